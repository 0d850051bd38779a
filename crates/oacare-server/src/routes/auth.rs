use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use oacare_audit::events::{Action, AuditEvent, Resource};
use oacare_auth::jwt::TOKEN_TTL;
use oacare_auth::password::{hash_password, verify_password};
use oacare_core::models::user::{Role, normalize_username};
use oacare_storage::users;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::auth::{MaybeAuthUser, TOKEN_COOKIE};
use crate::routes::required;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// bcrypt is CPU-bound; keep it off the async workers.
pub(crate) async fn hash_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

pub(crate) fn parse_role(raw: Option<&str>) -> Result<Role, ApiError> {
    Role::parse(required("role", raw)?)
        .ok_or_else(|| ApiError::BadRequest("role must be admin, executive or user".to_string()))
}

/// Admin and executive self-registration needs the matching role secret.
fn check_role_secret(config: &ServerConfig, role: Role, provided: Option<&str>) -> Result<(), ApiError> {
    let expected = match role {
        Role::Admin => config.admin_secret.as_deref(),
        Role::Executive => config.executive_secret.as_deref(),
        Role::User => return Ok(()),
    };
    match expected {
        None => Err(ApiError::Forbidden(format!("registration as {role} is disabled"))),
        Some(expected) if provided == Some(expected) => Ok(()),
        Some(_) => Err(ApiError::Forbidden(format!("invalid secret for role {role}"))),
    }
}

fn session_cookie(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!("{TOKEN_COOKIE}={value}; HttpOnly; Path=/; Max-Age={max_age_secs}; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let username = normalize_username(required("username", req.username.as_deref())?)?;
    let password = required("password", req.password.as_deref())?.to_string();
    let role = parse_role(req.role.as_deref())?;
    check_role_secret(&state.config, role, req.secret.as_deref())?;

    let password_hash = hash_blocking(password).await?;
    let user = users::register(state.store(), &username, password_hash, role).await?;

    AuditEvent::new(Action::Register, Resource::User, &user.id)
        .by(&user.id, user.role)
        .emit();

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "registered", "userID": user.id, "role": user.role })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    let username = required("username", req.username.as_deref())?;
    let password = required("password", req.password.as_deref())?.to_string();

    let user = match normalize_username(username) {
        Ok(username) => users::find_by_username(state.store(), &username).await?,
        Err(_) => None,
    }
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    if !verify_blocking(password, user.password_hash.clone()).await? {
        return Err(ApiError::Unauthorized("invalid password".to_string()));
    }

    let token = state.keys.issue(&user.id, &user.username, user.role)?;
    AuditEvent::new(Action::Login, Resource::Session, &user.id)
        .by(&user.id, user.role)
        .emit();

    let cookie = session_cookie(&token, TOKEN_TTL.as_secs(), state.config.cookie_secure);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(json!({ "message": "login successful", "role": user.role, "token": token })),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, MaybeAuthUser(principal): MaybeAuthUser) -> Response {
    if let Some(p) = principal {
        AuditEvent::new(Action::Logout, Resource::Session, &p.user_id)
            .by(&p.user_id, p.role)
            .emit();
    }
    let cookie = session_cookie("", 0, state.config.cookie_secure);
    ([(SET_COOKIE, cookie)], Json(json!({ "message": "logged out" }))).into_response()
}

pub async fn session(MaybeAuthUser(principal): MaybeAuthUser) -> Json<serde_json::Value> {
    Json(match principal {
        None => json!({ "isLoggedIn": false }),
        Some(p) => json!({
            "isLoggedIn": true,
            "userID": p.user_id,
            "username": p.username,
            "role": p.role,
            "iat": p.issued_at,
            "exp": p.expires_at,
        }),
    })
}
