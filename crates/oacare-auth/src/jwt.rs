use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use oacare_core::models::user::Role;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Session lifetime.
pub const TOKEN_TTL: SignedDuration = SignedDuration::from_secs(86_400);

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id (`USR###`).
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// The verified identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<SessionClaims> for Principal {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// HMAC keys for issuing and verifying session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, user_id: &str, username: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(user_id, username, role, Timestamp::now())
    }

    /// Issue a token as of `issued_at`, expiring one day later.
    pub fn issue_at(
        &self,
        user_id: &str,
        username: &str,
        role: Role,
        issued_at: Timestamp,
    ) -> Result<String, AuthError> {
        let iat = issued_at.as_second();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            iat,
            exp: iat + TOKEN_TTL.as_secs(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify an optional raw token.
    ///
    /// Missing or blank tokens are `Unauthenticated`, a past `exp` is
    /// `Expired`, anything else that fails to decode is `InvalidCredential`.
    pub fn verify(&self, token: Option<&str>) -> Result<Principal, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthenticated)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidCredential(e.to_string()),
        })?;

        Ok(data.claims.into())
    }
}
