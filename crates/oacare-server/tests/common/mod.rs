#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use oacare_core::models::user::Role;
use oacare_server::config::ServerConfig;
use oacare_server::state::AppState;
use oacare_storage::memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_SECRET: &str = "admin-secret";
pub const EXECUTIVE_SECRET: &str = "executive-secret";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let config = ServerConfig::from_lookup(|var| match var {
            "ADMIN_SECRET" => Some(ADMIN_SECRET.to_string()),
            "EXECUTIVE_SECRET" => Some(EXECUTIVE_SECRET.to_string()),
            "JWT_SECRET" => Some("test-secret".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        let router = oacare_server::app(state.clone());
        Self { state, router }
    }

    pub fn token(&self, role: Role) -> String {
        let user_id = match role {
            Role::Admin => "USR901",
            Role::Executive => "USR902",
            Role::User => "USR903",
        };
        self.state.keys.issue(user_id, role.as_str(), role).unwrap()
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Register a person and return the new elderly id.
    pub async fn create_elderly(&self, token: &str, body: Value) -> String {
        let res = self.post("/elderly", token, body).await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["id"].as_str().unwrap().to_string()
    }
}

pub fn elderly_body(name: &str, citizen_id: Option<&str>, birth_date: &str, gender: &str) -> Value {
    json!({
        "name": name,
        "phone": "0812345678",
        "citizenID": citizen_id,
        "birthDate": birth_date,
        "gender": gender,
        "address": {
            "street": "12 Moo 3",
            "subdistrict": "Nai Mueang",
            "district": "Mueang",
            "province": "Buriram"
        }
    })
}
