use std::sync::Arc;

use oacare_auth::jwt::SessionKeys;
use oacare_storage::store::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub config: Arc<ServerConfig>,
    pub keys: SessionKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>, config: ServerConfig) -> Self {
        let keys = SessionKeys::from_secret(config.jwt_secret.as_bytes());
        Self {
            store,
            config: Arc::new(config),
            keys,
        }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }
}
