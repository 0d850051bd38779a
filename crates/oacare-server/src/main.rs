use std::env;
use std::sync::Arc;

use oacare_server::config::{ServerConfig, StorageBackend};
use oacare_server::state::AppState;
use oacare_storage::memory::MemoryStore;
use oacare_storage::s3::S3Store;
use oacare_storage::store::ObjectStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(eyre::eyre!("failed to load .env: {e}"));
    }

    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set, using the development secret");
    }

    let store: Arc<dyn ObjectStore> = match &config.storage {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::S3 { bucket } => {
            tracing::info!(bucket = %bucket, "using S3 storage");
            Arc::new(S3Store::from_env(bucket.clone()).await)
        }
    };

    let bind = config.bind.clone();
    let app = oacare_server::app(AppState::new(store, config));

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
    } else {
        let listener = tokio::net::TcpListener::bind(&bind).await?;
        tracing::info!(addr = %bind, "listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
