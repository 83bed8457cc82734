use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use spa_admin::config::AppConfig;
use spa_admin::db;
use spa_admin::services::assets::LocalAssetStore;
use spa_admin::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(!config.session_secret.is_empty(), "SESSION_SECRET must not be empty");
    if config.uses_default_credentials() {
        tracing::warn!("default ADMIN_PASSWORD or SESSION_SECRET in use, set both before deploying");
    }

    let conn = db::init_db(&config.database_url)?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!(
        "serving uploads from {} at {}",
        config.upload_dir,
        config.upload_url
    );
    let assets = LocalAssetStore::new(
        config.upload_dir.clone(),
        "services",
        config.upload_url.clone(),
        config.max_upload_bytes,
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        assets: Box::new(assets),
    });

    let app = spa_admin::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
