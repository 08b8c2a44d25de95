use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cine_recomendador::{
    api::{create_router, AppState},
    config::Config,
    store::Dataset,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;

    // The dataset must load before the server accepts any request
    let dataset_path = config.dataset_path()?;
    let dataset = Dataset::load(&dataset_path, &config.feature_schema())
        .with_context(|| format!("Failed to load dataset from {}", dataset_path.display()))?;

    tracing::info!(
        path = %dataset_path.display(),
        records = dataset.len(),
        features = dataset.feature_columns().len(),
        "Dataset loaded"
    );

    let state = AppState::new(dataset);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
