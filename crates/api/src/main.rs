use std::sync::Arc;

use anyhow::Context;

use shelflife_api::app::{build_app, services::build_services};
use shelflife_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelflife_observability::init();

    let config = ApiConfig::from_env()?;
    let services = Arc::new(build_services(config.seed_sample_data)?);
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
