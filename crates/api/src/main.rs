use anyhow::Context;

use beerstock_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    beerstock_observability::init();

    let config = AppConfig::from_env();

    let app = beerstock_api::app::build_app(&config)
        .await
        .context("failed to initialize beer store")?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
