use anyhow::Context;

use freshcart_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    freshcart_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.using_dev_jwt_secret {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let app = freshcart_api::app::build_app(&config)
        .await
        .context("failed to initialise stores")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
