use marquee_api::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    marquee_observability::init();

    let config = GatewayConfig::from_env()?;
    let app = marquee_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
