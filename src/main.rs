use std::sync::Arc;

use anyhow::Context;
use log::info;
use tokio::net::TcpListener;

use house_price::{Artifacts, ServiceConfig, service};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter()),
    )
    .init();

    let artifacts = Artifacts::load(&config.model_path, &config.columns_path)
        .context("failed to load model artifacts")?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening at {addr}");

    service::serve(listener, Arc::new(artifacts)).await?;
    info!("wrapping up");

    Ok(())
}
