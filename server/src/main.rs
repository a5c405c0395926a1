use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use todo_core::TodoService;
use todo_server::{telemetry, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    let store = todo_server::open_store(&config.storage)
        .await
        .context("failed to open todo store")?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, log_format = %config.log_format, "listening");

    todo_server::run(listener, TodoService::new(store)).await?;
    Ok(())
}
