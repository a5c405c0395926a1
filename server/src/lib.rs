//! HTTP server for the todo service.
//!
//! # Overview
//! Wires `todo_core::TodoService` to an axum router and supplies the storage
//! backends: SQLite through `sqlx` for real deployments, or the core's
//! `MemoryStore`.
//!
//! # Design
//! - `router` is a plain function of a `TodoService`, so tests drive it with
//!   `tower::ServiceExt::oneshot` against any store.
//! - `run` serves until Ctrl-C or SIGTERM and then drains in-flight requests.

pub mod config;
pub mod response;
pub mod routes;
pub mod sqlite;
pub mod telemetry;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use todo_core::{MemoryStore, TodoService, TodoStore};

pub use config::{ServerConfig, StorageConfig};
pub use routes::router;
pub use sqlite::SqliteStore;

/// Build the store described by `config`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn TodoStore>, sqlx::Error> {
    match config {
        StorageConfig::Memory => {
            info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageConfig::Sqlite {
            url,
            max_connections,
        } => {
            info!(%url, "using sqlite store");
            Ok(Arc::new(SqliteStore::connect(url, *max_connections).await?))
        }
    }
}

pub async fn run(listener: TcpListener, service: TodoService) -> Result<(), std::io::Error> {
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
