//! Server startup and graceful shutdown

use anyhow::Result;
use avscan_core::constants::{PLUGIN_CATEGORY, PLUGIN_NAME};
use avscan_core::Config;
use axum::Router;
use std::future::Future;
use std::io;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        plugin = PLUGIN_NAME,
        category = PLUGIN_CATEGORY,
        addr = %addr,
        staging_dir = %config.staging_dir.display(),
        max_upload_mb = config.max_upload_size_bytes / 1024 / 1024,
        "Web service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Interrupt,
    Terminate,
}

async fn shutdown_signal() {
    let reason = first_signal(tokio::signal::ctrl_c(), terminate_signal()).await;
    tracing::info!(?reason, "Shutdown requested, draining in-flight scans");
}

#[cfg(unix)]
async fn terminate_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_signal() {
    std::future::pending::<()>().await;
}

/// Whichever signal fires first. A Ctrl+C listener that fails to install
/// never fires.
async fn first_signal<I, T>(interrupt: I, terminate: T) -> ShutdownReason
where
    I: Future<Output = io::Result<()>>,
    T: Future<Output = ()>,
{
    let interrupt = async {
        if let Err(e) = interrupt.await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = interrupt => ShutdownReason::Interrupt,
        _ = terminate => ShutdownReason::Terminate,
    }
}
