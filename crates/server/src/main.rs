// ABOUTME: Entry point for the ofd-server HTTP service.
// ABOUTME: Parses configuration, initialises logging and serves until Ctrl-C or SIGTERM.

use anyhow::Context;
use clap::Parser;
use ofd_server::{app, AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::parse();
    if config.uses_default_credentials() {
        warn!("using default Basic auth credentials; set BASIC_AUTH_USERNAME and BASIC_AUTH_PASSWORD");
    }

    let extractor = config.build_extractor()?;
    let state = AppState::new(extractor, config.credentials());
    let router = app(state, config.max_body_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, layout = %config.layout, max_body_bytes = config.max_body_bytes, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
