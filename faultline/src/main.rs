#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use args::Args;
use axum::Router;
use axum::routing::get;
use clap::Parser;
use config::Config;
use faultline_core::ExceptionFilter;
use faultline_server::{TracingSink, with_error_filter};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(
        config_path = %args.config.display(),
        "starting faultline"
    );

    let filter = Arc::new(ExceptionFilter::new(config.filter.clone(), Arc::new(TracingSink)));

    // Demo routes: /slow exceeds any configured request timeout so the
    // normalized 500 shape can be observed end to end
    let app = Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                "done"
            }),
        )
        .layer(TraceLayer::new_for_http());
    let app = with_error_filter(app, filter)?;

    let listen_address = args
        .listen
        .or(config.listen_address)
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    let listener = tokio::net::TcpListener::bind(listen_address).await?;
    tracing::info!(%listen_address, "faultline listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("faultline stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
