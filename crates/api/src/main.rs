//! `rh-api` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging.
//! 3. Register the database context ([`DbContext`]).
//! 4. Build the shared application state and the request pipeline.
//! 5. If TLS is configured, spawn the HTTPS listener.
//! 6. Bind the HTTP listener and serve until a shutdown signal arrives.
//!
//! Any failure in steps 1-5 is fatal; the process never starts serving.

mod config;
mod controllers;
mod db;
mod server;
mod telemetry;

use anyhow::{Context, Result};
use tracing::{error, info};

use config::Config;
use db::DbContext;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %cfg.environment,
        http_port = cfg.http_port,
        "rh-api starting"
    );

    // -----------------------------------------------------------------------
    // 3. Database context
    // -----------------------------------------------------------------------
    let db = DbContext::register(&cfg.conexao_padrao)?;

    // -----------------------------------------------------------------------
    // 4. Application state + request pipeline
    // -----------------------------------------------------------------------
    let state = AppState::new(db, &cfg)?;
    let router = server::router::build(state);

    // -----------------------------------------------------------------------
    // 5. HTTPS listener (optional)
    // -----------------------------------------------------------------------
    if let (Some(cert_path), Some(key_path)) = (&cfg.tls_cert_path, &cfg.tls_key_path) {
        let cert_pem = std::fs::read(cert_path)
            .with_context(|| format!("failed to read TLS certificate from {cert_path}"))?;
        let key_pem = std::fs::read(key_path)
            .with_context(|| format!("failed to read TLS private key from {key_path}"))?;
        let tls_config = server::tls::build_server_config(&cert_pem, &key_pem)?;

        // Bound here so a bind failure aborts startup instead of being
        // swallowed inside the accept task.
        let https_addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.https_port).into();
        let https_listener = server::tls::bind(https_addr).await?;
        let https_app = router.clone();
        tokio::spawn(async move {
            if let Err(e) = server::tls::serve(https_listener, tls_config, https_app).await {
                error!(error = %e, "https listener failed");
            }
        });
    }

    // -----------------------------------------------------------------------
    // 6. HTTP listener
    // -----------------------------------------------------------------------
    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.http_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolve when the process receives SIGINT or SIGTERM. In-flight requests
/// drain before the server exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
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
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received, draining in-flight requests");
}
