//! Optional HTTPS listener using rustls.
//!
//! When both `TLS_CERT_PATH` and `TLS_KEY_PATH` are configured, the
//! bootstrapper binds a second listener that terminates TLS itself and serves
//! the same router as the plain-HTTP listener.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Extension, Router};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use rustls::ServerConfig;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info};

use super::middleware::ConnectionScheme;

/// Build a [`rustls::ServerConfig`] from PEM-encoded certificate and private
/// key bytes.
///
/// # Errors
///
/// Returns an error if the certificate or key cannot be parsed, or if rustls
/// rejects the configuration.
pub fn build_server_config(cert_pem: &[u8], key_pem: &[u8]) -> Result<Arc<ServerConfig>> {
    let certs = rustls_pemfile::certs(&mut std::io::BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse TLS certificate chain")?;

    let key = rustls_pemfile::private_key(&mut std::io::BufReader::new(key_pem))
        .context("failed to read TLS private key")?
        .context("no private key found in PEM data")?;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("failed to build rustls ServerConfig")?;

    Ok(Arc::new(config))
}

/// Bind the HTTPS listener.
///
/// Called during startup, before any listener serves, so a bind failure is a
/// fatal startup fault rather than a logged warning inside the accept task.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTPS listener on {addr}"))
}

/// Accept TLS connections on `listener` and serve `router` over them.
///
/// Requests accepted here are marked [`ConnectionScheme::Https`] so the
/// redirect stage lets them through. Runs until the process exits.
///
/// # Errors
///
/// Returns an error if the accept loop fails.
pub async fn serve(listener: TcpListener, config: Arc<ServerConfig>, router: Router) -> Result<()> {
    let app = router.layer(Extension(ConnectionScheme::Https));
    let acceptor = TlsAcceptor::from(config);
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "https listener bound");
    }

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("failed to accept TLS connection")?;
        let acceptor = acceptor.clone();
        let app = app.clone();

        tokio::spawn(async move {
            match acceptor.accept(stream).await {
                Ok(tls_stream) => {
                    let service = TowerToHyperService::new(app);
                    if let Err(e) = Builder::new(TokioExecutor::new())
                        .serve_connection_with_upgrades(TokioIo::new(tls_stream), service)
                        .await
                    {
                        debug!(peer = %peer, error = %e, "connection closed with error");
                    }
                }
                Err(e) => debug!(peer = %peer, error = %e, "TLS handshake failed"),
            }
        });
    }
}
