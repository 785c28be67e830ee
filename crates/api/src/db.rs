//! Database context registration.
//!
//! The bootstrapper owns no queries; it registers a single context handle and
//! hands it to controllers through the application state.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Handle to the relational backend, registered exactly once at startup.
///
/// The underlying pool is created lazily: the connection string is parsed at
/// registration time (a malformed string is a fatal startup fault) but no
/// connection is opened until a controller first acquires one. Cloning is
/// cheap; every clone refers to the same pool.
#[derive(Debug, Clone)]
pub struct DbContext {
    pool: PgPool,
}

impl DbContext {
    /// Register the database context for this process.
    ///
    /// # Errors
    ///
    /// Returns an error if `connection_string` cannot be parsed. Connectivity
    /// problems surface later, on first use, as per-request faults.
    pub fn register(connection_string: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .connect_lazy(connection_string)
            .context("invalid connection string in CONEXAO_PADRAO")?;
        Ok(Self { pool })
    }

    /// Pool handle for resource controllers to run their queries against.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lazy pool construction grabs the ambient runtime handle, so the
    // success-path tests need a Tokio context.
    #[tokio::test]
    async fn register_accepts_well_formed_connection_string() {
        // Lazy registration must succeed without a reachable server.
        let ctx = DbContext::register("postgres://rh:rh@localhost:5432/rh").unwrap();
        assert!(!ctx.pool().is_closed());
    }

    #[test]
    fn register_rejects_malformed_connection_string() {
        assert!(DbContext::register("Server=tcp:db;Database=RH").is_err());
    }

    #[tokio::test]
    async fn clones_share_the_same_pool() {
        let ctx = DbContext::register("postgres://localhost/rh").unwrap();
        let clone = ctx.clone();
        assert_eq!(ctx.pool().size(), clone.pool().size());
    }
}
