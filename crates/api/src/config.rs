//! Configuration loading and validation for the API service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or
//! invalid; the loaded configuration is immutable for the process lifetime.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment the service runs in.
///
/// Controls only where the documentation UI is mounted: at `/swagger` in
/// development, at the application root in production. The machine-readable
/// schema endpoint is identical in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Connection string for the relational backend, read from
    /// `CONEXAO_PADRAO` (the deployment's historical key name). **Required.**
    pub conexao_padrao: String,

    /// Runtime environment name (`development` / `production`).
    #[serde(default)]
    pub environment: Environment,

    /// Port the plain-HTTP listener binds to.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Port plain-HTTP requests are redirected to, and the HTTPS listener
    /// port when TLS is configured.
    #[serde(default = "default_https_port")]
    pub https_port: u16,

    /// Whether the documentation endpoints are mounted at all. The upstream
    /// behaviour serves documentation in every environment; this knob makes
    /// that decision explicit instead of burying it in an environment branch.
    #[serde(default = "default_serve_docs")]
    pub serve_docs: bool,

    /// Filesystem path to a PEM-encoded TLS certificate chain. Optional; must
    /// be set together with `TLS_KEY_PATH` to enable the HTTPS listener.
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    /// Filesystem path to the matching PEM-encoded TLS private key.
    #[serde(default)]
    pub tls_key_path: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_http_port() -> u16 {
    8080
}
fn default_https_port() -> u16 {
    443
}
fn default_serve_docs() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.conexao_padrao, "CONEXAO_PADRAO")?;

        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(_), None) => {
                anyhow::bail!("TLS_CERT_PATH is set but TLS_KEY_PATH is missing");
            }
            (None, Some(_)) => {
                anyhow::bail!("TLS_KEY_PATH is set but TLS_CERT_PATH is missing");
            }
            _ => {}
        }

        if self.tls_enabled() && self.http_port == self.https_port {
            anyhow::bail!("HTTP_PORT and HTTPS_PORT must differ when TLS is enabled");
        }
        Ok(())
    }

    /// Whether an HTTPS listener should be bound alongside the HTTP one.
    pub fn tls_enabled(&self) -> bool {
        self.tls_cert_path.is_some() && self.tls_key_path.is_some()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            conexao_padrao: "postgres://rh:rh@localhost:5432/rh".into(),
            environment: Environment::default(),
            http_port: default_http_port(),
            https_port: default_https_port(),
            serve_docs: default_serve_docs(),
            tls_cert_path: None,
            tls_key_path: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_http_port(), 8080);
        assert_eq!(default_https_port(), 443);
        assert!(default_serve_docs());
        assert_eq!(default_log_level(), "info");
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_connection_string() {
        let cfg = Config {
            conexao_padrao: "   ".into(),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_cert_without_key() {
        let cfg = Config {
            tls_cert_path: Some("/etc/rh-api/tls.crt".into()),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_key_without_cert() {
        let cfg = Config {
            tls_key_path: Some("/etc/rh-api/tls.key".into()),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_colliding_ports_when_tls_enabled() {
        let cfg = Config {
            tls_cert_path: Some("/etc/rh-api/tls.crt".into()),
            tls_key_path: Some("/etc/rh-api/tls.key".into()),
            http_port: 8443,
            https_port: 8443,
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn environment_deserialises_from_lowercase() {
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(env, Environment::Production);
        assert_eq!(env.to_string(), "production");
    }
}
