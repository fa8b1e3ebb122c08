//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over `server.log_level`. Production emits JSON lines,
//! every other environment compact text.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Builds the filter from `RUST_LOG`, falling back to `default_directives`.
pub fn env_filter(default_directives: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directives).map_err(|source| TelemetryError::EnvFilter {
            value: default_directives.to_string(),
            source,
        }),
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(server: &ServerConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(&server.log_level)?;

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .try_init()
            .map_err(TelemetryError::Subscriber)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init()
            .map_err(TelemetryError::Subscriber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_default_directive_is_reported() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let err = env_filter("info,tacticsphere=[").unwrap_err();
        assert!(matches!(err, TelemetryError::EnvFilter { .. }));
    }

    #[test]
    fn default_server_directives_parse() {
        let server = ServerConfig::default();
        assert!(EnvFilter::try_new(&server.log_level).is_ok());
    }
}
