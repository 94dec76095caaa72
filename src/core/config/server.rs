//! HTTP server configuration.

use super::errors::{ConfigError, ConfigValidator};
use serde::{Deserialize, Serialize};

/// Settings for the HTTP front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
    /// Timeout for fetching a remote image, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Maximum size of a fetched remote image, in bytes.
    pub max_fetch_bytes: usize,
    /// Deadline for normalize, infer and rank of one request, in
    /// milliseconds. `None` disables the deadline.
    pub request_deadline_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            body_limit_bytes: 16 * 1024 * 1024,
            fetch_timeout_ms: 10_000,
            max_fetch_bytes: 16 * 1024 * 1024,
            request_deadline_ms: Some(30_000),
        }
    }
}

impl ServerConfig {
    /// Returns the fetch timeout as a duration.
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Returns the request deadline as a duration, if enabled.
    pub fn request_deadline(&self) -> Option<std::time::Duration> {
        self.request_deadline_ms
            .map(std::time::Duration::from_millis)
    }
}

impl ConfigValidator for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind
            .parse::<std::net::SocketAddr>()
            .map_err(|e| ConfigError::InvalidConfig {
                message: format!("bind address '{}' is invalid: {}", self.bind, e),
            })?;
        self.validate_positive("body_limit_bytes", self.body_limit_bytes)?;
        self.validate_positive("max_fetch_bytes", self.max_fetch_bytes)?;
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "fetch_timeout_ms must be greater than 0".to_string(),
            });
        }
        if self.request_deadline_ms == Some(0) {
            return Err(ConfigError::InvalidConfig {
                message: "request_deadline_ms must be greater than 0 when set".to_string(),
            });
        }
        Ok(())
    }
}
