//! Configuration management for the classification service.
//!
//! Every section has serde defaults, so a configuration file only needs the
//! keys it changes:
//!
//! ```rust
//! use oar_classify::core::config::AppConfig;
//!
//! let config: AppConfig = serde_json::from_str(r#"{
//!     "classifier": { "top_n": 3, "session_pool_size": 2 },
//!     "server": { "bind": "127.0.0.1:9000" }
//! }"#).unwrap();
//! assert_eq!(config.classifier.top_n, 3);
//! assert_eq!(config.classifier.model.input_name, "input");
//! ```

pub mod builder;
pub mod errors;
pub mod model_input;
pub mod onnx;
pub mod server;

pub use builder::{ClassifierConfig, DEFAULT_TOP_N};
pub use errors::{ConfigError, ConfigValidator};
pub use model_input::ModelInputConfig;
pub use onnx::*;
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Classifier and model settings.
    pub classifier: ClassifierConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Loads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.validate()?;
        self.server.validate()
    }
}
