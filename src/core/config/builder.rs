//! Classifier builder configuration.

use super::errors::{ConfigError, ConfigValidator};
use super::model_input::ModelInputConfig;
use super::onnx::OrtSessionConfig;
use serde::{Deserialize, Serialize};

/// Default number of labels returned per request.
pub const DEFAULT_TOP_N: usize = 5;

/// Upper bound on the session pool size; each session holds its own copy of
/// the model weights.
pub const MAX_SESSION_POOL_SIZE: usize = 64;

/// Configuration for building a [`crate::models::Classifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Name used in logs and error messages.
    pub model_name: String,
    /// Input contract of the graph.
    pub model: ModelInputConfig,
    /// Number of labels returned per request.
    pub top_n: usize,
    /// Number of independent ONNX Runtime sessions serving requests.
    pub session_pool_size: usize,
    /// ONNX Runtime session configuration (optional).
    pub ort_session: Option<OrtSessionConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_name: "inception".to_string(),
            model: ModelInputConfig::default(),
            top_n: DEFAULT_TOP_N,
            session_pool_size: 1,
            ort_session: None,
        }
    }
}

impl ClassifierConfig {
    /// Creates a new ClassifierConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model name.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Sets the model input contract.
    pub fn model(mut self, model: ModelInputConfig) -> Self {
        self.model = model;
        self
    }

    /// Sets the number of labels returned per request.
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sets the session pool size.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = size;
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn ort_session(mut self, config: OrtSessionConfig) -> Self {
        self.ort_session = Some(config);
        self
    }
}

impl ConfigValidator for ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive("top_n", self.top_n)?;
        self.validate_positive("session_pool_size", self.session_pool_size)?;
        self.validate_limit(
            "session_pool_size",
            self.session_pool_size,
            MAX_SESSION_POOL_SIZE,
        )?;
        self.model.validate()
    }
}
