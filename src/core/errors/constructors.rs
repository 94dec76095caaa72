//! Error constructor utilities for the classification pipeline.
//!
//! These helpers keep error construction uniform across the preprocessing,
//! inference and ranking stages.
//!
//! ```rust
//! use oar_classify::core::ClassifyError;
//!
//! let error = ClassifyError::empty_image();
//! assert!(error.is_client_error());
//!
//! let error = ClassifyError::config_error("top_n must be greater than 0");
//! assert!(!error.is_client_error());
//! ```

use super::types::{ClassifyError, OpaqueError, ProcessingStage};

impl ClassifyError {
    /// Creates an `InvalidImage` error for a zero-length payload.
    pub fn empty_image() -> Self {
        Self::InvalidImage {
            stage: ProcessingStage::Decode,
            message: "image payload is empty".to_string(),
            source: None,
        }
    }

    /// Creates an `InvalidImage` error for a payload the decoder rejected.
    pub fn decode_error(format: impl std::fmt::Display, error: image::ImageError) -> Self {
        Self::InvalidImage {
            stage: ProcessingStage::Decode,
            message: format!("failed to decode payload as {format}"),
            source: Some(error),
        }
    }

    /// Creates an `InvalidImage` error for a stage other than decoding.
    pub fn invalid_image(stage: ProcessingStage, message: impl Into<String>) -> Self {
        Self::InvalidImage {
            stage,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an `InferenceFailure` with full model context.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model that failed.
    /// * `operation` - The operation that failed.
    /// * `input_shape` - Shape of the supplied tensor.
    /// * `context` - Additional context about the failure.
    /// * `error` - The underlying error.
    pub fn inference_failure(
        model_name: &str,
        operation: &str,
        input_shape: &[usize],
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InferenceFailure {
            model_name: model_name.to_string(),
            operation: operation.to_string(),
            input_shape: input_shape.to_vec(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an `InferenceFailure` from an ONNX Runtime error, rendering it
    /// into an [`OpaqueError`].
    pub fn ort_failure(
        model_name: &str,
        operation: &str,
        input_shape: &[usize],
        context: &str,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::inference_failure(
            model_name,
            operation,
            input_shape,
            context,
            OpaqueError::from_display(error),
        )
    }

    /// Creates a `ModelLoad` error.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model being loaded.
    /// * `context` - What was being attempted.
    /// * `suggestion` - Optional hint for the operator.
    /// * `error` - The underlying error, rendered for display.
    pub fn model_load_error(
        model_name: &str,
        context: &str,
        suggestion: Option<&str>,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::ModelLoad {
            model_name: model_name.to_string(),
            context: context.to_string(),
            suggestion: suggestion.map(str::to_string),
            source: Box::new(OpaqueError::from_display(error)),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a configuration error naming the offending field.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }

    /// Returns true when the error was caused by the caller's input rather
    /// than by the service or its configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidImage { .. })
    }
}

impl From<crate::core::config::ConfigError> for ClassifyError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
