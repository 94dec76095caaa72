//! Error types for the classification pipeline.
//!
//! The three request-time failure kinds of the core pipeline are
//! [`ClassifyError::InvalidImage`], [`ClassifyError::InferenceFailure`] and
//! [`ClassifyError::InsufficientLabels`]. The remaining variants cover startup
//! concerns (model loading, configuration, IO).

use thiserror::Error;

/// Stage of the preprocessing path where an image was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// The payload could not be decoded into pixels.
    Decode,
    /// The decoded pixels could not be resized to the model input.
    Resize,
    /// The resized pixels could not be assembled into a tensor.
    Normalization,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decode => write!(f, "decode"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Normalization => write!(f, "normalization"),
        }
    }
}

/// Errors produced while classifying an image or while setting up the classifier.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The input bytes are empty or could not be turned into an image tensor.
    #[error("invalid image ({stage}): {message}")]
    InvalidImage {
        /// Where the image was rejected.
        stage: ProcessingStage,
        /// Human readable reason.
        message: String,
        /// Underlying decoder error, if any.
        #[source]
        source: Option<image::ImageError>,
    },

    /// The inference engine reported a fault. This indicates a pipeline or
    /// model defect rather than bad user input.
    #[error("inference failed for model '{model_name}' during {operation}: {context}")]
    InferenceFailure {
        /// Name of the model that failed.
        model_name: String,
        /// Operation that failed (tensor conversion, forward pass, extraction).
        operation: String,
        /// Shape of the tensor that was supplied.
        input_shape: Vec<usize>,
        /// Additional context.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The label table holds no labels, so nothing can be ranked.
    #[error("label table is empty")]
    InsufficientLabels,

    /// The model could not be loaded into an inference session.
    #[error("failed to load model '{model_name}': {context}")]
    ModelLoad {
        /// Name of the model.
        model_name: String,
        /// Additional context.
        context: String,
        /// Optional hint for fixing the problem.
        suggestion: Option<String>,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A configuration value is invalid.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Error carrying only a rendered message.
///
/// ONNX Runtime errors are rendered into this type before being chained so
/// the source stays `Send + Sync + 'static`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueError(pub String);

impl OpaqueError {
    /// Renders any displayable error into an `OpaqueError`.
    pub fn from_display(error: impl std::fmt::Display) -> Self {
        Self(error.to_string())
    }
}

impl std::fmt::Display for OpaqueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for OpaqueError {}
