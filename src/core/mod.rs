//! The core module of the classification pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Tensor type aliases
//! - Configuration management
//! - Error handling
//! - ONNX Runtime inference engine
//! - The [`InferenceEngine`] trait seam

pub mod batch;
pub mod config;
pub mod errors;
pub mod inference;
pub mod traits;

pub use batch::{ProbabilityVector, Tensor3D, Tensor4D};
pub use config::{AppConfig, ClassifierConfig, ConfigError, ModelInputConfig, ServerConfig};
pub use errors::{ClassifyError, ProcessingStage};
pub use inference::OrtInfer;
pub use traits::InferenceEngine;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
