//! Error types for the classification pipeline.
//!
//! # Usage
//!
//! ```rust
//! use oar_classify::core::errors::{ClassifyError, ProcessingStage};
//!
//! let error = ClassifyError::invalid_image(ProcessingStage::Resize, "image has zero width");
//! assert!(error.is_client_error());
//! ```

pub mod constructors;
pub mod types;

pub use types::{ClassifyError, OpaqueError, ProcessingStage};
