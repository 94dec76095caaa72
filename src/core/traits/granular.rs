//! Granular traits for composable classifier components.
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │Normalizer   │───▶│InferenceEng │───▶│Ranker       │
//! │• normalize  │    │• infer      │    │• rank       │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! The inference engine is the only component shared across requests, so it
//! is the one behind a trait: handlers hold it as `dyn InferenceEngine` and
//! tests substitute a deterministic fake graph.
//!
//! ```rust
//! use oar_classify::core::{ClassifyError, InferenceEngine, ProbabilityVector, Tensor4D};
//!
//! #[derive(Debug)]
//! struct Uniform(usize);
//!
//! impl InferenceEngine for Uniform {
//!     fn infer(&self, _input: &Tensor4D) -> Result<ProbabilityVector, ClassifyError> {
//!         Ok(vec![1.0 / self.0 as f32; self.0])
//!     }
//!
//!     fn engine_info(&self) -> String {
//!         "uniform".to_string()
//!     }
//! }
//!
//! let engine = Uniform(4);
//! let probabilities = engine.infer(&Tensor4D::zeros((1, 2, 2, 3))).unwrap();
//! assert_eq!(probabilities.len(), 4);
//! ```

use crate::core::{ClassifyError, ProbabilityVector, Tensor4D};
use std::fmt::Debug;

/// Trait for inference engine operations.
///
/// Implementations must be safe to call concurrently from many requests:
/// each call supplies its own input and receives its own output, and no call
/// may mutate state observed by another call.
pub trait InferenceEngine: Send + Sync + Debug {
    /// Runs the graph on one normalized tensor and returns the output vector
    /// with the batch dimension stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InferenceFailure`] when execution fails, for
    /// example because the tensor shape does not match the graph input.
    fn infer(&self, input: &Tensor4D) -> Result<ProbabilityVector, ClassifyError>;

    /// Describes the engine (backend, model) for logs and health output.
    fn engine_info(&self) -> String;

    /// Validates that the input is suitable for inference.
    fn validate_inference_input(&self, input: &Tensor4D) -> Result<(), ClassifyError> {
        if input.shape()[0] != 1 {
            return Err(ClassifyError::inference_failure(
                &self.engine_info(),
                "input_validation",
                input.shape(),
                "only single-image batches are supported",
                crate::core::errors::OpaqueError("batch dimension must be 1".to_string()),
            ));
        }
        Ok(())
    }
}
