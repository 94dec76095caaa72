//! Trait definitions for the classification pipeline.

pub mod granular;

pub use granular::InferenceEngine;
