//! Structures and helpers for ONNX Runtime inference.
//!
//! [`OrtInfer`] owns the imported graph and its session pool and implements
//! [`crate::core::traits::InferenceEngine`].

pub mod ort_infer;

pub use ort_infer::OrtInfer;
