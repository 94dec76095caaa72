//! Core ONNX Runtime inference engine with a pool of independent sessions.

use crate::core::errors::ClassifyError;
use ort::{session::Session, value::ValueType};
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

/// Loaded inference graph plus the sessions bound to it.
///
/// The graph is imported once per session at construction and never
/// modified afterwards. Requests pick a session round-robin and hold its lock
/// only for the duration of one run, so `session_pool_size` requests can
/// execute in parallel and no two requests ever share a session's execution
/// state.
pub struct OrtInfer {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: AtomicUsize,
    pub(super) input_name: String,
    pub(super) output_name: String,
    pub(super) model_path: Option<std::path::PathBuf>,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Attempts to retrieve the primary input tensor shape from the first session.
    ///
    /// Returns a vector of dimensions if available. Dynamic dimensions (e.g., -1)
    /// are returned as-is.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session_mutex = self.sessions.first()?;
        let session_guard = session_mutex.lock().ok()?;
        let input = session_guard
            .inputs
            .iter()
            .find(|input| input.name == self.input_name)?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Returns the number of sessions in the pool.
    pub fn pool_size(&self) -> usize {
        self.sessions.len()
    }

    /// Returns the resolved input node name.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Returns the resolved output node name.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns the model path, when the model was loaded from disk.
    pub fn model_path(&self) -> Option<&std::path::Path> {
        self.model_path.as_deref()
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

pub(crate) fn require_sessions(model_name: &str, pool_size: usize) -> Result<(), ClassifyError> {
    if pool_size == 0 {
        return Err(ClassifyError::config_error_with_context(
            "session_pool_size",
            "0",
            &format!("model '{model_name}' needs at least one session"),
        ));
    }
    Ok(())
}
