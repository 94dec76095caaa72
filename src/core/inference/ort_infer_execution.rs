use super::*;
use crate::core::errors::OpaqueError;
use crate::core::traits::InferenceEngine;
use crate::core::{ProbabilityVector, Tensor4D};
use ort::value::TensorRef;
use std::sync::atomic::Ordering;

impl OrtInfer {
    /// Runs the graph on one tensor and returns the output with the batch
    /// dimension stripped.
    pub fn infer_probabilities(&self, x: &Tensor4D) -> Result<ProbabilityVector, ClassifyError> {
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifyError::ort_failure(
                &self.model_name,
                "tensor_conversion",
                &input_shape,
                &format!("Failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            ClassifyError::inference_failure(
                &self.model_name,
                "session_lock",
                &input_shape,
                &format!(
                    "Failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
                OpaqueError("Session lock poisoned".to_string()),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifyError::ort_failure(
                &self.model_name,
                "forward_pass",
                &input_shape,
                &format!(
                    "ONNX Runtime inference failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::ort_failure(
                    &self.model_name,
                    "output_extraction",
                    &input_shape,
                    &format!("Failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;
        let dims: Vec<i64> = output_shape.iter().copied().collect();

        strip_batch_dimension(&dims, output_data).map_err(|reason| {
            ClassifyError::inference_failure(
                &self.model_name,
                "output_validation",
                &input_shape,
                &format!("Unexpected output shape {:?}", dims),
                OpaqueError(reason),
            )
        })
    }
}

impl InferenceEngine for OrtInfer {
    fn infer(&self, input: &Tensor4D) -> Result<ProbabilityVector, ClassifyError> {
        self.validate_inference_input(input)?;
        self.infer_probabilities(input)
    }

    fn engine_info(&self) -> String {
        format!(
            "ONNXRuntime({}, {} session(s), {} -> {})",
            self.model_name(),
            self.pool_size(),
            self.input_name(),
            self.output_name()
        )
    }
}

/// Views a `[1, L]` (or `[L]`) output as a flat vector of length `L`.
///
/// Any leading dimensions must be 1; the element count must match the shape.
pub(crate) fn strip_batch_dimension(
    shape: &[i64],
    data: &[f32],
) -> Result<ProbabilityVector, String> {
    let Some((&classes, leading)) = shape.split_last() else {
        return Err("output tensor is a scalar".to_string());
    };
    if let Some(dim) = leading.iter().find(|&&d| d != 1) {
        return Err(format!(
            "expected a single-image output, found leading dimension {dim}"
        ));
    }
    if classes < 0 || classes as usize != data.len() {
        return Err(format!(
            "output data size mismatch: shape declares {classes} values, got {}",
            data.len()
        ));
    }
    Ok(data.to_vec())
}
