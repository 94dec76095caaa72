//! Tensor types exchanged between the pipeline stages.

/// Normalized image tensor, `[1, H, W, 3]` for NHWC graphs or `[1, 3, H, W]`
/// for NCHW graphs.
pub type Tensor4D = ndarray::Array4<f32>;

/// Pixel grid after resizing and before normalization, `[H, W, 3]`.
pub type Tensor3D = ndarray::Array3<f32>;

/// Probability vector with the batch dimension stripped, index-aligned with
/// the label table.
pub type ProbabilityVector = Vec<f32>;
