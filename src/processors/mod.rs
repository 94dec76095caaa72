//! Image processing and ranking stages of the classification pipeline.
//!
//! # Modules
//!
//! * `decode` - Decoding of JPEG and PNG payloads into RGB pixel grids
//! * `resize` - Resizing to the model input size
//! * `normalization` - Per-channel normalization into the input tensor
//! * `topk` - Top-n ranking of graph output against the label table
//! * `types` - Type definitions used across the processors module

mod decode;
mod normalization;
pub mod resize;
mod topk;
pub mod types;

pub use decode::*;
pub use normalization::*;
pub use resize::{resize_to_input, rgb_to_tensor};
pub use topk::*;
pub use types::*;
