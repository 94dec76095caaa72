//! # OAR Classify
//!
//! Image classification over HTTP with a pre-trained ONNX graph.
//!
//! A JPEG or PNG image is decoded, resized and normalized into the graph's
//! input tensor, run through ONNX Runtime, and the output probabilities are
//! paired with a label vocabulary and ranked.
//!
//! ## Pipeline
//!
//! - **Image Normalizer**: bytes -> `[1, 224, 224, 3]` float tensor
//! - **Inference Executor**: tensor -> probability vector, over a pool of
//!   ONNX Runtime sessions
//! - **Label Ranker**: probabilities + labels -> top-n `(label, probability)`
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, tensor types and the inference engine
//! * [`domain`] - Label table and result types
//! * [`models`] - The end-to-end [`models::Classifier`]
//! * [`processors`] - Decoding, resizing, normalization and ranking
//! * [`server`] - axum HTTP front end
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oar_classify::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = Classifier::builder()
//!     .top_n(5)
//!     .labels(LabelTable::from_file("model/imagenet_comp_graph_label_strings.txt")?)
//!     .build_from_file("model/tensorflow_inception_graph.onnx")?;
//!
//! let bytes = std::fs::read("cat.jpg")?;
//! let result = classifier.classify(&bytes, ImageFormatHint::from_name("cat.jpg"), "cat.jpg")?;
//! for label in &result.labels {
//!     println!("{}: {:.3}", label.label, label.probability);
//! }
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod models;

pub mod processors;
pub mod server;

/// Prelude module for convenient imports.
///
/// ```rust
/// use oar_classify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ClassifierConfig, ClassifyError, InferenceEngine, ModelInputConfig};
    pub use crate::domain::{ClassifyResult, LabelResult, LabelTable};
    pub use crate::models::{Classifier, ClassifierBuilder};
    pub use crate::processors::ImageFormatHint;
}
