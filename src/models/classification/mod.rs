//! Image classification model.

pub mod classifier;
pub mod normalizer;

pub use classifier::{Classifier, ClassifierBuilder};
pub use normalizer::ImageNormalizer;
