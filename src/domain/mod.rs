//! Domain-level structures shared across the classification pipeline.
//!
//! This module groups the label vocabulary and the result values handed back
//! to callers.

pub mod labels;
pub mod result;

pub use labels::LabelTable;
pub use result::{ClassifyResult, LabelResult};
