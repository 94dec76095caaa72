//! Classification result values returned to callers.

use serde::{Deserialize, Serialize};

/// One ranked label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelResult {
    /// Human readable class name.
    pub label: String,
    /// Score reported by the graph for this class.
    pub probability: f32,
}

impl LabelResult {
    /// Creates a new label result.
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Ranked labels for one image.
///
/// `filename` identifies the source: the uploaded file name or the fetched
/// URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResult {
    /// Source identifier of the image.
    pub filename: String,
    /// Labels sorted by descending probability.
    pub labels: Vec<LabelResult>,
}

impl ClassifyResult {
    /// Creates a new result.
    pub fn new(filename: impl Into<String>, labels: Vec<LabelResult>) -> Self {
        Self {
            filename: filename.into(),
            labels,
        }
    }

    /// Highest ranked label, if any.
    pub fn best(&self) -> Option<&LabelResult> {
        self.labels.first()
    }
}
