//! Label vocabulary of the inference graph.

use crate::core::ClassifyError;
use std::io::BufRead;
use std::path::Path;

/// Immutable ordered label vocabulary.
///
/// Position `i` names output position `i` of the graph. The table is built
/// once at startup and only read afterwards, so it is shared between
/// requests without synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Builds a table from already-split labels.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InsufficientLabels`] when `labels` is empty.
    pub fn new(labels: Vec<String>) -> Result<Self, ClassifyError> {
        if labels.is_empty() {
            return Err(ClassifyError::InsufficientLabels);
        }
        Ok(Self { labels })
    }

    /// Reads newline-delimited labels.
    ///
    /// Every line keeps its position, blank ones included, so the table stays
    /// aligned with the graph output. A trailing `\r` is stripped from each
    /// line and a final newline does not add an empty label.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, ClassifyError> {
        let labels = reader
            .lines()
            .map(|line| line.map(|l| l.trim_end_matches('\r').to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(labels)
    }

    /// Parses newline-delimited labels from a string.
    ///
    /// ```rust
    /// use oar_classify::domain::LabelTable;
    ///
    /// let table = LabelTable::parse("cat\ndog\ncar\n").unwrap();
    /// assert_eq!(table.len(), 3);
    /// assert_eq!(table.get(1), Some("dog"));
    /// ```
    pub fn parse(text: &str) -> Result<Self, ClassifyError> {
        Self::from_reader(text.as_bytes())
    }

    /// Reads newline-delimited labels from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClassifyError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a successfully constructed table.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Iterates labels in output order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Labels as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_order_and_blank_lines() {
        let table = LabelTable::parse("dummy\n\nkit fox\r\nEnglish setter\n").unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec!["dummy", "", "kit fox", "English setter"]
        );
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let table = LabelTable::parse("a\nb").unwrap();
        assert_eq!(table.as_slice(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.get(2), None);
    }

    #[test]
    fn test_empty_source_is_insufficient() {
        assert!(matches!(
            LabelTable::parse(""),
            Err(ClassifyError::InsufficientLabels)
        ));
        assert!(matches!(
            LabelTable::new(Vec::new()),
            Err(ClassifyError::InsufficientLabels)
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "oar-classify-labels-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "cat\ndog\n").unwrap();
        let table = LabelTable::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table.len(), 2);

        assert!(matches!(
            LabelTable::from_file("/nonexistent/labels.txt"),
            Err(ClassifyError::Io(_))
        ));
    }
}
