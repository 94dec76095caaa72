//! Top-n label ranking of graph output.

use crate::core::ClassifyError;
use crate::domain::LabelResult;
use std::cmp::Ordering;

/// Pairs each probability with its label and returns the `top_n` best.
///
/// Only the first `min(probabilities.len(), labels.len())` positions are
/// considered. Results are sorted by descending probability; ties keep
/// their output order and NaN ranks below every number.
///
/// ```rust
/// use oar_classify::processors::rank;
///
/// let labels = vec!["cat".to_string(), "dog".to_string(), "car".to_string()];
/// let ranked = rank(&[0.2, 0.5, 0.3], &labels, 2).unwrap();
/// assert_eq!(ranked[0].label, "dog");
/// assert_eq!(ranked[1].label, "car");
/// ```
///
/// # Errors
///
/// Returns [`ClassifyError::InsufficientLabels`] when `labels` is empty.
pub fn rank(
    probabilities: &[f32],
    labels: &[String],
    top_n: usize,
) -> Result<Vec<LabelResult>, ClassifyError> {
    if labels.is_empty() {
        return Err(ClassifyError::InsufficientLabels);
    }

    let mut scored: Vec<(usize, f32)> = probabilities
        .iter()
        .take(labels.len())
        .copied()
        .enumerate()
        .collect();
    scored.sort_by(|a, b| descending(a.1, b.1));
    scored.truncate(top_n);

    Ok(scored
        .into_iter()
        .map(|(i, p)| LabelResult::new(labels[i].clone(), p))
        .collect())
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn names(results: &[LabelResult]) -> Vec<&str> {
        results.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_rank_orders_by_probability() {
        let ranked = rank(&[0.2, 0.5, 0.3], &labels(&["cat", "dog", "car"]), 2).unwrap();
        assert_eq!(
            ranked,
            vec![LabelResult::new("dog", 0.5), LabelResult::new("car", 0.3)]
        );
    }

    #[test]
    fn test_rank_length_is_min_of_inputs() {
        let table = labels(&["a", "b", "c", "d"]);
        assert_eq!(rank(&[0.1, 0.2, 0.3, 0.4], &table, 10).unwrap().len(), 4);
        assert_eq!(rank(&[0.1, 0.2], &table, 10).unwrap().len(), 2);
        assert_eq!(rank(&[0.1, 0.2, 0.3, 0.4, 0.9, 0.8], &table, 10).unwrap().len(), 4);
        assert_eq!(rank(&[0.1, 0.2, 0.3], &table, 0).unwrap().len(), 0);
    }

    #[test]
    fn test_extra_probabilities_never_surface() {
        let ranked = rank(&[0.1, 0.2, 0.99], &labels(&["a", "b"]), 5).unwrap();
        assert_eq!(names(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_ties_keep_output_order() {
        let ranked = rank(&[0.25, 0.5, 0.25, 0.25], &labels(&["w", "x", "y", "z"]), 4).unwrap();
        assert_eq!(names(&ranked), vec!["x", "w", "y", "z"]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let ranked = rank(&[f32::NAN, 0.1, 0.7], &labels(&["n", "a", "b"]), 3).unwrap();
        assert_eq!(names(&ranked), vec!["b", "a", "n"]);
        assert!(ranked[2].probability.is_nan());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(rank(&[], &labels(&["a"]), 5).unwrap().is_empty());
        assert!(matches!(
            rank(&[0.5], &[], 5),
            Err(ClassifyError::InsufficientLabels)
        ));
    }
}
