use crate::error::{ClassifyError, Result};
use crate::{Array2, Labels, Vector};

/// Fraction of predictions that exactly match the true labels.
pub fn accuracy_score(y_true: &Labels, y_pred: &Labels) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifyError::LengthMismatch { samples: y_true.len(), labels: y_pred.len() });
    }
    if y_true.is_empty() {
        return Err(ClassifyError::EmptyInput);
    }

    let correct = y_true.iter().zip(y_pred.iter()).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Counts indexed `[true class, predicted class]` in the order of `classes`.
/// Labels outside `classes` are ignored.
pub fn confusion_matrix(y_true: &Labels, y_pred: &Labels, classes: &[usize]) -> Result<Array2<usize>> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifyError::LengthMismatch { samples: y_true.len(), labels: y_pred.len() });
    }

    let mut matrix = Array2::zeros((classes.len(), classes.len()));
    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        let row = classes.iter().position(|c| c == t);
        let col = classes.iter().position(|c| c == p);
        if let (Some(row), Some(col)) = (row, col) {
            matrix[[row, col]] += 1;
        }
    }
    Ok(matrix)
}

/// Whether one group lies strictly above the other on the real line.
/// An empty group is never separable.
pub fn classes_separable(a: &Vector, b: &Vector) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let (min_a, max_a) = min_max(a);
    let (min_b, max_b) = min_max(b);
    min_a > max_b || min_b > max_a
}

fn min_max(values: &Vector) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy_score() {
        let y_true = array![0, 1, 1, 2];
        let y_pred = array![0, 1, 2, 2];

        let accuracy = accuracy_score(&y_true, &y_pred).unwrap();
        assert!((accuracy - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_accuracy_score_length_mismatch() {
        assert!(accuracy_score(&array![0, 1], &array![0]).is_err());
        assert!(accuracy_score(&array![], &array![]).is_err());
    }

    #[test]
    fn test_confusion_matrix() {
        let y_true = array![0, 0, 1, 1, 2];
        let y_pred = array![0, 1, 1, 1, 0];

        let matrix = confusion_matrix(&y_true, &y_pred, &[0, 1, 2]).unwrap();
        assert_eq!(matrix, array![[1, 1, 0], [0, 2, 0], [1, 0, 0]]);
        assert_eq!(matrix.sum(), 5);
    }

    #[test]
    fn test_classes_separable() {
        assert!(classes_separable(&array![1.0, 2.0], &array![3.0, 4.0]));
        assert!(classes_separable(&array![5.0, 6.0], &array![-1.0, 4.9]));
        assert!(!classes_separable(&array![1.0, 3.5], &array![3.0, 4.0]));
    }

    #[test]
    fn test_classes_separable_touching_ranges() {
        // equal extremes overlap at a point
        assert!(!classes_separable(&array![1.0, 3.0], &array![3.0, 4.0]));
    }

    #[test]
    fn test_classes_separable_empty_side() {
        assert!(!classes_separable(&array![], &array![1.0]));
        assert!(!classes_separable(&array![1.0], &array![]));
    }
}
