//! Tabular datasets: a feature matrix with an aligned vector of class labels.
//!
//! # Examples
//!
//! ```rust
//! use linclass::load_breast_cancer;
//!
//! let data = load_breast_cancer().unwrap();
//! assert_eq!(data.n_samples(), 569);
//! assert_eq!(data.n_features(), 30);
//! assert_eq!(data.classes(), vec![0, 1]);
//! ```

mod loaders;
mod synthetic;

pub use loaders::{CsvLayout, load_breast_cancer, load_csv, load_wine};
pub use synthetic::make_blobs;

use crate::error::{ClassifyError, Result};
use crate::{Labels, Matrix, Vector};

#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Labels,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Labels) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(ClassifyError::LengthMismatch {
                samples: features.nrows(),
                labels: labels.len(),
            });
        }

        Ok(Self {
            features,
            labels,
            feature_names: Vec::new(),
            target_names: Vec::new(),
        })
    }

    pub fn with_feature_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.feature_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.target_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Distinct labels in ascending order.
    pub fn classes(&self) -> Vec<usize> {
        unique_labels(&self.labels)
    }

    pub fn n_classes(&self) -> usize {
        self.classes().len()
    }

    /// Splits a per-sample value array into the values belonging to class `a`
    /// and those belonging to class `b`, preserving sample order.
    pub fn partition(&self, values: &Vector, a: usize, b: usize) -> Result<(Vector, Vector)> {
        if values.len() != self.n_samples() {
            return Err(ClassifyError::LengthMismatch {
                samples: self.n_samples(),
                labels: values.len(),
            });
        }

        let mut first = Vec::new();
        let mut second = Vec::new();
        for (&value, &label) in values.iter().zip(self.labels.iter()) {
            if label == a {
                first.push(value);
            } else if label == b {
                second.push(value);
            }
        }

        Ok((Vector::from(first), Vector::from(second)))
    }
}

pub(crate) fn unique_labels(labels: &Labels) -> Vec<usize> {
    let mut classes: Vec<usize> = labels.iter().copied().collect();
    classes.sort_unstable();
    classes.dedup();
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dataset_creation() {
        let features = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let labels = array![1, 0, 1];

        let dataset = Dataset::new(features, labels).unwrap();
        assert_eq!(dataset.n_samples(), 3);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.classes(), vec![0, 1]);
        assert_eq!(dataset.n_classes(), 2);
    }

    #[test]
    fn test_dataset_length_mismatch() {
        let features = Matrix::zeros((4, 2));
        let labels = array![0, 1];

        let err = Dataset::new(features, labels).unwrap_err();
        assert!(matches!(err, ClassifyError::LengthMismatch { samples: 4, labels: 2 }));
    }

    #[test]
    fn test_partition_by_label() {
        let features = Matrix::zeros((5, 1));
        let labels = array![0, 1, 2, 1, 0];
        let dataset = Dataset::new(features, labels).unwrap();

        let values = array![0.5, -1.0, 9.0, -2.0, 0.7];
        let (zeros, ones) = dataset.partition(&values, 0, 1).unwrap();

        assert_eq!(zeros, array![0.5, 0.7]);
        assert_eq!(ones, array![-1.0, -2.0]);
    }

    #[test]
    fn test_partition_rejects_wrong_length() {
        let dataset = Dataset::new(Matrix::zeros((3, 1)), array![0, 1, 0]).unwrap();
        assert!(dataset.partition(&array![1.0, 2.0], 0, 1).is_err());
    }

    #[test]
    fn test_names_builders() {
        let dataset = Dataset::new(Matrix::zeros((1, 2)), array![0])
            .unwrap()
            .with_feature_names(["a", "b"])
            .with_target_names(vec!["only".to_string()]);

        assert_eq!(dataset.feature_names, vec!["a", "b"]);
        assert_eq!(dataset.target_names, vec!["only"]);
    }
}
