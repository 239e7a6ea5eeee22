//! Error type shared by every model, loader and renderer in the crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Model not fitted: call fit() first")]
    NotFitted,

    #[error("Number of samples in X ({samples}) and y ({labels}) must match")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("Number of features in X ({got}) doesn't match training data ({expected})")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Input must have at least one sample and one feature")]
    EmptyInput,

    #[error("At least {required} classes are required, got {got}")]
    InsufficientClasses { required: usize, got: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    #[error("Did not converge: {0}")]
    NoConvergence(String),

    #[error("Malformed dataset: {0}")]
    Dataset(String),

    #[error("Plotting failed: {0}")]
    Plot(String),

    #[error("Cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

impl ClassifyError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let error = ClassifyError::DimensionMismatch { expected: 30, got: 13 };
        assert_eq!(
            error.to_string(),
            "Number of features in X (13) doesn't match training data (30)"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = ClassifyError::invalid("c", "must be positive");
        assert_eq!(error.to_string(), "Invalid parameter: c - must be positive");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "wine_data.csv");
        let error: ClassifyError = io.into();
        assert!(matches!(error, ClassifyError::Io(_)));
        assert!(error.to_string().contains("wine_data.csv"));
    }

    #[test]
    fn test_read_error_names_path() {
        let error = ClassifyError::Read {
            path: PathBuf::from("data/wine_data.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            error.to_string(),
            "Cannot read data/wine_data.csv: No such file or directory"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClassifyError>();
    }
}
