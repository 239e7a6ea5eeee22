pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod decomposition;
pub mod error;
pub mod linalg;
pub mod linear_model;
pub mod metrics;
pub mod optimize;
pub mod plot;
pub mod walkthrough;

pub use dataset::{Dataset, load_breast_cancer, load_wine, make_blobs};
pub use decomposition::LDA;
pub use error::{ClassifyError, Result};
pub use linear_model::{LogisticRegression, MultiClass, Perceptron, Solver};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
pub type Labels = Array1<usize>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let vec = Vector::zeros(5);
        let mat = Matrix::zeros((3, 4));
        let labels = Labels::from(vec![0, 1, 1]);
        assert_eq!(vec.len(), 5);
        assert_eq!(mat.shape(), &[3, 4]);
        assert_eq!(labels.len(), 3);
    }
}
