use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::logistic_regression::argmax_rows;
use crate::dataset::unique_labels;
use crate::error::{ClassifyError, Result};
use crate::{Labels, Matrix, Vector};

/// Rosenblatt perceptron trained by stochastic updates on misclassified samples.
/// More than two classes are handled one-vs-rest.
#[derive(Clone, Debug)]
pub struct Perceptron {
    pub coefficients: Option<Matrix>,
    pub intercepts: Option<Vector>,
    pub classes: Option<Vec<usize>>,
    /// Epochs run by the slowest one-vs-rest problem.
    pub n_iter: Option<usize>,
    eta0: f64,
    max_iter: usize,
    tolerance: Option<f64>,
    n_iter_no_change: usize,
    shuffle: bool,
    random_state: u64,
    fit_intercept: bool,
}

impl Perceptron {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercepts: None,
            classes: None,
            n_iter: None,
            eta0: 1.0,
            max_iter: 1000,
            tolerance: Some(1e-3),
            n_iter_no_change: 5,
            shuffle: true,
            random_state: 0,
            fit_intercept: true,
        }
    }

    pub fn eta0(mut self, eta0: f64) -> Self {
        self.eta0 = eta0;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Early-stopping threshold on the epoch loss; `None` always runs `max_iter` epochs.
    pub fn tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn n_iter_no_change(mut self, n_iter_no_change: usize) -> Self {
        self.n_iter_no_change = n_iter_no_change;
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn fit(&mut self, x: &Matrix, y: &Labels) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ClassifyError::LengthMismatch { samples: x.nrows(), labels: y.len() });
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ClassifyError::EmptyInput);
        }
        if !(self.eta0 > 0.0) {
            return Err(ClassifyError::invalid("eta0", format!("must be positive, got {}", self.eta0)));
        }
        if self.max_iter == 0 {
            return Err(ClassifyError::invalid("max_iter", "must be at least 1"));
        }
        if self.n_iter_no_change == 0 {
            return Err(ClassifyError::invalid("n_iter_no_change", "must be at least 1"));
        }

        let classes = unique_labels(y);
        if classes.len() < 2 {
            return Err(ClassifyError::InsufficientClasses { required: 2, got: classes.len() });
        }

        let positives: Vec<usize> = if classes.len() == 2 {
            vec![classes[1]]
        } else {
            classes.clone()
        };

        let mut coefficients = Matrix::zeros((positives.len(), x.ncols()));
        let mut intercepts = Vector::zeros(positives.len());
        let mut n_iter = 0;
        for (row, &positive) in positives.iter().enumerate() {
            let signs = y.mapv(|label| if label == positive { 1.0 } else { -1.0 });
            let (w, b, epochs) = self.fit_binary(x, &signs);
            coefficients.row_mut(row).assign(&w);
            intercepts[row] = b;
            n_iter = n_iter.max(epochs);
        }

        debug!(classes = classes.len(), n_iter, "fitted perceptron");

        self.coefficients = Some(coefficients);
        self.intercepts = Some(intercepts);
        self.classes = Some(classes);
        self.n_iter = Some(n_iter);
        Ok(())
    }

    pub fn decision_function(&self, x: &Matrix) -> Result<Matrix> {
        let coeffs = self.coefficients.as_ref().ok_or(ClassifyError::NotFitted)?;
        let intercepts = self.intercepts.as_ref().ok_or(ClassifyError::NotFitted)?;

        if x.ncols() != coeffs.ncols() {
            return Err(ClassifyError::DimensionMismatch { expected: coeffs.ncols(), got: x.ncols() });
        }

        Ok(x.dot(&coeffs.t()) + intercepts)
    }

    pub fn predict(&self, x: &Matrix) -> Result<Labels> {
        let classes = self.classes.as_ref().ok_or(ClassifyError::NotFitted)?;
        let scores = self.decision_function(x)?;

        if scores.ncols() == 1 {
            return Ok(scores
                .column(0)
                .mapv(|score| if score > 0.0 { classes[1] } else { classes[0] }));
        }
        Ok(argmax_rows(&scores).mapv(|idx| classes[idx]))
    }

    pub fn score(&self, x: &Matrix, y: &Labels) -> Result<f64> {
        let predictions = self.predict(x)?;
        crate::metrics::accuracy_score(y, &predictions)
    }

    fn fit_binary(&self, x: &Matrix, signs: &Vector) -> (Vector, f64, usize) {
        let n_samples = x.nrows();
        let mut w = Vector::zeros(x.ncols());
        let mut b = 0.0;
        let mut rng = StdRng::seed_from_u64(self.random_state);
        let mut order: Vec<usize> = (0..n_samples).collect();

        let mut best_loss = f64::INFINITY;
        let mut no_improvement_count = 0;

        for epoch in 0..self.max_iter {
            if self.shuffle {
                order.shuffle(&mut rng);
            }

            let mut epoch_loss = 0.0;
            for &i in &order {
                let sample = x.row(i);
                let margin = signs[i] * (sample.dot(&w) + b);
                if margin <= 0.0 {
                    epoch_loss -= margin;
                    w.scaled_add(self.eta0 * signs[i], &sample);
                    if self.fit_intercept {
                        b += self.eta0 * signs[i];
                    }
                }
            }

            if let Some(tol) = self.tolerance {
                if epoch_loss > best_loss - tol * n_samples as f64 {
                    no_improvement_count += 1;
                } else {
                    no_improvement_count = 0;
                }
                best_loss = best_loss.min(epoch_loss);

                if no_improvement_count >= self.n_iter_no_change {
                    return (w, b, epoch + 1);
                }
            }
        }

        if self.tolerance.is_some() {
            warn!(
                max_iter = self.max_iter,
                "perceptron reached max_iter before the epoch loss stopped improving"
            );
        }
        (w, b, self.max_iter)
    }
}

impl Default for Perceptron {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_blobs;
    use ndarray::array;

    #[test]
    fn test_perceptron_separable() {
        let x = array![[-2.0, -1.5], [-1.5, -2.0], [-1.0, -1.2], [1.0, 1.3], [1.5, 2.0], [2.0, 1.5]];
        let y = array![0, 0, 0, 1, 1, 1];

        let mut model = Perceptron::new();
        model.fit(&x, &y).unwrap();

        assert_eq!(model.predict(&x).unwrap(), y);
        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
        assert_eq!(model.coefficients.as_ref().unwrap().nrows(), 1);
    }

    #[test]
    fn test_perceptron_stops_early_when_separated() {
        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let y = array![0, 0, 1, 1];

        let mut model = Perceptron::new();
        model.fit(&x, &y).unwrap();

        // a handful of corrective epochs, then five without improvement
        assert!(model.n_iter.unwrap() < 20);
    }

    #[test]
    fn test_perceptron_without_tolerance_runs_all_epochs() {
        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let y = array![0, 0, 1, 1];

        let mut model = Perceptron::new().tolerance(None).max_iter(20);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.n_iter, Some(20));
    }

    #[test]
    fn test_perceptron_is_deterministic() {
        let centers = array![[0.0, 0.0], [3.0, 3.0]];
        let data = make_blobs(&centers, 40, 1.0, 5).unwrap();

        let mut first = Perceptron::new();
        let mut second = Perceptron::new();
        first.fit(&data.features, &data.labels).unwrap();
        second.fit(&data.features, &data.labels).unwrap();

        assert_eq!(first.coefficients, second.coefficients);
        assert_eq!(first.intercepts, second.intercepts);
    }

    #[test]
    fn test_perceptron_one_vs_rest() {
        let centers = array![[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]];
        let data = make_blobs(&centers, 30, 0.5, 2).unwrap();

        let mut model = Perceptron::new().tolerance(None);
        model.fit(&data.features, &data.labels).unwrap();

        assert_eq!(model.coefficients.as_ref().unwrap().shape(), &[3, 2]);
        assert!(model.score(&data.features, &data.labels).unwrap() > 0.9);
    }

    #[test]
    fn test_perceptron_errors() {
        let x = array![[1.0], [2.0]];
        let model = Perceptron::new();
        assert!(matches!(model.predict(&x), Err(ClassifyError::NotFitted)));

        let mut model = Perceptron::new();
        assert!(matches!(
            model.fit(&x, &array![3, 3]),
            Err(ClassifyError::InsufficientClasses { .. })
        ));
        assert!(Perceptron::new().eta0(0.0).fit(&x, &array![0, 1]).is_err());
        assert!(Perceptron::new().fit(&x, &array![0]).is_err());
    }
}
