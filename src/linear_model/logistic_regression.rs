use ndarray::{Axis, s};
use tracing::{debug, warn};

use crate::dataset::unique_labels;
use crate::error::{ClassifyError, Result};
use crate::optimize::{Lbfgs, Minimum};
use crate::{Labels, Matrix, Vector};

/// How a problem with more than two classes is decomposed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MultiClass {
    /// One-vs-rest for two classes, multinomial otherwise.
    #[default]
    Auto,
    /// One independent sigmoid model per class.
    Ovr,
    /// A single softmax model over all classes, fitted jointly.
    Multinomial,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Solver {
    #[default]
    Lbfgs,
    /// Fixed-step batch gradient descent.
    GradientDescent { learning_rate: f64 },
}

#[derive(Clone, Debug)]
pub struct LogisticRegression {
    /// One row per fitted model: a single row for binary one-vs-rest,
    /// one row per class otherwise.
    pub coefficients: Option<Matrix>,
    pub intercepts: Option<Vector>,
    pub classes: Option<Vec<usize>>,
    pub n_iter: Option<usize>,
    fitted_mode: Option<MultiClass>,
    c: f64,
    max_iter: usize,
    tolerance: f64,
    fit_intercept: bool,
    multi_class: MultiClass,
    solver: Solver,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercepts: None,
            classes: None,
            n_iter: None,
            fitted_mode: None,
            c: 1.0,
            max_iter: 100,
            tolerance: 1e-4,
            fit_intercept: true,
            multi_class: MultiClass::Auto,
            solver: Solver::Lbfgs,
        }
    }

    /// Inverse regularization strength; larger values penalize the weights less.
    pub fn c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn multi_class(mut self, multi_class: MultiClass) -> Self {
        self.multi_class = multi_class;
        self
    }

    pub fn solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    pub fn fit(&mut self, x: &Matrix, y: &Labels) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ClassifyError::LengthMismatch { samples: x.nrows(), labels: y.len() });
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ClassifyError::EmptyInput);
        }
        self.validate_params()?;

        let classes = unique_labels(y);
        if classes.len() < 2 {
            return Err(ClassifyError::InsufficientClasses { required: 2, got: classes.len() });
        }

        let mode = match self.multi_class {
            MultiClass::Auto if classes.len() == 2 => MultiClass::Ovr,
            MultiClass::Auto => MultiClass::Multinomial,
            mode => mode,
        };

        let l2 = 1.0 / (self.c * x.nrows() as f64);
        let (coefficients, intercepts, n_iter) = match mode {
            MultiClass::Multinomial => {
                let class_index: Vec<usize> = y
                    .iter()
                    .map(|label| classes.binary_search(label).unwrap_or(0))
                    .collect();
                self.fit_multinomial(x, &class_index, classes.len(), l2)?
            }
            _ => {
                let positives: Vec<usize> = if classes.len() == 2 {
                    vec![classes[1]]
                } else {
                    classes.clone()
                };
                let mut coefficients = Matrix::zeros((positives.len(), x.ncols()));
                let mut intercepts = Vector::zeros(positives.len());
                let mut n_iter = 0;
                for (row, &positive) in positives.iter().enumerate() {
                    let targets = y.mapv(|label| if label == positive { 1.0 } else { 0.0 });
                    let (w, b, iters) = self.fit_binary(x, &targets, l2)?;
                    coefficients.row_mut(row).assign(&w);
                    intercepts[row] = b;
                    n_iter = n_iter.max(iters);
                }
                (coefficients, intercepts, n_iter)
            }
        };

        debug!(
            classes = classes.len(),
            mode = ?mode,
            n_iter,
            "fitted logistic regression"
        );

        self.coefficients = Some(coefficients);
        self.intercepts = Some(intercepts);
        self.classes = Some(classes);
        self.n_iter = Some(n_iter);
        self.fitted_mode = Some(mode);
        Ok(())
    }

    /// Raw linear scores, one column per fitted model.
    pub fn decision_function(&self, x: &Matrix) -> Result<Matrix> {
        let coeffs = self.coefficients.as_ref().ok_or(ClassifyError::NotFitted)?;
        let intercepts = self.intercepts.as_ref().ok_or(ClassifyError::NotFitted)?;

        if x.ncols() != coeffs.ncols() {
            return Err(ClassifyError::DimensionMismatch { expected: coeffs.ncols(), got: x.ncols() });
        }

        Ok(x.dot(&coeffs.t()) + intercepts)
    }

    /// Class membership probabilities, one column per class in ascending label order.
    pub fn predict_proba(&self, x: &Matrix) -> Result<Matrix> {
        let scores = self.decision_function(x)?;
        let mode = self.fitted_mode.ok_or(ClassifyError::NotFitted)?;

        let probabilities = match mode {
            MultiClass::Multinomial => softmax_rows(&scores),
            _ if scores.ncols() == 1 => {
                let mut probabilities = Matrix::zeros((scores.nrows(), 2));
                for (i, &z) in scores.column(0).iter().enumerate() {
                    let p = sigmoid(z);
                    probabilities[[i, 0]] = 1.0 - p;
                    probabilities[[i, 1]] = p;
                }
                probabilities
            }
            // σ_k / Σσ normalized from log σ(z) = -softplus(-z), so rows whose
            // sigmoids all underflow still sum to one
            _ => softmax_rows(&scores.mapv(|z| -softplus(-z))),
        };

        Ok(probabilities)
    }

    pub fn predict(&self, x: &Matrix) -> Result<Labels> {
        let classes = self.classes.as_ref().ok_or(ClassifyError::NotFitted)?;
        let probabilities = self.predict_proba(x)?;
        Ok(argmax_rows(&probabilities).mapv(|idx| classes[idx]))
    }

    /// Mean accuracy on the given samples.
    pub fn score(&self, x: &Matrix, y: &Labels) -> Result<f64> {
        let predictions = self.predict(x)?;
        crate::metrics::accuracy_score(y, &predictions)
    }

    fn validate_params(&self) -> Result<()> {
        if !(self.c > 0.0) || !self.c.is_finite() {
            return Err(ClassifyError::invalid("c", format!("must be positive and finite, got {}", self.c)));
        }
        if self.max_iter == 0 {
            return Err(ClassifyError::invalid("max_iter", "must be at least 1"));
        }
        if let Solver::GradientDescent { learning_rate } = self.solver {
            if !(learning_rate > 0.0) {
                return Err(ClassifyError::invalid(
                    "learning_rate",
                    format!("must be positive, got {learning_rate}"),
                ));
            }
        }
        Ok(())
    }

    fn fit_binary(&self, x: &Matrix, targets: &Vector, l2: f64) -> Result<(Vector, f64, usize)> {
        let n_features = x.ncols();
        let n_params = n_features + usize::from(self.fit_intercept);
        let fit_intercept = self.fit_intercept;

        let objective = |theta: &Vector| binary_loss_and_grad(x, targets, theta, l2, fit_intercept);
        let minimum = self.minimize(Vector::zeros(n_params), objective)?;

        let w = minimum.x.slice(s![..n_features]).to_owned();
        let b = if fit_intercept { minimum.x[n_features] } else { 0.0 };
        Ok((w, b, minimum.n_iter))
    }

    fn fit_multinomial(
        &self,
        x: &Matrix,
        class_index: &[usize],
        n_classes: usize,
        l2: f64,
    ) -> Result<(Matrix, Vector, usize)> {
        let n_features = x.ncols();
        let cols = n_features + usize::from(self.fit_intercept);
        let fit_intercept = self.fit_intercept;

        let mut one_hot = Matrix::zeros((x.nrows(), n_classes));
        for (i, &k) in class_index.iter().enumerate() {
            one_hot[[i, k]] = 1.0;
        }

        let objective =
            |theta: &Vector| multinomial_loss_and_grad(x, &one_hot, theta, l2, fit_intercept);
        let minimum = self.minimize(Vector::zeros(n_classes * cols), objective)?;

        let (coefficients, intercepts) = unpack(&minimum.x, n_classes, n_features, fit_intercept);
        Ok((coefficients, intercepts, minimum.n_iter))
    }

    fn minimize<F>(&self, theta0: Vector, objective: F) -> Result<Minimum>
    where
        F: FnMut(&Vector) -> (f64, Vector),
    {
        let minimum = match self.solver {
            Solver::Lbfgs => Lbfgs::new(self.max_iter, self.tolerance).minimize(theta0, objective)?,
            Solver::GradientDescent { learning_rate } => {
                gradient_descent(theta0, objective, learning_rate, self.max_iter, self.tolerance)?
            }
        };

        if !minimum.converged {
            warn!(
                max_iter = self.max_iter,
                n_iter = minimum.n_iter,
                loss = minimum.value,
                "logistic regression failed to converge; increase max_iter or scale the data"
            );
        }
        Ok(minimum)
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

fn gradient_descent<F>(
    mut theta: Vector,
    mut objective: F,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
) -> Result<Minimum>
where
    F: FnMut(&Vector) -> (f64, Vector),
{
    let mut value = f64::INFINITY;
    for iteration in 0..max_iter {
        let (cost, gradient) = objective(&theta);
        if !cost.is_finite() {
            return Err(ClassifyError::NoConvergence("gradient descent diverged".to_string()));
        }
        value = cost;
        if gradient.iter().all(|g| g.abs() <= tolerance) {
            return Ok(Minimum { x: theta, value, n_iter: iteration, converged: true });
        }
        theta.scaled_add(-learning_rate, &gradient);
    }

    Ok(Minimum { x: theta, value, n_iter: max_iter, converged: false })
}

/// Mean log-loss of a single sigmoid model plus `l2/2·‖w‖²`, and its gradient.
/// `theta` holds the weights followed by the intercept when one is fitted.
fn binary_loss_and_grad(
    x: &Matrix,
    targets: &Vector,
    theta: &Vector,
    l2: f64,
    fit_intercept: bool,
) -> (f64, Vector) {
    let n_samples = x.nrows() as f64;
    let n_features = x.ncols();
    let w = theta.slice(s![..n_features]);
    let b = if fit_intercept { theta[n_features] } else { 0.0 };

    let z = x.dot(&w) + b;
    let loss = z
        .iter()
        .zip(targets.iter())
        .map(|(&z, &t)| softplus(z) - t * z)
        .sum::<f64>()
        / n_samples;
    let error = z.mapv(sigmoid) - targets;

    let mut grad = Vector::zeros(theta.len());
    let grad_w = x.t().dot(&error) / n_samples + &w * l2;
    grad.slice_mut(s![..n_features]).assign(&grad_w);
    if fit_intercept {
        grad[n_features] = error.sum() / n_samples;
    }

    (loss + 0.5 * l2 * w.dot(&w), grad)
}

/// Mean cross-entropy of a softmax model plus `l2/2·‖W‖²`, and its gradient.
/// `theta` is the row-major `n_classes × (n_features [+ 1])` parameter block.
fn multinomial_loss_and_grad(
    x: &Matrix,
    one_hot: &Matrix,
    theta: &Vector,
    l2: f64,
    fit_intercept: bool,
) -> (f64, Vector) {
    let n_samples = x.nrows() as f64;
    let n_features = x.ncols();
    let n_classes = one_hot.ncols();
    let (w, b) = unpack(theta, n_classes, n_features, fit_intercept);

    let scores = x.dot(&w.t()) + &b;
    let mut loss = 0.0;
    for (row, targets) in scores.rows().into_iter().zip(one_hot.rows()) {
        let lse = log_sum_exp(row.iter().copied());
        loss += lse - row.dot(&targets);
    }
    loss /= n_samples;

    let error = (softmax_rows(&scores) - one_hot) / n_samples;
    let grad_w = error.t().dot(x) + &w * l2;
    let grad_b = error.sum_axis(Axis(0));

    let cols = n_features + usize::from(fit_intercept);
    let mut grad = Vector::zeros(theta.len());
    for k in 0..n_classes {
        grad.slice_mut(s![k * cols..k * cols + n_features]).assign(&grad_w.row(k));
        if fit_intercept {
            grad[k * cols + n_features] = grad_b[k];
        }
    }

    let penalty = 0.5 * l2 * w.iter().map(|v| v * v).sum::<f64>();
    (loss + penalty, grad)
}

fn unpack(theta: &Vector, n_classes: usize, n_features: usize, fit_intercept: bool) -> (Matrix, Vector) {
    let cols = n_features + usize::from(fit_intercept);
    let w = Matrix::from_shape_fn((n_classes, n_features), |(k, j)| theta[k * cols + j]);
    let b = Vector::from_shape_fn(n_classes, |k| {
        if fit_intercept { theta[k * cols + n_features] } else { 0.0 }
    });
    (w, b)
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 { z + (-z).exp().ln_1p() } else { z.exp().ln_1p() }
}

fn log_sum_exp(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.map(|v| (v - max).exp()).sum::<f64>().ln()
}

pub(crate) fn softmax_rows(scores: &Matrix) -> Matrix {
    let mut probabilities = scores.clone();
    for mut row in probabilities.rows_mut() {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        row.mapv_inplace(|v| (v - max).exp());
        let total = row.sum();
        row /= total;
    }
    probabilities
}

pub(crate) fn argmax_rows(values: &Matrix) -> Labels {
    values
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            for (idx, &value) in row.iter().enumerate() {
                if value > row[best] {
                    best = idx;
                }
            }
            best
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_blobs;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn three_blobs() -> crate::Dataset {
        let centers = array![[0.0, 0.0], [6.0, 0.0], [0.0, 6.0]];
        make_blobs(&centers, 30, 0.7, 11).unwrap()
    }

    #[test]
    fn test_logistic_regression_simple() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0, 0, 1, 1];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        let probabilities = model.predict_proba(&x).unwrap();

        assert_eq!(predictions, y);
        assert_eq!(probabilities.shape(), &[4, 2]);
        assert!(probabilities[[0, 1]] < 0.5);
        assert!(probabilities[[3, 1]] > 0.5);
        assert_eq!(model.coefficients.as_ref().unwrap().nrows(), 1);
    }

    #[test]
    fn test_logistic_regression_score() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0, 0, 1, 1];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_arbitrary_label_values() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![7, 7, 9, 9];

        let mut model = LogisticRegression::new().c(100.0);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.classes.as_ref().unwrap(), &vec![7, 9]);
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_logistic_regression_single_class() {
        let x = array![[1.0], [2.0]];
        let y = array![1, 1];

        let mut model = LogisticRegression::new();
        let err = model.fit(&x, &y).unwrap_err();
        assert!(matches!(err, ClassifyError::InsufficientClasses { required: 2, got: 1 }));
    }

    #[test]
    fn test_logistic_regression_predict_without_fit() {
        let x = array![[1.0], [2.0]];
        let model = LogisticRegression::new();

        assert!(matches!(model.predict(&x), Err(ClassifyError::NotFitted)));
        assert!(matches!(model.predict_proba(&x), Err(ClassifyError::NotFitted)));
    }

    #[test]
    fn test_logistic_regression_dimension_mismatch() {
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0]];
        let y = array![0, 0, 1, 1];
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let err = model.predict(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, ClassifyError::DimensionMismatch { expected: 2, got: 1 }));
        assert!(model.fit(&x, &array![0, 1]).is_err());
    }

    #[test]
    fn test_invalid_c_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![0, 1];

        assert!(LogisticRegression::new().c(0.0).fit(&x, &y).is_err());
        assert!(LogisticRegression::new().c(f64::NAN).fit(&x, &y).is_err());
        assert!(LogisticRegression::new().max_iter(0).fit(&x, &y).is_err());
    }

    #[test]
    fn test_multinomial_three_classes() {
        let data = three_blobs();
        let mut model = LogisticRegression::new().multi_class(MultiClass::Multinomial);
        model.fit(&data.features, &data.labels).unwrap();

        let probabilities = model.predict_proba(&data.features).unwrap();
        assert_eq!(probabilities.shape(), &[90, 3]);
        for row in probabilities.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert_eq!(model.coefficients.as_ref().unwrap().shape(), &[3, 2]);
        assert_eq!(model.score(&data.features, &data.labels).unwrap(), 1.0);
    }

    #[test]
    fn test_auto_mode_picks_multinomial_for_three_classes() {
        let data = three_blobs();
        let mut auto = LogisticRegression::new();
        let mut multinomial = LogisticRegression::new().multi_class(MultiClass::Multinomial);
        auto.fit(&data.features, &data.labels).unwrap();
        multinomial.fit(&data.features, &data.labels).unwrap();

        assert_eq!(auto.coefficients, multinomial.coefficients);
    }

    #[test]
    fn test_one_vs_rest_three_classes() {
        let data = three_blobs();
        let mut model = LogisticRegression::new().multi_class(MultiClass::Ovr);
        model.fit(&data.features, &data.labels).unwrap();

        let probabilities = model.predict_proba(&data.features).unwrap();
        for row in probabilities.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert!(model.score(&data.features, &data.labels).unwrap() > 0.95);
    }

    #[test]
    fn test_multinomial_binary_keeps_two_rows() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0, 0, 1, 1];
        let mut model = LogisticRegression::new().multi_class(MultiClass::Multinomial);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.coefficients.as_ref().unwrap().nrows(), 2);
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_gradient_descent_solver() {
        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let y = array![0, 0, 1, 1];

        let mut model = LogisticRegression::new()
            .solver(Solver::GradientDescent { learning_rate: 0.5 })
            .max_iter(5000);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
        assert!(model.coefficients.as_ref().unwrap()[[0, 0]] > 0.0);
    }

    #[test]
    fn test_refit_is_deterministic() {
        let data = three_blobs();
        let mut first = LogisticRegression::new().c(1e5).max_iter(500);
        let mut second = first.clone();
        first.fit(&data.features, &data.labels).unwrap();
        second.fit(&data.features, &data.labels).unwrap();

        assert_eq!(first.coefficients, second.coefficients);
        assert_eq!(
            first.predict_proba(&data.features).unwrap(),
            second.predict_proba(&data.features).unwrap()
        );
    }

    #[test]
    fn test_binary_gradient_matches_finite_differences() {
        let x = array![[0.5, -1.0], [1.5, 2.0], [-0.3, 0.7], [2.0, -0.5]];
        let t = array![0.0, 1.0, 0.0, 1.0];
        let theta = array![0.3, -0.2, 0.1];

        let (_, grad) = binary_loss_and_grad(&x, &t, &theta, 0.05, true);
        for i in 0..theta.len() {
            let mut plus = theta.clone();
            let mut minus = theta.clone();
            plus[i] += 1e-6;
            minus[i] -= 1e-6;
            let numeric = (binary_loss_and_grad(&x, &t, &plus, 0.05, true).0
                - binary_loss_and_grad(&x, &t, &minus, 0.05, true).0)
                / 2e-6;
            assert_abs_diff_eq!(grad[i], numeric, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_multinomial_gradient_matches_finite_differences() {
        let x = array![[0.5, -1.0], [1.5, 2.0], [-0.3, 0.7]];
        let one_hot = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let theta = Vector::from_shape_fn(9, |i| (i as f64 - 4.0) * 0.1);

        let (_, grad) = multinomial_loss_and_grad(&x, &one_hot, &theta, 0.1, true);
        for i in 0..theta.len() {
            let mut plus = theta.clone();
            let mut minus = theta.clone();
            plus[i] += 1e-6;
            minus[i] -= 1e-6;
            let numeric = (multinomial_loss_and_grad(&x, &one_hot, &plus, 0.1, true).0
                - multinomial_loss_and_grad(&x, &one_hot, &minus, 0.1, true).0)
                / 2e-6;
            assert_abs_diff_eq!(grad[i], numeric, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_sigmoid_function() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5, epsilon = 1e-12);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!(softplus(1000.0).is_finite());
        assert_abs_diff_eq!(softplus(0.0), 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let scores = array![[1000.0, 0.0, -1000.0], [1.0, 2.0, 3.0]];
        let probabilities = softmax_rows(&scores);

        assert_abs_diff_eq!(probabilities[[0, 0]], 1.0, epsilon = 1e-12);
        for row in probabilities.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert_eq!(argmax_rows(&probabilities), array![0, 2]);
    }

    fn one_vs_rest_model(intercepts: Vector) -> LogisticRegression {
        let mut model = LogisticRegression::new().multi_class(MultiClass::Ovr);
        model.coefficients = Some(Matrix::zeros((intercepts.len(), 1)));
        model.intercepts = Some(intercepts);
        model.classes = Some(vec![0, 1, 2]);
        model.fitted_mode = Some(MultiClass::Ovr);
        model
    }

    #[test]
    fn test_one_vs_rest_proba_when_every_sigmoid_underflows() {
        // exp(-800) is below the smallest subnormal f64
        let model = one_vs_rest_model(array![-800.0, -810.0, -900.0]);
        let probabilities = model.predict_proba(&array![[0.0], [1.0]]).unwrap();

        for row in probabilities.rows() {
            assert!(row.iter().all(|p| p.is_finite()));
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert!(probabilities[[0, 0]] > 0.999);
        assert_eq!(model.predict(&array![[0.0]]).unwrap(), array![0]);
    }

    #[test]
    fn test_one_vs_rest_proba_matches_normalized_sigmoids() {
        let model = one_vs_rest_model(array![0.5, -1.0, 2.0]);
        let probabilities = model.predict_proba(&array![[0.0]]).unwrap();

        let sigmoids = array![0.5, -1.0, 2.0].mapv(sigmoid);
        let expected = &sigmoids / sigmoids.sum();
        for k in 0..3 {
            assert_abs_diff_eq!(probabilities[[0, k]], expected[k], epsilon = 1e-12);
        }
    }
}
