use ndarray::{Axis, s};
use tracing::debug;

use crate::dataset::unique_labels;
use crate::error::{ClassifyError, Result};
use crate::linalg::{cholesky, cholesky_solve, congruence_inverse, solve_upper_transposed, symmetric_eigen};
use crate::linear_model::{sigmoid, softmax_rows};
use crate::{Labels, Matrix, Vector};

/// Fisher's Linear Discriminant with a shared-covariance Gaussian classifier.
#[derive(Clone, Debug)]
pub struct LDA {
    /// Discriminant directions, one per row, ordered by decreasing eigenvalue.
    pub components: Option<Matrix>,
    pub explained_variance_ratio: Option<Vector>,
    /// Class means, one row per class.
    pub means: Option<Matrix>,
    pub priors: Option<Vector>,
    /// Prior-weighted mean of the class means; `transform` centers on it.
    pub xbar: Option<Vector>,
    pub coefficients: Option<Matrix>,
    pub intercepts: Option<Vector>,
    pub classes: Option<Vec<usize>>,
    n_components: Option<usize>,
}

impl LDA {
    pub fn new() -> Self {
        Self {
            components: None,
            explained_variance_ratio: None,
            means: None,
            priors: None,
            xbar: None,
            coefficients: None,
            intercepts: None,
            classes: None,
            n_components: None,
        }
    }

    /// Number of directions kept; capped at `min(n_classes - 1, n_features)`.
    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = Some(n_components);
        self
    }

    pub fn fit(&mut self, x: &Matrix, y: &Labels) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ClassifyError::LengthMismatch { samples: x.nrows(), labels: y.len() });
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ClassifyError::EmptyInput);
        }
        if self.n_components == Some(0) {
            return Err(ClassifyError::invalid("n_components", "must be at least 1"));
        }

        let classes = unique_labels(y);
        if classes.len() < 2 {
            return Err(ClassifyError::InsufficientClasses { required: 2, got: classes.len() });
        }

        let n_samples = x.nrows();
        let n_classes = classes.len();
        let n_features = x.ncols();
        let max_components = (n_classes - 1).min(n_features);
        let n_components = self.n_components.unwrap_or(max_components).min(max_components);

        let class_index: Vec<usize> = y
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or(0))
            .collect();

        let mut means = Matrix::zeros((n_classes, n_features));
        let mut counts = vec![0usize; n_classes];
        for (row, &k) in x.axis_iter(Axis(0)).zip(class_index.iter()) {
            let mut mean = means.row_mut(k);
            mean += &row;
            counts[k] += 1;
        }
        for (mut mean, &count) in means.axis_iter_mut(Axis(0)).zip(counts.iter()) {
            mean /= count as f64;
        }

        let priors = Vector::from_iter(counts.iter().map(|&count| count as f64 / n_samples as f64));
        let xbar = priors.dot(&means);

        let mut within = Matrix::zeros((n_features, n_features));
        for (row, &k) in x.axis_iter(Axis(0)).zip(class_index.iter()) {
            let diff = &row - &means.row(k);
            within += &outer(&diff, &diff);
        }
        within /= n_samples as f64;

        let mut between = Matrix::zeros((n_features, n_features));
        for (mean, &prior) in means.axis_iter(Axis(0)).zip(priors.iter()) {
            let diff = &mean - &xbar;
            between.scaled_add(prior, &outer(&diff, &diff));
        }

        let scale = diagonal_scaling(&within)?;
        let within_scaled = rescale(&within, &scale);
        let between_scaled = rescale(&between, &scale);
        let l = cholesky(&within_scaled)?;

        let (eigenvalues, directions) = discriminant_directions(&l, &between_scaled, &scale)?;
        let eigenvalues = eigenvalues.mapv(|v| v.max(0.0));
        let total = eigenvalues.sum();

        let mut components = Matrix::zeros((n_components, n_features));
        for i in 0..n_components {
            components.row_mut(i).assign(&directions.column(i));
        }
        let explained_variance_ratio = if total > 0.0 {
            eigenvalues.slice(s![..n_components]).mapv(|v| v / total)
        } else {
            Vector::zeros(n_components)
        };

        let (coefficients, intercepts) = discriminant_functions(&l, &scale, &means, &priors);

        debug!(
            classes = n_classes,
            n_components,
            explained = ?explained_variance_ratio.to_vec(),
            "fitted linear discriminant"
        );

        self.components = Some(components);
        self.explained_variance_ratio = Some(explained_variance_ratio);
        self.means = Some(means);
        self.priors = Some(priors);
        self.xbar = Some(xbar);
        self.coefficients = Some(coefficients);
        self.intercepts = Some(intercepts);
        self.classes = Some(classes);
        Ok(())
    }

    /// Projects centered samples onto the discriminant directions.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let components = self.components.as_ref().ok_or(ClassifyError::NotFitted)?;
        let xbar = self.xbar.as_ref().ok_or(ClassifyError::NotFitted)?;

        if x.ncols() != components.ncols() {
            return Err(ClassifyError::DimensionMismatch { expected: components.ncols(), got: x.ncols() });
        }

        Ok((x - xbar).dot(&components.t()))
    }

    pub fn fit_transform(&mut self, x: &Matrix, y: &Labels) -> Result<Matrix> {
        self.fit(x, y)?;
        self.transform(x)
    }

    pub fn decision_function(&self, x: &Matrix) -> Result<Matrix> {
        let coeffs = self.coefficients.as_ref().ok_or(ClassifyError::NotFitted)?;
        let intercepts = self.intercepts.as_ref().ok_or(ClassifyError::NotFitted)?;

        if x.ncols() != coeffs.ncols() {
            return Err(ClassifyError::DimensionMismatch { expected: coeffs.ncols(), got: x.ncols() });
        }

        Ok(x.dot(&coeffs.t()) + intercepts)
    }

    pub fn predict_proba(&self, x: &Matrix) -> Result<Matrix> {
        let scores = self.decision_function(x)?;
        if scores.ncols() > 1 {
            return Ok(softmax_rows(&scores));
        }

        let mut probabilities = Matrix::zeros((scores.nrows(), 2));
        for (i, &z) in scores.column(0).iter().enumerate() {
            let p = sigmoid(z);
            probabilities[[i, 0]] = 1.0 - p;
            probabilities[[i, 1]] = p;
        }
        Ok(probabilities)
    }

    pub fn predict(&self, x: &Matrix) -> Result<Labels> {
        let classes = self.classes.as_ref().ok_or(ClassifyError::NotFitted)?;
        let scores = self.decision_function(x)?;

        let predictions = scores
            .axis_iter(Axis(0))
            .map(|row| {
                if row.len() == 1 {
                    return if row[0] > 0.0 { classes[1] } else { classes[0] };
                }
                let mut best = 0;
                for (k, &score) in row.iter().enumerate() {
                    if score > row[best] {
                        best = k;
                    }
                }
                classes[best]
            })
            .collect();
        Ok(predictions)
    }

    pub fn score(&self, x: &Matrix, y: &Labels) -> Result<f64> {
        let predictions = self.predict(x)?;
        crate::metrics::accuracy_score(y, &predictions)
    }
}

impl Default for LDA {
    fn default() -> Self {
        Self::new()
    }
}

fn outer(a: &Vector, b: &Vector) -> Matrix {
    a.view().insert_axis(Axis(1)).dot(&b.view().insert_axis(Axis(0)))
}

/// `1/sqrt(diag(within))`, which brings every feature to unit within-class variance.
fn diagonal_scaling(within: &Matrix) -> Result<Vector> {
    let mut scale = Vector::zeros(within.nrows());
    for (j, &variance) in within.diag().iter().enumerate() {
        if !(variance > 0.0) {
            return Err(ClassifyError::SingularMatrix(format!(
                "feature {j} has zero within-class variance"
            )));
        }
        scale[j] = 1.0 / variance.sqrt();
    }
    Ok(scale)
}

fn rescale(m: &Matrix, scale: &Vector) -> Matrix {
    Matrix::from_shape_fn(m.raw_dim(), |(i, j)| m[[i, j]] * scale[i] * scale[j])
}

/// Solves `Sb·w = λ·Sw·w` given the Cholesky factor of the rescaled `Sw`.
/// Directions come back as columns in the original feature space, normalized
/// to unit within-class variance, with the largest component positive.
fn discriminant_directions(l: &Matrix, between_scaled: &Matrix, scale: &Vector) -> Result<(Vector, Matrix)> {
    let reduced = congruence_inverse(l, between_scaled);
    let (eigenvalues, eigenvectors) = symmetric_eigen(&reduced)?;

    let mut directions = Matrix::zeros(eigenvectors.raw_dim());
    for (k, v) in eigenvectors.axis_iter(Axis(1)).enumerate() {
        let mut w = solve_upper_transposed(l, &v.to_owned()) * scale;
        let pivot = w.iter().copied().fold(0.0, |acc: f64, x| if x.abs() > acc.abs() { x } else { acc });
        if pivot < 0.0 {
            w.mapv_inplace(|x| -x);
        }
        directions.column_mut(k).assign(&w);
    }

    Ok((eigenvalues, directions))
}

/// Linear discriminant functions `δ_k(x) = x·Σ⁻¹μ_k - ½μ_kᵀΣ⁻¹μ_k + ln π_k`.
/// Two classes collapse to the single difference `δ_1 - δ_0`.
fn discriminant_functions(l: &Matrix, scale: &Vector, means: &Matrix, priors: &Vector) -> (Matrix, Vector) {
    let n_classes = means.nrows();
    let mut coefficients = Matrix::zeros(means.raw_dim());
    let mut intercepts = Vector::zeros(n_classes);

    for (k, mean) in means.axis_iter(Axis(0)).enumerate() {
        let scaled_mean = &mean * scale;
        let coef = cholesky_solve(l, &scaled_mean) * scale;
        intercepts[k] = -0.5 * mean.dot(&coef) + priors[k].ln();
        coefficients.row_mut(k).assign(&coef);
    }

    if n_classes == 2 {
        let coef = &coefficients.row(1) - &coefficients.row(0);
        let intercept = intercepts[1] - intercepts[0];
        return (coef.insert_axis(Axis(0)), Vector::from_elem(1, intercept));
    }

    (coefficients, intercepts)
}
