//! End-to-end tour of the discriminative classifiers: binary and multinomial
//! logistic regression, a perceptron, and a one-dimensional Fisher projection
//! with its separability check.
//!
//! # Examples
//!
//! ```rust
//! use linclass::make_blobs;
//! use linclass::walkthrough::{WalkthroughConfig, run};
//! use ndarray::array;
//!
//! let binary = make_blobs(&array![[0.0, 0.0], [4.0, 4.0]], 25, 1.0, 1).unwrap();
//! let multiclass = make_blobs(&array![[0.0, 0.0], [5.0, 0.0], [0.0, 5.0]], 20, 0.8, 2).unwrap();
//!
//! let report = run(&binary, &multiclass, &WalkthroughConfig::default()).unwrap();
//! for line in report.summary_lines() {
//!     println!("{line}");
//! }
//! ```

use std::path::PathBuf;

use plotters::style::{BLUE, RED};
use tracing::info;

use crate::dataset::{Dataset, make_blobs};
use crate::error::{ClassifyError, Result};
use crate::metrics::{accuracy_score, classes_separable};
use crate::plot::HistogramChart;
use crate::{LDA, Labels, LogisticRegression, Matrix, MultiClass, Perceptron, Vector};

pub const HISTOGRAM_TITLE: &str = "Projection of breast-cancer samples onto Fisher's discriminant";
pub const HISTOGRAM_X_LABEL: &str = "LDA projection";

const OFFLINE_FEATURES: usize = 13;
const OFFLINE_PER_CLASS: usize = 60;
const OFFLINE_SEED: u64 = 178;

/// Three-class stand-in for the wine data when no wine file is available:
/// 60 samples per class over 13 features, identical on every call.
/// Class `k` is shifted by 3 along every feature `j` with `j % 3 == k`.
pub fn offline_multiclass() -> Result<Dataset> {
    let centers = Matrix::from_shape_fn((3, OFFLINE_FEATURES), |(class, feature)| {
        if feature % 3 == class { 3.0 } else { 0.0 }
    });
    let dataset = make_blobs(&centers, OFFLINE_PER_CLASS, 1.0, OFFLINE_SEED)?
        .with_feature_names((0..OFFLINE_FEATURES).map(|feature| format!("feature_{feature}")));
    Ok(dataset)
}

#[derive(Clone, Debug)]
pub struct WalkthroughConfig {
    pub binary_c: f64,
    pub binary_max_iter: usize,
    pub multiclass_c: f64,
    pub multiclass_max_iter: usize,
    pub multi_class: MultiClass,
    pub histogram_bins: usize,
    /// Where to write the projection histogram; nothing is rendered when unset.
    pub histogram_path: Option<PathBuf>,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            binary_c: 1e5,
            binary_max_iter: 10_000,
            multiclass_c: 1e5,
            multiclass_max_iter: 1_000,
            multi_class: MultiClass::Multinomial,
            histogram_bins: 30,
            histogram_path: None,
        }
    }
}

/// Outputs read off a fitted probabilistic classifier on its training data.
#[derive(Clone, Debug)]
pub struct ClassifierOutcome {
    pub predictions: Labels,
    pub probabilities: Matrix,
    pub accuracy: f64,
}

#[derive(Clone, Debug)]
pub struct ProjectionOutcome {
    /// One projected value per sample, in dataset order.
    pub projection: Vector,
    pub first_class: Vector,
    pub second_class: Vector,
    pub separable: bool,
    pub histogram: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct WalkthroughReport {
    pub binary: ClassifierOutcome,
    pub multiclass: ClassifierOutcome,
    pub perceptron_epochs: usize,
    pub projection: ProjectionOutcome,
}

impl WalkthroughReport {
    /// Binary accuracy, multiclass accuracy, then the separability verdict.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            self.binary.accuracy.to_string(),
            self.multiclass.accuracy.to_string(),
            self.projection.separable.to_string(),
        ]
    }
}

/// Runs the four classifier steps in order: logistic regression on `binary`,
/// multinomial logistic regression on `multiclass`, a default perceptron on
/// `binary`, and a single-component LDA projection of `binary`.
pub fn run(binary: &Dataset, multiclass: &Dataset, config: &WalkthroughConfig) -> Result<WalkthroughReport> {
    let binary_classes = binary.classes();
    if binary_classes.len() != 2 {
        return Err(ClassifyError::Dataset(format!(
            "binary dataset must have exactly two classes, found {}",
            binary_classes.len()
        )));
    }

    let mut logistic = LogisticRegression::new()
        .c(config.binary_c)
        .max_iter(config.binary_max_iter);
    let binary_outcome = evaluate_logistic(&mut logistic, binary)?;
    info!(accuracy = binary_outcome.accuracy, n_iter = ?logistic.n_iter, "binary logistic regression");

    let mut softmax = LogisticRegression::new()
        .c(config.multiclass_c)
        .max_iter(config.multiclass_max_iter)
        .multi_class(config.multi_class);
    let multiclass_outcome = evaluate_logistic(&mut softmax, multiclass)?;
    info!(
        accuracy = multiclass_outcome.accuracy,
        classes = multiclass.n_classes(),
        n_iter = ?softmax.n_iter,
        "multiclass logistic regression"
    );

    let mut perceptron = Perceptron::new();
    perceptron.fit(&binary.features, &binary.labels)?;
    let perceptron_epochs = perceptron.n_iter.unwrap_or(0);
    info!(epochs = perceptron_epochs, "perceptron");

    let projection = project(binary, &binary_classes, config)?;
    info!(separable = projection.separable, "fisher projection");

    Ok(WalkthroughReport {
        binary: binary_outcome,
        multiclass: multiclass_outcome,
        perceptron_epochs,
        projection,
    })
}

fn evaluate_logistic(model: &mut LogisticRegression, data: &Dataset) -> Result<ClassifierOutcome> {
    model.fit(&data.features, &data.labels)?;
    let predictions = model.predict(&data.features)?;
    let probabilities = model.predict_proba(&data.features)?;
    let accuracy = accuracy_score(&data.labels, &predictions)?;

    Ok(ClassifierOutcome { predictions, probabilities, accuracy })
}

fn project(data: &Dataset, classes: &[usize], config: &WalkthroughConfig) -> Result<ProjectionOutcome> {
    let mut lda = LDA::new().n_components(1);
    let projected = lda.fit_transform(&data.features, &data.labels)?;
    let projection = projected.column(0).to_owned();

    let (first_class, second_class) = data.partition(&projection, classes[0], classes[1])?;
    let separable = classes_separable(&first_class, &second_class);

    let histogram = match &config.histogram_path {
        Some(path) => {
            let name = |idx: usize| {
                data.target_names
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("class {}", classes[idx]))
            };
            HistogramChart::new(HISTOGRAM_TITLE, HISTOGRAM_X_LABEL, config.histogram_bins)
                .series(name(0), first_class.clone(), RED)
                .series(name(1), second_class.clone(), BLUE)
                .render_svg_file(path)?;
            Some(path.clone())
        }
        None => None,
    };

    Ok(ProjectionOutcome {
        projection,
        first_class,
        second_class,
        separable,
        histogram,
    })
}
