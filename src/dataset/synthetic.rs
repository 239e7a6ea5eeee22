use ndarray::{Axis, s};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Normal;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::Dataset;
use crate::error::{ClassifyError, Result};
use crate::{Labels, Matrix};

/// Isotropic Gaussian blobs, `n_per_class` samples around each row of `centers`.
/// Class `k` is the `k`-th center; samples are grouped by class.
pub fn make_blobs(centers: &Matrix, n_per_class: usize, std: f64, seed: u64) -> Result<Dataset> {
    if centers.nrows() == 0 || centers.ncols() == 0 || n_per_class == 0 {
        return Err(ClassifyError::EmptyInput);
    }
    let noise = Normal::new(0.0, std)
        .map_err(|e| ClassifyError::invalid("std", e.to_string()))?;

    let n_classes = centers.nrows();
    let n_features = centers.ncols();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut features = Matrix::random_using((n_classes * n_per_class, n_features), noise, &mut rng);
    let mut labels = Labels::zeros(n_classes * n_per_class);

    for (class, center) in centers.axis_iter(Axis(0)).enumerate() {
        let rows = class * n_per_class..(class + 1) * n_per_class;
        let mut block = features.slice_mut(s![rows.clone(), ..]);
        block += &center;
        labels.slice_mut(s![rows]).fill(class);
    }

    Ok(Dataset::new(features, labels)?
        .with_target_names((0..n_classes).map(|class| format!("blob_{class}"))))
}
