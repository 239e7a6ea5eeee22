use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::Dataset;
use crate::error::{ClassifyError, Result};
use crate::{Labels, Matrix};

const BREAST_CANCER_CSV: &str = include_str!("../../data/breast_cancer.csv");

const BREAST_CANCER_FEATURES: [&str; 30] = [
    "mean radius",
    "mean texture",
    "mean perimeter",
    "mean area",
    "mean smoothness",
    "mean compactness",
    "mean concavity",
    "mean concave points",
    "mean symmetry",
    "mean fractal dimension",
    "radius error",
    "texture error",
    "perimeter error",
    "area error",
    "smoothness error",
    "compactness error",
    "concavity error",
    "concave points error",
    "symmetry error",
    "fractal dimension error",
    "worst radius",
    "worst texture",
    "worst perimeter",
    "worst area",
    "worst smoothness",
    "worst compactness",
    "worst concavity",
    "worst concave points",
    "worst symmetry",
    "worst fractal dimension",
];

const WINE_FEATURES: [&str; 13] = [
    "alcohol",
    "malic_acid",
    "ash",
    "alcalinity_of_ash",
    "magnesium",
    "total_phenols",
    "flavanoids",
    "nonflavanoid_phenols",
    "proanthocyanins",
    "color_intensity",
    "hue",
    "od280/od315_of_diluted_wines",
    "proline",
];

/// Row layout of a dataset CSV file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsvLayout {
    /// Header `n_samples,n_features,<target names...>`, label in the last column.
    Bundled,
    /// No header, label in the first column. Labels are shifted so the smallest becomes 0.
    LabelFirst,
}

/// Breast Cancer Wisconsin (Diagnostic): 569 samples, 30 features,
/// label 0 = malignant, 1 = benign.
pub fn load_breast_cancer() -> Result<Dataset> {
    let dataset = load_csv(BREAST_CANCER_CSV.as_bytes(), CsvLayout::Bundled)?
        .with_feature_names(BREAST_CANCER_FEATURES);
    debug!(
        samples = dataset.n_samples(),
        features = dataset.n_features(),
        "loaded breast cancer dataset"
    );
    Ok(dataset)
}

/// UCI wine recognition data: 178 samples, 13 features, 3 cultivars.
///
/// Accepts either the bundled-CSV layout or the raw UCI `wine.data` file; the
/// layout is chosen from the first line.
pub fn load_wine<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ClassifyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let layout = detect_layout(&content);
    let mut dataset = load_csv(content.as_bytes(), layout)?;

    if dataset.n_features() != WINE_FEATURES.len() {
        return Err(ClassifyError::Dataset(format!(
            "expected {} wine features, found {}",
            WINE_FEATURES.len(),
            dataset.n_features()
        )));
    }

    if dataset.target_names.is_empty() {
        dataset.target_names = dataset
            .classes()
            .iter()
            .map(|class| format!("class_{class}"))
            .collect();
    }

    debug!(
        path = %path.display(),
        ?layout,
        samples = dataset.n_samples(),
        classes = dataset.n_classes(),
        "loaded wine dataset"
    );
    Ok(dataset.with_feature_names(WINE_FEATURES))
}

pub fn load_csv<R: Read>(reader: R, layout: CsvLayout) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = reader.records();

    let mut declared = None;
    let mut target_names = Vec::new();
    if layout == CsvLayout::Bundled {
        let header = records
            .next()
            .ok_or_else(|| ClassifyError::Dataset("missing header row".to_string()))??;
        let n_samples: usize = parse_field(&header, 0, 0)?;
        let n_features: usize = parse_field(&header, 1, 0)?;
        target_names = header.iter().skip(2).map(String::from).collect();
        declared = Some((n_samples, n_features));
    }

    let mut values = Vec::new();
    let mut labels = Vec::new();
    let mut width = declared.map(|(_, n_features)| n_features);

    for (row, record) in records.enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let n_features = record.len().saturating_sub(1);
        match width {
            Some(expected) if expected != n_features => {
                return Err(ClassifyError::Dataset(format!(
                    "row {}: expected {} features, found {}",
                    row + 1,
                    expected,
                    n_features
                )));
            }
            None => width = Some(n_features),
            _ => {}
        }

        let (label_col, feature_cols) = match layout {
            CsvLayout::Bundled => (n_features, 0..n_features),
            CsvLayout::LabelFirst => (0, 1..n_features + 1),
        };
        labels.push(parse_field::<usize>(&record, label_col, row + 1)?);
        for col in feature_cols {
            values.push(parse_field::<f64>(&record, col, row + 1)?);
        }
    }

    let n_features = width.unwrap_or(0);
    let n_samples = labels.len();
    if n_samples == 0 || n_features == 0 {
        return Err(ClassifyError::EmptyInput);
    }
    if let Some((expected, _)) = declared {
        if expected != n_samples {
            return Err(ClassifyError::Dataset(format!(
                "header declares {expected} samples, found {n_samples}"
            )));
        }
    }

    if layout == CsvLayout::LabelFirst {
        let offset = labels.iter().copied().min().unwrap_or(0);
        labels.iter_mut().for_each(|label| *label -= offset);
    }

    let features = Matrix::from_shape_vec((n_samples, n_features), values)?;
    Ok(Dataset::new(features, Labels::from(labels))?.with_target_names(target_names))
}

fn detect_layout(content: &str) -> CsvLayout {
    let first_line = content.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let all_numeric = first_line
        .split(',')
        .all(|field| field.trim().parse::<f64>().is_ok());
    if all_numeric {
        CsvLayout::LabelFirst
    } else {
        CsvLayout::Bundled
    }
}

fn parse_field<T: FromStr>(record: &csv::StringRecord, col: usize, row: usize) -> Result<T> {
    let field = record
        .get(col)
        .ok_or_else(|| ClassifyError::Dataset(format!("row {row}: missing column {col}")))?;
    field
        .parse()
        .map_err(|_| ClassifyError::Dataset(format!("row {row}: cannot parse {field:?}")))
}
