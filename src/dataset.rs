//! Accident statistics dataset: loading, cleaning and labeling
//!
//! Shared by the training and visualization binaries. The training
//! frame keeps four 2015 columns, drops rows with missing values and
//! labels each city 1 (high risk) when its severity exceeds the
//! column median, else 0.

use crate::{Result, RouteSafeError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Feature columns, in the order the classifier is trained with.
pub const FEATURE_COLUMNS: [&str; 4] = [
    "Severity - 2015",
    "Total Accidents - 2015",
    "Killed - 2015",
    "Injured - 2015",
];

/// Column names of the raw statistics file, which ships without a
/// header row.
pub const RAW_COLUMNS: [&str; 30] = [
    "Name of City",
    "Total number of Fatal Accidents - 2011",
    "All Accidents - 2011",
    "Persons Killed - 2011",
    "Persons Injured - 2011",
    "Total number of Fatal Accidents - 2012",
    "All Accidents - 2012",
    "Persons Killed - 2012",
    "Persons Injured - 2012",
    "Fatal Accidents - 2013",
    "Total Accidents - 2013",
    "Killed - 2013",
    "Injured - 2013",
    "Severity - 2013",
    "Fatal Accidents - 2014",
    "Greviously Injured Accidents - 2014",
    "Minor Accidents - 2014",
    "Non-Injurey Accidents - 2014",
    "Total Accidents - 2014",
    "Killed - 2014",
    "Injured - 2014",
    "Severity - 2014",
    "Fatal Accidents - 2015",
    "Greviously Injured Accidents - 2015",
    "Minor Accidents - 2015",
    "Non-Injurey Accidents - 2015",
    "Total Accidents - 2015",
    "Killed - 2015",
    "Injured - 2015",
    "Severity - 2015",
];

/// Cleaned, labeled training data.
#[derive(Debug, Clone)]
pub struct TrainingFrame {
    /// Rows of feature values, ordered as [`FEATURE_COLUMNS`]
    pub features: Vec<Vec<f64>>,
    /// Risk labels: 1 = high risk, 0 = low risk
    pub labels: Vec<u32>,
}

impl TrainingFrame {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the frame holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Count of rows per label
    #[must_use]
    pub fn label_counts(&self) -> (usize, usize) {
        let high = self.labels.iter().filter(|&&l| l == 1).count();
        (self.labels.len() - high, high)
    }
}

/// One row of the raw statistics file.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub city: String,
    /// Values aligned with `RAW_COLUMNS[1..]`; non-numeric cells are `None`
    values: Vec<Option<f64>>,
}

impl RawRecord {
    /// Look up a value by column name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<f64> {
        let index = RAW_COLUMNS.iter().position(|&c| c == name)?;
        // index 0 is the city name
        self.values.get(index.checked_sub(1)?).copied().flatten()
    }
}

/// Load the cleaned accident CSV into a labeled training frame.
///
/// The file carries a header row; only [`FEATURE_COLUMNS`] are kept
/// and rows missing any of them are dropped.
pub fn load_training_frame(path: &Path) -> Result<TrainingFrame> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut column_indices = Vec::with_capacity(FEATURE_COLUMNS.len());
    for name in FEATURE_COLUMNS {
        let index = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                RouteSafeError::model(format!("training data is missing column '{name}'"))
            })?;
        column_indices.push(index);
    }

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut row = Vec::with_capacity(FEATURE_COLUMNS.len());
        let mut complete = true;
        for &index in &column_indices {
            match record.get(index).map(str::trim).and_then(parse_cell) {
                Some(value) => row.push(value),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(RouteSafeError::model(
            "training data has no complete rows",
        ));
    }

    let severities: Vec<f64> = rows.iter().map(|r| r[0]).collect();
    let threshold = median(&severities);
    let labels = rows
        .iter()
        .map(|r| u32::from(r[0] > threshold))
        .collect::<Vec<_>>();

    info!(
        "Loaded {} training rows, severity median {:.2}",
        rows.len(),
        threshold
    );

    Ok(TrainingFrame {
        features: rows,
        labels,
    })
}

/// Load the raw statistics file (headerless, 30 columns).
///
/// Missing city names become "Unknown City"; non-numeric cells in
/// value columns become `None`.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let city = record
            .get(0)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Unknown City")
            .to_string();
        let values = (1..RAW_COLUMNS.len())
            .map(|i| record.get(i).map(str::trim).and_then(parse_cell))
            .collect();
        records.push(RawRecord { city, values });
    }

    Ok(records)
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok()
}

fn csv_error(err: csv::Error) -> RouteSafeError {
    RouteSafeError::model(format!("cannot read training data: {err}"))
}

/// Median of a non-empty slice (mean of the middle two for even
/// lengths). Returns NaN for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Linear-interpolated quantile of a non-empty slice, `q` in [0, 1].
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Stratified train/test split with a seeded shuffle.
///
/// Splits each label group separately so both sides keep the class
/// proportions of the whole frame.
#[must_use]
pub fn stratified_split(
    frame: &TrainingFrame,
    test_fraction: f64,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<u32>, Vec<Vec<f64>>, Vec<u32>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut by_label: HashMap<u32, Vec<usize>> = HashMap::new();
    for (index, &label) in frame.labels.iter().enumerate() {
        by_label.entry(label).or_default().push(index);
    }

    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();
    let mut labels_sorted: Vec<u32> = by_label.keys().copied().collect();
    labels_sorted.sort_unstable();

    for label in labels_sorted {
        let mut indices = by_label.remove(&label).unwrap_or_default();
        indices.shuffle(&mut rng);
        let test_count = (indices.len() as f64 * test_fraction).round() as usize;
        test_indices.extend(indices.drain(..test_count.min(indices.len())));
        train_indices.extend(indices);
    }

    train_indices.shuffle(&mut rng);
    test_indices.shuffle(&mut rng);

    let take = |indices: &[usize]| -> (Vec<Vec<f64>>, Vec<u32>) {
        (
            indices.iter().map(|&i| frame.features[i].clone()).collect(),
            indices.iter().map(|&i| frame.labels[i]).collect(),
        )
    };

    let (x_train, y_train) = take(&train_indices);
    let (x_test, y_test) = take(&test_indices);
    (x_train, y_train, x_test, y_test)
}

/// Stratified k-fold assignment: returns for each fold the indices of
/// its test rows. Every row lands in exactly one fold and each fold
/// roughly preserves the class proportions.
#[must_use]
pub fn stratified_folds(labels: &[u32], n_folds: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut folds = vec![Vec::new(); n_folds.max(1)];

    let mut by_label: HashMap<u32, Vec<usize>> = HashMap::new();
    for (index, &label) in labels.iter().enumerate() {
        by_label.entry(label).or_default().push(index);
    }

    let mut labels_sorted: Vec<u32> = by_label.keys().copied().collect();
    labels_sorted.sort_unstable();

    for label in labels_sorted {
        let mut indices = by_label.remove(&label).unwrap_or_default();
        indices.shuffle(&mut rng);
        let fold_count = folds.len();
        for (offset, index) in indices.into_iter().enumerate() {
            folds[offset % fold_count].push(index);
        }
    }

    folds
}

/// Per-label precision and recall over truth/prediction pairs.
///
/// Returns one `(label, precision, recall)` entry per label seen in
/// either slice, in ascending label order. Undefined ratios (no
/// predicted or no actual rows for a label) come back as 0.
#[must_use]
pub fn precision_recall(truth: &[u32], predicted: &[u32]) -> Vec<(u32, f64, f64)> {
    let mut labels: Vec<u32> = truth.iter().chain(predicted).copied().collect();
    labels.sort_unstable();
    labels.dedup();

    labels
        .into_iter()
        .map(|label| {
            let pairs = || truth.iter().zip(predicted);
            let tp = pairs().filter(|&(&t, &p)| t == label && p == label).count();
            let fp = pairs().filter(|&(&t, &p)| t != label && p == label).count();
            let missed = pairs().filter(|&(&t, &p)| t == label && p != label).count();

            let precision = if tp + fp == 0 {
                0.0
            } else {
                tp as f64 / (tp + fp) as f64
            };
            let recall = if tp + missed == 0 {
                0.0
            } else {
                tp as f64 / (tp + missed) as f64
            };
            (label, precision, recall)
        })
        .collect()
}

/// Fraction of matching labels between truth and prediction.
#[must_use]
pub fn accuracy(truth: &[u32], predicted: &[u32]) -> f64 {
    if truth.is_empty() || truth.len() != predicted.len() {
        return 0.0;
    }
    let matches = truth
        .iter()
        .zip(predicted)
        .filter(|(a, b)| a == b)
        .count();
    matches as f64 / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_quantile() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 0.5), Some(3.0));
        assert_eq!(quantile(&values, 0.25), Some(2.0));
        assert_eq!(quantile(&values, 1.0), Some(5.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_precision_recall_per_label() {
        let truth = [0, 0, 1, 1, 1, 0];
        let predicted = [0, 1, 1, 1, 0, 0];
        let report = precision_recall(&truth, &predicted);

        // Both labels: 2 true positives, 1 false positive, 1 miss
        assert_eq!(report.len(), 2);
        for (index, label) in [0_u32, 1].into_iter().enumerate() {
            let (got_label, precision, recall) = report[index];
            assert_eq!(got_label, label);
            assert!((precision - 2.0 / 3.0).abs() < 1e-9);
            assert!((recall - 2.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_precision_recall_degenerate_prediction() {
        // Everything predicted low risk: label 1 has no predictions
        let report = precision_recall(&[0, 1, 1], &[0, 0, 0]);
        assert_eq!(report[0], (0, 1.0 / 3.0, 1.0));
        assert_eq!(report[1], (1, 0.0, 0.0));
    }

    #[test]
    fn test_stratified_split_proportions() {
        let frame = TrainingFrame {
            features: (0..100).map(|i| vec![i as f64; 4]).collect(),
            labels: (0..100).map(|i| u32::from(i % 2 == 0)).collect(),
        };
        let (x_train, y_train, x_test, y_test) = stratified_split(&frame, 0.4, 42);

        assert_eq!(x_train.len() + x_test.len(), 100);
        assert_eq!(y_test.len(), 40);
        let high_in_test = y_test.iter().filter(|&&l| l == 1).count();
        assert_eq!(high_in_test, 20);
        let high_in_train = y_train.iter().filter(|&&l| l == 1).count();
        assert_eq!(high_in_train, 30);
    }

    #[test]
    fn test_stratified_folds_cover_everything() {
        let labels: Vec<u32> = (0..53).map(|i| u32::from(i % 3 == 0)).collect();
        let folds = stratified_folds(&labels, 5, 42);

        assert_eq!(folds.len(), 5);
        let mut seen: Vec<usize> = folds.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..53).collect::<Vec<_>>());
    }

    #[test]
    fn test_raw_record_column_lookup() {
        let record = RawRecord {
            city: "Agra".to_string(),
            values: (0..29).map(|i| Some(i as f64)).collect(),
        };
        assert_eq!(record.column("Total number of Fatal Accidents - 2011"), Some(0.0));
        assert_eq!(record.column("Severity - 2015"), Some(28.0));
        assert_eq!(record.column("No Such Column"), None);
    }
}
