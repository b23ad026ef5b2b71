//! Train the route-safety classifier from the cleaned accident CSV.
//!
//! Loads the per-city 2015 statistics, labels each city by whether
//! its severity exceeds the median, fits a random forest on a
//! stratified 60/40 split, reports holdout and 5-fold cross-validated
//! accuracy, and writes the classifier artifact consumed by the web
//! app.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;
use tracing_subscriber::EnvFilter;

use routesafe::dataset::{
    accuracy, load_training_frame, precision_recall, stratified_folds, stratified_split,
    FEATURE_COLUMNS,
};
use routesafe::scorer::ClassifierArtifact;

const SEED: u64 = 42;
const TEST_FRACTION: f64 = 0.4;
const CV_FOLDS: usize = 5;

fn forest_parameters() -> RandomForestClassifierParameters {
    RandomForestClassifierParameters::default()
        .with_n_trees(30)
        .with_max_depth(3)
        .with_min_samples_leaf(5)
        .with_seed(SEED)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_path: PathBuf = env::args()
        .nth(1)
        .unwrap_or_else(|| "road_accidents_cleaned.csv".to_string())
        .into();
    let artifact_path: PathBuf = env::args()
        .nth(2)
        .unwrap_or_else(|| "safety_model.json".to_string())
        .into();

    let frame = load_training_frame(&data_path)
        .with_context(|| format!("cannot load training data from {}", data_path.display()))?;

    let (low, high) = frame.label_counts();
    info!("Risk level distribution: {} low risk, {} high risk", low, high);
    info!("Model features: {:?}", FEATURE_COLUMNS);

    let (x_train, y_train, x_test, y_test) = stratified_split(&frame, TEST_FRACTION, SEED);

    let train_matrix =
        DenseMatrix::from_2d_vec(&x_train).map_err(|e| anyhow!("bad training matrix: {e}"))?;
    let model = RandomForestClassifier::fit(&train_matrix, &y_train, forest_parameters())
        .map_err(|e| anyhow!("training failed: {e}"))?;

    let test_matrix =
        DenseMatrix::from_2d_vec(&x_test).map_err(|e| anyhow!("bad test matrix: {e}"))?;
    let predicted = model
        .predict(&test_matrix)
        .map_err(|e| anyhow!("holdout prediction failed: {e}"))?;
    info!(
        "Holdout accuracy: {:.3} ({} test rows)",
        accuracy(&y_test, &predicted),
        y_test.len()
    );
    for (label, precision, recall) in precision_recall(&y_test, &predicted) {
        let name = if label == 1 { "high risk" } else { "low risk" };
        info!("Holdout {name}: precision {precision:.3}, recall {recall:.3}");
    }

    let cv_mean = cross_validate(&frame.features, &frame.labels)?;
    info!("Stratified {}-fold cross-validation accuracy: {:.3}", CV_FOLDS, cv_mean);

    let artifact = ClassifierArtifact {
        feature_names: FEATURE_COLUMNS.iter().map(|&s| s.to_string()).collect(),
        model,
    };
    write_artifact(&artifact, &artifact_path)?;
    info!("Model saved as '{}'", artifact_path.display());

    Ok(())
}

/// Mean accuracy over stratified folds, refitting per fold.
fn cross_validate(features: &[Vec<f64>], labels: &[u32]) -> Result<f64> {
    let folds = stratified_folds(labels, CV_FOLDS, SEED);
    let mut scores = Vec::with_capacity(folds.len());

    for fold in &folds {
        let in_fold = |i: &usize| fold.contains(i);

        let train_rows: Vec<Vec<f64>> = (0..features.len())
            .filter(|i| !in_fold(i))
            .map(|i| features[i].clone())
            .collect();
        let train_labels: Vec<u32> = (0..labels.len())
            .filter(|i| !in_fold(i))
            .map(|i| labels[i])
            .collect();
        let test_rows: Vec<Vec<f64>> = fold.iter().map(|&i| features[i].clone()).collect();
        let test_labels: Vec<u32> = fold.iter().map(|&i| labels[i]).collect();

        let train_matrix =
            DenseMatrix::from_2d_vec(&train_rows).map_err(|e| anyhow!("bad fold matrix: {e}"))?;
        let model = RandomForestClassifier::fit(&train_matrix, &train_labels, forest_parameters())
            .map_err(|e| anyhow!("fold training failed: {e}"))?;

        let test_matrix =
            DenseMatrix::from_2d_vec(&test_rows).map_err(|e| anyhow!("bad fold matrix: {e}"))?;
        let predicted = model
            .predict(&test_matrix)
            .map_err(|e| anyhow!("fold prediction failed: {e}"))?;

        scores.push(accuracy(&test_labels, &predicted));
    }

    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

fn write_artifact(artifact: &ClassifierArtifact, path: &Path) -> Result<()> {
    let serialized =
        serde_json::to_string(artifact).context("cannot serialize classifier artifact")?;
    fs::write(path, serialized)
        .with_context(|| format!("cannot write classifier artifact to {}", path.display()))?;
    Ok(())
}
