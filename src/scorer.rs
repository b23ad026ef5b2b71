//! Risk scorer backed by a pre-trained random forest classifier
//!
//! The classifier artifact is loaded once at process start and passed
//! into the scorer explicitly; a missing or corrupt artifact fails
//! startup with a clear diagnostic instead of failing lazily on the
//! first request.

use crate::models::Route;
use crate::{Result, RouteSafeError};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Concrete classifier type stored in the artifact
pub type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// On-disk classifier artifact: the trained model plus the feature
/// names in the exact order the model was trained with.
#[derive(Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub feature_names: Vec<String>,
    pub model: Forest,
}

/// Scores routes with the pre-trained classifier.
pub struct RiskScorer {
    feature_names: Vec<String>,
    model: Forest,
}

impl RiskScorer {
    /// Load the classifier artifact from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            RouteSafeError::model(format!(
                "cannot read classifier artifact '{}': {e}",
                path.display()
            ))
        })?;

        let artifact: ClassifierArtifact = serde_json::from_str(&raw).map_err(|e| {
            RouteSafeError::model(format!(
                "corrupt classifier artifact '{}': {e}",
                path.display()
            ))
        })?;

        let scorer = Self::from_artifact(artifact)?;
        info!(
            "Loaded classifier expecting features: {:?}",
            scorer.feature_names
        );
        Ok(scorer)
    }

    /// Build a scorer from an already-deserialized artifact.
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self> {
        if artifact.feature_names.is_empty() {
            return Err(RouteSafeError::model(
                "classifier artifact declares no feature names",
            ));
        }

        Ok(Self {
            feature_names: artifact.feature_names,
            model: artifact.model,
        })
    }

    /// Feature names the model expects, in training order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Label a route: 0 = safe, nonzero = unsafe.
    ///
    /// The feature row matches the training schema by name and order,
    /// but carries a constant zero for every feature regardless of the
    /// route, so all routes scored in one call receive the same label.
    pub fn score(&self, _route: &Route) -> Result<u32> {
        let row = vec![vec![0.0_f64; self.feature_names.len()]];
        let features = DenseMatrix::from_2d_vec(&row)
            .map_err(|e| RouteSafeError::model(format!("cannot build feature row: {e}")))?;

        let labels = self
            .model
            .predict(&features)
            .map_err(|e| RouteSafeError::model(format!("prediction failed: {e}")))?;

        let label = labels
            .first()
            .copied()
            .ok_or_else(|| RouteSafeError::model("classifier returned no label"))?;

        debug!("Scored route with label {}", label);
        Ok(label)
    }
}
