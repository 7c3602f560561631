//! # Inference Engine
//!
//! Wraps the pre-trained gradient-boosted tree classifier. The model is
//! exported offline as a JSON artifact holding the feature manifest and the
//! ensemble's oblivious trees; this module loads it once at process start
//! and scores aligned feature records into two-class probabilities.
//!
//! The loaded classifier is an explicit immutable handle, shared across
//! concurrent prediction calls behind an `Arc` with no locking: no call
//! mutates it, and inference is a pure, synchronous function of the record
//! and the artifact.

use crate::errors::PredictError;
use crate::features::FeatureVector;
use crate::schema::{align, AlignedRecord, ClassifierManifest, ManifestField};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

pub const HIGH_DOPAMINE_LABEL: &str = "High Dopamine";
pub const LOW_DOPAMINE_LABEL: &str = "Low Dopamine";

/// One level of an oblivious tree: every node at that depth applies the same
/// test, so a tree of depth `d` is `d` splits plus `2^d` leaf values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Split {
    /// True when the feature value is strictly greater than the border.
    Numeric { feature: usize, border: f64 },
    /// True when the categorical feature equals the label exactly.
    Categorical { feature: usize, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObliviousTree {
    splits: Vec<Split>,
    leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn score(&self, record: &AlignedRecord) -> f64 {
        let mut leaf = 0usize;
        for (level, split) in self.splits.iter().enumerate() {
            let branch = match split {
                Split::Numeric { feature, border } => record.number(*feature) > *border,
                Split::Categorical { feature, value } => record.category(*feature) == *value,
            };
            if branch {
                leaf |= 1 << level;
            }
        }
        self.leaf_values.get(leaf).copied().unwrap_or(0.0)
    }
}

/// The serialized classifier artifact, produced by the offline training
/// export. Raw leaf scores sum into a logit; `scale` and `bias` carry the
/// calibration the exporter baked in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub features: Vec<ManifestField>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub bias: f64,
    trees: Vec<ObliviousTree>,
}

fn default_scale() -> f64 {
    1.0
}

/// The prediction result: two-class probabilities summing to 1, plus the
/// arg-max label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub probability_low: f64,
    pub probability_high: f64,
    pub final_label: String,
}

/// The loaded two-class probability estimator.
#[derive(Debug, Clone)]
pub struct DopamineClassifier {
    manifest: ClassifierManifest,
    artifact: ModelArtifact,
}

impl DopamineClassifier {
    /// Loads the classifier from its JSON artifact at a fixed local path.
    ///
    /// A failure here is fatal to the prediction capability only; the caller
    /// decides whether the process keeps serving non-prediction routes.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            PredictError::ModelLoad(format!("could not read '{}': {e}", path.display()))
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .map_err(|e| PredictError::ModelLoad(format!("invalid artifact: {e}")))?;
        let classifier = Self::from_artifact(artifact)?;
        info!(
            path = %path.display(),
            features = classifier.manifest.len(),
            "Classifier artifact loaded"
        );
        Ok(classifier)
    }

    /// Builds the classifier from an already-deserialized artifact,
    /// validating that every tree split references a manifest column.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, PredictError> {
        if artifact.features.is_empty() {
            return Err(PredictError::ModelLoad(
                "artifact declares no features".to_string(),
            ));
        }
        for (i, tree) in artifact.trees.iter().enumerate() {
            // Bound the depth before shifting; 1 << 64 would overflow.
            if tree.splits.len() >= usize::BITS as usize {
                return Err(PredictError::ModelLoad(format!(
                    "tree {i} declares {} splits, deeper than any supported artifact",
                    tree.splits.len()
                )));
            }
            let expected_leaves = 1usize << tree.splits.len();
            if tree.leaf_values.len() != expected_leaves {
                return Err(PredictError::ModelLoad(format!(
                    "tree {i} has {} leaves, expected {expected_leaves}",
                    tree.leaf_values.len()
                )));
            }
            for split in &tree.splits {
                let feature = match split {
                    Split::Numeric { feature, .. } | Split::Categorical { feature, .. } => *feature,
                };
                if feature >= artifact.features.len() {
                    return Err(PredictError::ModelLoad(format!(
                        "tree {i} references feature index {feature}, but the manifest has {} columns",
                        artifact.features.len()
                    )));
                }
            }
        }

        let manifest = ClassifierManifest {
            fields: artifact.features.clone(),
        };
        Ok(Self { manifest, artifact })
    }

    /// The ordered feature-name manifest extracted from the artifact.
    pub fn manifest(&self) -> &ClassifierManifest {
        &self.manifest
    }

    /// Scores an aligned record into `(p_low, p_high)` and the arg-max label.
    ///
    /// Ties resolve toward "High Dopamine": the original arg-max picked
    /// index 1 when the probabilities were exactly equal, and the trained
    /// model's calibration may account for that, so the convention is kept.
    pub fn predict(&self, record: &AlignedRecord) -> Result<Prediction, PredictError> {
        if record.values.len() != self.manifest.len() {
            return Err(PredictError::MalformedRecord(format!(
                "record has {} values, manifest declares {}",
                record.values.len(),
                self.manifest.len()
            )));
        }

        let raw: f64 = self.artifact.bias
            + self.artifact.scale
                * self
                    .artifact
                    .trees
                    .iter()
                    .map(|tree| tree.score(record))
                    .sum::<f64>();

        let probability_high = 1.0 / (1.0 + (-raw).exp());
        let probability_low = 1.0 - probability_high;

        let final_label = if probability_high >= probability_low {
            HIGH_DOPAMINE_LABEL
        } else {
            LOW_DOPAMINE_LABEL
        };

        Ok(Prediction {
            probability_low,
            probability_high,
            final_label: final_label.to_string(),
        })
    }

    /// Convenience: align an arbitrary feature vector and score it.
    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<Prediction, PredictError> {
        let record = align(vector, &self.manifest);
        self.predict(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureValue;
    use crate::schema::FeatureKind;
    use std::io::Write;

    fn artifact_json() -> String {
        // Two columns, one depth-1 tree splitting on log_view_count > 5.
        serde_json::json!({
            "features": [
                {"name": "video_category", "kind": "categorical"},
                {"name": "log_view_count", "kind": "numeric"}
            ],
            "scale": 1.0,
            "bias": 0.0,
            "trees": [
                {"splits": [{"feature": 1, "border": 5.0}], "leaf_values": [-2.0, 2.0]}
            ]
        })
        .to_string()
    }

    fn classifier() -> DopamineClassifier {
        let artifact: ModelArtifact = serde_json::from_str(&artifact_json()).unwrap();
        DopamineClassifier::from_artifact(artifact).unwrap()
    }

    #[test]
    fn loads_the_manifest_from_the_artifact() {
        let classifier = classifier();
        assert_eq!(classifier.manifest().len(), 2);
        assert_eq!(classifier.manifest().fields[0].name, "video_category");
        assert_eq!(classifier.manifest().fields[1].kind, FeatureKind::Numeric);
    }

    #[test]
    fn probabilities_sum_to_one_and_follow_the_split() {
        let classifier = classifier();

        let mut vector = FeatureVector::new();
        vector.insert("log_view_count".to_string(), FeatureValue::Number(10.0));
        let high = classifier.predict_vector(&vector).unwrap();
        assert!((high.probability_low + high.probability_high - 1.0).abs() < 1e-12);
        assert!(high.probability_high > 0.5);
        assert_eq!(high.final_label, HIGH_DOPAMINE_LABEL);

        vector.insert("log_view_count".to_string(), FeatureValue::Number(1.0));
        let low = classifier.predict_vector(&vector).unwrap();
        assert!(low.probability_high < 0.5);
        assert_eq!(low.final_label, LOW_DOPAMINE_LABEL);
    }

    #[test]
    fn equal_probabilities_resolve_to_high_dopamine() {
        // No trees: the raw score is exactly the bias (0), so both classes
        // land on 0.5 and the tie must break toward "High Dopamine".
        let artifact: ModelArtifact = serde_json::from_str(
            &serde_json::json!({
                "features": [{"name": "log_view_count", "kind": "numeric"}],
                "trees": []
            })
            .to_string(),
        )
        .unwrap();
        let classifier = DopamineClassifier::from_artifact(artifact).unwrap();

        let prediction = classifier.predict_vector(&FeatureVector::new()).unwrap();
        assert_eq!(prediction.probability_low, 0.5);
        assert_eq!(prediction.probability_high, 0.5);
        assert_eq!(prediction.final_label, HIGH_DOPAMINE_LABEL);
    }

    #[test]
    fn categorical_splits_match_canonical_labels() {
        let artifact: ModelArtifact = serde_json::from_str(
            &serde_json::json!({
                "features": [{"name": "video_category", "kind": "categorical"}],
                "trees": [
                    {"splits": [{"feature": 0, "value": "Gaming"}], "leaf_values": [-1.0, 3.0]}
                ]
            })
            .to_string(),
        )
        .unwrap();
        let classifier = DopamineClassifier::from_artifact(artifact).unwrap();

        let mut vector = FeatureVector::new();
        vector.insert(
            "video_category".to_string(),
            FeatureValue::Category("Gaming".to_string()),
        );
        assert_eq!(
            classifier.predict_vector(&vector).unwrap().final_label,
            HIGH_DOPAMINE_LABEL
        );

        // An aligned-but-absent column scores down the "Missing" branch.
        assert_eq!(
            classifier
                .predict_vector(&FeatureVector::new())
                .unwrap()
                .final_label,
            LOW_DOPAMINE_LABEL
        );
    }

    #[test]
    fn load_reports_unreadable_and_invalid_artifacts() {
        assert!(matches!(
            DopamineClassifier::load(Path::new("/nonexistent/model.json")),
            Err(PredictError::ModelLoad(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(
            DopamineClassifier::load(file.path()),
            Err(PredictError::ModelLoad(_))
        ));
    }

    #[test]
    fn from_artifact_rejects_inconsistent_trees() {
        let artifact: ModelArtifact = serde_json::from_str(
            &serde_json::json!({
                "features": [{"name": "x", "kind": "numeric"}],
                "trees": [{"splits": [{"feature": 9, "border": 1.0}], "leaf_values": [0.0, 0.0]}]
            })
            .to_string(),
        )
        .unwrap();
        assert!(matches!(
            DopamineClassifier::from_artifact(artifact),
            Err(PredictError::ModelLoad(_))
        ));
    }

    #[test]
    fn from_artifact_rejects_absurd_tree_depths() {
        let splits: Vec<_> = (0..64)
            .map(|_| serde_json::json!({"feature": 0, "border": 1.0}))
            .collect();
        let artifact: ModelArtifact = serde_json::from_value(serde_json::json!({
            "features": [{"name": "x", "kind": "numeric"}],
            "trees": [{"splits": splits, "leaf_values": []}]
        }))
        .unwrap();
        assert!(matches!(
            DopamineClassifier::from_artifact(artifact),
            Err(PredictError::ModelLoad(_))
        ));
    }

    #[test]
    fn malformed_record_is_reported_not_retried() {
        let classifier = classifier();
        let record = AlignedRecord { values: vec![] };
        assert!(matches!(
            classifier.predict(&record),
            Err(PredictError::MalformedRecord(_))
        ));
    }
}
