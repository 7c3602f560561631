//! # Schema Alignment
//!
//! Reconciles an arbitrary feature vector against the classifier's declared
//! feature manifest. Callers may omit any field and still get a defined
//! prediction: absent features are synthesized with a type-aware default,
//! extras are dropped silently, and the output is in the exact column order
//! the classifier was fit against. An unvalidated mapping never reaches the
//! model boundary.

use crate::features::{FeatureValue, FeatureVector};
use serde::{Deserialize, Serialize};

/// Sentinel label substituted for an absent categorical feature.
pub const MISSING_CATEGORY: &str = "Missing";

/// The expected value kind of a manifest column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Categorical,
    Numeric,
}

/// One column of the classifier's input schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestField {
    pub name: String,
    pub kind: FeatureKind,
}

/// The ordered feature-name list extracted from the classifier artifact.
///
/// Immutable for the process lifetime; owned by the inference engine and
/// shared with the aligner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierManifest {
    pub fields: Vec<ManifestField>,
}

impl ClassifierManifest {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a feature name in the declared column order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A feature record reindexed to the manifest's exact column order.
///
/// `values[i]` corresponds to `manifest.fields[i]`; the invariant that every
/// manifest name appears exactly once is guaranteed by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRecord {
    pub values: Vec<FeatureValue>,
}

impl AlignedRecord {
    /// Numeric view of column `i` (categorical values coerce to 0.0).
    pub fn number(&self, i: usize) -> f64 {
        self.values.get(i).map(FeatureValue::as_number).unwrap_or(0.0)
    }

    /// Categorical view of column `i`.
    pub fn category(&self, i: usize) -> String {
        self.values
            .get(i)
            .map(FeatureValue::as_category)
            .unwrap_or_else(|| MISSING_CATEGORY.to_string())
    }
}

/// Aligns a feature vector to the manifest.
///
/// For each manifest column in order: copy the supplied value if present,
/// otherwise insert the type-aware default (`"Missing"` for categorical
/// columns, 0 for numeric ones). Names not in the manifest are not forwarded
/// to inference.
pub fn align(vector: &FeatureVector, manifest: &ClassifierManifest) -> AlignedRecord {
    let values = manifest
        .fields
        .iter()
        .map(|field| match vector.get(&field.name) {
            Some(value) => value.clone(),
            None => match field.kind {
                FeatureKind::Categorical => FeatureValue::Category(MISSING_CATEGORY.to_string()),
                FeatureKind::Numeric => FeatureValue::Number(0.0),
            },
        })
        .collect();
    AlignedRecord { values }
}
