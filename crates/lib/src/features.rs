//! # Feature Derivation
//!
//! Turns raw platform metadata and canonicalized user inputs into the named
//! feature vector the classifier expects. Every extraction point has a
//! defined default, so derivation never fails on missing fields: an absent
//! view count is 0 views, an unparseable duration is 0 seconds, and an
//! absent publish timestamp zeroes all four calendar features (a sentinel,
//! not a real calendar value).

use crate::duration::parse_iso8601_duration;
use crate::vocab::{canonicalize, CategoryKind};
use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A single feature value: either numeric or a canonical category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    /// Numeric view of the value. Category labels coerce to 0.0 so that a
    /// mistyped field degrades to the numeric default instead of failing.
    pub fn as_number(&self) -> f64 {
        match self {
            FeatureValue::Number(n) => *n,
            FeatureValue::Category(_) => 0.0,
        }
    }

    /// Categorical view of the value. Numbers render with their canonical
    /// display form so the classifier sees a stable string.
    pub fn as_category(&self) -> String {
        match self {
            FeatureValue::Number(n) => n.to_string(),
            FeatureValue::Category(s) => s.clone(),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Category(s.to_string())
    }
}

/// The derivation-stage output: feature name to value. Ephemeral; built once
/// per prediction request and handed to the schema aligner.
pub type FeatureVector = HashMap<String, FeatureValue>;

/// Read-only video metadata as fetched from the platform API.
///
/// Every field is optional: the upstream response nests these under
/// `snippet`/`contentDetails`/`statistics` groupings, and any key may be
/// absent at any level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVideoMetadata {
    /// Non-negative view counter. The API serializes it as a string.
    pub view_count: Option<u64>,
    /// ISO-8601 duration string, e.g. `PT1M30S`.
    pub duration: Option<String>,
    pub title: Option<String>,
    /// RFC 3339 publish instant; a trailing `Z` means UTC.
    pub published_at: Option<String>,
    /// Display-only, not a model feature.
    pub channel_title: Option<String>,
}

/// User-supplied categorical and passthrough numeric attributes.
///
/// The string fields are free text and case-insensitive; after
/// canonicalization each is guaranteed to be a member of its closed
/// vocabulary, with a defined "unknown" member so the step never fails.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoricalInputs {
    #[serde(default)]
    pub key_dopamine_factor: Option<String>,
    #[serde(default)]
    pub dominant_color: Option<String>,
    #[serde(default)]
    pub video_category: Option<String>,
    #[serde(default)]
    pub freq_cut_per_video: i64,
    #[serde(default)]
    pub is_for_kids: i64,
}

impl CategoricalInputs {
    /// Canonicalizes the free-text fields and merges everything into the
    /// feature vector under the declared training names.
    pub fn merge_into(&self, vector: &mut FeatureVector) {
        vector.insert(
            "key_dopamine_factor".to_string(),
            canonicalize(
                CategoryKind::DopamineFactor,
                self.key_dopamine_factor.as_deref().unwrap_or(""),
            )
            .into(),
        );
        vector.insert(
            "dominant_color".to_string(),
            canonicalize(
                CategoryKind::DominantColor,
                self.dominant_color.as_deref().unwrap_or(""),
            )
            .into(),
        );
        vector.insert(
            "video_category".to_string(),
            canonicalize(
                CategoryKind::VideoCategory,
                self.video_category.as_deref().unwrap_or(""),
            )
            .into(),
        );
        vector.insert(
            "freq_cut_per_video".to_string(),
            FeatureValue::Number(self.freq_cut_per_video as f64),
        );
        vector.insert(
            "is_for_kids".to_string(),
            FeatureValue::Number(self.is_for_kids as f64),
        );
    }
}

/// Derives the metadata-based model features.
///
/// - `log_view_count = ln(1 + view_count)`: view counts are heavy-tailed,
///   and log1p is defined at zero views.
/// - `video_duration_sec` via the total ISO-8601 parser.
/// - `title_word_count`: whitespace-delimited tokens, 0 for an empty title.
/// - `publish_year` / `publish_month` (1-12) / `publish_dayofweek`
///   (0 = Monday .. 6 = Sunday) / `is_weekend` from the publish instant, or
///   all 0 when the timestamp is absent or unparseable.
pub fn derive_features(metadata: &RawVideoMetadata) -> FeatureVector {
    let mut vector = FeatureVector::new();

    let view_count = metadata.view_count.unwrap_or(0);
    vector.insert(
        "log_view_count".to_string(),
        FeatureValue::Number((1.0 + view_count as f64).ln()),
    );

    let duration_sec = metadata
        .duration
        .as_deref()
        .map(parse_iso8601_duration)
        .unwrap_or(0);
    vector.insert(
        "video_duration_sec".to_string(),
        FeatureValue::Number(duration_sec as f64),
    );

    let title_word_count = metadata
        .title
        .as_deref()
        .map(|t| t.split_whitespace().count())
        .unwrap_or(0);
    vector.insert(
        "title_word_count".to_string(),
        FeatureValue::Number(title_word_count as f64),
    );

    let (year, month, dayofweek, is_weekend) = match metadata
        .published_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
    {
        Some(instant) => {
            let dayofweek = instant.weekday().num_days_from_monday();
            (
                instant.year() as f64,
                instant.month() as f64,
                dayofweek as f64,
                if dayofweek >= 5 { 1.0 } else { 0.0 },
            )
        }
        None => {
            debug!(
                published_at = ?metadata.published_at,
                "Publish timestamp absent or unparseable; calendar features default to 0"
            );
            (0.0, 0.0, 0.0, 0.0)
        }
    };
    vector.insert("publish_year".to_string(), FeatureValue::Number(year));
    vector.insert("publish_month".to_string(), FeatureValue::Number(month));
    vector.insert(
        "publish_dayofweek".to_string(),
        FeatureValue::Number(dayofweek),
    );
    vector.insert("is_weekend".to_string(), FeatureValue::Number(is_weekend));

    vector
}
