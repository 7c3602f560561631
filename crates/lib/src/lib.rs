//! # Dopamine Engagement Prediction
//!
//! This crate turns raw short-form video metadata and user-supplied
//! categorical attributes into the exact fixed-schema feature vector a
//! pre-trained gradient-boosted tree classifier was fit against, and scores
//! it into a "High Dopamine" / "Low Dopamine" label.
//!
//! The pipeline is deterministic and side-effect free: canonicalize free-text
//! categories, derive numeric/calendar features from platform metadata, align
//! the result to the classifier's feature manifest, and run inference. The
//! I/O-bound collaborators (the video platform API client and the streaming
//! chat relay) live under [`providers`].

pub mod duration;
pub mod errors;
pub mod features;
pub mod model;
pub mod otp;
pub mod providers;
pub mod schema;
pub mod video_url;
pub mod vocab;

pub use duration::parse_iso8601_duration;
pub use errors::PredictError;
pub use features::{derive_features, CategoricalInputs, FeatureValue, FeatureVector, RawVideoMetadata};
pub use model::{DopamineClassifier, Prediction, HIGH_DOPAMINE_LABEL, LOW_DOPAMINE_LABEL};
pub use schema::{align, AlignedRecord, ClassifierManifest, FeatureKind, ManifestField};
pub use video_url::extract_video_id;
pub use vocab::{canonicalize, CategoryKind};
