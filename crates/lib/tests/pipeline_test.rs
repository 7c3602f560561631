//! # Feature Pipeline Integration Tests
//!
//! Drives the whole library surface end-to-end: metadata (fetched from a
//! mocked video platform API) through feature derivation, categorical
//! canonicalization, schema alignment, and classifier inference.

use anyhow::Result;
use dopamine::{
    canonicalize, derive_features, providers::YouTubeProvider, CategoricalInputs, CategoryKind,
    DopamineClassifier, FeatureValue, HIGH_DOPAMINE_LABEL, LOW_DOPAMINE_LABEL,
};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;

/// Writes a classifier artifact whose single tree splits on
/// `log_view_count > 10` and whose second tree rewards the canonical
/// "Visual Effects" factor.
fn write_artifact() -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(
        json!({
            "features": [
                {"name": "key_dopamine_factor", "kind": "categorical"},
                {"name": "log_view_count", "kind": "numeric"},
                {"name": "video_duration_sec", "kind": "numeric"},
                {"name": "title_word_count", "kind": "numeric"},
                {"name": "is_weekend", "kind": "numeric"}
            ],
            "scale": 1.0,
            "bias": 0.0,
            "trees": [
                {"splits": [{"feature": 1, "border": 10.0}], "leaf_values": [-1.5, 1.5]},
                {"splits": [{"feature": 0, "value": "Visual Effects"}], "leaf_values": [-0.5, 2.0]}
            ]
        })
        .to_string()
        .as_bytes(),
    )?;
    Ok(file)
}

#[tokio::test]
async fn metadata_fetch_to_prediction() -> Result<()> {
    // Arrange: a viral-looking video behind the mocked platform API.
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/videos").query_param("id", "abc123");
        then.status(200).json_body(json!({
            "items": [{
                "snippet": {
                    "title": "MOST Satisfying Slime EVER",
                    "publishedAt": "2024-03-09T10:00:00Z",
                    "channelTitle": "Slime Lab"
                },
                "contentDetails": { "duration": "PT45S" },
                "statistics": { "viewCount": "120000" }
            }]
        }));
    });
    let provider = YouTubeProvider::new(Some(server.url("/videos")), "key".to_string())?;
    let classifier = {
        let artifact = write_artifact()?;
        DopamineClassifier::load(artifact.path())?
    };

    // Act: fetch, derive, merge the user-supplied categoricals, score.
    let metadata = provider.fetch_video("abc123").await?;
    let mut vector = derive_features(&metadata);
    let inputs = CategoricalInputs {
        key_dopamine_factor: Some("visual effects".to_string()),
        dominant_color: None,
        video_category: None,
        freq_cut_per_video: 20,
        is_for_kids: 0,
    };
    inputs.merge_into(&mut vector);
    let prediction = classifier.predict_vector(&vector)?;

    // Assert: ln(120001) > 10 and the canonicalized factor matches the
    // categorical split, so both trees vote high.
    assert_eq!(prediction.final_label, HIGH_DOPAMINE_LABEL);
    assert!(prediction.probability_high > 0.9);

    Ok(())
}

#[tokio::test]
async fn degraded_metadata_still_scores() -> Result<()> {
    // Arrange: the platform returns an item with every grouping missing.
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/videos");
        then.status(200).json_body(json!({ "items": [{}] }));
    });
    let provider = YouTubeProvider::new(Some(server.url("/videos")), "key".to_string())?;
    let classifier = {
        let artifact = write_artifact()?;
        DopamineClassifier::load(artifact.path())?
    };

    // Act: no categoricals supplied either, so alignment fills everything
    // with sentinel defaults.
    let metadata = provider.fetch_video("gone").await?;
    let vector = derive_features(&metadata);
    let prediction = classifier.predict_vector(&vector)?;

    // Assert: zeros and "Missing" land on the low leaves of both trees.
    assert_eq!(prediction.final_label, LOW_DOPAMINE_LABEL);
    assert!(
        vector
            .get("log_view_count")
            .is_some_and(|v| v.as_number() == 0.0),
        "absent view count must derive to 0"
    );

    Ok(())
}

#[test]
fn canonical_labels_line_up_with_artifact_split_values() {
    // The artifact's categorical split values are canonical training labels;
    // user input in any casing must resolve onto them.
    assert_eq!(
        canonicalize(CategoryKind::DopamineFactor, "  VISUAL EFFECTS "),
        "Visual Effects"
    );
    let mut vector = dopamine::FeatureVector::new();
    let inputs = CategoricalInputs {
        key_dopamine_factor: Some("Visual Effects".to_string()),
        dominant_color: Some("no-such-color".to_string()),
        video_category: None,
        freq_cut_per_video: 0,
        is_for_kids: 1,
    };
    inputs.merge_into(&mut vector);
    assert_eq!(
        vector.get("key_dopamine_factor").unwrap().as_category(),
        "Visual Effects"
    );
    assert_eq!(
        vector.get("dominant_color").unwrap().as_category(),
        "No Dominant Color"
    );
    assert!(matches!(
        vector.get("is_for_kids"),
        Some(FeatureValue::Number(n)) if *n == 1.0
    ));
}
