//! # Prediction Endpoint Tests
//!
//! Covers the `/predict` route end-to-end: scoring against the generated
//! classifier artifact, input validation, the degraded no-model mode, and
//! persistence of successful predictions into the history store.

mod common;

use anyhow::Result;
use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_predict_high_dopamine() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    // The test artifact scores +2 when log_view_count > 5, so this record
    // lands on the high-dopamine leaf.
    let payload = json!({
        "url": "https://www.youtube.com/watch?v=abc123",
        "video_title": "Ultimate Satisfying Compilation",
        "key_dopamine_factor": "visual effects",
        "dominant_color": "red",
        "video_category": "Entertainment",
        "freq_cut_per_video": 12,
        "is_for_kids": 0,
        "log_view_count": 7.2,
        "video_duration_sec": 90.0,
        "title_word_count": 3.0
    });

    // Act
    let response = app
        .client
        .post(format!("{}/predict", app.address))
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert!(response.status().is_success());
    let body: Value = response.json().await?;
    assert_eq!("High Dopamine", body["final_label"]);
    let p_high = body["probability_high"].as_f64().unwrap();
    let p_low = body["probability_low"].as_f64().unwrap();
    assert!(p_high > 0.8, "expected a confident high score, got {p_high}");
    assert!((p_high + p_low - 1.0).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_predict_low_dopamine_with_sparse_input() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    // Everything but one numeric feature is omitted; alignment fills the
    // gaps with defaults and log_view_count stays below the split border.
    let payload = json!({ "log_view_count": 1.0 });

    // Act
    let response = app
        .client
        .post(format!("{}/predict", app.address))
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert!(response.status().is_success());
    let body: Value = response.json().await?;
    assert_eq!("Low Dopamine", body["final_label"]);
    assert!(body["probability_low"].as_f64().unwrap() > 0.8);

    Ok(())
}

#[tokio::test]
async fn test_predict_empty_body_is_rejected() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;

    // Act
    let response = app
        .client
        .post(format!("{}/predict", app.address))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!("No data provided for prediction.", body["error"]);

    Ok(())
}

#[tokio::test]
async fn test_predict_without_model_returns_service_unavailable() -> Result<()> {
    // Arrange: no artifact on disk, so the classifier fails to load and the
    // server starts in degraded mode.
    let app = TestApp::spawn_with_model(None).await?;

    // Act
    let response = app
        .client
        .post(format!("{}/predict", app.address))
        .json(&json!({ "log_view_count": 7.2 }))
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(503, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(
        "Model is not loaded, cannot make prediction.",
        body["error"]
    );

    // The rest of the server keeps serving.
    let health = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request to /health");
    assert!(health.status().is_success());

    Ok(())
}

#[tokio::test]
async fn test_predict_persists_to_history() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let payload = json!({
        "url": "https://youtu.be/xyz789",
        "video_title": "Quiet Documentary",
        "log_view_count": 2.0
    });

    // Act
    let response = app
        .client
        .post(format!("{}/predict", app.address))
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let history: Vec<Value> = app
        .client
        .get(format!("{}/history", app.address))
        .send()
        .await?
        .json()
        .await?;

    // Assert
    assert_eq!(1, history.len());
    let entry = &history[0];
    assert_eq!("https://youtu.be/xyz789", entry["youtube_url"]);
    assert_eq!("Quiet Documentary", entry["video_title"]);
    assert_eq!("Low Dopamine", entry["final_label"]);
    assert!(entry["prediction_date"].as_str().unwrap().len() >= 19);

    Ok(())
}
