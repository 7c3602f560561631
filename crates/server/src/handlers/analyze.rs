//! # URL Analysis Handler
//!
//! Resolves a platform URL to its video, fetches the metadata, and returns
//! the derived model features alongside the display fields. This is the
//! metadata-driven entry into the feature pipeline; the client feeds the
//! result back into `/predict` together with the user-supplied attributes.

use crate::{errors::AppError, state::AppState};
use axum::{extract::State, Json};
use dopamine::{derive_features, extract_video_id};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

#[derive(Deserialize)]
pub struct AnalyzeUrlRequest {
    pub url: String,
}

/// The handler for the `/analyze-url` endpoint.
pub async fn analyze_url_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AnalyzeUrlRequest>,
) -> Result<Json<Value>, AppError> {
    let youtube = app_state
        .youtube
        .as_ref()
        .ok_or(AppError::Predict(dopamine::PredictError::MissingApiKey))?;

    // A URL matching no accepted shape is expected user input, rejected
    // before the fetch.
    let video_id = extract_video_id(&payload.url)
        .ok_or_else(|| AppError::BadRequest("Invalid YouTube URL provided".to_string()))?;

    let metadata = youtube.fetch_video(video_id).await?;
    let features = derive_features(&metadata);

    let mut body = Map::new();
    body.insert(
        "video_title".to_string(),
        json!(metadata.title.as_deref().unwrap_or("N/A")),
    );
    body.insert(
        "channel_name".to_string(),
        json!(metadata.channel_title.as_deref().unwrap_or("N/A")),
    );
    for (name, value) in &features {
        body.insert(name.clone(), serde_json::to_value(value).unwrap_or(Value::Null));
    }

    info!(video_id, "Analyzed URL, returning derived features");
    Ok(Json(Value::Object(body)))
}
