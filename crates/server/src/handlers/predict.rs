//! # Prediction Handler
//!
//! Accepts a flat mapping of field name to value, canonicalizes the
//! free-text categorical fields, aligns the record against the classifier
//! manifest, and scores it. Callers may omit any field and still get a
//! defined prediction; an unvalidated mapping never reaches the model.

use crate::{errors::AppError, state::AppState};
use axum::{extract::State, Json};
use dopamine::{CategoricalInputs, FeatureValue, FeatureVector, Prediction};
use serde_json::{Map, Value};
use tracing::info;

/// Fields consumed by name rather than forwarded as features.
const RESERVED_FIELDS: &[&str] = &[
    "url",
    "video_title",
    "channel_name",
    "key_dopamine_factor",
    "dominant_color",
    "video_category",
    "freq_cut_per_video",
    "is_for_kids",
];

fn string_field(map: &Map<String, Value>, name: &str) -> Option<String> {
    map.get(name).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Integer coercion matching the loose client contract: numbers, numeric
/// strings, and booleans all count; anything else is the 0 default.
fn integer_field(map: &Map<String, Value>, name: &str) -> i64 {
    match map.get(name) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| {
            n.as_f64().map(|f| f as i64).unwrap_or(0)
        }),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Bool(b)) => *b as i64,
        _ => 0,
    }
}

/// Converts a loose JSON value into a feature value, when representable.
fn to_feature_value(value: &Value) -> Option<FeatureValue> {
    match value {
        Value::Number(n) => n.as_f64().map(FeatureValue::Number),
        Value::String(s) => Some(FeatureValue::Category(s.clone())),
        Value::Bool(b) => Some(FeatureValue::Number(*b as i64 as f64)),
        _ => None,
    }
}

/// The handler for the `/predict` endpoint.
pub async fn predict_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Prediction>, AppError> {
    // Checked on every request, not only at startup: the process keeps
    // serving other routes when the model is unavailable.
    let classifier = app_state
        .classifier
        .as_ref()
        .ok_or(AppError::ModelUnavailable)?;

    let map = payload
        .as_object()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::BadRequest("No data provided for prediction.".to_string()))?;

    info!("Received data for prediction: {payload}");

    // Pre-computed features the caller supplied directly (e.g. the
    // /analyze-url output) are forwarded as-is; alignment drops anything the
    // manifest does not declare.
    let mut vector = FeatureVector::new();
    for (name, value) in map {
        if RESERVED_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if let Some(feature) = to_feature_value(value) {
            vector.insert(name.clone(), feature);
        }
    }

    let inputs = CategoricalInputs {
        key_dopamine_factor: string_field(map, "key_dopamine_factor"),
        dominant_color: string_field(map, "dominant_color"),
        video_category: string_field(map, "video_category"),
        freq_cut_per_video: integer_field(map, "freq_cut_per_video"),
        is_for_kids: integer_field(map, "is_for_kids"),
    };
    inputs.merge_into(&mut vector);

    let prediction = classifier.predict_vector(&vector)?;

    // History persistence is best-effort: a storage failure must not turn a
    // successful prediction into an error response.
    let youtube_url = string_field(map, "url").unwrap_or_else(|| "N/A".to_string());
    let video_title = string_field(map, "video_title").unwrap_or_else(|| "N/A".to_string());
    if let Err(e) = app_state
        .history
        .insert(
            &youtube_url,
            &video_title,
            &prediction.final_label,
            prediction.probability_high,
            prediction.probability_low,
        )
        .await
    {
        tracing::error!("Failed to save prediction to history: {e:?}");
    }

    info!(
        final_label = %prediction.final_label,
        probability_high = prediction.probability_high,
        "Prediction successful"
    );
    Ok(Json(prediction))
}
