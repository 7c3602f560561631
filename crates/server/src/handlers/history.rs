//! # Prediction History Handlers
//!
//! Listing (with sort order), single deletion, and full clearing of the
//! stored prediction history.

use crate::{errors::AppError, state::AppState, storage::HistoryEntry, types::SortParams};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

/// The handler for `GET /history`.
pub async fn history_list_handler(
    State(app_state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let entries = app_state.history.list(params.ascending()).await?;
    Ok(Json(entries))
}

/// The handler for `DELETE /history/{id}`.
pub async fn history_delete_handler(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let deleted = app_state.history.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Prediction not found.".to_string()));
    }
    info!(id, "Deleted prediction from history");
    Ok(Json(json!({ "message": "Prediction deleted successfully." })))
}

/// The handler for `DELETE /history`.
pub async fn history_clear_handler(
    State(app_state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let removed = app_state.history.clear().await?;
    info!(removed, "Cleared complete prediction history");
    Ok(Json(json!({
        "message": format!("All {removed} prediction(s) cleared successfully.")
    })))
}
