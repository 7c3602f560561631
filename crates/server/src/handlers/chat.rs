//! # Chat Relay Handler
//!
//! A streaming pass-through to the configured chat provider. Upstream
//! content deltas are forwarded as server-sent events as they arrive; the
//! stream ends when the provider signals completion or the connection
//! drops. Errors that occur mid-stream are forwarded as an `error` event
//! rather than torn-down silently.

use crate::{errors::AppError, state::AppState};
use anyhow::anyhow;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// The handler for the `/chat` endpoint.
pub async fn chat_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if payload.message.is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }
    let provider = app_state
        .chat_provider
        .as_ref()
        .ok_or_else(|| AppError::Internal(anyhow!("chat provider is not configured")))?;

    let upstream = provider.stream_chat(&payload.message).await?;

    let events = upstream.map(|chunk| {
        let body = match chunk {
            Ok(content) => json!({ "content": content }),
            Err(e) => json!({ "error": e.to_string() }),
        };
        Ok(Event::default()
            .json_data(body)
            .unwrap_or_else(|_| Event::default()))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
