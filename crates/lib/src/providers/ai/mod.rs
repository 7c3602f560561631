//! # Chat Relay Providers
//!
//! The assistant endpoint is a pass-through to an OpenAI-compatible chat
//! completion API. Providers stream content deltas as they arrive with no
//! buffering contract beyond forwarding chunks, terminating on the
//! `[DONE]` marker or underlying connection failure.

pub mod openrouter;

use crate::errors::PredictError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use futures::stream::BoxStream;
pub use openrouter::OpenRouterProvider;
use std::fmt::Debug;

/// A stream of assistant content deltas.
pub type ChatStream = BoxStream<'static, Result<String, PredictError>>;

/// A trait for streaming chat completion providers.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug + DynClone {
    /// Opens a streaming completion for a single user message and yields the
    /// content chunks as the upstream model produces them.
    async fn stream_chat(&self, user_message: &str) -> Result<ChatStream, PredictError>;
}

dyn_clone::clone_trait_object!(ChatProvider);
