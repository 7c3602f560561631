//! OpenRouter chat relay with server-sent-event streaming.

use super::{ChatProvider, ChatStream};
use crate::errors::PredictError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

/// The fixed pre-prompt restricting the assistant to on-topic queries.
const SYSTEM_PROMPT: &str =
    "Don't help the user with any coding related tasks. \
     Answer to only dopamine or website related queries.";

// --- OpenAI-compatible request and streaming-response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    #[serde(default)]
    delta: ChatDelta,
}

#[derive(Deserialize, Debug, Default)]
struct ChatDelta {
    content: Option<String>,
}

/// A provider for the OpenRouter streaming chat completion API.
#[derive(Clone, Debug)]
pub struct OpenRouterProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(
        api_url: Option<String>,
        api_key: String,
        model: Option<String>,
    ) -> Result<Self, PredictError> {
        if api_key.is_empty() {
            return Err(PredictError::MissingApiKey);
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(PredictError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

struct SseState {
    inner: BoxStream<'static, Result<Vec<u8>, reqwest::Error>>,
    buffer: String,
    done: bool,
}

/// Pulls complete `data:` lines out of the buffered byte stream and decodes
/// the content deltas. Undecodable chunks are skipped, matching the relay's
/// forward-what-you-can contract.
fn next_delta(state: &mut SseState) -> Option<String> {
    while let Some(pos) = state.buffer.find('\n') {
        let line: String = state.buffer.drain(..=pos).collect();
        let line = line.trim();
        let Some(payload) = line.strip_prefix("data: ") else {
            continue;
        };
        if payload == "[DONE]" {
            state.done = true;
            return None;
        }
        if let Ok(chunk) = serde_json::from_str::<ChatChunk>(payload) {
            if let Some(content) = chunk.choices.first().and_then(|c| c.delta.content.clone()) {
                if !content.is_empty() {
                    return Some(content);
                }
            }
        }
    }
    None
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    async fn stream_chat(&self, user_message: &str) -> Result<ChatStream, PredictError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: 0.7,
            stream: true,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(PredictError::ApiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PredictError::ApiResponse(error_text));
        }

        let state = SseState {
            inner: response
                .bytes_stream()
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .boxed(),
            buffer: String::new(),
            done: false,
        };

        let stream = futures::stream::unfold(state, |mut state| async move {
            loop {
                if state.done {
                    return None;
                }
                if let Some(delta) = next_delta(&mut state) {
                    return Some((Ok(delta), state));
                }
                if state.done {
                    return None;
                }
                match state.inner.next().await {
                    Some(Ok(bytes)) => {
                        state.buffer.push_str(&String::from_utf8_lossy(&bytes));
                    }
                    Some(Err(e)) => {
                        state.done = true;
                        return Some((Err(PredictError::ApiRequest(e)), state));
                    }
                    None => {
                        debug!("Upstream chat stream closed without [DONE]");
                        return None;
                    }
                }
            }
        });

        Ok(stream.boxed())
    }
}
