//! # Video Platform Metadata Client
//!
//! Fetches the `snippet`/`contentDetails`/`statistics` groupings for a video
//! and flattens them into [`RawVideoMetadata`]. Every nested key is optional
//! at every level; a missing field degrades to a default downstream rather
//! than failing the fetch. One blocking round trip per request, no internal
//! retry.

use crate::errors::PredictError;
use crate::features::RawVideoMetadata;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

// --- Platform API response structures (all keys optional) ---

#[derive(Deserialize, Debug, Default)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize, Debug, Default)]
struct VideoItem {
    snippet: Option<Snippet>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Deserialize, Debug, Default)]
struct Snippet {
    title: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct Statistics {
    /// The API serializes the counter as a decimal string.
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

/// A client for the video platform's public data API.
#[derive(Clone, Debug)]
pub struct YouTubeProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl YouTubeProvider {
    /// Creates a new provider. `api_url` overrides the public endpoint,
    /// which the integration tests point at a mock server.
    pub fn new(api_url: Option<String>, api_key: String) -> Result<Self, PredictError> {
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
        })
    }

    /// Fetches metadata for a video by its canonical identifier.
    pub async fn fetch_video(&self, video_id: &str) -> Result<RawVideoMetadata, PredictError> {
        debug!(video_id, "Fetching video metadata");
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", video_id),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(PredictError::ApiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PredictError::ApiResponse(error_text));
        }

        let list: VideoListResponse = response
            .json()
            .await
            .map_err(PredictError::ApiDeserialization)?;

        let item = list.items.into_iter().next().ok_or(PredictError::VideoNotFound)?;

        let snippet = item.snippet.unwrap_or_default();
        let content = item.content_details.unwrap_or_default();
        let stats = item.statistics.unwrap_or_default();

        Ok(RawVideoMetadata {
            view_count: stats.view_count.and_then(|v| v.parse().ok()),
            duration: content.duration,
            title: snippet.title,
            published_at: snippet.published_at,
            channel_title: snippet.channel_title,
        })
    }
}
