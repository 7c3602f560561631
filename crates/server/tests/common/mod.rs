//! # Common Test Utilities
//!
//! `TestApp` spawns the real server on a random port, backed by a temporary
//! database, a generated classifier artifact, and an `httpmock::MockServer`
//! standing in for the video platform and chat relay APIs.

#![allow(unused)]

use anyhow::Result;
use dopamine_server::{
    config::get_config,
    router::create_router,
    state::{build_app_state, AppState},
};
use httpmock::MockServer;
use reqwest::Client;
use serde_json::json;
use std::{fs::File, io::Write};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _tmp_dir: TempDir,
    _server_handle: JoinHandle<()>,
}

/// The classifier artifact used across the integration tests: the full
/// training manifest with a single depth-1 tree splitting on
/// `log_view_count > 5`, so predictions are deterministic per input.
pub fn test_model_artifact() -> serde_json::Value {
    json!({
        "features": [
            {"name": "key_dopamine_factor", "kind": "categorical"},
            {"name": "dominant_color", "kind": "categorical"},
            {"name": "video_category", "kind": "categorical"},
            {"name": "freq_cut_per_video", "kind": "numeric"},
            {"name": "is_for_kids", "kind": "numeric"},
            {"name": "log_view_count", "kind": "numeric"},
            {"name": "video_duration_sec", "kind": "numeric"},
            {"name": "title_word_count", "kind": "numeric"},
            {"name": "publish_year", "kind": "numeric"},
            {"name": "publish_month", "kind": "numeric"},
            {"name": "publish_dayofweek", "kind": "numeric"},
            {"name": "is_weekend", "kind": "numeric"}
        ],
        "scale": 1.0,
        "bias": 0.0,
        "trees": [
            {"splits": [{"feature": 5, "border": 5.0}], "leaf_values": [-2.0, 2.0]}
        ]
    })
}

impl TestApp {
    /// Spawns the application server against a freshly generated model
    /// artifact and mock upstream services.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_model(Some(test_model_artifact())).await
    }

    /// Spawns the server with an optional model artifact; `None` simulates a
    /// failed classifier load (degraded mode).
    pub async fn spawn_with_model(artifact: Option<serde_json::Value>) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let tmp_dir = tempfile::tempdir()?;

        let model_path = tmp_dir.path().join("model.json");
        if let Some(artifact) = artifact {
            let mut file = File::create(&model_path)?;
            file.write_all(artifact.to_string().as_bytes())?;
        }

        let db_path = tmp_dir.path().join("predictions.db");
        let config_path = tmp_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
model_path: "{}"
youtube:
  api_url: "{}"
  api_key: "test-youtube-key"
chat:
  api_url: "{}"
  api_key: "test-chat-key"
  model_name: "mock-chat-model"
"#,
            db_path.to_str().unwrap(),
            model_path.to_str().unwrap(),
            mock_server.url("/videos"),
            mock_server.url("/v1/chat/completions"),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let address = format!("http://127.0.0.1:{port}");

        let router = create_router(app_state.clone());
        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Server error: {e}");
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            _tmp_dir: tmp_dir,
            _server_handle: server_handle,
        })
    }
}
