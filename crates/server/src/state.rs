//! # Application State
//!
//! The shared state built once at startup: the immutable classifier handle,
//! the history database, the external-API providers, the passcode store,
//! and the mail transport. A classifier that fails to load leaves the
//! prediction routes in a degraded "model unavailable" mode while the rest
//! of the server keeps serving.

use crate::config::AppConfig;
use crate::mailer::Mailer;
use crate::storage::HistoryStore;
use dopamine::otp::OtpStore;
use dopamine::providers::{ChatProvider, OpenRouterProvider, YouTubeProvider};
use dopamine::DopamineClassifier;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use turso::Builder;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when the artifact failed to load; prediction requests then
    /// report the model as unavailable instead of crashing the process.
    pub classifier: Option<Arc<DopamineClassifier>>,
    pub history: HistoryStore,
    pub youtube: Option<YouTubeProvider>,
    pub chat_provider: Option<Arc<dyn ChatProvider>>,
    pub otp_store: OtpStore,
    pub mailer: Option<Mailer>,
}

/// Builds the shared application state from the configuration.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let classifier = match DopamineClassifier::load(Path::new(&config.model_path)) {
        Ok(classifier) => {
            info!(path = %config.model_path, "Classifier loaded");
            Some(Arc::new(classifier))
        }
        Err(e) => {
            error!(path = %config.model_path, "Could not load classifier: {e}. Prediction requests will be rejected.");
            None
        }
    };

    let db = Builder::new_local(&config.db_url).build().await?;
    let history = HistoryStore::new(Arc::new(db));
    history.initialize_schema().await?;
    info!(db_path = %config.db_url, "Initialized prediction history storage");

    let youtube = match config.youtube.api_key.clone().filter(|k| !k.is_empty()) {
        Some(api_key) => Some(YouTubeProvider::new(config.youtube.api_url.clone(), api_key)?),
        None => {
            warn!("No video platform API key configured; /analyze-url will report a configuration error.");
            None
        }
    };

    let chat_provider: Option<Arc<dyn ChatProvider>> =
        match config.chat.api_key.clone().filter(|k| !k.is_empty()) {
            Some(api_key) => Some(Arc::new(OpenRouterProvider::new(
                config.chat.api_url.clone(),
                api_key,
                config.chat.model_name.clone(),
            )?)),
            None => {
                warn!("No chat relay API key configured; /chat will report a configuration error.");
                None
            }
        };

    let mailer = match &config.smtp {
        Some(smtp) => Some(Mailer::new(smtp)?),
        None => {
            warn!("No SMTP configuration; /send-otp will report a configuration error.");
            None
        }
    };

    Ok(AppState {
        config: Arc::new(config),
        classifier,
        history,
        youtube,
        chat_provider,
        otp_store: OtpStore::new(),
        mailer,
    })
}
