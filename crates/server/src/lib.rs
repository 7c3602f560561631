//! # dopamine-server
//!
//! The HTTP layer over the `dopamine` prediction pipeline: metadata
//! analysis, prediction, history persistence, passcode login, and the
//! streaming assistant relay.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod mailer;
pub mod router;
pub mod state;
pub mod storage;
pub mod types;

use crate::config::AppConfig;
use crate::state::build_app_state;
use tracing::info;

/// Builds the application state and serves the router on the listener.
pub async fn run(listener: tokio::net::TcpListener, config: AppConfig) -> anyhow::Result<()> {
    let app_state = build_app_state(config).await?;
    let app = router::create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
