//! # API Route Handlers
//!
//! The Axum route handlers, split into logical sub-modules: metadata
//! analysis, prediction, history, passcode login, and the chat relay.

pub mod analyze;
pub mod auth_handlers;
pub mod chat;
pub mod general;
pub mod history;
pub mod predict;

pub use analyze::*;
pub use auth_handlers::*;
pub use chat::*;
pub use general::*;
pub use history::*;
pub use predict::*;
