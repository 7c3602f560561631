use super::{handlers, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/analyze-url", post(handlers::analyze_url_handler))
        .route("/predict", post(handlers::predict_handler))
        .route(
            "/history",
            get(handlers::history_list_handler).delete(handlers::history_clear_handler),
        )
        .route("/history/{id}", delete(handlers::history_delete_handler))
        .route("/send-otp", post(handlers::send_otp_handler))
        .route("/verify-otp", post(handlers::verify_otp_handler))
        .route("/chat", post(handlers::chat_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
