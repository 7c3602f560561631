use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dopamine::PredictError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Input-shape problems map to 4xx, an unloaded classifier to a stable 503,
/// upstream API failures to 502, and everything else to 500 — the taxonomy
/// keeps "the model is missing" distinct from "your input was bad".
pub enum AppError {
    /// Structurally invalid request input, rejected before the core runs.
    BadRequest(String),
    /// A referenced resource does not exist.
    NotFound(String),
    /// Failed login verification.
    Unauthorized(String),
    /// The classifier artifact did not load at startup.
    ModelUnavailable,
    /// Errors originating from the `dopamine` pipeline or its collaborators.
    Predict(PredictError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::Predict(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ModelUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Model is not loaded, cannot make prediction.".to_string(),
            ),
            AppError::Predict(err) => {
                error!("PredictError: {:?}", err);
                match err {
                    PredictError::ModelUnavailable => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Model is not loaded, cannot make prediction.".to_string(),
                    ),
                    PredictError::VideoNotFound => (
                        StatusCode::NOT_FOUND,
                        "Video not found or API request failed".to_string(),
                    ),
                    PredictError::ApiRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to external API failed: {e}"),
                    ),
                    PredictError::ApiDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize external API response: {e}"),
                    ),
                    PredictError::ApiResponse(e) => {
                        (StatusCode::BAD_GATEWAY, format!("External API error: {e}"))
                    }
                    PredictError::MissingApiKey => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is missing an API key configuration.".to_string(),
                    ),
                    PredictError::MalformedRecord(e) => (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to process prediction: {e}"),
                    ),
                    PredictError::ModelLoad(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Classifier artifact error: {e}"),
                    ),
                    PredictError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
