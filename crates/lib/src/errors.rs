use thiserror::Error;

/// Custom error types for the prediction pipeline and its collaborators.
///
/// Input-shape problems (unrecognized categories, malformed durations or
/// URLs) are deliberately *not* represented here: those recover locally with
/// a defined default and never cross a component boundary as an error.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to load classifier artifact: {0}")]
    ModelLoad(String),
    #[error("Classifier is not loaded, cannot make prediction")]
    ModelUnavailable,
    #[error("Aligned record does not match the classifier manifest: {0}")]
    MalformedRecord(String),
    #[error("Request to external API failed: {0}")]
    ApiRequest(reqwest::Error),
    #[error("Failed to deserialize external API response: {0}")]
    ApiDeserialization(reqwest::Error),
    #[error("External API returned an error: {0}")]
    ApiResponse(String),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("Video not found")]
    VideoNotFound,
}
