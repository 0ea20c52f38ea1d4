use thiserror::Error;

/// Every way an analysis call can fail. No variant is retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("no response text from model")]
    EmptyResponse,

    #[error("response is not a valid analysis: {0}")]
    Json(#[from] serde_json::Error),
}
