use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success response. `message` is the body's `error` field when
    /// there is one.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 409, e.g. creating an agent whose name is taken
    #[error("{0}")]
    Conflict(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
