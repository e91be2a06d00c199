use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid UTF-8 sequence of {len} byte(s) at offset {offset}")]
    Invalid { offset: usize, len: usize },

    #[error("stream ended inside a multi-byte character ({bytes} byte(s) pending)")]
    Truncated { bytes: usize },
}

/// Failure while consuming a response body.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Failed reading response stream: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed decoding response stream: {0}")]
    Decode(#[from] DecodeError),
}
