//! HTTP client for the agent server.
//!
//! Every endpoint answers JSON except the chat stream. Failures carry a
//! JSON body with an `error` field which becomes the error message.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::core::AppConfig;

pub mod agents;
pub mod chat;
pub mod conversations;
pub mod documents;
pub mod error;
pub mod media;
pub mod models;

pub use error::{ApiError, ApiResult};
pub use models::*;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(60 * 5),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout: config.request_timeout,
            ..Self::new(&config.server_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON success body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.timeout(self.timeout).send().await?;
        let response = check_response(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(self.http.get(self.url(path))).await
    }
}

/// Turn a non-success response into an `ApiError`.
pub(crate) async fn check_response(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    tracing::debug!("Request failed with {}: {}", status, message);

    if status == StatusCode::CONFLICT {
        Err(ApiError::Conflict(message))
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Encode a user supplied name for use as a single path segment.
pub(crate) fn segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}
