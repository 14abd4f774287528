//! Error types for the DryKlin API client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when calling the DryKlin API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, reset).
    #[error("network request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: StatusCode,
        /// Message from the API's error body, or the status reason.
        message: String,
    },

    /// The response body could not be decoded into the expected type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// Caller input was rejected before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A request URL could not be built from the configured base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ApiError {
    /// Status code, for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403: the session guard's trigger.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    /// 5xx response.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_server_error())
    }

    /// No response was received.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Build a `Status` error from a failed response, pulling the message out
    /// of the API's JSON error body when there is one.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::Status {
            status,
            message: error_message(status, &body),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

/// Error body shapes the API uses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<MessageField>,
    #[serde(default)]
    error: Option<String>,
}

/// `message` is a string, or a list of validation messages.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let message = parsed.and_then(|b| match b.message {
        Some(MessageField::One(m)) if !m.is_empty() => Some(m),
        Some(MessageField::Many(list)) if !list.is_empty() => Some(list.join("; ")),
        _ => b.error.filter(|e| !e.is_empty()),
    });

    message.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.starts_with('{') {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            trimmed.chars().take(200).collect()
        }
    })
}
