//! Typed errors for service calls, keyed off HTTP status codes.

use thiserror::Error;

/// Errors raised by the service clients.
///
/// Non-success statuses are classified by [`ApiError::from_status`]. The
/// specific 4xx kinds come first; anything else in the 4xx range falls back
/// to [`ApiError::Client`] and anything in the 5xx range to [`ApiError::Server`].
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("resource not found (404): {body}")]
    NotFound { body: String },
    #[error("resource conflict (409): {body}")]
    Conflict { body: String },
    #[error("resource gone (410): {body}")]
    Gone { body: String },
    #[error("unprocessable entity (422): {body}")]
    UnprocessableEntity { body: String },
    #[error("client error ({status}): {body}")]
    Client { status: u16, body: String },
    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },
    #[error("unexpected status ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("request timed out: {0}")]
    TimedOut(String),
    #[error("HTTP request failed: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ApiError {
    /// Classify a non-success status code and its response body.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            404 => ApiError::NotFound { body },
            409 => ApiError::Conflict { body },
            410 => ApiError::Gone { body },
            422 => ApiError::UnprocessableEntity { body },
            400..=499 => ApiError::Client { status, body },
            500..=599 => ApiError::Server { status, body },
            _ => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// The HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Conflict { .. } => Some(409),
            ApiError::Gone { .. } => Some(410),
            ApiError::UnprocessableEntity { .. } => Some(422),
            ApiError::Client { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::TimedOut(_)
            | ApiError::Transport(_)
            | ApiError::Decode(_)
            | ApiError::InvalidArgument(_) => None,
        }
    }

    /// True for every 4xx kind, including the specific ones.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::TimedOut(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
