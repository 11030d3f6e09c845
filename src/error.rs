//! Error handling for the Azure AI chat client.
//!
//! All fallible operations in this crate return [`LlmError`]. Remote API
//! failures keep the original status code and body so callers can inspect
//! what the service actually said.

use thiserror::Error;

/// Errors produced by the chat client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error (connection, TLS, timeout, malformed request)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Error response from the remote API
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Error message from the response body
        message: String,
        /// Raw error body, when it parsed as JSON
        details: Option<serde_json::Value>,
    },

    /// Failed to parse a response body or stream event
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error while consuming a streaming response
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Invalid or incomplete client configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Invalid request parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation not supported by the configured model
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The request was cancelled through its [`CancelHandle`](crate::utils::cancel::CancelHandle)
    #[error("Request was cancelled")]
    Cancelled,

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LlmError {
    /// Create an API error without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether retrying the request could plausibly succeed.
    ///
    /// Rate limits and server-side failures are retryable; validation,
    /// configuration and cancellation errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { code, .. } => *code == 429 || *code >= 500,
            Self::HttpError(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
