//! Error types for PdfKit

use crate::normalize::ResponseBody;
use thiserror::Error;

/// Fixed message returned when the base URL or bearer token is missing
pub const MISSING_CONFIG_MESSAGE: &str = "Error: Missing API configuration. Please set API_BASE_URL and API_BEARER_TOKEN environment variables.";

/// Errors that can occur while invoking a conversion operation
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Base URL or bearer token is not configured
    #[error("{}", MISSING_CONFIG_MESSAGE)]
    MissingConfig,

    /// No descriptor is registered under this name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client: {0}")]
    ClientBuildError(#[source] reqwest::Error),

    /// Base URL and path do not form a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to connect to server
    #[error("Connection error - {0}")]
    ConnectError(#[source] reqwest::Error),

    /// Request exceeded the configured deadline
    #[error("Request timeout - {0}")]
    Timeout(#[source] reqwest::Error),

    /// Other transport-level failure
    #[error("{0}")]
    RequestError(String),

    /// Server answered with status >= 400
    #[error("HTTP {status}")]
    HttpStatus { status: u16, body: ResponseBody },

    /// Anything not covered above
    #[error("{0}")]
    Unexpected(String),
}

/// Coarse error category, one per terminal state of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Http,
    Unexpected,
}

impl ConvertError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConvertError::Timeout(err)
        } else if err.is_connect() {
            ConvertError::ConnectError(err)
        } else {
            ConvertError::RequestError(err.to_string())
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::MissingConfig => ErrorKind::Config,
            ConvertError::ClientBuildError(_)
            | ConvertError::InvalidUrl(_)
            | ConvertError::ConnectError(_)
            | ConvertError::Timeout(_)
            | ConvertError::RequestError(_) => ErrorKind::Transport,
            ConvertError::HttpStatus { .. } => ErrorKind::Http,
            ConvertError::UnknownOperation(_) | ConvertError::Unexpected(_) => {
                ErrorKind::Unexpected
            }
        }
    }
}
