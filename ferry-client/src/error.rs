//! Error types for the Ferry client

use aws_sdk_sts::config::http::HttpResponse;
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error codes the services use to signal throttling
const THROTTLING_CODES: [&str; 4] = [
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "RequestLimitExceeded",
];

/// Errors that can occur when calling the remote services
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request failed before a response arrived (dispatch failure or timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Service returned an error status code
    #[error("API error (status {status}, {code}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Service error code (e.g. `ClientException`), or `unknown`
        code: String,
        /// Error message from the service
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code, service error code and message
    pub fn api_error(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map a failed SDK call onto the client error kinds
    ///
    /// Service errors keep their HTTP status and error code so the
    /// classification helpers below keep working.
    pub(crate) fn from_sdk<E>(err: SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        let detail = DisplayErrorContext(&err).to_string();
        match &err {
            SdkError::ServiceError(service) => Self::ApiError {
                status: service.raw().status().as_u16(),
                code: err.code().unwrap_or("unknown").to_string(),
                message: err.message().map(str::to_string).unwrap_or(detail),
            },
            SdkError::ConstructionFailure(_) => Self::InvalidRequest(detail),
            SdkError::ResponseError(_) => Self::ParseError(detail),
            _ => Self::RequestFailed(detail),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Check if retrying the same request may succeed
    ///
    /// Transport failures, server errors and throttling are transient;
    /// everything else will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) => true,
            Self::ApiError { status, code, .. } => {
                *status >= 500 || *status == 429 || THROTTLING_CODES.contains(&code.as_str())
            }
            _ => false,
        }
    }
}
