use crate::errors::internal::{ErrorKind, InternalError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error body returned by every endpoint
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// API error types
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request failed validation
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired credentials
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller lacks permission, or the resource is protected
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Uniqueness or state conflict
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: String, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(body("validation_error", message.into(), 400))
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(body("unauthenticated", message.into(), 401))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(body("forbidden", message.into(), 403))
    }

    pub fn protected_resource(message: impl Into<String>) -> Self {
        ApiError::Forbidden(body("protected_resource", message.into(), 403))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(body("not_found", message.into(), 404))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(body("conflict", message.into(), 409))
    }

    /// Generic internal error; never carries internal details
    pub fn internal_server_error() -> Self {
        ApiError::InternalError(body("internal_error", "An internal error occurred".to_string(), 500))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err.kind() {
            ErrorKind::Internal => {
                tracing::error!("Internal error while handling request: {}", err);
                Self::internal_server_error()
            }
            ErrorKind::Validation => {
                tracing::debug!("Validation failed: {}", err);
                Self::bad_request(err.to_string())
            }
            ErrorKind::Unauthenticated => {
                tracing::debug!("Unauthenticated request: {}", err);
                Self::unauthenticated(err.to_string())
            }
            ErrorKind::Forbidden => {
                tracing::warn!("Forbidden: {}", err);
                Self::forbidden(err.to_string())
            }
            ErrorKind::ProtectedResource => {
                tracing::warn!("Protected resource change rejected: {}", err);
                Self::protected_resource(err.to_string())
            }
            ErrorKind::NotFound => {
                tracing::debug!("Not found: {}", err);
                Self::not_found(err.to_string())
            }
            ErrorKind::Conflict => {
                tracing::debug!("Conflict: {}", err);
                Self::conflict(err.to_string())
            }
        }
    }

    fn response(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn error_code(&self) -> &str {
        &self.response().error
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
