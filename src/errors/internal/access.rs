use thiserror::Error;

/// Authentication and authorization failures
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Expired token")]
    ExpiredToken,
}

impl AccessError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken { reason: reason.into() }
    }
}
