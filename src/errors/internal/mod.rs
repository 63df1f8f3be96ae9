use thiserror::Error;

pub mod access;
pub mod course;
pub mod database;
pub mod enrollment;
pub mod message;
pub mod user;

pub use access::AccessError;
pub use course::CourseError;
pub use database::DatabaseError;
pub use enrollment::EnrollmentError;
pub use message::MessageError;
pub use user::UserError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure variants (Database, Parse, Crypto) are shared; domain
/// variants belong to one area each. Not exposed via API: handlers convert
/// into `ApiError`, which hides infrastructure details.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error("Validation error: {field}: {message}")]
    Validation {
        field: String,
        message: String,
    },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Course(#[from] CourseError),

    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Error classification used at the API boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Unauthenticated,
    Conflict,
    Validation,
    ProtectedResource,
    Internal,
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> Self {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> Self {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            InternalError::Database(_) | InternalError::Parse { .. } | InternalError::Crypto { .. } => {
                ErrorKind::Internal
            }
            InternalError::Validation { .. } => ErrorKind::Validation,
            InternalError::Access(AccessError::Forbidden(_)) => ErrorKind::Forbidden,
            InternalError::Access(_) => ErrorKind::Unauthenticated,
            InternalError::User(UserError::DuplicateUsername { .. })
            | InternalError::User(UserError::DuplicateEmail { .. }) => ErrorKind::Conflict,
            InternalError::User(UserError::UserNotFound { .. }) => ErrorKind::NotFound,
            InternalError::User(UserError::ProtectedUser { .. }) => ErrorKind::ProtectedResource,
            InternalError::Course(CourseError::CourseNotFound { .. }) => ErrorKind::NotFound,
            InternalError::Enrollment(EnrollmentError::EnrollmentNotFound { .. }) => ErrorKind::NotFound,
            InternalError::Enrollment(EnrollmentError::AlreadyEnrolled { .. }) => ErrorKind::Conflict,
            InternalError::Enrollment(EnrollmentError::ProgressOutOfRange { .. }) => ErrorKind::Validation,
            InternalError::Enrollment(EnrollmentError::NotOwner { .. }) => ErrorKind::Forbidden,
            InternalError::Message(MessageError::MessageNotFound { .. })
            | InternalError::Message(MessageError::ReplyNotFound { .. }) => ErrorKind::NotFound,
            InternalError::Message(MessageError::NotThreadParticipant { .. }) => ErrorKind::Forbidden,
        }
    }
}
