use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("Email already exists: {email}")]
    DuplicateEmail { email: String },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i32 },

    #[error("User {user_id} is protected and cannot be {action}")]
    ProtectedUser { user_id: i32, action: &'static str },
}
