use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Admin flag at the time the token was issued
    pub is_admin: bool,
}

/// Authenticated caller, re-read from the store on every request
///
/// The admin flag here comes from the users table, not from the token, so a
/// demoted admin loses access as soon as the row changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl From<&user::Model> for Identity {
    fn from(u: &user::Model) -> Self {
        Self {
            user_id: u.id,
            username: u.username.clone(),
            is_admin: u.is_admin,
        }
    }
}
