use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};

use crate::types::db::user;
use crate::types::internal::format_timestamp;
use crate::types::internal::user::{UserInput, UserUpdate};

/// Public view of a user; never includes the password hash
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    /// The bootstrap admin; cannot be demoted or deleted
    pub is_protected: bool,
    pub has_unread_messages: bool,
    /// ISO 8601
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            is_admin: u.is_admin,
            is_protected: u.is_protected,
            has_unread_messages: u.has_unread_messages,
            created_at: format_timestamp(u.created_at),
        }
    }
}

/// Admin request to create a user
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[oai(validator(min_length = 3, max_length = 64))]
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[oai(default)]
    pub is_admin: bool,
}

impl From<CreateUserRequest> for UserInput {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
            is_admin: r.is_admin,
        }
    }
}

/// Admin partial update; omitted fields are left unchanged
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[oai(validator(min_length = 3, max_length = 64))]
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: Option<bool>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
            is_admin: r.is_admin,
        }
    }
}

#[derive(ApiResponse)]
pub enum CreateUserApiResponse {
    /// User created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}
