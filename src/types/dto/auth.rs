use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};

use crate::types::dto::user::UserResponse;
use crate::types::internal::user::{UserInput, UserUpdate};

/// Request model for self-registration
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[oai(validator(min_length = 3, max_length = 64))]
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<RegisterRequest> for UserInput {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
            is_admin: false,
        }
    }
}

/// Request model for user login
#[derive(Object, Debug)]
pub struct LoginRequest {
    /// Username, matched case-insensitively
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the access token
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    pub user: UserResponse,
}

/// Own-profile update; username and admin flag are not editable here
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UpdateProfileRequest> for UserUpdate {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            ..Default::default()
        }
    }
}

/// Request model for password change
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password for verification
    pub current_password: String,

    /// New password to set
    pub new_password: String,
}

#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created, token issued
    #[oai(status = 201)]
    Created(Json<TokenResponse>),
}
