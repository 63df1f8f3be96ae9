use std::sync::Arc;

use poem::Request;
use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};

use crate::api::{authenticated_context, optional_context};
use crate::coordinators::{AuthCoordinator, IssuedToken};
use crate::errors::ApiError;
use crate::types::dto::auth::{
    ChangePasswordRequest, LoginRequest, RegisterApiResponse, RegisterRequest, TokenResponse, UpdateProfileRequest,
};
use crate::types::dto::common::AckResponse;
use crate::types::dto::user::UserResponse;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
}

impl AuthApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self { auth_coordinator }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Registration, login and own account
    Authentication,
}

fn token_response(issued: IssuedToken) -> TokenResponse {
    TokenResponse {
        access_token: issued.access_token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
        user: UserResponse::from(issued.user),
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an account and receive an access token
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<RegisterApiResponse, ApiError> {
        let ctx = optional_context(&self.auth_coordinator, req).await?;
        let issued = self.auth_coordinator.register(&ctx, body.0.into()).await?;
        Ok(RegisterApiResponse::Created(Json(token_response(issued))))
    }

    /// Authenticate with username and password
    ///
    /// Access tokens expire after JWT_EXPIRATION_MINUTES (15 by default).
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let ctx = optional_context(&self.auth_coordinator, req).await?;
        let issued = self
            .auth_coordinator
            .login(&ctx, &body.username, &body.password)
            .await?;
        Ok(Json(token_response(issued)))
    }

    /// Current user
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let user = self.auth_coordinator.whoami(&ctx).await?;
        Ok(Json(user.into()))
    }

    /// Update own names and email
    #[oai(path = "/profile", method = "put", tag = "AuthTags::Authentication")]
    async fn update_profile(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let user = self.auth_coordinator.update_profile(&ctx, body.0.into()).await?;
        Ok(Json(user.into()))
    }

    /// Change own password; the current password must be supplied
    #[oai(path = "/password", method = "put", tag = "AuthTags::Authentication")]
    async fn change_password(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<AckResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        self.auth_coordinator
            .change_password(&ctx, &body.current_password, &body.new_password)
            .await?;
        Ok(Json(AckResponse {
            message: "Password changed".to_string(),
        }))
    }
}
