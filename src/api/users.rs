use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{authenticated_context, BearerAuth};
use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, UserCoordinator};
use crate::errors::ApiError;
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::user::{CreateUserApiResponse, CreateUserRequest, UpdateUserRequest, UserResponse};

/// Admin user management endpoints
pub struct UserApi {
    user_coordinator: UserCoordinator,
    auth_coordinator: Arc<AuthCoordinator>,
}

impl UserApi {
    pub fn new(app_data: Arc<AppData>, auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self {
            user_coordinator: UserCoordinator::new(app_data),
            auth_coordinator,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// Admin-only user management
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UserApi {
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let users = self.user_coordinator.list_users(&ctx).await?;
        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    #[oai(path = "/:id", method = "get", tag = "UserTags::Users")]
    async fn get(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<UserResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let user = self.user_coordinator.get_user(&ctx, id.0).await?;
        Ok(Json(user.into()))
    }

    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<CreateUserApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let user = self.user_coordinator.create_user(&ctx, body.0.into()).await?;
        Ok(CreateUserApiResponse::Created(Json(user.into())))
    }

    /// Partially update a user; the protected admin cannot be demoted
    #[oai(path = "/:id", method = "put", tag = "UserTags::Users")]
    async fn update(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let user = self.user_coordinator.update_user(&ctx, id.0, body.0.into()).await?;
        Ok(Json(user.into()))
    }

    /// Delete a user and their enrollments; the protected admin cannot be deleted
    #[oai(path = "/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<DeletedApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        self.user_coordinator.delete_user(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }
}
