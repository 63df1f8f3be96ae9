use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{authenticated_context, BearerAuth};
use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, EnrollmentCoordinator};
use crate::errors::ApiError;
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::enrollment::{EnrollApiResponse, EnrollRequest, EnrollmentResponse, ProgressRequest};

/// Enrollment and progress endpoints for the signed-in user
pub struct EnrollmentApi {
    enrollment_coordinator: EnrollmentCoordinator,
    auth_coordinator: Arc<AuthCoordinator>,
}

impl EnrollmentApi {
    pub fn new(app_data: Arc<AppData>, auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self {
            enrollment_coordinator: EnrollmentCoordinator::new(app_data),
            auth_coordinator,
        }
    }
}

#[derive(Tags)]
enum EnrollmentTags {
    Enrollments,
}

#[OpenApi(prefix_path = "/enrollments")]
impl EnrollmentApi {
    /// Own enrollments with course details
    #[oai(path = "/", method = "get", tag = "EnrollmentTags::Enrollments")]
    async fn list_mine(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let rows = self.enrollment_coordinator.list_mine(&ctx).await?;
        Ok(Json(rows.into_iter().map(EnrollmentResponse::from).collect()))
    }

    /// Enroll in a course
    #[oai(path = "/", method = "post", tag = "EnrollmentTags::Enrollments")]
    async fn enroll(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<EnrollRequest>,
    ) -> Result<EnrollApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let enrolled = self.enrollment_coordinator.enroll(&ctx, body.course_id).await?;
        Ok(EnrollApiResponse::Created(Json(enrolled.into())))
    }

    /// Set progress (0-100); 100 marks the enrollment completed
    #[oai(path = "/:id/progress", method = "put", tag = "EnrollmentTags::Enrollments")]
    async fn set_progress(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<ProgressRequest>,
    ) -> Result<Json<EnrollmentResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let updated = self.enrollment_coordinator.set_progress(&ctx, id.0, body.progress).await?;
        Ok(Json(updated.into()))
    }

    #[oai(path = "/:id/complete", method = "put", tag = "EnrollmentTags::Enrollments")]
    async fn complete(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<EnrollmentResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let updated = self.enrollment_coordinator.complete(&ctx, id.0).await?;
        Ok(Json(updated.into()))
    }

    /// Leave a course
    #[oai(path = "/:id", method = "delete", tag = "EnrollmentTags::Enrollments")]
    async fn unenroll(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<DeletedApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        self.enrollment_coordinator.unenroll(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }
}
