use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{authenticated_context, BearerAuth};
use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, CourseCoordinator};
use crate::errors::ApiError;
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::course::{CourseResponse, CreateCourseApiResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::types::internal::course::Course;

/// Course catalog endpoints
pub struct CourseApi {
    course_coordinator: CourseCoordinator,
    auth_coordinator: Arc<AuthCoordinator>,
}

impl CourseApi {
    pub fn new(app_data: Arc<AppData>, auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self {
            course_coordinator: CourseCoordinator::new(app_data),
            auth_coordinator,
        }
    }
}

#[derive(Tags)]
enum CourseTags {
    /// Public catalog and admin course management
    Courses,
}

fn to_responses(courses: Vec<Course>) -> Json<Vec<CourseResponse>> {
    Json(courses.into_iter().map(CourseResponse::from).collect())
}

#[OpenApi(prefix_path = "/courses")]
impl CourseApi {
    /// All courses
    #[oai(path = "/", method = "get", tag = "CourseTags::Courses")]
    async fn list(&self) -> Result<Json<Vec<CourseResponse>>, ApiError> {
        Ok(to_responses(self.course_coordinator.list_courses().await?))
    }

    /// Featured courses in catalog order (default limit 6)
    #[oai(path = "/featured", method = "get", tag = "CourseTags::Courses")]
    async fn featured(
        &self,
        #[oai(validator(minimum(value = "1"), maximum(value = "100")))] limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<CourseResponse>>, ApiError> {
        Ok(to_responses(self.course_coordinator.list_featured(limit.0).await?))
    }

    /// Courses in one category (exact match)
    #[oai(path = "/category/:category", method = "get", tag = "CourseTags::Courses")]
    async fn by_category(&self, category: Path<String>) -> Result<Json<Vec<CourseResponse>>, ApiError> {
        Ok(to_responses(self.course_coordinator.list_by_category(&category.0).await?))
    }

    #[oai(path = "/:id", method = "get", tag = "CourseTags::Courses")]
    async fn get(&self, id: Path<i32>) -> Result<Json<CourseResponse>, ApiError> {
        let course = self.course_coordinator.get_course(id.0).await?;
        Ok(Json(course.into()))
    }

    /// Create a course (admin)
    #[oai(path = "/", method = "post", tag = "CourseTags::Courses")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateCourseRequest>,
    ) -> Result<CreateCourseApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let course = self.course_coordinator.create_course(&ctx, body.0.into()).await?;
        Ok(CreateCourseApiResponse::Created(Json(course.into())))
    }

    /// Partially update a course (admin)
    #[oai(path = "/:id", method = "put", tag = "CourseTags::Courses")]
    async fn update(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateCourseRequest>,
    ) -> Result<Json<CourseResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let course = self.course_coordinator.update_course(&ctx, id.0, body.0.into()).await?;
        Ok(Json(course.into()))
    }

    /// Delete a course and its enrollments (admin)
    #[oai(path = "/:id", method = "delete", tag = "CourseTags::Courses")]
    async fn delete(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<DeletedApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        self.course_coordinator.delete_course(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }
}
