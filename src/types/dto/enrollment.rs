use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};

use crate::types::dto::course::CourseResponse;
use crate::types::internal::enrollment::EnrollmentWithCourse;
use crate::types::internal::format_timestamp;

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: i32,
}

/// Range is checked by the server so out-of-range values get a uniform error body
#[derive(Object, Debug)]
pub struct ProgressRequest {
    pub progress: i32,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub enrolled_at: String,
    pub completed: bool,
    /// 0-100
    pub progress: i32,
    pub course: Option<CourseResponse>,
}

impl From<EnrollmentWithCourse> for EnrollmentResponse {
    fn from(e: EnrollmentWithCourse) -> Self {
        Self {
            id: e.enrollment.id,
            user_id: e.enrollment.user_id,
            course_id: e.enrollment.course_id,
            enrolled_at: format_timestamp(e.enrollment.enrolled_at),
            completed: e.enrollment.completed,
            progress: e.enrollment.progress,
            course: e.course.map(CourseResponse::from),
        }
    }
}

#[derive(ApiResponse)]
pub enum EnrollApiResponse {
    /// Enrolled
    #[oai(status = 201)]
    Created(Json<EnrollmentResponse>),
}
