use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourseError {
    #[error("Course not found: {course_id}")]
    CourseNotFound { course_id: i32 },
}
