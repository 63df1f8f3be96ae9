use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrollmentError {
    #[error("Enrollment not found: {enrollment_id}")]
    EnrollmentNotFound { enrollment_id: i32 },

    #[error("User {user_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { user_id: i32, course_id: i32 },

    #[error("Progress must be between 0 and 100, got {progress}")]
    ProgressOutOfRange { progress: i32 },

    #[error("Enrollment {enrollment_id} does not belong to the requesting user")]
    NotOwner { enrollment_id: i32 },
}
