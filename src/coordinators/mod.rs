// Coordinators layer - Workflow orchestration
//
// Coordinators compose provider and store operations for specific API
// endpoints, check authorization, and own the transaction boundaries.

pub mod analytics_coordinator;
pub mod auth_coordinator;
pub mod course_coordinator;
pub mod enrollment_coordinator;
pub mod message_coordinator;
pub mod user_coordinator;

pub use analytics_coordinator::AnalyticsCoordinator;
pub use auth_coordinator::{AuthCoordinator, IssuedToken};
pub use course_coordinator::CourseCoordinator;
pub use enrollment_coordinator::EnrollmentCoordinator;
pub use message_coordinator::MessageCoordinator;
pub use user_coordinator::UserCoordinator;
