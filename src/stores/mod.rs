// Stores layer - Data access and repository pattern
//
// Every store method takes the connection explicitly so coordinators can run
// several calls inside one transaction.
pub mod analytics_store;
pub mod course_store;
pub mod enrollment_store;
pub mod message_store;
pub mod reply_store;
pub mod user_store;

pub use analytics_store::{completion_rate, AnalyticsStore, CategoryCount};
pub use course_store::CourseStore;
pub use enrollment_store::EnrollmentStore;
pub use message_store::MessageStore;
pub use reply_store::ReplyStore;
pub use user_store::UserStore;

use sea_orm::{DbErr, SqlErr};

/// Driver message when the database rejected a write on a unique index
///
/// The message names the violated constraint or column, e.g.
/// `UNIQUE constraint failed: users.email` on SQLite.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}
