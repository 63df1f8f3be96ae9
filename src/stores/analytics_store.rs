use std::sync::Arc;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryOrder, QuerySelect};

use crate::errors::InternalError;
use crate::stores::{CourseStore, EnrollmentStore, UserStore};
use crate::types::db::course;

/// Number of courses in one category
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Read-only aggregate queries for the admin dashboard
pub struct AnalyticsStore {
    user_store: Arc<UserStore>,
    course_store: Arc<CourseStore>,
    enrollment_store: Arc<EnrollmentStore>,
}

impl AnalyticsStore {
    pub fn new(
        user_store: Arc<UserStore>,
        course_store: Arc<CourseStore>,
        enrollment_store: Arc<EnrollmentStore>,
    ) -> Self {
        Self {
            user_store,
            course_store,
            enrollment_store,
        }
    }

    pub async fn total_users(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        self.user_store.count(conn).await
    }

    pub async fn total_courses(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        self.course_store.count(conn).await
    }

    pub async fn total_enrollments(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        self.enrollment_store.count(conn).await
    }

    pub async fn completed_enrollments(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        self.enrollment_store.count_completed(conn).await
    }

    /// Live courses grouped by category, alphabetical
    pub async fn course_count_by_category(&self, conn: &impl ConnectionTrait) -> Result<Vec<CategoryCount>, InternalError> {
        course::Entity::find()
            .select_only()
            .column(course::Column::Category)
            .column_as(course::Column::Id.count(), "count")
            .group_by(course::Column::Category)
            .order_by_asc(course::Column::Category)
            .into_model::<CategoryCount>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("course_count_by_category", e))
    }
}

/// Whole percent of completed enrollments, 0 when there are none
pub fn completion_rate(completed: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}
