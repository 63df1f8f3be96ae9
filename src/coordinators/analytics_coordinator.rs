use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::AuthorizationGate;
use crate::stores::{completion_rate, AnalyticsStore};
use crate::types::internal::analytics::Dashboard;
use crate::types::internal::context::RequestContext;

pub struct AnalyticsCoordinator {
    db: DatabaseConnection,
    analytics_store: Arc<AnalyticsStore>,
}

impl AnalyticsCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            analytics_store: app_data.analytics_store.clone(),
        }
    }

    /// Admin dashboard figures
    pub async fn dashboard(&self, ctx: &RequestContext) -> Result<Dashboard, InternalError> {
        AuthorizationGate::require_admin(ctx)?;

        let total_enrollments = self.analytics_store.total_enrollments(&self.db).await?;
        let completed_enrollments = self.analytics_store.completed_enrollments(&self.db).await?;

        Ok(Dashboard {
            total_users: self.analytics_store.total_users(&self.db).await?,
            total_courses: self.analytics_store.total_courses(&self.db).await?,
            total_enrollments,
            completed_enrollments,
            completion_rate: completion_rate(completed_enrollments, total_enrollments),
            courses_by_category: self.analytics_store.course_count_by_category(&self.db).await?,
        })
    }
}
