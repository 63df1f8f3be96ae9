use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::internal::CourseError;
use crate::errors::InternalError;
use crate::providers::AuthorizationGate;
use crate::stores::course_store::DEFAULT_FEATURED_LIMIT;
use crate::stores::{CourseStore, EnrollmentStore};
use crate::types::internal::context::RequestContext;
use crate::types::internal::course::{Course, CourseChanges, NewCourse};

/// Public catalog reads and admin course management
pub struct CourseCoordinator {
    db: DatabaseConnection,
    course_store: Arc<CourseStore>,
    enrollment_store: Arc<EnrollmentStore>,
}

impl CourseCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            course_store: app_data.course_store.clone(),
            enrollment_store: app_data.enrollment_store.clone(),
        }
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, InternalError> {
        self.course_store.list_all(&self.db).await
    }

    /// Featured courses; `limit` defaults to 6
    pub async fn list_featured(&self, limit: Option<u64>) -> Result<Vec<Course>, InternalError> {
        self.course_store
            .list_featured(&self.db, limit.unwrap_or(DEFAULT_FEATURED_LIMIT))
            .await
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Course>, InternalError> {
        self.course_store.list_by_category(&self.db, category).await
    }

    pub async fn get_course(&self, course_id: i32) -> Result<Course, InternalError> {
        self.course_store.require_by_id(&self.db, course_id).await
    }

    pub async fn create_course(&self, ctx: &RequestContext, new_course: NewCourse) -> Result<Course, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        let course = self.course_store.create(&self.db, new_course).await?;

        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, course_id = course.id, "Course created");

        Ok(course)
    }

    pub async fn update_course(
        &self,
        ctx: &RequestContext,
        course_id: i32,
        changes: CourseChanges,
    ) -> Result<Course, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        let course = self.course_store.update(&self.db, course_id, changes).await?;

        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, course_id, "Course updated");

        Ok(course)
    }

    /// Delete a course together with its enrollments
    pub async fn delete_course(&self, ctx: &RequestContext, course_id: i32) -> Result<(), InternalError> {
        AuthorizationGate::require_admin(ctx)?;

        let txn = begin_transaction(&self.db).await?;
        let removed_enrollments = self.enrollment_store.delete_for_course(&txn, course_id).await?;
        if !self.course_store.delete(&txn, course_id).await? {
            return Err(CourseError::CourseNotFound { course_id }.into());
        }
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            course_id,
            removed_enrollments,
            "Course deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test::utils::{new_course, new_user, setup_test_app_data};
    use crate::types::internal::auth::Identity;

    fn ctx(is_admin: bool) -> RequestContext {
        RequestContext::for_api(None).with_identity(Identity {
            user_id: 1,
            username: "someone".to_string(),
            is_admin,
        })
    }

    #[tokio::test]
    async fn test_featured_default_limit() {
        let app_data = setup_test_app_data().await;
        let coordinator = CourseCoordinator::new(app_data);
        for i in 0..8 {
            coordinator
                .create_course(&ctx(true), new_course(&format!("F{}", i), "Design", true))
                .await
                .unwrap();
        }

        assert_eq!(coordinator.list_featured(None).await.unwrap().len(), 6);
        assert_eq!(coordinator.list_featured(Some(3)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_writes_require_admin() {
        let app_data = setup_test_app_data().await;
        let coordinator = CourseCoordinator::new(app_data);

        let err = coordinator
            .create_course(&ctx(false), new_course("Nope", "Design", false))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(coordinator.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_enrollments() {
        let app_data = setup_test_app_data().await;
        let coordinator = CourseCoordinator::new(app_data.clone());
        let db = &app_data.db;

        let course = coordinator.create_course(&ctx(true), new_course("Doomed", "Design", false)).await.unwrap();
        let user = app_data.user_store.create(db, new_user("student")).await.unwrap();
        app_data.enrollment_store.create(db, user.id, course.id).await.unwrap();

        coordinator.delete_course(&ctx(true), course.id).await.unwrap();

        assert_eq!(coordinator.get_course(course.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert!(app_data.enrollment_store.list_by_course(db, course.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_course_is_not_found() {
        let app_data = setup_test_app_data().await;
        let coordinator = CourseCoordinator::new(app_data);
        let err = coordinator.delete_course(&ctx(true), 55).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
