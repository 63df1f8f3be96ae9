use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::internal::EnrollmentError;
use crate::errors::InternalError;
use crate::providers::AuthorizationGate;
use crate::stores::{CourseStore, EnrollmentStore};
use crate::types::db::enrollment;
use crate::types::internal::context::RequestContext;
use crate::types::internal::enrollment::{EnrollmentState, EnrollmentWithCourse};

/// Enrollment lifecycle for the requesting user
pub struct EnrollmentCoordinator {
    db: DatabaseConnection,
    course_store: Arc<CourseStore>,
    enrollment_store: Arc<EnrollmentStore>,
}

impl EnrollmentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            course_store: app_data.course_store.clone(),
            enrollment_store: app_data.enrollment_store.clone(),
        }
    }

    async fn with_course(&self, enrollment: enrollment::Model) -> Result<EnrollmentWithCourse, InternalError> {
        let course = self.course_store.get_by_id(&self.db, enrollment.course_id).await?;
        Ok(EnrollmentWithCourse { enrollment, course })
    }

    /// Load an enrollment and check it belongs to the caller
    async fn owned_enrollment(
        &self,
        ctx: &RequestContext,
        enrollment_id: i32,
    ) -> Result<enrollment::Model, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;
        let enrollment = self.enrollment_store.require_by_id(&self.db, enrollment_id).await?;

        if enrollment.user_id != identity.user_id {
            tracing::warn!(
                request_id = %ctx.request_id,
                user_id = identity.user_id,
                enrollment_id,
                "Enrollment access by non-owner"
            );
            return Err(EnrollmentError::NotOwner { enrollment_id }.into());
        }

        Ok(enrollment)
    }

    /// Own enrollments, each with its course
    pub async fn list_mine(&self, ctx: &RequestContext) -> Result<Vec<EnrollmentWithCourse>, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;
        let rows = self.enrollment_store.list_by_user(&self.db, identity.user_id).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(self.with_course(row).await?);
        }
        Ok(result)
    }

    /// Enroll the caller; the insert and the counter bump share a transaction
    pub async fn enroll(&self, ctx: &RequestContext, course_id: i32) -> Result<EnrollmentWithCourse, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;

        let txn = begin_transaction(&self.db).await?;
        let enrollment = self.enrollment_store.create(&txn, identity.user_id, course_id).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = identity.user_id,
            course_id,
            enrollment_id = enrollment.id,
            "Enrolled"
        );

        self.with_course(enrollment).await
    }

    /// Set progress; 100 completes, anything lower un-completes
    pub async fn set_progress(
        &self,
        ctx: &RequestContext,
        enrollment_id: i32,
        progress: i32,
    ) -> Result<EnrollmentWithCourse, InternalError> {
        AuthorizationGate::require_authenticated(ctx)?;
        let state = EnrollmentState::with_progress(progress)?;
        self.apply_state(ctx, enrollment_id, state).await
    }

    pub async fn complete(&self, ctx: &RequestContext, enrollment_id: i32) -> Result<EnrollmentWithCourse, InternalError> {
        self.apply_state(ctx, enrollment_id, EnrollmentState::Completed).await
    }

    async fn apply_state(
        &self,
        ctx: &RequestContext,
        enrollment_id: i32,
        state: EnrollmentState,
    ) -> Result<EnrollmentWithCourse, InternalError> {
        self.owned_enrollment(ctx, enrollment_id).await?;
        let updated = self.enrollment_store.set_state(&self.db, enrollment_id, state).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            enrollment_id,
            progress = updated.progress,
            completed = updated.completed,
            "Enrollment progress updated"
        );

        self.with_course(updated).await
    }

    /// Remove own enrollment and release the course seat
    pub async fn unenroll(&self, ctx: &RequestContext, enrollment_id: i32) -> Result<(), InternalError> {
        self.owned_enrollment(ctx, enrollment_id).await?;

        let txn = begin_transaction(&self.db).await?;
        if !self.enrollment_store.delete(&txn, enrollment_id).await? {
            return Err(EnrollmentError::EnrollmentNotFound { enrollment_id }.into());
        }
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, enrollment_id, "Unenrolled");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test::utils::{new_course, new_user, setup_test_app_data};
    use crate::types::internal::auth::Identity;

    fn ctx_for(user_id: i32) -> RequestContext {
        RequestContext::for_api(None).with_identity(Identity {
            user_id,
            username: format!("user{}", user_id),
            is_admin: false,
        })
    }

    async fn setup() -> (Arc<AppData>, EnrollmentCoordinator, i32, i32) {
        let app_data = setup_test_app_data().await;
        let user = app_data.user_store.create(&app_data.db, new_user("learner")).await.unwrap();
        let course = app_data
            .course_store
            .create(&app_data.db, new_course("Course", "Design", false))
            .await
            .unwrap();
        let coordinator = EnrollmentCoordinator::new(app_data.clone());
        (app_data, coordinator, user.id, course.id)
    }

    #[tokio::test]
    async fn test_enroll_embeds_course_with_new_count() {
        let (_, coordinator, user_id, course_id) = setup().await;

        let enrolled = coordinator.enroll(&ctx_for(user_id), course_id).await.unwrap();
        assert_eq!(enrolled.enrollment.progress, 0);
        assert_eq!(enrolled.course.unwrap().enrollments, 1);

        let err = coordinator.enroll(&ctx_for(user_id), course_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_anonymous_cannot_enroll() {
        let (_, coordinator, _, course_id) = setup().await;
        let err = coordinator.enroll(&RequestContext::for_api(None), course_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_progress_round_trip_through_completion() {
        let (_, coordinator, user_id, course_id) = setup().await;
        let ctx = ctx_for(user_id);
        let id = coordinator.enroll(&ctx, course_id).await.unwrap().enrollment.id;

        let done = coordinator.set_progress(&ctx, id, 100).await.unwrap();
        assert!(done.enrollment.completed);

        let back = coordinator.set_progress(&ctx, id, 50).await.unwrap();
        assert!(!back.enrollment.completed);
        assert_eq!(back.enrollment.progress, 50);

        let completed = coordinator.complete(&ctx, id).await.unwrap();
        assert_eq!(completed.enrollment.progress, 100);
        assert!(completed.enrollment.completed);
    }

    #[tokio::test]
    async fn test_progress_errors() {
        let (_, coordinator, user_id, course_id) = setup().await;
        let ctx = ctx_for(user_id);
        let id = coordinator.enroll(&ctx, course_id).await.unwrap().enrollment.id;

        for bad in [-1, 101] {
            let err = coordinator.set_progress(&ctx, id, bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        let err = coordinator.set_progress(&ctx, id + 1000, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = coordinator.set_progress(&ctx_for(user_id + 1), id, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_unenroll_releases_seat() {
        let (app_data, coordinator, user_id, course_id) = setup().await;
        let ctx = ctx_for(user_id);
        let id = coordinator.enroll(&ctx, course_id).await.unwrap().enrollment.id;

        let err = coordinator.unenroll(&ctx_for(user_id + 1), id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        coordinator.unenroll(&ctx, id).await.unwrap();
        assert_eq!(
            app_data.course_store.require_by_id(&app_data.db, course_id).await.unwrap().enrollments,
            0
        );
        assert!(coordinator.list_mine(&ctx).await.unwrap().is_empty());
    }
}
