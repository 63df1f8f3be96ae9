use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::errors::internal::{CourseError, EnrollmentError};
use crate::errors::InternalError;
use crate::stores::{unique_violation, CourseStore};
use crate::types::db::enrollment;
use crate::types::internal::enrollment::EnrollmentState;

/// A hit on the (user, course) unique index means the pair is already enrolled
fn already_enrolled_or_database(err: DbErr, user_id: i32, course_id: i32) -> InternalError {
    if unique_violation(&err).is_some() {
        EnrollmentError::AlreadyEnrolled { user_id, course_id }.into()
    } else {
        InternalError::database("create_enrollment", err)
    }
}

/// Enrollments table access
///
/// Every insert or delete also moves the owning course's `enrollments`
/// counter, so callers must run these inside a transaction.
pub struct EnrollmentStore {
    course_store: Arc<CourseStore>,
}

impl EnrollmentStore {
    pub fn new(course_store: Arc<CourseStore>) -> Self {
        Self { course_store }
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        enrollment_id: i32,
    ) -> Result<Option<enrollment::Model>, InternalError> {
        enrollment::Entity::find_by_id(enrollment_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_enrollment_by_id", e))
    }

    pub async fn require_by_id(
        &self,
        conn: &impl ConnectionTrait,
        enrollment_id: i32,
    ) -> Result<enrollment::Model, InternalError> {
        self.get_by_id(conn, enrollment_id)
            .await?
            .ok_or_else(|| EnrollmentError::EnrollmentNotFound { enrollment_id }.into())
    }

    pub async fn find_for(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        course_id: i32,
    ) -> Result<Option<enrollment::Model>, InternalError> {
        enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_enrollment", e))
    }

    pub async fn list_by_user(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<Vec<enrollment::Model>, InternalError> {
        enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .order_by_asc(enrollment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_enrollments_by_user", e))
    }

    pub async fn list_by_course(
        &self,
        conn: &impl ConnectionTrait,
        course_id: i32,
    ) -> Result<Vec<enrollment::Model>, InternalError> {
        enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .order_by_asc(enrollment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_enrollments_by_course", e))
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<enrollment::Model>, InternalError> {
        enrollment::Entity::find()
            .order_by_asc(enrollment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_enrollments", e))
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        enrollment::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_enrollments", e))
    }

    pub async fn count_completed(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        enrollment::Entity::find()
            .filter(enrollment::Column::Completed.eq(true))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_completed_enrollments", e))
    }

    /// Insert an Active(0) enrollment and bump the course counter
    ///
    /// The course must exist and the (user, course) pair must be new.
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        course_id: i32,
    ) -> Result<enrollment::Model, InternalError> {
        if !self.course_store.exists(conn, course_id).await? {
            return Err(CourseError::CourseNotFound { course_id }.into());
        }
        if self.find_for(conn, user_id, course_id).await?.is_some() {
            return Err(EnrollmentError::AlreadyEnrolled { user_id, course_id }.into());
        }

        let state = EnrollmentState::new();
        let model = enrollment::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            course_id: Set(course_id),
            enrolled_at: Set(Utc::now().timestamp()),
            completed: Set(state.is_completed()),
            progress: Set(state.progress()),
        }
        .insert(conn)
        .await
        .map_err(|e| already_enrolled_or_database(e, user_id, course_id))?;

        self.course_store.adjust_enrollments(conn, course_id, 1).await?;

        tracing::debug!(enrollment_id = model.id, user_id, course_id, "Enrollment created");

        Ok(model)
    }

    /// Persist a state; progress and completed are always written together
    pub async fn set_state(
        &self,
        conn: &impl ConnectionTrait,
        enrollment_id: i32,
        state: EnrollmentState,
    ) -> Result<enrollment::Model, InternalError> {
        let existing = self.require_by_id(conn, enrollment_id).await?;

        let mut active: enrollment::ActiveModel = existing.into();
        active.progress = Set(state.progress());
        active.completed = Set(state.is_completed());

        let model = active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_enrollment", e))?;

        tracing::debug!(enrollment_id, progress = model.progress, completed = model.completed, "Enrollment updated");

        Ok(model)
    }

    /// Remove one enrollment and decrement its course counter
    pub async fn delete(&self, conn: &impl ConnectionTrait, enrollment_id: i32) -> Result<bool, InternalError> {
        let Some(existing) = self.get_by_id(conn, enrollment_id).await? else {
            return Ok(false);
        };

        enrollment::Entity::delete_by_id(enrollment_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_enrollment", e))?;

        self.release_course_seat(conn, existing.course_id).await?;

        Ok(true)
    }

    /// Remove every enrollment of a user, decrementing each affected course
    pub async fn delete_for_user(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<u64, InternalError> {
        let rows = self.list_by_user(conn, user_id).await?;

        enrollment::Entity::delete_many()
            .filter(enrollment::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_enrollments_for_user", e))?;

        for row in &rows {
            self.release_course_seat(conn, row.course_id).await?;
        }

        Ok(rows.len() as u64)
    }

    /// Remove every enrollment of a course; the course row is expected to go too
    pub async fn delete_for_course(&self, conn: &impl ConnectionTrait, course_id: i32) -> Result<u64, InternalError> {
        let result = enrollment::Entity::delete_many()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_enrollments_for_course", e))?;

        Ok(result.rows_affected)
    }

    async fn release_course_seat(&self, conn: &impl ConnectionTrait, course_id: i32) -> Result<(), InternalError> {
        match self.course_store.adjust_enrollments(conn, course_id, -1).await {
            // Course already gone; nothing to decrement
            Err(InternalError::Course(CourseError::CourseNotFound { .. })) => {
                tracing::warn!(course_id, "Enrollment referenced a missing course");
                Ok(())
            }
            other => other,
        }
    }
}
