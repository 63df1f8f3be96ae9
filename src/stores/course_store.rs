use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::errors::internal::CourseError;
use crate::errors::InternalError;
use crate::types::db::course;
use crate::types::internal::course::{tags_to_json, Course, CourseChanges, NewCourse};

pub const DEFAULT_FEATURED_LIMIT: u64 = 6;

/// Courses table access
#[derive(Debug, Default)]
pub struct CourseStore;

impl CourseStore {
    pub fn new() -> Self {
        Self
    }

    fn decode_all(rows: Vec<course::Model>) -> Result<Vec<Course>, InternalError> {
        rows.into_iter().map(Course::try_from).collect()
    }

    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, course_id: i32) -> Result<Option<Course>, InternalError> {
        course::Entity::find_by_id(course_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_course_by_id", e))?
            .map(Course::try_from)
            .transpose()
    }

    pub async fn require_by_id(&self, conn: &impl ConnectionTrait, course_id: i32) -> Result<Course, InternalError> {
        self.get_by_id(conn, course_id)
            .await?
            .ok_or_else(|| CourseError::CourseNotFound { course_id }.into())
    }

    pub async fn exists(&self, conn: &impl ConnectionTrait, course_id: i32) -> Result<bool, InternalError> {
        let count = course::Entity::find()
            .filter(course::Column::Id.eq(course_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("course_exists", e))?;
        Ok(count > 0)
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<Course>, InternalError> {
        let rows = course::Entity::find()
            .order_by_asc(course::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_courses", e))?;
        Self::decode_all(rows)
    }

    /// Featured courses in insertion order, at most `limit` of them
    pub async fn list_featured(&self, conn: &impl ConnectionTrait, limit: u64) -> Result<Vec<Course>, InternalError> {
        let rows = course::Entity::find()
            .filter(course::Column::Featured.eq(true))
            .order_by_asc(course::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_featured_courses", e))?;
        Self::decode_all(rows)
    }

    pub async fn list_by_category(&self, conn: &impl ConnectionTrait, category: &str) -> Result<Vec<Course>, InternalError> {
        let rows = course::Entity::find()
            .filter(course::Column::Category.eq(category))
            .order_by_asc(course::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_courses_by_category", e))?;
        Self::decode_all(rows)
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        course::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_courses", e))
    }

    /// Insert a course with zeroed counters
    pub async fn create(&self, conn: &impl ConnectionTrait, new_course: NewCourse) -> Result<Course, InternalError> {
        let now = Utc::now().timestamp();
        let model = course::ActiveModel {
            id: NotSet,
            title: Set(new_course.title),
            description: Set(new_course.description),
            price: Set(new_course.price),
            duration: Set(new_course.duration),
            level: Set(new_course.level),
            image_url: Set(new_course.image_url),
            instructor: Set(new_course.instructor),
            category: Set(new_course.category),
            tags: Set(tags_to_json(&new_course.tags)?),
            featured: Set(new_course.featured),
            enrollments: Set(0),
            rating: Set(0),
            reviews: Set(0),
            content: Set(new_course.content.to_json()?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_course", e))?;

        tracing::debug!(course_id = model.id, title = %model.title, "Course created");

        Course::try_from(model)
    }

    /// Partial update; always refreshes `updated_at`
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        course_id: i32,
        changes: CourseChanges,
    ) -> Result<Course, InternalError> {
        let existing = course::Entity::find_by_id(course_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_course_for_update", e))?
            .ok_or(CourseError::CourseNotFound { course_id })?;

        let mut active: course::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(duration) = changes.duration {
            active.duration = Set(duration);
        }
        if let Some(level) = changes.level {
            active.level = Set(level);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(instructor) = changes.instructor {
            active.instructor = Set(instructor);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(tags_to_json(&tags)?);
        }
        if let Some(featured) = changes.featured {
            active.featured = Set(featured);
        }
        if let Some(content) = changes.content {
            active.content = Set(content.to_json()?);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let model = active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_course", e))?;

        Course::try_from(model)
    }

    /// Delete the course row; returns whether a row existed
    ///
    /// Enrollments are removed by the caller in the same transaction.
    pub async fn delete(&self, conn: &impl ConnectionTrait, course_id: i32) -> Result<bool, InternalError> {
        let result = course::Entity::delete_by_id(course_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_course", e))?;

        Ok(result.rows_affected > 0)
    }

    /// `enrollments = enrollments + delta` evaluated in SQL
    ///
    /// Returns `CourseNotFound` when no row matched.
    pub async fn adjust_enrollments(
        &self,
        conn: &impl ConnectionTrait,
        course_id: i32,
        delta: i32,
    ) -> Result<(), InternalError> {
        let result = course::Entity::update_many()
            .col_expr(course::Column::Enrollments, Expr::col(course::Column::Enrollments).add(delta))
            .filter(course::Column::Id.eq(course_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("adjust_course_enrollments", e))?;

        if result.rows_affected == 0 {
            return Err(CourseError::CourseNotFound { course_id }.into());
        }

        Ok(())
    }
}
