use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::errors::InternalError;
use crate::types::db::course;

/// A single lesson inside a course section
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseLesson {
    pub title: String,
    pub duration: String,
    pub content: String,
}

/// An ordered group of lessons
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSection {
    pub title: String,
    pub lessons: Vec<CourseLesson>,
}

/// Structured course body, stored as a JSON document on the course row
#[derive(Object, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseContent {
    pub sections: Vec<CourseSection>,
}

impl CourseContent {
    pub fn to_json(&self) -> Result<String, InternalError> {
        serde_json::to_string(self).map_err(|e| InternalError::parse("course_content", e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, InternalError> {
        serde_json::from_str(raw).map_err(|e| InternalError::parse("course_content", e.to_string()))
    }

    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }
}

pub fn tags_to_json(tags: &[String]) -> Result<String, InternalError> {
    serde_json::to_string(tags).map_err(|e| InternalError::parse("course_tags", e.to_string()))
}

pub fn tags_from_json(raw: &str) -> Result<Vec<String>, InternalError> {
    serde_json::from_str(raw).map_err(|e| InternalError::parse("course_tags", e.to_string()))
}

/// Fields required to create a course
///
/// Counters (enrollments, rating, reviews) always start at zero.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price: i32,
    pub duration: String,
    pub level: String,
    pub image_url: String,
    pub instructor: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub content: CourseContent,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub duration: Option<String>,
    pub level: Option<String>,
    pub image_url: Option<String>,
    pub instructor: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub content: Option<CourseContent>,
}

/// Course row with its JSON columns decoded
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub duration: String,
    pub level: String,
    pub image_url: String,
    pub instructor: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub enrollments: i32,
    pub rating: i32,
    pub reviews: i32,
    pub content: CourseContent,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TryFrom<course::Model> for Course {
    type Error = InternalError;

    fn try_from(m: course::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            tags: tags_from_json(&m.tags)?,
            content: CourseContent::from_json(&m.content)?,
            id: m.id,
            title: m.title,
            description: m.description,
            price: m.price,
            duration: m.duration,
            level: m.level,
            image_url: m.image_url,
            instructor: m.instructor,
            category: m.category,
            featured: m.featured,
            enrollments: m.enrollments,
            rating: m.rating,
            reviews: m.reviews,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}
