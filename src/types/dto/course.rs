use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};

use crate::types::internal::course::{Course, CourseChanges, CourseContent, NewCourse};
use crate::types::internal::format_timestamp;

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Minor currency units
    pub price: i32,
    pub duration: String,
    pub level: String,
    pub image_url: String,
    pub instructor: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    /// Live enrollment count
    pub enrollments: i32,
    pub rating: i32,
    pub reviews: i32,
    pub lesson_count: u32,
    pub content: CourseContent,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            lesson_count: c.content.lesson_count() as u32,
            id: c.id,
            title: c.title,
            description: c.description,
            price: c.price,
            duration: c.duration,
            level: c.level,
            image_url: c.image_url,
            instructor: c.instructor,
            category: c.category,
            tags: c.tags,
            featured: c.featured,
            enrollments: c.enrollments,
            rating: c.rating,
            reviews: c.reviews,
            content: c.content,
            created_at: format_timestamp(c.created_at),
            updated_at: format_timestamp(c.updated_at),
        }
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[oai(validator(min_length = 1))]
    pub title: String,
    pub description: String,
    #[oai(validator(minimum(value = "0")))]
    pub price: i32,
    pub duration: String,
    pub level: String,
    pub image_url: String,
    pub instructor: String,
    #[oai(validator(min_length = 1))]
    pub category: String,
    #[oai(default)]
    pub tags: Vec<String>,
    #[oai(default)]
    pub featured: bool,
    #[oai(default)]
    pub content: CourseContent,
}

impl From<CreateCourseRequest> for NewCourse {
    fn from(r: CreateCourseRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            price: r.price,
            duration: r.duration,
            level: r.level,
            image_url: r.image_url,
            instructor: r.instructor,
            category: r.category,
            tags: r.tags,
            featured: r.featured,
            content: r.content,
        }
    }
}

/// Partial update; omitted fields are left unchanged
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[oai(validator(minimum(value = "0")))]
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

impl From<UpdateCourseRequest> for CourseChanges {
    fn from(r: UpdateCourseRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            price: r.price,
            duration: r.duration,
            level: r.level,
            image_url: r.image_url,
            instructor: r.instructor,
            category: r.category,
            tags: r.tags,
            featured: r.featured,
            content: r.content,
        }
    }
}

#[derive(ApiResponse)]
pub enum CreateCourseApiResponse {
    /// Course created
    #[oai(status = 201)]
    Created(Json<CourseResponse>),
}
