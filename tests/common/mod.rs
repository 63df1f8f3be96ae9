// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use coursehub_backend::config::{migrate_database, SecretManager};
use coursehub_backend::types::db::user;
use coursehub_backend::types::internal::auth::Identity;
use coursehub_backend::types::internal::context::RequestContext;
use coursehub_backend::types::internal::course::{CourseContent, CourseLesson, CourseSection, NewCourse};
use coursehub_backend::types::internal::user::NewUser;
use coursehub_backend::AppData;
use sea_orm::Database;

pub const TEST_JWT_SECRET: &str = "integration-secret-key-at-least-32-chars";
pub const TEST_PEPPER: &str = "integration-pepper-16";

/// AppData over a fresh in-memory database with migrations applied
pub async fn setup_app_data() -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    migrate_database(&db).await.expect("Failed to run migrations");

    let secret_manager = Arc::new(SecretManager::new(TEST_JWT_SECRET, TEST_PEPPER));
    Arc::new(AppData::new(db, secret_manager, Duration::from_secs(15 * 60)))
}

pub async fn create_user(app_data: &AppData, username: &str, is_admin: bool) -> user::Model {
    app_data
        .user_store
        .create(
            &app_data.db,
            NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: app_data.password_provider.hash("password123").expect("hash"),
                first_name: None,
                last_name: None,
                is_admin,
                is_protected: false,
            },
        )
        .await
        .expect("Failed to create user")
}

pub fn ctx_for(user: &user::Model) -> RequestContext {
    RequestContext::for_api(None).with_identity(Identity::from(user))
}

pub fn course(title: &str, category: &str, featured: bool) -> NewCourse {
    NewCourse {
        title: title.to_string(),
        description: "An integration test course".to_string(),
        price: 1999,
        duration: "2 weeks".to_string(),
        level: "Beginner".to_string(),
        image_url: "https://images.example.com/c.jpg".to_string(),
        instructor: "Instructor".to_string(),
        category: category.to_string(),
        tags: vec!["test".to_string()],
        featured,
        content: CourseContent {
            sections: vec![CourseSection {
                title: "Only section".to_string(),
                lessons: vec![CourseLesson {
                    title: "Only lesson".to_string(),
                    duration: "1:00".to_string(),
                    content: "Text".to_string(),
                }],
            }],
        },
    }
}
