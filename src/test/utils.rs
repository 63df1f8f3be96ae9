// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{migrate_database, SecretManager};
use crate::types::internal::course::{CourseContent, CourseLesson, CourseSection, NewCourse};
use crate::types::internal::message::NewMessage;
use crate::types::internal::user::NewUser;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// Fresh in-memory SQLite database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    migrate_database(&db).await.expect("Failed to run migrations");

    db
}

/// AppData over a fresh database with fixed test secrets
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let secret_manager = Arc::new(SecretManager::new(TEST_JWT_SECRET, TEST_PEPPER));
    Arc::new(AppData::new(db, secret_manager, Duration::from_secs(15 * 60)))
}

/// Plain, non-admin user with email `{username}@example.com`
///
/// The password hash is a placeholder; tests that log in hash a real one.
pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: "not-a-real-hash".to_string(),
        first_name: None,
        last_name: None,
        is_admin: false,
        is_protected: false,
    }
}

/// Course with tags ["beginner", "rust"] and one two-lesson section
pub fn new_course(title: &str, category: &str, featured: bool) -> NewCourse {
    NewCourse {
        title: title.to_string(),
        description: format!("{} description", title),
        price: 4999,
        duration: "4 weeks".to_string(),
        level: "Beginner".to_string(),
        image_url: "https://images.example.com/course.jpg".to_string(),
        instructor: "Test Instructor".to_string(),
        category: category.to_string(),
        tags: vec!["beginner".to_string(), "rust".to_string()],
        featured,
        content: CourseContent {
            sections: vec![CourseSection {
                title: "Introduction".to_string(),
                lessons: vec![
                    CourseLesson {
                        title: "Welcome".to_string(),
                        duration: "5:00".to_string(),
                        content: "Course overview".to_string(),
                    },
                    CourseLesson {
                        title: "Setup".to_string(),
                        duration: "10:00".to_string(),
                        content: "Installing tools".to_string(),
                    },
                ],
            }],
        },
    }
}

pub fn new_message(user_id: Option<i32>, subject: &str) -> NewMessage {
    NewMessage {
        user_id,
        name: "Sender".to_string(),
        email: "sender@example.com".to_string(),
        subject: subject.to_string(),
        body: format!("Body of {}", subject),
    }
}
