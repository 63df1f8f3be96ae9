use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::config::{ApplicationSettings, SecretManager};
use crate::providers::{PasswordProvider, TokenProvider};
use crate::stores::{AnalyticsStore, CourseStore, EnrollmentStore, MessageStore, ReplyStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ secret_manager, password_provider, token_provider
///   └─ user/course/enrollment/message/reply/analytics stores
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub password_provider: Arc<PasswordProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub user_store: Arc<UserStore>,
    pub course_store: Arc<CourseStore>,
    pub enrollment_store: Arc<EnrollmentStore>,
    pub message_store: Arc<MessageStore>,
    pub reply_store: Arc<ReplyStore>,
    pub analytics_store: Arc<AnalyticsStore>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    pub fn init(db: DatabaseConnection, secret_manager: SecretManager, settings: &ApplicationSettings) -> Self {
        tracing::info!("Initializing AppData...");
        let app_data = Self::new(db, Arc::new(secret_manager), settings.jwt_expiration());
        tracing::info!("AppData initialization complete");
        app_data
    }

    /// Wire providers and stores around an existing connection
    pub fn new(db: DatabaseConnection, secret_manager: Arc<SecretManager>, jwt_expiration: Duration) -> Self {
        let password_provider = Arc::new(PasswordProvider::new(secret_manager.clone()));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone(), jwt_expiration));

        // Order matters: dependent stores take Arcs of the ones before them
        let user_store = Arc::new(UserStore::new());
        let course_store = Arc::new(CourseStore::new());
        let enrollment_store = Arc::new(EnrollmentStore::new(course_store.clone()));
        let message_store = Arc::new(MessageStore::new(user_store.clone()));
        let reply_store = Arc::new(ReplyStore::new(message_store.clone(), user_store.clone()));
        let analytics_store = Arc::new(AnalyticsStore::new(
            user_store.clone(),
            course_store.clone(),
            enrollment_store.clone(),
        ));

        Self {
            db,
            secret_manager,
            password_provider,
            token_provider,
            user_store,
            course_store,
            enrollment_store,
            message_store,
            reply_store,
            analytics_store,
        }
    }
}
