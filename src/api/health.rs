use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::types::dto::common::HealthResponse;

/// Health check API
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
        }
    }
}

/// API tags for health endpoints
#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Reports "healthy" when the database answers a ping, "degraded" otherwise.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let status = match self.db.ping().await {
            Ok(()) => "healthy",
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                "degraded"
            }
        };

        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
