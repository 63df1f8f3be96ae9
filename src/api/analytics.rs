use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{authenticated_context, BearerAuth};
use crate::app_data::AppData;
use crate::coordinators::{AnalyticsCoordinator, AuthCoordinator};
use crate::errors::ApiError;
use crate::types::dto::analytics::DashboardResponse;

pub struct AnalyticsApi {
    analytics_coordinator: AnalyticsCoordinator,
    auth_coordinator: Arc<AuthCoordinator>,
}

impl AnalyticsApi {
    pub fn new(app_data: Arc<AppData>, auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self {
            analytics_coordinator: AnalyticsCoordinator::new(app_data),
            auth_coordinator,
        }
    }
}

#[derive(Tags)]
enum AnalyticsTags {
    Analytics,
}

#[OpenApi(prefix_path = "/analytics")]
impl AnalyticsApi {
    /// Totals, completion rate and courses per category (admin)
    #[oai(path = "/dashboard", method = "get", tag = "AnalyticsTags::Analytics")]
    async fn dashboard(&self, req: &Request, auth: BearerAuth) -> Result<Json<DashboardResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let dashboard = self.analytics_coordinator.dashboard(&ctx).await?;
        Ok(Json(dashboard.into()))
    }
}
