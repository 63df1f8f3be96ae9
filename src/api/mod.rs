// API layer - HTTP endpoints
pub mod analytics;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod messages;
pub mod users;

use std::sync::Arc;

use poem::{Request, Route};
use poem_openapi::OpenApiService;

pub use analytics::AnalyticsApi;
pub use auth::{AuthApi, BearerAuth};
pub use courses::CourseApi;
pub use enrollments::EnrollmentApi;
pub use health::HealthApi;
pub use messages::MessageApi;
pub use users::UserApi;

use crate::app_data::AppData;
use crate::coordinators::AuthCoordinator;
use crate::errors::ApiError;
use crate::types::internal::context::RequestContext;

/// Context for a route that requires a bearer token
///
/// A token that fails validation leaves the context anonymous, so the
/// coordinator's gate answers with 401.
pub(crate) async fn authenticated_context(
    auth: &AuthCoordinator,
    req: &Request,
    bearer: &BearerAuth,
) -> Result<RequestContext, ApiError> {
    let ctx = RequestContext::for_api(RequestContext::extract_ip_address(req));
    Ok(auth.authenticate(ctx, &bearer.0.token).await?)
}

/// Context for a public route; a bearer token is optional
pub(crate) async fn optional_context(auth: &AuthCoordinator, req: &Request) -> Result<RequestContext, ApiError> {
    Ok(auth.context_for(req).await?)
}

/// Compose the OpenAPI service and Swagger UI
///
/// API endpoints are nested under `/api`, Swagger UI under `/swagger`.
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> Route {
    let auth = Arc::new(AuthCoordinator::new(app_data.clone()));

    let api_service = OpenApiService::new(
        (
            HealthApi::new(app_data.clone()),
            AuthApi::new(auth.clone()),
            CourseApi::new(app_data.clone(), auth.clone()),
            EnrollmentApi::new(app_data.clone(), auth.clone()),
            UserApi::new(app_data.clone(), auth.clone()),
            MessageApi::new(app_data.clone(), auth.clone()),
            AnalyticsApi::new(app_data, auth),
        ),
        "CourseHub API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", server_url));

    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
