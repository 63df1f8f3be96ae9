use poem_openapi::{ApiResponse, Object};

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Plain acknowledgement
#[derive(Object, Debug)]
pub struct AckResponse {
    pub message: String,
}

/// Response for delete endpoints
#[derive(ApiResponse)]
pub enum DeletedApiResponse {
    /// Resource deleted
    #[oai(status = 204)]
    NoContent,
}
