// Internal types - not exposed over the API directly
pub mod analytics;
pub mod auth;
pub mod context;
pub mod course;
pub mod enrollment;
pub mod message;
pub mod user;

/// Format a unix timestamp (seconds) as RFC 3339 for API responses
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
