// API request/response models
pub mod analytics;
pub mod auth;
pub mod common;
pub mod course;
pub mod enrollment;
pub mod message;
pub mod user;
