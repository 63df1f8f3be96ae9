// Database entities - SeaORM models
pub mod course;
pub mod enrollment;
pub mod message;
pub mod message_reply;
pub mod user;
