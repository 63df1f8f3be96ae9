use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};

use crate::errors::InternalError;
use crate::types::db::{message, message_reply};
use crate::types::internal::format_timestamp;
use crate::types::internal::message::{MessageStatus, MessageThread, NewMessage};

/// Contact form submission
#[derive(Object, Debug)]
pub struct CreateMessageRequest {
    #[oai(validator(min_length = 1))]
    pub name: String,
    #[oai(validator(min_length = 3))]
    pub email: String,
    #[oai(validator(min_length = 1))]
    pub subject: String,
    #[oai(validator(min_length = 1))]
    pub message: String,
}

impl From<CreateMessageRequest> for NewMessage {
    fn from(r: CreateMessageRequest) -> Self {
        Self {
            user_id: None,
            name: r.name,
            email: r.email,
            subject: r.subject,
            body: r.message,
        }
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i32,
    /// Absent for anonymous submissions
    pub user_id: Option<i32>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: String,
}

impl TryFrom<message::Model> for MessageResponse {
    type Error = InternalError;

    fn try_from(m: message::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            status: m.status.parse()?,
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            email: m.email,
            subject: m.subject,
            message: m.body,
            created_at: format_timestamp(m.created_at),
        })
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: i32,
    pub message_id: i32,
    pub author_id: i32,
    pub content: String,
    pub is_admin: bool,
    pub read: bool,
    pub created_at: String,
}

impl From<message_reply::Model> for ReplyResponse {
    fn from(r: message_reply::Model) -> Self {
        Self {
            id: r.id,
            message_id: r.message_id,
            author_id: r.author_id,
            content: r.content,
            is_admin: r.is_admin,
            read: r.read,
            created_at: format_timestamp(r.created_at),
        }
    }
}

/// Message with its replies, oldest reply first
#[derive(Object, Debug)]
pub struct MessageThreadResponse {
    pub message: MessageResponse,
    pub replies: Vec<ReplyResponse>,
}

impl TryFrom<MessageThread> for MessageThreadResponse {
    type Error = InternalError;

    fn try_from(t: MessageThread) -> Result<Self, Self::Error> {
        Ok(Self {
            message: MessageResponse::try_from(t.message)?,
            replies: t.replies.into_iter().map(ReplyResponse::from).collect(),
        })
    }
}

#[derive(Object, Debug)]
pub struct UpdateStatusRequest {
    pub status: MessageStatus,
}

#[derive(Object, Debug)]
pub struct CreateReplyRequest {
    #[oai(validator(min_length = 1))]
    pub content: String,
}

#[derive(Object, Debug)]
pub struct UnreadCountResponse {
    pub count: u64,
}

#[derive(ApiResponse)]
pub enum CreateMessageApiResponse {
    /// Message received
    #[oai(status = 201)]
    Created(Json<MessageResponse>),
}

#[derive(ApiResponse)]
pub enum CreateReplyApiResponse {
    /// Reply appended
    #[oai(status = 201)]
    Created(Json<ReplyResponse>),
}
