use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{authenticated_context, optional_context, BearerAuth};
use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, MessageCoordinator};
use crate::errors::{ApiError, InternalError};
use crate::types::db::message;
use crate::types::dto::common::DeletedApiResponse;
use crate::types::dto::message::{
    CreateMessageApiResponse, CreateMessageRequest, CreateReplyApiResponse, CreateReplyRequest, MessageResponse,
    MessageThreadResponse, ReplyResponse, UnreadCountResponse, UpdateStatusRequest,
};

/// Contact inbox and reply thread endpoints
pub struct MessageApi {
    message_coordinator: MessageCoordinator,
    auth_coordinator: Arc<AuthCoordinator>,
}

impl MessageApi {
    pub fn new(app_data: Arc<AppData>, auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self {
            message_coordinator: MessageCoordinator::new(app_data),
            auth_coordinator,
        }
    }
}

#[derive(Tags)]
enum MessageTags {
    Messages,
}

fn to_responses(messages: Vec<message::Model>) -> Result<Vec<MessageResponse>, InternalError> {
    messages.into_iter().map(MessageResponse::try_from).collect()
}

#[OpenApi]
impl MessageApi {
    /// Submit the contact form; signed-in senders are linked to their account
    #[oai(path = "/messages", method = "post", tag = "MessageTags::Messages")]
    async fn submit(&self, req: &Request, body: Json<CreateMessageRequest>) -> Result<CreateMessageApiResponse, ApiError> {
        let ctx = optional_context(&self.auth_coordinator, req).await?;
        let message = self.message_coordinator.submit(&ctx, body.0.into()).await?;
        Ok(CreateMessageApiResponse::Created(Json(MessageResponse::try_from(message)?)))
    }

    /// All messages, newest first (admin)
    #[oai(path = "/messages", method = "get", tag = "MessageTags::Messages")]
    async fn list(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<MessageResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let messages = self.message_coordinator.list_all(&ctx).await?;
        Ok(Json(to_responses(messages)?))
    }

    /// Unread messages (admin)
    #[oai(path = "/messages/unread", method = "get", tag = "MessageTags::Messages")]
    async fn list_unread(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<MessageResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let messages = self.message_coordinator.list_unread(&ctx).await?;
        Ok(Json(to_responses(messages)?))
    }

    #[oai(path = "/messages/unread-count", method = "get", tag = "MessageTags::Messages")]
    async fn unread_count(&self, req: &Request, auth: BearerAuth) -> Result<Json<UnreadCountResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let count = self.message_coordinator.unread_count(&ctx).await?;
        Ok(Json(UnreadCountResponse { count }))
    }

    /// Own threads; clears the unread-messages flag
    #[oai(path = "/messages/mine", method = "get", tag = "MessageTags::Messages")]
    async fn list_mine(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<MessageThreadResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let threads = self.message_coordinator.list_mine(&ctx).await?;
        let threads = threads
            .into_iter()
            .map(MessageThreadResponse::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Json(threads))
    }

    /// Open a thread (admin); an unread message becomes read
    #[oai(path = "/messages/:id", method = "get", tag = "MessageTags::Messages")]
    async fn open(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageThreadResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let thread = self.message_coordinator.open_message(&ctx, id.0).await?;
        Ok(Json(MessageThreadResponse::try_from(thread)?))
    }

    /// Override a message status (admin)
    #[oai(path = "/messages/:id/status", method = "put", tag = "MessageTags::Messages")]
    async fn set_status(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateStatusRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let message = self.message_coordinator.set_status(&ctx, id.0, body.status).await?;
        Ok(Json(MessageResponse::try_from(message)?))
    }

    /// Reply to a thread; admins on any message, users on their own
    #[oai(path = "/messages/:id/replies", method = "post", tag = "MessageTags::Messages")]
    async fn reply(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<CreateReplyRequest>,
    ) -> Result<CreateReplyApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let reply = self.message_coordinator.add_reply(&ctx, id.0, body.0.content).await?;
        Ok(CreateReplyApiResponse::Created(Json(ReplyResponse::from(reply))))
    }

    /// Mark a reply read; repeating it is harmless
    #[oai(path = "/replies/:id/read", method = "put", tag = "MessageTags::Messages")]
    async fn mark_reply_read(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<ReplyResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        let reply = self.message_coordinator.mark_reply_read(&ctx, id.0).await?;
        Ok(Json(reply.into()))
    }

    /// Delete a message and its replies (admin)
    #[oai(path = "/messages/:id", method = "delete", tag = "MessageTags::Messages")]
    async fn delete(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<DeletedApiResponse, ApiError> {
        let ctx = authenticated_context(&self.auth_coordinator, req, &auth).await?;
        self.message_coordinator.delete_message(&ctx, id.0).await?;
        Ok(DeletedApiResponse::NoContent)
    }
}
