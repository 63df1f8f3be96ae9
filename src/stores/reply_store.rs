use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};

use crate::errors::internal::MessageError;
use crate::errors::InternalError;
use crate::stores::{MessageStore, UserStore};
use crate::types::db::message_reply;
use crate::types::internal::message::{MessageStatus, NewReply};

/// Append-only reply log per message
pub struct ReplyStore {
    message_store: Arc<MessageStore>,
    user_store: Arc<UserStore>,
}

impl ReplyStore {
    pub fn new(message_store: Arc<MessageStore>, user_store: Arc<UserStore>) -> Self {
        Self {
            message_store,
            user_store,
        }
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        reply_id: i32,
    ) -> Result<Option<message_reply::Model>, InternalError> {
        message_reply::Entity::find_by_id(reply_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_reply_by_id", e))
    }

    /// Thread order: oldest first, id breaks ties
    pub async fn list_by_message(
        &self,
        conn: &impl ConnectionTrait,
        message_id: i32,
    ) -> Result<Vec<message_reply::Model>, InternalError> {
        message_reply::Entity::find()
            .filter(message_reply::Column::MessageId.eq(message_id))
            .order_by_asc(message_reply::Column::CreatedAt)
            .order_by_asc(message_reply::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_replies_by_message", e))
    }

    /// Append a reply
    ///
    /// An admin reply to someone else's message flips the message to
    /// "replied" and raises the owner's unread flag. Run inside a transaction.
    pub async fn create(&self, conn: &impl ConnectionTrait, new_reply: NewReply) -> Result<message_reply::Model, InternalError> {
        let message = self.message_store.require_by_id(conn, new_reply.message_id).await?;

        let model = message_reply::ActiveModel {
            id: NotSet,
            message_id: Set(new_reply.message_id),
            author_id: Set(new_reply.author_id),
            content: Set(new_reply.content),
            is_admin: Set(new_reply.is_admin),
            read: Set(false),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_reply", e))?;

        if new_reply.is_admin && message.user_id != Some(new_reply.author_id) {
            self.message_store
                .set_status(conn, message.id, MessageStatus::Replied)
                .await?;
            if let Some(owner_id) = message.user_id {
                self.user_store.set_unread_flag(conn, owner_id, true).await?;
            }
        }

        tracing::debug!(
            reply_id = model.id,
            message_id = model.message_id,
            is_admin = model.is_admin,
            "Reply added"
        );

        Ok(model)
    }

    /// Idempotent; a reply that is already read stays read
    pub async fn mark_read(&self, conn: &impl ConnectionTrait, reply_id: i32) -> Result<message_reply::Model, InternalError> {
        let existing = self
            .get_by_id(conn, reply_id)
            .await?
            .ok_or(MessageError::ReplyNotFound { reply_id })?;

        if existing.read {
            return Ok(existing);
        }

        let mut active: message_reply::ActiveModel = existing.into();
        active.read = Set(true);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("mark_reply_read", e))
    }

    /// Mark every admin reply in the given threads as read
    pub async fn mark_admin_replies_read(
        &self,
        conn: &impl ConnectionTrait,
        message_ids: &[i32],
    ) -> Result<u64, InternalError> {
        if message_ids.is_empty() {
            return Ok(0);
        }

        let result = message_reply::Entity::update_many()
            .col_expr(message_reply::Column::Read, Expr::value(true))
            .filter(message_reply::Column::MessageId.is_in(message_ids.iter().copied()))
            .filter(message_reply::Column::IsAdmin.eq(true))
            .filter(message_reply::Column::Read.eq(false))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_admin_replies_read", e))?;

        Ok(result.rows_affected)
    }
}
