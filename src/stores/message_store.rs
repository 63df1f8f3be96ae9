use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::internal::MessageError;
use crate::errors::InternalError;
use crate::stores::UserStore;
use crate::types::db::{message, message_reply};
use crate::types::internal::message::{MessageStatus, NewMessage};

/// Messages table access
///
/// Listings are newest first.
pub struct MessageStore {
    user_store: Arc<UserStore>,
}

impl MessageStore {
    pub fn new(user_store: Arc<UserStore>) -> Self {
        Self { user_store }
    }

    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, message_id: i32) -> Result<Option<message::Model>, InternalError> {
        message::Entity::find_by_id(message_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_message_by_id", e))
    }

    pub async fn require_by_id(&self, conn: &impl ConnectionTrait, message_id: i32) -> Result<message::Model, InternalError> {
        self.get_by_id(conn, message_id)
            .await?
            .ok_or_else(|| MessageError::MessageNotFound { message_id }.into())
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<message::Model>, InternalError> {
        message::Entity::find()
            .order_by_desc(message::Column::CreatedAt)
            .order_by_desc(message::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_messages", e))
    }

    pub async fn list_unread(&self, conn: &impl ConnectionTrait) -> Result<Vec<message::Model>, InternalError> {
        message::Entity::find()
            .filter(message::Column::Status.eq(MessageStatus::Unread.as_str()))
            .order_by_desc(message::Column::CreatedAt)
            .order_by_desc(message::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_unread_messages", e))
    }

    pub async fn list_by_user(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<Vec<message::Model>, InternalError> {
        message::Entity::find()
            .filter(message::Column::UserId.eq(user_id))
            .order_by_desc(message::Column::CreatedAt)
            .order_by_desc(message::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_messages_by_user", e))
    }

    pub async fn count_unread(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        message::Entity::find()
            .filter(message::Column::Status.eq(MessageStatus::Unread.as_str()))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_unread_messages", e))
    }

    /// Insert an unread message; flags the sender when the message has an owner
    pub async fn create(&self, conn: &impl ConnectionTrait, new_message: NewMessage) -> Result<message::Model, InternalError> {
        let model = message::ActiveModel {
            id: NotSet,
            user_id: Set(new_message.user_id),
            name: Set(new_message.name),
            email: Set(new_message.email),
            subject: Set(new_message.subject),
            body: Set(new_message.body),
            status: Set(MessageStatus::Unread.as_str().to_string()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_message", e))?;

        if let Some(user_id) = model.user_id {
            self.user_store.set_unread_flag(conn, user_id, true).await?;
        }

        tracing::debug!(message_id = model.id, user_id = ?model.user_id, "Message created");

        Ok(model)
    }

    pub async fn set_status(
        &self,
        conn: &impl ConnectionTrait,
        message_id: i32,
        status: MessageStatus,
    ) -> Result<message::Model, InternalError> {
        let existing = self.require_by_id(conn, message_id).await?;

        let mut active: message::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_message_status", e))
    }

    /// unread -> read; any other status is left as is
    pub async fn mark_read_if_unread(&self, conn: &impl ConnectionTrait, message_id: i32) -> Result<(), InternalError> {
        message::Entity::update_many()
            .col_expr(message::Column::Status, Expr::value(MessageStatus::Read.as_str()))
            .filter(message::Column::Id.eq(message_id))
            .filter(message::Column::Status.eq(MessageStatus::Unread.as_str()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_message_read", e))?;

        Ok(())
    }

    /// Delete a message and its replies; returns whether the message existed
    pub async fn delete(&self, conn: &impl ConnectionTrait, message_id: i32) -> Result<bool, InternalError> {
        message_reply::Entity::delete_many()
            .filter(message_reply::Column::MessageId.eq(message_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_message_replies", e))?;

        let result = message::Entity::delete_by_id(message_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_message", e))?;

        Ok(result.rows_affected > 0)
    }
}
