use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::internal::MessageError;
use crate::errors::InternalError;
use crate::providers::AuthorizationGate;
use crate::stores::{MessageStore, ReplyStore, UserStore};
use crate::types::db::{message, message_reply};
use crate::types::internal::context::RequestContext;
use crate::types::internal::message::{MessageStatus, MessageThread, NewMessage, NewReply};

/// Contact inbox and reply threads
pub struct MessageCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    message_store: Arc<MessageStore>,
    reply_store: Arc<ReplyStore>,
}

impl MessageCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            message_store: app_data.message_store.clone(),
            reply_store: app_data.reply_store.clone(),
        }
    }

    async fn thread(&self, message: message::Model) -> Result<MessageThread, InternalError> {
        let replies = self.reply_store.list_by_message(&self.db, message.id).await?;
        Ok(MessageThread { message, replies })
    }

    /// Accept a contact form; the sender is the authenticated caller, if any
    pub async fn submit(&self, ctx: &RequestContext, mut new_message: NewMessage) -> Result<message::Model, InternalError> {
        new_message.user_id = ctx.identity.as_ref().map(|i| i.user_id);

        let txn = begin_transaction(&self.db).await?;
        let message = self.message_store.create(&txn, new_message).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            message_id = message.id,
            user_id = ?message.user_id,
            "Message submitted"
        );

        Ok(message)
    }

    pub async fn list_all(&self, ctx: &RequestContext) -> Result<Vec<message::Model>, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        self.message_store.list_all(&self.db).await
    }

    pub async fn list_unread(&self, ctx: &RequestContext) -> Result<Vec<message::Model>, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        self.message_store.list_unread(&self.db).await
    }

    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<u64, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        self.message_store.count_unread(&self.db).await
    }

    /// Admin view of one thread; opening an unread message marks it read
    pub async fn open_message(&self, ctx: &RequestContext, message_id: i32) -> Result<MessageThread, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        self.message_store.require_by_id(&self.db, message_id).await?;
        self.message_store.mark_read_if_unread(&self.db, message_id).await?;

        let message = self.message_store.require_by_id(&self.db, message_id).await?;
        self.thread(message).await
    }

    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        message_id: i32,
        status: MessageStatus,
    ) -> Result<message::Model, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        let message = self.message_store.set_status(&self.db, message_id, status).await?;

        tracing::info!(request_id = %ctx.request_id, message_id, status = %status, "Message status set");

        Ok(message)
    }

    /// Append a reply; admins may reply anywhere, users only on their own messages
    pub async fn add_reply(
        &self,
        ctx: &RequestContext,
        message_id: i32,
        content: String,
    ) -> Result<message_reply::Model, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;
        let message = self.message_store.require_by_id(&self.db, message_id).await?;

        if !AuthorizationGate::is_owner_or_admin(identity, message.user_id) {
            return Err(MessageError::NotThreadParticipant {
                user_id: identity.user_id,
                message_id,
            }
            .into());
        }

        let txn = begin_transaction(&self.db).await?;
        let reply = self
            .reply_store
            .create(
                &txn,
                NewReply {
                    message_id,
                    author_id: identity.user_id,
                    content,
                    is_admin: identity.is_admin,
                },
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            message_id,
            reply_id = reply.id,
            is_admin = reply.is_admin,
            "Reply added"
        );

        Ok(reply)
    }

    /// Mark one reply read; idempotent
    pub async fn mark_reply_read(&self, ctx: &RequestContext, reply_id: i32) -> Result<message_reply::Model, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;
        let reply = self
            .reply_store
            .get_by_id(&self.db, reply_id)
            .await?
            .ok_or(MessageError::ReplyNotFound { reply_id })?;
        let message = self.message_store.require_by_id(&self.db, reply.message_id).await?;

        if !AuthorizationGate::is_owner_or_admin(identity, message.user_id) {
            return Err(MessageError::NotThreadParticipant {
                user_id: identity.user_id,
                message_id: message.id,
            }
            .into());
        }

        self.reply_store.mark_read(&self.db, reply_id).await
    }

    /// Own threads, newest first
    ///
    /// Viewing them clears the caller's unread flag and marks the admin
    /// replies in those threads read.
    pub async fn list_mine(&self, ctx: &RequestContext) -> Result<Vec<MessageThread>, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;

        let txn = begin_transaction(&self.db).await?;
        let messages = self.message_store.list_by_user(&txn, identity.user_id).await?;
        let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
        self.reply_store.mark_admin_replies_read(&txn, &ids).await?;
        self.user_store.set_unread_flag(&txn, identity.user_id, false).await?;
        commit_transaction(txn).await?;

        let mut threads = Vec::with_capacity(messages.len());
        for message in messages {
            threads.push(self.thread(message).await?);
        }
        Ok(threads)
    }

    /// Delete a message and its thread
    pub async fn delete_message(&self, ctx: &RequestContext, message_id: i32) -> Result<(), InternalError> {
        AuthorizationGate::require_admin(ctx)?;

        let txn = begin_transaction(&self.db).await?;
        if !self.message_store.delete(&txn, message_id).await? {
            return Err(MessageError::MessageNotFound { message_id }.into());
        }
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, message_id, "Message deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test::utils::{new_message, new_user, setup_test_app_data};
    use crate::types::db::user;
    use crate::types::internal::auth::Identity;

    struct Fixture {
        app_data: Arc<AppData>,
        coordinator: MessageCoordinator,
        admin: user::Model,
        member: user::Model,
    }

    async fn fixture() -> Fixture {
        let app_data = setup_test_app_data().await;
        let mut admin = new_user("admin");
        admin.is_admin = true;
        let admin = app_data.user_store.create(&app_data.db, admin).await.unwrap();
        let member = app_data.user_store.create(&app_data.db, new_user("member")).await.unwrap();
        let coordinator = MessageCoordinator::new(app_data.clone());
        Fixture { app_data, coordinator, admin, member }
    }

    fn ctx(user: &user::Model) -> RequestContext {
        RequestContext::for_api(None).with_identity(Identity::from(user))
    }

    #[tokio::test]
    async fn test_submit_takes_sender_from_identity() {
        let f = fixture().await;

        let anonymous = f
            .coordinator
            .submit(&RequestContext::for_api(None), new_message(Some(999), "Anon"))
            .await
            .unwrap();
        assert_eq!(anonymous.user_id, None);

        let owned = f.coordinator.submit(&ctx(&f.member), new_message(None, "Mine")).await.unwrap();
        assert_eq!(owned.user_id, Some(f.member.id));
    }

    #[tokio::test]
    async fn test_open_marks_read_and_requires_admin() {
        let f = fixture().await;
        let message = f.coordinator.submit(&ctx(&f.member), new_message(None, "Open me")).await.unwrap();

        let err = f.coordinator.open_message(&ctx(&f.member), message.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let thread = f.coordinator.open_message(&ctx(&f.admin), message.id).await.unwrap();
        assert_eq!(thread.message.status, "read");
        assert_eq!(f.coordinator.unread_count(&ctx(&f.admin)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reply_rules() {
        let f = fixture().await;
        let other = f.app_data.user_store.create(&f.app_data.db, new_user("other")).await.unwrap();
        let message = f.coordinator.submit(&ctx(&f.member), new_message(None, "Thread")).await.unwrap();

        // Owner may reply to their own thread
        f.coordinator.add_reply(&ctx(&f.member), message.id, "more info".to_string()).await.unwrap();

        let err = f
            .coordinator
            .add_reply(&ctx(&other), message.id, "butting in".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        f.coordinator.add_reply(&ctx(&f.admin), message.id, "answer".to_string()).await.unwrap();

        let thread = f.coordinator.open_message(&ctx(&f.admin), message.id).await.unwrap();
        assert_eq!(thread.message.status, "replied");
        assert_eq!(thread.replies.len(), 2);
        assert!(!thread.replies[0].is_admin);
        assert!(thread.replies[1].is_admin);
    }

    #[tokio::test]
    async fn test_list_mine_clears_flag_and_reads_admin_replies() {
        let f = fixture().await;
        let db = &f.app_data.db;
        let message = f.coordinator.submit(&ctx(&f.member), new_message(None, "Help")).await.unwrap();
        f.coordinator.add_reply(&ctx(&f.admin), message.id, "on it".to_string()).await.unwrap();
        assert!(f.app_data.user_store.require_by_id(db, f.member.id).await.unwrap().has_unread_messages);

        let threads = f.coordinator.list_mine(&ctx(&f.member)).await.unwrap();

        assert_eq!(threads.len(), 1);
        assert!(threads[0].replies.iter().all(|r| r.read));
        assert!(!f.app_data.user_store.require_by_id(db, f.member.id).await.unwrap().has_unread_messages);
    }

    #[tokio::test]
    async fn test_mark_reply_read_idempotent() {
        let f = fixture().await;
        let message = f.coordinator.submit(&ctx(&f.member), new_message(None, "Read")).await.unwrap();
        let reply = f.coordinator.add_reply(&ctx(&f.admin), message.id, "hi".to_string()).await.unwrap();

        assert!(f.coordinator.mark_reply_read(&ctx(&f.member), reply.id).await.unwrap().read);
        assert!(f.coordinator.mark_reply_read(&ctx(&f.member), reply.id).await.unwrap().read);
    }

    #[tokio::test]
    async fn test_delete_message() {
        let f = fixture().await;
        let message = f.coordinator.submit(&RequestContext::for_api(None), new_message(None, "Bye")).await.unwrap();

        f.coordinator.delete_message(&ctx(&f.admin), message.id).await.unwrap();
        let err = f.coordinator.delete_message(&ctx(&f.admin), message.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_admin_status_override() {
        let f = fixture().await;
        let message = f.coordinator.submit(&RequestContext::for_api(None), new_message(None, "Pend")).await.unwrap();

        let updated = f
            .coordinator
            .set_status(&ctx(&f.admin), message.id, MessageStatus::Pending)
            .await
            .unwrap();
        assert_eq!(updated.status, "pending");
    }
}
