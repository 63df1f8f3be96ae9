use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::providers::{AuthorizationGate, PasswordProvider};
use crate::stores::{EnrollmentStore, UserStore};
use crate::types::db::user;
use crate::types::internal::context::RequestContext;
use crate::types::internal::user::{NewUser, UserChanges, UserInput, UserUpdate};

/// Admin user management
///
/// Every operation requires an admin identity. The protected bootstrap admin
/// can be edited but never demoted or deleted.
pub struct UserCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    enrollment_store: Arc<EnrollmentStore>,
    password_provider: Arc<PasswordProvider>,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            enrollment_store: app_data.enrollment_store.clone(),
            password_provider: app_data.password_provider.clone(),
        }
    }

    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<user::Model>, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        self.user_store.list_all(&self.db).await
    }

    pub async fn get_user(&self, ctx: &RequestContext, user_id: i32) -> Result<user::Model, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        self.user_store.require_by_id(&self.db, user_id).await
    }

    pub async fn create_user(&self, ctx: &RequestContext, input: UserInput) -> Result<user::Model, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        self.password_provider.check_policy(&input.password)?;
        let password_hash = self.password_provider.hash(&input.password)?;

        let user = self
            .user_store
            .create(
                &self.db,
                NewUser {
                    username: input.username,
                    email: input.email,
                    password_hash,
                    first_name: input.first_name,
                    last_name: input.last_name,
                    is_admin: input.is_admin,
                    is_protected: false,
                },
            )
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            user_id = user.id,
            is_admin = user.is_admin,
            "User created by admin"
        );

        Ok(user)
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i32,
        update: UserUpdate,
    ) -> Result<user::Model, InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        let target = self.user_store.require_by_id(&self.db, user_id).await?;

        if update.is_admin == Some(false) {
            AuthorizationGate::ensure_not_protected(&target, "demoted")?;
        }

        let password_hash = match update.password {
            Some(password) => {
                self.password_provider.check_policy(&password)?;
                Some(self.password_provider.hash(&password)?)
            }
            None => None,
        };

        let user = self
            .user_store
            .update(
                &self.db,
                user_id,
                UserChanges {
                    username: update.username,
                    email: update.email,
                    password_hash,
                    first_name: update.first_name,
                    last_name: update.last_name,
                    is_admin: update.is_admin,
                },
            )
            .await?;

        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, user_id, "User updated by admin");

        Ok(user)
    }

    /// Delete a user and their enrollments in one transaction
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: i32) -> Result<(), InternalError> {
        AuthorizationGate::require_admin(ctx)?;
        let target = self.user_store.require_by_id(&self.db, user_id).await?;
        AuthorizationGate::ensure_not_protected(&target, "deleted")?;

        let txn = begin_transaction(&self.db).await?;
        let removed_enrollments = self.enrollment_store.delete_for_user(&txn, user_id).await?;
        if !self.user_store.delete(&txn, user_id).await? {
            return Err(UserError::UserNotFound { user_id }.into());
        }
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            user_id,
            removed_enrollments,
            "User deleted"
        );

        Ok(())
    }
}
