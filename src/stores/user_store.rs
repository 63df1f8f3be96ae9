use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::stores::unique_violation;
use crate::types::db::user;
use crate::types::internal::user::{NewUser, UserChanges};

/// Lookup key for a username: trimmed and lowercased over full Unicode
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Emails are stored in this form, so it is also their lookup key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Map a failed user write: a unique-index hit becomes the matching
/// duplicate error, anything else a database error
fn duplicate_or_database(operation: &str, err: DbErr, username: &str, email: &str) -> InternalError {
    match unique_violation(&err) {
        Some(message) if message.contains("email") => UserError::DuplicateEmail { email: email.to_string() }.into(),
        Some(_) => UserError::DuplicateUsername { username: username.to_string() }.into(),
        None => InternalError::database(operation, err),
    }
}

/// Users table access
///
/// Username and email are unique case-insensitively. Both are folded in Rust
/// (the username into `username_normalized`), checked before every create and
/// update, and backed by unique indexes for writes that race past the check.
#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))
    }

    /// Same as `get_by_id` but a missing row is `UserNotFound`
    pub async fn require_by_id(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<user::Model, InternalError> {
        self.get_by_id(conn, user_id)
            .await?
            .ok_or_else(|| UserError::UserNotFound { user_id }.into())
    }

    pub async fn get_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::UsernameNormalized.eq(normalize_username(username)))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_username", e))
    }

    pub async fn get_by_email(&self, conn: &impl ConnectionTrait, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_email", e))
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }

    /// The bootstrap admin, if one has been created
    pub async fn get_protected(&self, conn: &impl ConnectionTrait) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::IsProtected.eq(true))
            .order_by_asc(user::Column::Id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_protected_user", e))
    }

    async fn ensure_unique(
        &self,
        conn: &impl ConnectionTrait,
        username: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i32>,
    ) -> Result<(), InternalError> {
        if let Some(username) = username {
            if let Some(existing) = self.get_by_username(conn, username).await? {
                if Some(existing.id) != exclude_id {
                    return Err(UserError::DuplicateUsername { username: username.to_string() }.into());
                }
            }
        }
        if let Some(email) = email {
            if let Some(existing) = self.get_by_email(conn, email).await? {
                if Some(existing.id) != exclude_id {
                    return Err(UserError::DuplicateEmail { email: email.to_string() }.into());
                }
            }
        }
        Ok(())
    }

    /// Insert a user; fails with Conflict on a duplicate username or email
    pub async fn create(&self, conn: &impl ConnectionTrait, new_user: NewUser) -> Result<user::Model, InternalError> {
        let username = new_user.username.trim().to_string();
        let email = normalize_email(&new_user.email);

        self.ensure_unique(conn, Some(&username), Some(&email), None).await?;

        let now = Utc::now().timestamp();
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(username.clone()),
            username_normalized: Set(normalize_username(&username)),
            email: Set(email.clone()),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            is_admin: Set(new_user.is_admin),
            is_protected: Set(new_user.is_protected),
            has_unread_messages: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| duplicate_or_database("create_user", e, &username, &email))?;

        tracing::debug!(user_id = model.id, username = %model.username, "User created");

        Ok(model)
    }

    /// Partial update; unchanged fields are left alone and `updated_at` is refreshed
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        let existing = self.require_by_id(conn, user_id).await?;

        let username = changes.username.map(|u| u.trim().to_string());
        let email = changes.email.map(|e| normalize_email(&e));
        self.ensure_unique(conn, username.as_deref(), email.as_deref(), Some(user_id))
            .await?;

        let final_username = username.clone().unwrap_or_else(|| existing.username.clone());
        let final_email = email.clone().unwrap_or_else(|| existing.email.clone());

        let mut active: user::ActiveModel = existing.into();
        if let Some(username) = username {
            active.username_normalized = Set(normalize_username(&username));
            active.username = Set(username);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(is_admin) = changes.is_admin {
            active.is_admin = Set(is_admin);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| duplicate_or_database("update_user", e, &final_username, &final_email))
    }

    /// Delete a user row; returns whether a row existed
    ///
    /// Dependent rows are not touched here, see `UserCoordinator::delete_user`.
    pub async fn delete(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<bool, InternalError> {
        let result = user::Entity::delete_by_id(user_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn set_unread_flag(&self, conn: &impl ConnectionTrait, user_id: i32, unread: bool) -> Result<(), InternalError> {
        user::Entity::update_many()
            .col_expr(user::Column::HasUnreadMessages, Expr::value(unread))
            .filter(user::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_unread_flag", e))?;

        Ok(())
    }
}
