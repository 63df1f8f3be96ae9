use std::sync::Arc;

use poem::Request;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::internal::AccessError;
use crate::errors::InternalError;
use crate::providers::{AuthorizationGate, PasswordProvider, TokenProvider};
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::internal::auth::Identity;
use crate::types::internal::context::RequestContext;
use crate::types::internal::user::{NewUser, UserChanges, UserInput, UserUpdate};

/// Issued access token plus the account it belongs to
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
    pub user: user::Model,
}

/// Registration, login, request identity and self-service account workflows
pub struct AuthCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    password_provider: Arc<PasswordProvider>,
    token_provider: Arc<TokenProvider>,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            password_provider: app_data.password_provider.clone(),
            token_provider: app_data.token_provider.clone(),
        }
    }

    /// Build the request context for an incoming HTTP request
    ///
    /// The bearer token is optional. A missing, invalid or expired token, or
    /// one whose user no longer exists, yields an anonymous context; the
    /// authorization gate then rejects protected operations.
    pub async fn context_for(&self, req: &Request) -> Result<RequestContext, InternalError> {
        let ctx = RequestContext::for_api(RequestContext::extract_ip_address(req));

        match RequestContext::extract_bearer(req) {
            Some(bearer) => self.authenticate(ctx, &bearer.token).await,
            None => Ok(ctx),
        }
    }

    /// Attach the identity behind `token` to `ctx`, re-reading the user row
    pub async fn authenticate(&self, ctx: RequestContext, token: &str) -> Result<RequestContext, InternalError> {
        let claims = match self.token_provider.validate_jwt(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(request_id = %ctx.request_id, "Ignoring bearer token: {}", e);
                return Ok(ctx);
            }
        };

        let user_id = match TokenProvider::subject_user_id(&claims) {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::debug!(request_id = %ctx.request_id, "Ignoring bearer token: {}", e);
                return Ok(ctx);
            }
        };

        match self.user_store.get_by_id(&self.db, user_id).await? {
            Some(user) => Ok(ctx.with_identity(Identity::from(&user))),
            None => {
                tracing::debug!(request_id = %ctx.request_id, user_id, "Token subject no longer exists");
                Ok(ctx)
            }
        }
    }

    fn issue_token(&self, user: user::Model) -> Result<IssuedToken, InternalError> {
        let access_token = self.token_provider.generate_jwt(user.id, user.is_admin)?;
        Ok(IssuedToken {
            access_token,
            expires_in: self.token_provider.expires_in(),
            user,
        })
    }

    /// Create a regular account and log it in
    pub async fn register(&self, ctx: &RequestContext, input: UserInput) -> Result<IssuedToken, InternalError> {
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
                    is_admin: false,
                    is_protected: false,
                },
            )
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = user.id,
            username = %user.username,
            "User registered"
        );

        self.issue_token(user)
    }

    /// Verify credentials and issue an access token
    ///
    /// Unknown username and wrong password fail the same way.
    pub async fn login(&self, ctx: &RequestContext, username: &str, password: &str) -> Result<IssuedToken, InternalError> {
        let Some(user) = self.user_store.get_by_username(&self.db, username).await? else {
            tracing::info!(request_id = %ctx.request_id, username, "Login failed: unknown user");
            return Err(AccessError::InvalidCredentials.into());
        };

        if !self.password_provider.verify(password, &user.password_hash) {
            tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Login failed: bad password");
            return Err(AccessError::InvalidCredentials.into());
        }

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Login succeeded");

        self.issue_token(user)
    }

    /// Current account, fresh from the store
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<user::Model, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;
        self.user_store.require_by_id(&self.db, identity.user_id).await
    }

    /// Update own names and email
    pub async fn update_profile(&self, ctx: &RequestContext, update: UserUpdate) -> Result<user::Model, InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;

        let changes = UserChanges {
            email: update.email,
            first_name: update.first_name,
            last_name: update.last_name,
            ..Default::default()
        };
        if changes.is_empty() {
            return self.user_store.require_by_id(&self.db, identity.user_id).await;
        }

        let user = self.user_store.update(&self.db, identity.user_id, changes).await?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Profile updated");

        Ok(user)
    }

    /// Replace own password after verifying the current one
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        let identity = AuthorizationGate::require_authenticated(ctx)?;
        let user = self.user_store.require_by_id(&self.db, identity.user_id).await?;

        if !self.password_provider.verify(current_password, &user.password_hash) {
            return Err(AccessError::IncorrectPassword.into());
        }
        self.password_provider.check_policy(new_password)?;

        let password_hash = self.password_provider.hash(new_password)?;
        self.user_store
            .update(
                &self.db,
                user.id,
                UserChanges {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Password changed");

        Ok(())
    }
}
