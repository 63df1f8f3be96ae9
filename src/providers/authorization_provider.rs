use crate::errors::internal::{AccessError, UserError};
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::auth::Identity;
use crate::types::internal::context::RequestContext;

/// Allow/deny decisions for authenticated-only and admin-only operations
///
/// Pure predicates over the identity carried in the request context; no
/// store access happens here.
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// DENY "not authenticated" when no identity is present
    pub fn require_authenticated(ctx: &RequestContext) -> Result<&Identity, InternalError> {
        ctx.identity
            .as_ref()
            .ok_or(InternalError::Access(AccessError::Unauthenticated))
    }

    /// DENY "not authenticated" when absent, "forbidden" when not an admin
    pub fn require_admin(ctx: &RequestContext) -> Result<&Identity, InternalError> {
        let identity = Self::require_authenticated(ctx)?;
        if !identity.is_admin {
            tracing::warn!(
                request_id = %ctx.request_id,
                user_id = identity.user_id,
                "Admin-only operation attempted by non-admin"
            );
            return Err(AccessError::forbidden("admin privileges required").into());
        }
        Ok(identity)
    }

    /// Caller is the owner of the resource or an admin
    pub fn is_owner_or_admin(identity: &Identity, owner_id: Option<i32>) -> bool {
        identity.is_admin || owner_id == Some(identity.user_id)
    }

    /// The protected bootstrap admin cannot be demoted or deleted
    pub fn ensure_not_protected(target: &user::Model, action: &'static str) -> Result<(), InternalError> {
        if target.is_protected {
            return Err(UserError::ProtectedUser {
                user_id: target.id,
                action,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn identity(user_id: i32, is_admin: bool) -> Identity {
        Identity {
            user_id,
            username: format!("user{}", user_id),
            is_admin,
        }
    }

    fn user_row(id: i32, is_protected: bool) -> user::Model {
        user::Model {
            id,
            username: "admin".to_string(),
            username_normalized: "admin".to_string(),
            email: "admin@coursehub.local".to_string(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            is_admin: true,
            is_protected,
            has_unread_messages: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_anonymous_denied_as_unauthenticated() {
        let ctx = RequestContext::for_api(None);

        let err = AuthorizationGate::require_authenticated(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        let err = AuthorizationGate::require_admin(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_non_admin_forbidden_for_admin_operations() {
        let ctx = RequestContext::for_api(None).with_identity(identity(5, false));

        assert_eq!(AuthorizationGate::require_authenticated(&ctx).unwrap().user_id, 5);
        let err = AuthorizationGate::require_admin(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_admin_allowed() {
        let ctx = RequestContext::for_api(None).with_identity(identity(1, true));
        assert!(AuthorizationGate::require_admin(&ctx).is_ok());
    }

    #[test]
    fn test_owner_or_admin() {
        assert!(AuthorizationGate::is_owner_or_admin(&identity(3, false), Some(3)));
        assert!(!AuthorizationGate::is_owner_or_admin(&identity(3, false), Some(4)));
        assert!(!AuthorizationGate::is_owner_or_admin(&identity(3, false), None));
        assert!(AuthorizationGate::is_owner_or_admin(&identity(1, true), None));
    }

    #[test]
    fn test_protected_user_rejected() {
        let err = AuthorizationGate::ensure_not_protected(&user_row(1, true), "deleted").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtectedResource);
        assert!(AuthorizationGate::ensure_not_protected(&user_row(2, false), "deleted").is_ok());
    }
}
