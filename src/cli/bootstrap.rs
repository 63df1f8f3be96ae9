// Bootstrap command implementation
// Ensures the protected admin account exists

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::context::RequestContext;
use crate::types::internal::user::NewUser;

/// What `ensure_protected_admin` did
#[derive(Debug)]
pub enum BootstrapOutcome {
    AlreadyPresent(user::Model),
    Created {
        user: user::Model,
        /// Set only when the password was generated; shown to the operator once
        generated_password: Option<String>,
    },
}

/// Create the protected admin unless one already exists
///
/// Without a configured password a random one is generated and returned.
pub async fn ensure_protected_admin(
    app_data: &AppData,
    username: &str,
    email: &str,
    password: Option<&str>,
) -> Result<BootstrapOutcome, InternalError> {
    let ctx = RequestContext::for_cli("bootstrap-admin");

    if let Some(existing) = app_data.user_store.get_protected(&app_data.db).await? {
        tracing::debug!(request_id = %ctx.request_id, user_id = existing.id, "Protected admin already present");
        return Ok(BootstrapOutcome::AlreadyPresent(existing));
    }

    let (password, generated_password) = match password {
        Some(password) => {
            app_data.password_provider.check_policy(password)?;
            (password.to_string(), None)
        }
        None => {
            let generated = app_data.password_provider.generate_secure_password();
            (generated.clone(), Some(generated))
        }
    };

    let user = app_data
        .user_store
        .create(
            &app_data.db,
            NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: app_data.password_provider.hash(&password)?,
                first_name: None,
                last_name: None,
                is_admin: true,
                is_protected: true,
            },
        )
        .await?;

    tracing::info!(
        request_id = %ctx.request_id,
        actor = %ctx.actor_id,
        user_id = user.id,
        username = %user.username,
        "Protected admin created"
    );

    Ok(BootstrapOutcome::Created { user, generated_password })
}

/// Print the outcome for the operator
pub fn report(outcome: &BootstrapOutcome) {
    match outcome {
        BootstrapOutcome::AlreadyPresent(user) => {
            println!("Protected admin '{}' already exists (id {})", user.username, user.id);
        }
        BootstrapOutcome::Created { user, generated_password } => {
            println!("Created protected admin '{}' (id {})", user.username, user.id);
            if let Some(password) = generated_password {
                println!();
                println!("  Generated password: {}", password);
                println!("  Store it now; it will not be shown again.");
                println!();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_creates_once_with_generated_password() {
        let app_data = setup_test_app_data().await;

        let outcome = ensure_protected_admin(&app_data, "admin", "admin@coursehub.local", None)
            .await
            .unwrap();
        let BootstrapOutcome::Created { user, generated_password } = outcome else {
            panic!("expected a new admin");
        };
        assert!(user.is_admin);
        assert!(user.is_protected);
        let password = generated_password.unwrap();
        assert!(app_data.password_provider.verify(&password, &user.password_hash));

        let again = ensure_protected_admin(&app_data, "admin", "admin@coursehub.local", None)
            .await
            .unwrap();
        assert!(matches!(again, BootstrapOutcome::AlreadyPresent(ref u) if u.id == user.id));
        assert_eq!(app_data.user_store.count(&app_data.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_configured_password_is_used() {
        let app_data = setup_test_app_data().await;

        let outcome = ensure_protected_admin(&app_data, "root", "root@example.com", Some("configured-pass"))
            .await
            .unwrap();
        let BootstrapOutcome::Created { user, generated_password } = outcome else {
            panic!("expected a new admin");
        };
        assert!(generated_password.is_none());
        assert!(app_data.password_provider.verify("configured-pass", &user.password_hash));
    }

    #[tokio::test]
    async fn test_weak_configured_password_rejected() {
        let app_data = setup_test_app_data().await;
        let err = ensure_protected_admin(&app_data, "root", "root@example.com", Some("weak"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
