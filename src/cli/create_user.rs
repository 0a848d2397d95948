use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::stores::{CredentialStore, NewUser};
use crate::types::db::user;

/// Create an account from the command line
///
/// Applies the same required-field rules as registration over HTTP.
pub async fn create_user(
    credential_store: &CredentialStore,
    new_user: NewUser,
) -> Result<user::Model, InternalError> {
    if new_user.username.trim().is_empty() || new_user.password.is_empty() {
        return Err(CredentialError::Validation("username and password are required".to_string()).into());
    }

    let created = credential_store.add_user(new_user).await?;
    tracing::info!(user_id = %created.id, "Account created from CLI");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_user, setup_test_db, TEST_PEPPER};
    use crate::types::internal::Role;

    #[tokio::test]
    async fn test_create_user_from_cli() {
        let store = CredentialStore::new(setup_test_db().await, TEST_PEPPER.to_string());
        let created = create_user(&store, new_user("cli-admin", "long-password", Role::Admin))
            .await
            .unwrap();
        assert_eq!(created.role, "admin");
    }

    #[tokio::test]
    async fn test_create_user_requires_password() {
        let store = CredentialStore::new(setup_test_db().await, TEST_PEPPER.to_string());
        let result = create_user(&store, new_user("cli-admin", "", Role::Admin)).await;
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::Validation(_)))
        ));
    }
}
