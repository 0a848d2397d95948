use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::fmt;
use uuid::Uuid;

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::dto::auth::RegisterRequest;
use crate::types::internal::Role;

/// Account fields needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hourly_rate: Option<f64>,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            hourly_rate: req.hourly_rate,
        }
    }
}

/// CredentialStore manages user accounts and their password hashes
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Add a new user to the database
    ///
    /// # Returns
    /// * `Ok(Model)` - The created user
    /// * `Err(InternalError)` - DuplicateUsername if the username is taken, or a database/crypto error
    pub async fn add_user(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        if self.find_by_username(&new_user.username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername(new_user.username).into());
        }

        let salt = SaltString::generate(&mut rand_core::OsRng);
        let password_hash = self
            .argon2()?
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();

        let now = Utc::now().timestamp();
        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(new_user.username.clone()),
            password_hash: Set(password_hash),
            role: Set(new_user.role.to_string()),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            email: Set(new_user.email),
            hourly_rate: Set(new_user.hourly_rate),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                InternalError::from(CredentialError::DuplicateUsername(new_user.username.clone()))
            } else {
                InternalError::database("insert_user", e)
            }
        })?;

        tracing::info!(user_id = %created.id, role = %created.role, "User created");
        Ok(created)
    }

    /// Verify user credentials and return the user on success
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| CredentialError::InvalidCredentials)?;

        self.argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| CredentialError::InvalidCredentials)?;

        Ok(user)
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<user::Model, InternalError> {
        User::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))?
            .ok_or_else(|| CredentialError::UserNotFound(user_id.to_string()).into())
    }

    /// All users holding `role`, ordered by username
    pub async fn list_users_by_role(&self, role: Role) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users_by_role", e))
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
