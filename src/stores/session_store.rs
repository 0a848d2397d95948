use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::types::db::session::{self, ActiveModel, Entity as Session};

/// SessionStore tracks which issued tokens are still honored
///
/// A session row is created at login and deleted at logout. Tokens whose
/// session row is gone are rejected even if their signature is still valid.
#[derive(Debug)]
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        session_id: &str,
        user_id: &str,
        expires_at: i64,
    ) -> Result<session::Model, InternalError> {
        let model = ActiveModel {
            id: Set(session_id.to_string()),
            user_id: Set(user_id.to_string()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_session", e))
    }

    /// Look up a session that exists, belongs to `user_id` and has not expired
    pub async fn find_active(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<session::Model, InternalError> {
        let session = Session::find_by_id(session_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session", e))?
            .ok_or_else(|| CredentialError::SessionNotFound(session_id.to_string()))?;

        if session.user_id != user_id {
            return Err(CredentialError::SessionNotFound(session_id.to_string()).into());
        }
        if session.expires_at <= Utc::now().timestamp() {
            return Err(CredentialError::ExpiredToken.into());
        }

        Ok(session)
    }

    /// Delete a session. Returns whether a row was removed.
    pub async fn revoke(&self, session_id: &str) -> Result<bool, InternalError> {
        let result = Session::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Remove every session past its expiry
    pub async fn purge_expired(&self) -> Result<u64, InternalError> {
        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lte(Utc::now().timestamp()))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("purge_expired_sessions", e))?;

        Ok(result.rows_affected)
    }
}
