use std::sync::Arc;

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::services::TokenService;
use crate::stores::{CredentialStore, NewUser, SessionStore};
use crate::types::dto::auth::{LoginResponse, RegisterRequest, UserResponse};
use crate::types::internal::{AuthenticatedUser, RequestContext, Role};

/// Authentication service that orchestrates login, logout and registration
///
/// Coordinates CredentialStore, SessionStore and TokenService. Every issued
/// token is backed by a session row; `authenticate` checks both.
#[derive(Debug)]
pub struct AuthService {
    credential_store: Arc<CredentialStore>,
    session_store: Arc<SessionStore>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        credential_store: Arc<CredentialStore>,
        session_store: Arc<SessionStore>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            credential_store,
            session_store,
            token_service,
        }
    }

    /// Verify credentials, open a session and issue its token
    ///
    /// # Returns
    /// * `Ok(LoginResponse)` - The user fields plus the bearer token
    /// * `Err(InternalError)` - `CredentialError::InvalidCredentials` for an unknown user or wrong password
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, InternalError> {
        let user = match self.credential_store.verify_credentials(username, password).await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    ip = ?ctx.ip_address,
                    "Login failed: {}",
                    err
                );
                return Err(err);
            }
        };

        let role = user
            .role
            .parse::<Role>()
            .map_err(|e| InternalError::parse("role", e.to_string()))?;

        let session_id = self.token_service.generate_session_id();
        let expires_at = self.token_service.session_expiration();
        self.session_store.create(&session_id, &user.id, expires_at).await?;
        let token = self
            .token_service
            .issue_token(&user.id, role, &session_id, expires_at)?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user.id,
            role = %role,
            "Login succeeded"
        );

        Ok(LoginResponse::new(UserResponse::from(user), token))
    }

    /// Revoke the session behind the caller's token
    pub async fn logout(
        &self,
        ctx: &RequestContext,
        user: &AuthenticatedUser,
    ) -> Result<(), InternalError> {
        let removed = self.session_store.revoke(&user.session_id).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user.user_id,
            removed,
            "Logout"
        );
        Ok(())
    }

    /// Create an account. Registration is open to any caller.
    pub async fn register(
        &self,
        ctx: &RequestContext,
        req: RegisterRequest,
    ) -> Result<UserResponse, InternalError> {
        let missing: Vec<&str> = [
            ("username", req.username.as_str()),
            ("password", req.password.as_str()),
            ("firstName", req.first_name.as_str()),
            ("lastName", req.last_name.as_str()),
            ("email", req.email.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(CredentialError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ))
            .into());
        }

        let mut new_user = NewUser::from(req);
        new_user.username = new_user.username.trim().to_string();
        let created = self.credential_store.add_user(new_user).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %created.id,
            "Account registered"
        );
        Ok(UserResponse::from(created))
    }

    /// Accept a bearer token: signature, expiry, known role and a live session
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, InternalError> {
        let claims = self.token_service.validate_token(token)?;

        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| CredentialError::InvalidToken(format!("unknown role {}", claims.role)))?;

        self.session_store.find_active(&claims.sid, &claims.sub).await?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            role,
            session_id: claims.sid,
        })
    }

    pub async fn current_user(&self, user: &AuthenticatedUser) -> Result<UserResponse, InternalError> {
        let model = self.credential_store.get_user_by_id(&user.user_id).await?;
        Ok(UserResponse::from(model))
    }
}
