use poem::Request;
use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::api::helpers::authenticated_context;
use crate::errors::AuthError;
use crate::services::AuthService;
use crate::types::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
}

impl AuthApi {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password
    ///
    /// Returns the user fields together with a bearer token.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);
        let response = self
            .auth_service
            .login(&ctx, &body.username, &body.password)
            .await?;
        Ok(Json(response))
    }

    /// End the current session; the token stops working immediately
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        if let Some(user) = &ctx.user {
            self.auth_service.logout(&ctx, user).await?;
        }
        Ok(Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }))
    }

    /// Current user
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserResponse>, AuthError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        let user = ctx.user.as_ref().ok_or_else(AuthError::invalid_token)?;
        Ok(Json(self.auth_service.current_user(user).await?))
    }

    /// Create an account
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(
        &self,
        req: &Request,
        body: Json<RegisterRequest>,
    ) -> Result<Json<UserResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);
        let created = self.auth_service.register(&ctx, body.0).await?;
        Ok(Json(created))
    }
}
