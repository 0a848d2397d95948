use poem::Request;

use crate::api::auth::BearerAuth;
use crate::errors::{ApiError, InternalError};
use crate::services::AuthService;
use crate::types::internal::{AuthenticatedUser, RequestContext, Role};

/// Build a RequestContext for a bearer-authenticated request
///
/// Fails when the token is malformed, expired, or its session was revoked.
pub async fn authenticated_context(
    auth_service: &AuthService,
    req: &Request,
    auth: &BearerAuth,
) -> Result<RequestContext, InternalError> {
    let ctx = RequestContext::from_request(req);
    match auth_service.authenticate(&auth.0.token).await {
        Ok(user) => Ok(ctx.with_user(user)),
        Err(err) => {
            tracing::debug!(
                request_id = %ctx.request_id,
                ip = ?ctx.ip_address,
                "Rejected bearer token: {}",
                err
            );
            Err(err)
        }
    }
}

/// Require the authenticated caller to hold one of `roles`
pub fn require_role<'a>(
    ctx: &'a RequestContext,
    roles: &[Role],
) -> Result<&'a AuthenticatedUser, ApiError> {
    let user = ctx
        .user
        .as_ref()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !user.has_any_role(roles) {
        tracing::warn!(
            request_id = %ctx.request_id,
            user_id = %user.user_id,
            role = %user.role,
            "Role not allowed for operation"
        );
        return Err(ApiError::forbidden());
    }

    Ok(user)
}

/// Authenticated caller of a context built by [`authenticated_context`]
pub fn caller(ctx: &RequestContext) -> Result<&AuthenticatedUser, ApiError> {
    require_role(ctx, &Role::ALL)
}
