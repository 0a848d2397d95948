use std::net::IpAddr;

use poem::Request;
use uuid::Uuid;

use super::auth::AuthenticatedUser;

/// Request context that flows through all layers
///
/// Carries what is needed for logging across API, service, and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: Uuid,

    /// Set once the bearer token has been accepted
    pub user: Option<AuthenticatedUser>,

    /// Actor who initiated the operation, used in log lines
    pub actor_id: String,
}

impl RequestContext {
    /// Create a RequestContext for an HTTP request
    pub fn from_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            request_id: Uuid::new_v4(),
            user: None,
            actor_id: "anonymous".to_string(),
        }
    }

    /// Create a RequestContext for CLI or startup operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: Uuid::new_v4(),
            user: None,
            actor_id: format!("system:{}", operation_name),
        }
    }

    pub fn with_user(mut self, user: AuthenticatedUser) -> Self {
        self.actor_id = user.user_id.clone();
        self.user = Some(user);
        self
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}
