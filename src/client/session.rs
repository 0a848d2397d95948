use std::sync::Arc;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientError;
use crate::client::query_cache::QueryCache;
use crate::types::dto::auth::{LoginRequest, UserResponse};
use crate::types::internal::DashboardRoute;

/// Signed-in state of the dashboard
#[derive(Debug)]
pub struct Session {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    user: Option<UserResponse>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self {
            client,
            cache,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&UserResponse> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.client.token().is_some()
    }

    /// Where the current user lands; `/login` when signed out
    pub fn dashboard(&self) -> DashboardRoute {
        match &self.user {
            Some(user) => user.dashboard(),
            None => DashboardRoute::Unrecognized,
        }
    }

    /// Sign in, store the token and return the dashboard for the user's role
    pub async fn login(&mut self, username: &str, password: &str) -> Result<DashboardRoute, ClientError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("Username and password are required"));
        }

        let response = self
            .client
            .login(&LoginRequest {
                username: username.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        let (user, token) = response.into_parts();
        self.client.set_token(&token);
        self.cache.invalidate_all();

        let route = user.dashboard();
        tracing::debug!(username = %user.username, route = route.path(), "Signed in");
        self.user = Some(user);
        Ok(route)
    }

    /// Sign out locally even when the server call fails
    pub async fn logout(&mut self) {
        if self.client.token().is_some() {
            if let Err(e) = self.client.logout().await {
                tracing::debug!(error = %e, "Logout request failed");
            }
        }
        self.client.clear_token();
        self.cache.invalidate_all();
        self.user = None;
    }

    /// Resolve the stored token into a user, e.g. after a restart
    ///
    /// Without a stored token no request is made.
    pub async fn current_user(&mut self) -> Result<&UserResponse, ClientError> {
        if self.client.token().is_none() {
            self.user = None;
            return Err(ClientError::Authentication("Not signed in".to_string()));
        }

        match self.client.me().await {
            Ok(user) => Ok(self.user.insert(user)),
            Err(e) => {
                if e.is_authentication() {
                    self.user = None;
                }
                Err(e)
            }
        }
    }
}
