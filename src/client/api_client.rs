use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::client::error::ClientError;
use crate::client::storage::{KeyValueStorage, AUTH_TOKEN_KEY};
use crate::types::dto::academic_year::{AcademicYearResponse, CreateAcademicYearRequest};
use crate::types::dto::admin::{
    CreateLevelRequest, CreateSubjectRequest, LessonWithDetails, LevelResponse, SubjectResponse,
};
use crate::types::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::types::dto::common::{CountResponse, ErrorResponse, MessageResponse};
use crate::types::dto::notification::{
    DelayCheckResponse, NotificationResponse, NotifySgRequest, NotifySgResponse, ReadAllResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path below the API base, e.g. `/auth/login`
    pub path: String,
    pub bearer_token: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Moves requests to the server and back
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// Transport over HTTP using reqwest
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let url = self.url(&request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Typed client for the EduTrack REST API
///
/// The bearer token lives in the shared storage under `authToken`. Any 401
/// response removes it, which the rest of the client treats as logged out.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    storage: Arc<dyn KeyValueStorage>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("authenticated", &self.token().is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new(base_url)), storage)
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { transport, storage }
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        self.storage.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) {
        self.storage.set(AUTH_TOKEN_KEY, token);
    }

    pub fn clear_token(&self) {
        self.storage.remove(AUTH_TOKEN_KEY);
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let request = HttpRequest {
            method,
            path: path.to_string(),
            bearer_token: self.token(),
            body,
        };

        let response = self.transport.execute(request).await?;

        match response.status {
            200..=299 => {
                let raw = if response.body.trim().is_empty() {
                    "null"
                } else {
                    response.body.as_str()
                };
                Ok(serde_json::from_str(raw)?)
            }
            401 => {
                self.clear_token();
                tracing::debug!(path, "Unauthorized response, token cleared");
                Err(ClientError::Authentication(error_message(&response.body)))
            }
            status => Err(ClientError::Server {
                status,
                message: error_message(&response.body),
            }),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(HttpMethod::Get, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(HttpMethod::Post, path, Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(HttpMethod::Post, path, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(HttpMethod::Delete, path, None).await
    }

    // Auth

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.post("/auth/login", request).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        self.post_empty("/auth/logout").await
    }

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        self.get("/auth/me").await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse, ClientError> {
        self.post("/auth/register", request).await
    }

    // Academic years

    pub async fn academic_years(&self) -> Result<Vec<String>, ClientError> {
        self.get("/academic-years").await
    }

    pub async fn active_academic_year(&self) -> Result<AcademicYearResponse, ClientError> {
        self.get("/academic-years/active").await
    }

    pub async fn create_academic_year(
        &self,
        request: &CreateAcademicYearRequest,
    ) -> Result<AcademicYearResponse, ClientError> {
        self.post("/admin/create-academic-year", request).await
    }

    // Catalog

    pub async fn subjects(&self) -> Result<Vec<SubjectResponse>, ClientError> {
        self.get("/admin/subjects").await
    }

    pub async fn create_subject(&self, request: &CreateSubjectRequest) -> Result<SubjectResponse, ClientError> {
        self.post("/admin/subjects", request).await
    }

    pub async fn levels(&self, academic_year: Option<&str>) -> Result<Vec<LevelResponse>, ClientError> {
        self.get(&year_scoped("/admin/levels", academic_year)).await
    }

    pub async fn create_level(&self, request: &CreateLevelRequest) -> Result<LevelResponse, ClientError> {
        self.post("/admin/levels", request).await
    }

    pub async fn lessons(&self, academic_year: Option<&str>) -> Result<Vec<LessonWithDetails>, ClientError> {
        self.get(&year_scoped("/admin/lessons", academic_year)).await
    }

    // Notifications

    pub async fn notifications(&self) -> Result<Vec<NotificationResponse>, ClientError> {
        self.get("/notifications").await
    }

    pub async fn notification_count(&self) -> Result<u64, ClientError> {
        let response: CountResponse = self.get("/notifications/count").await?;
        Ok(response.count)
    }

    pub async fn mark_notification_read(&self, id: i32) -> Result<(), ClientError> {
        let _: MessageResponse = self.post_empty(&format!("/notifications/{}/read", id)).await?;
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self) -> Result<u64, ClientError> {
        let response: ReadAllResponse = self.post_empty("/notifications/read-all").await?;
        Ok(response.updated)
    }

    pub async fn delete_notification(&self, id: i32) -> Result<(), ClientError> {
        let _: MessageResponse = self.delete(&format!("/notifications/{}", id)).await?;
        Ok(())
    }

    pub async fn check_delays(&self) -> Result<u64, ClientError> {
        let response: DelayCheckResponse = self.post_empty("/notifications/check-delays").await?;
        Ok(response.created)
    }

    pub async fn notify_sg(&self, request: &NotifySgRequest) -> Result<u64, ClientError> {
        let response: NotifySgResponse = self.post("/notify-sg", request).await?;
        Ok(response.notified)
    }
}

/// Append the `academicYear` filter when one is selected
pub fn year_scoped(path: &str, academic_year: Option<&str>) -> String {
    match academic_year.map(str::trim).filter(|y| !y.is_empty()) {
        Some(year) => format!("{}?academicYear={}", path, year),
        None => path.to_string(),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}
