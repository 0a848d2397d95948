use chrono::Utc;
use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::api::helpers::{authenticated_context, caller};
use crate::errors::ApiError;
use crate::services::{AuthService, NotificationService};
use crate::stores::NotificationStore;
use crate::types::dto::common::{CountResponse, MessageResponse};
use crate::types::dto::notification::{
    DelayCheckResponse, NotificationResponse, NotifySgRequest, NotifySgResponse, ReadAllResponse,
};

/// Notification inbox of the authenticated user
pub struct NotificationApi {
    auth_service: Arc<AuthService>,
    notification_store: Arc<NotificationStore>,
    notification_service: Arc<NotificationService>,
}

impl NotificationApi {
    pub fn new(
        auth_service: Arc<AuthService>,
        notification_store: Arc<NotificationStore>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            auth_service,
            notification_store,
            notification_service,
        }
    }
}

#[derive(Tags)]
enum NotificationTags {
    /// Notification inbox
    Notifications,
}

#[OpenApi]
impl NotificationApi {
    /// Caller's notifications, newest first
    #[oai(path = "/notifications", method = "get", tag = "NotificationTags::Notifications")]
    async fn list(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        let user = caller(&ctx)?;

        let rows = self.notification_store.list_for(&user.user_id).await?;
        Ok(Json(rows.into_iter().map(NotificationResponse::from_model).collect()))
    }

    /// Number of unread notifications
    #[oai(path = "/notifications/count", method = "get", tag = "NotificationTags::Notifications")]
    async fn count(&self, req: &Request, auth: BearerAuth) -> Result<Json<CountResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        let user = caller(&ctx)?;

        let count = self.notification_store.count_unread(&user.user_id).await?;
        Ok(Json(CountResponse { count }))
    }

    #[oai(path = "/notifications/:id/read", method = "post", tag = "NotificationTags::Notifications")]
    async fn mark_read(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        let user = caller(&ctx)?;

        self.notification_store.mark_read(id.0, &user.user_id).await?;
        Ok(Json(MessageResponse {
            message: "Notification marked as read".to_string(),
        }))
    }

    #[oai(path = "/notifications/read-all", method = "post", tag = "NotificationTags::Notifications")]
    async fn mark_all_read(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<ReadAllResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        let user = caller(&ctx)?;

        let updated = self.notification_store.mark_all_read(&user.user_id).await?;
        Ok(Json(ReadAllResponse { updated }))
    }

    #[oai(path = "/notifications/:id", method = "delete", tag = "NotificationTags::Notifications")]
    async fn delete(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        let user = caller(&ctx)?;

        self.notification_store.delete(id.0, &user.user_id).await?;
        Ok(Json(MessageResponse {
            message: "Notification deleted".to_string(),
        }))
    }

    /// Scan the active year for overdue lessons and notify their teachers and inspectors
    #[oai(path = "/notifications/check-delays", method = "post", tag = "NotificationTags::Notifications")]
    async fn check_delays(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<DelayCheckResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        caller(&ctx)?;

        let created = self
            .notification_service
            .check_delays(Utc::now().date_naive())
            .await?;
        Ok(Json(DelayCheckResponse { created }))
    }

    /// Send a reminder to every general supervisor
    #[oai(path = "/notify-sg", method = "post", tag = "NotificationTags::Notifications")]
    async fn notify_sg(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<NotifySgRequest>,
    ) -> Result<Json<NotifySgResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        let user = caller(&ctx)?;

        let notified = self.notification_service.notify_sg(body.0).await?;
        tracing::info!(request_id = %ctx.request_id, sender = %user.user_id, notified, "SG reminder sent");
        Ok(Json(NotifySgResponse { notified }))
    }
}
