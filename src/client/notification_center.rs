use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientError;
use crate::client::query_cache::{keys, QueryCache};
use crate::types::dto::notification::{NotificationResponse, NotificationType, Priority};

/// How often the unread badge is refreshed
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn unread_count(&self) -> Result<u64, ClientError>;
    async fn list(&self) -> Result<Vec<NotificationResponse>, ClientError>;
    async fn mark_read(&self, id: i32) -> Result<(), ClientError>;
    async fn mark_all_read(&self) -> Result<u64, ClientError>;
    async fn delete(&self, id: i32) -> Result<(), ClientError>;
    async fn check_delays(&self) -> Result<u64, ClientError>;
}

#[async_trait]
impl NotificationGateway for ApiClient {
    async fn unread_count(&self) -> Result<u64, ClientError> {
        self.notification_count().await
    }

    async fn list(&self) -> Result<Vec<NotificationResponse>, ClientError> {
        self.notifications().await
    }

    async fn mark_read(&self, id: i32) -> Result<(), ClientError> {
        self.mark_notification_read(id).await
    }

    async fn mark_all_read(&self) -> Result<u64, ClientError> {
        self.mark_all_notifications_read().await
    }

    async fn delete(&self, id: i32) -> Result<(), ClientError> {
        self.delete_notification(id).await
    }

    async fn check_delays(&self) -> Result<u64, ClientError> {
        ApiClient::check_delays(self).await
    }
}

/// Notification bell: unread badge plus a lazily loaded list
///
/// The badge is polled whether or not the list is open. The list is only
/// fetched while open. Every successful mutation invalidates both, then
/// reloads the badge and, while open, the list.
pub struct NotificationCenter {
    gateway: Arc<dyn NotificationGateway>,
    cache: Arc<QueryCache>,
    open: AtomicBool,
}

impl NotificationCenter {
    pub fn new(gateway: Arc<dyn NotificationGateway>, cache: Arc<QueryCache>) -> Self {
        Self {
            gateway,
            cache,
            open: AtomicBool::new(false),
        }
    }

    /// Run the delay check once and load the badge; failures are ignored
    pub async fn mount(&self) {
        match self.check_delays().await {
            Ok(created) => tracing::debug!(created, "Delay check on mount"),
            Err(e) => {
                tracing::debug!(error = %e, "Delay check on mount failed");
                if let Err(e) = self.refresh_count().await {
                    tracing::debug!(error = %e, "Unread count fetch failed");
                }
            }
        }
    }

    /// Refresh the unread count every `period` until the handle is aborted
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let center = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = center.refresh_count().await {
                    tracing::debug!(error = %e, "Unread count poll failed");
                }
            }
        })
    }

    pub async fn refresh_count(&self) -> Result<u64, ClientError> {
        let gateway = self.gateway.clone();
        self.cache
            .refetch(keys::NOTIFICATION_COUNT, || async move { gateway.unread_count().await })
            .await
    }

    /// Last known unread count
    pub fn unread_count(&self) -> Option<u64> {
        self.cache.get(keys::NOTIFICATION_COUNT)
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Open the list and fetch it; the server's ordering is kept as is
    pub async fn open(&self) -> Result<Vec<NotificationResponse>, ClientError> {
        self.open.store(true, Ordering::SeqCst);
        let gateway = self.gateway.clone();
        self.cache
            .refetch(keys::NOTIFICATIONS, || async move { gateway.list().await })
            .await
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// List as last fetched while open
    pub fn notifications(&self) -> Vec<NotificationResponse> {
        self.cache.get(keys::NOTIFICATIONS).unwrap_or_default()
    }

    pub async fn mark_read(&self, id: i32) -> Result<(), ClientError> {
        self.gateway.mark_read(id).await?;
        self.reload().await;
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<u64, ClientError> {
        let updated = self.gateway.mark_all_read().await?;
        self.reload().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ClientError> {
        self.gateway.delete(id).await?;
        self.reload().await;
        Ok(())
    }

    pub async fn check_delays(&self) -> Result<u64, ClientError> {
        let created = self.gateway.check_delays().await?;
        self.reload().await;
        Ok(created)
    }

    async fn reload(&self) {
        self.cache.invalidate(keys::NOTIFICATION_COUNT);
        self.cache.invalidate(keys::NOTIFICATIONS);

        if let Err(e) = self.refresh_count().await {
            tracing::debug!(error = %e, "Unread count reload failed");
        }
        if self.is_open() {
            let gateway = self.gateway.clone();
            let reloaded = self
                .cache
                .refetch(keys::NOTIFICATIONS, || async move { gateway.list().await })
                .await;
            if let Err(e) = reloaded {
                tracing::debug!(error = %e, "Notification list reload failed");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Neutral,
    Info,
    Warning,
    Danger,
}

pub fn priority_accent(priority: Priority) -> Accent {
    match priority {
        Priority::Low => Accent::Neutral,
        Priority::Normal => Accent::Info,
        Priority::High => Accent::Warning,
        Priority::Urgent => Accent::Danger,
    }
}

/// Icon name shown next to a notification
pub fn type_icon(notification_type: NotificationType) -> &'static str {
    match notification_type {
        NotificationType::Delay => "clock",
        NotificationType::Validation => "check-circle",
        NotificationType::Reminder => "bell",
    }
}
