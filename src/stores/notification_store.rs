use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::internal::NotificationError;
use crate::errors::InternalError;
use crate::types::db::notification::{self, ActiveModel, Entity as Notification};
use crate::types::dto::notification::{NotificationType, Priority};

/// Fields of a notification about to be sent
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
}

/// NotificationStore holds each user's notification inbox
///
/// Every read and mutation is scoped to a recipient; a notification that
/// belongs to someone else behaves as if it did not exist.
#[derive(Debug)]
pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Notifications of `recipient_id`, newest first
    pub async fn list_for(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<notification::Model>, InternalError> {
        Notification::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_notifications", e))
    }

    pub async fn count_unread(&self, recipient_id: &str) -> Result<u64, InternalError> {
        Notification::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_unread_notifications", e))
    }

    pub async fn create(&self, new: NewNotification) -> Result<notification::Model, InternalError> {
        ActiveModel {
            recipient_id: Set(new.recipient_id),
            notification_type: Set(new.notification_type.as_str().to_string()),
            title: Set(new.title),
            message: Set(new.message),
            is_read: Set(false),
            priority: Set(new.priority.as_str().to_string()),
            entity_type: Set(new.entity_type),
            entity_id: Set(new.entity_id),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_notification", e))
    }

    /// Whether `recipient_id` already has a notification of this type about this entity
    pub async fn exists_for_entity(
        &self,
        recipient_id: &str,
        notification_type: NotificationType,
        entity_type: &str,
        entity_id: i32,
    ) -> Result<bool, InternalError> {
        let count = Notification::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::NotificationType.eq(notification_type.as_str()))
            .filter(notification::Column::EntityType.eq(entity_type))
            .filter(notification::Column::EntityId.eq(entity_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("find_notification_for_entity", e))?;

        Ok(count > 0)
    }

    async fn find_owned(
        &self,
        id: i32,
        recipient_id: &str,
    ) -> Result<notification::Model, InternalError> {
        Notification::find_by_id(id)
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_notification", e))?
            .ok_or_else(|| NotificationError::NotFound(id).into())
    }

    pub async fn mark_read(&self, id: i32, recipient_id: &str) -> Result<(), InternalError> {
        let found = self.find_owned(id, recipient_id).await?;
        if found.is_read {
            return Ok(());
        }

        let mut active: ActiveModel = found.into();
        active.is_read = Set(true);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("mark_notification_read", e))?;
        Ok(())
    }

    /// Mark every unread notification of `recipient_id` as read; returns how many changed
    pub async fn mark_all_read(&self, recipient_id: &str) -> Result<u64, InternalError> {
        let result = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("mark_all_notifications_read", e))?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, id: i32, recipient_id: &str) -> Result<(), InternalError> {
        let result = Notification::delete_many()
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_notification", e))?;

        if result.rows_affected == 0 {
            return Err(NotificationError::NotFound(id).into());
        }
        Ok(())
    }
}
