use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::notification;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Delay,
    Validation,
    Reminder,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Delay => "delay",
            NotificationType::Validation => "validation",
            NotificationType::Reminder => "reminder",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "delay" => Some(NotificationType::Delay),
            "validation" => Some(NotificationType::Validation),
            "reminder" => Some(NotificationType::Reminder),
            _ => None,
        }
    }
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "low" => Some(Priority::Low),
            "normal" => Some(Priority::Normal),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i32,
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub priority: Priority,
    /// ISO 8601 timestamp
    pub created_at: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
}

impl NotificationResponse {
    /// Rows with an unknown type or priority fall back to reminder/normal
    pub fn from_model(model: notification::Model) -> Self {
        let created_at = chrono::DateTime::from_timestamp(model.created_at, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();

        Self {
            id: model.id,
            notification_type: NotificationType::parse(&model.notification_type)
                .unwrap_or(NotificationType::Reminder),
            title: model.title,
            message: model.message,
            is_read: model.is_read,
            priority: Priority::parse(&model.priority).unwrap_or_default(),
            created_at,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
        }
    }
}

/// Request body for notifying every general supervisor
#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySgRequest {
    pub title: String,
    pub message: String,
    #[oai(default)]
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Object, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySgResponse {
    pub notified: u64,
}

#[derive(Object, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayCheckResponse {
    pub created: u64,
}

#[derive(Object, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}
