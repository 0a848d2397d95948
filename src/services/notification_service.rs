use chrono::NaiveDate;
use std::sync::Arc;

use crate::errors::internal::NotificationError;
use crate::errors::InternalError;
use crate::stores::{
    AcademicYearStore, AssignmentStore, CredentialStore, LessonStore, NewNotification,
    NotificationStore,
};
use crate::types::dto::notification::{NotificationType, NotifySgRequest, Priority};
use crate::types::internal::Role;

const LESSON_ENTITY: &str = "lesson";

/// Creates notifications on behalf of the system
#[derive(Debug)]
pub struct NotificationService {
    notification_store: Arc<NotificationStore>,
    academic_year_store: Arc<AcademicYearStore>,
    lesson_store: Arc<LessonStore>,
    assignment_store: Arc<AssignmentStore>,
    credential_store: Arc<CredentialStore>,
}

impl NotificationService {
    pub fn new(
        notification_store: Arc<NotificationStore>,
        academic_year_store: Arc<AcademicYearStore>,
        lesson_store: Arc<LessonStore>,
        assignment_store: Arc<AssignmentStore>,
        credential_store: Arc<CredentialStore>,
    ) -> Self {
        Self {
            notification_store,
            academic_year_store,
            lesson_store,
            assignment_store,
            credential_store,
        }
    }

    /// Send delay notifications for lessons of the active year that are overdue on `today`
    ///
    /// The lesson's teacher and every inspector assigned to that teacher get
    /// one high-priority `delay` notification per lesson. Running the check
    /// again does not duplicate notifications already sent.
    ///
    /// # Returns
    /// Number of notifications created
    pub async fn check_delays(&self, today: NaiveDate) -> Result<u64, InternalError> {
        let Some(year) = self.academic_year_store.active_year().await? else {
            tracing::debug!("No active academic year, skipping delay check");
            return Ok(0);
        };

        let overdue = self.lesson_store.overdue(&year.name, today).await?;
        let mut created = 0u64;

        for lesson in overdue {
            let mut recipients = vec![lesson.teacher_id.clone()];
            recipients.extend(
                self.assignment_store
                    .inspectors_for_teacher(&lesson.teacher_id, &year.name)
                    .await?,
            );

            for recipient in recipients {
                let already_sent = self
                    .notification_store
                    .exists_for_entity(&recipient, NotificationType::Delay, LESSON_ENTITY, lesson.id)
                    .await?;
                if already_sent {
                    continue;
                }

                self.notification_store
                    .create(NewNotification {
                        recipient_id: recipient,
                        notification_type: NotificationType::Delay,
                        title: "Lesson behind schedule".to_string(),
                        message: format!(
                            "\"{}\" was planned for {} and is not completed yet",
                            lesson.title, lesson.planned_date
                        ),
                        priority: Priority::High,
                        entity_type: Some(LESSON_ENTITY.to_string()),
                        entity_id: Some(lesson.id),
                    })
                    .await?;
                created += 1;
            }
        }

        if created > 0 {
            tracing::info!(year = %year.name, created, "Delay notifications sent");
        }
        Ok(created)
    }

    /// Send a reminder to every general supervisor; returns how many were notified
    pub async fn notify_sg(&self, req: NotifySgRequest) -> Result<u64, InternalError> {
        let title = req.title.trim();
        let message = req.message.trim();
        if title.is_empty() || message.is_empty() {
            return Err(NotificationError::Validation("title and message are required".to_string()).into());
        }

        let supervisors = self.credential_store.list_users_by_role(Role::Sg).await?;
        for sg in &supervisors {
            self.notification_store
                .create(NewNotification {
                    recipient_id: sg.id.clone(),
                    notification_type: NotificationType::Reminder,
                    title: title.to_string(),
                    message: message.to_string(),
                    priority: req.priority,
                    entity_type: None,
                    entity_id: None,
                })
                .await?;
        }

        tracing::info!(notified = supervisors.len(), "Supervisors notified");
        Ok(supervisors.len() as u64)
    }
}
