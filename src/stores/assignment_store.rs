use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::types::db::{inspector_assignment, teacher_enrollment};

/// AssignmentStore records who teaches and who inspects whom in each year
#[derive(Debug)]
pub struct AssignmentStore {
    db: DatabaseConnection,
}

impl AssignmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn enroll_teacher(
        &self,
        teacher_id: &str,
        academic_year: &str,
    ) -> Result<teacher_enrollment::Model, InternalError> {
        teacher_enrollment::ActiveModel {
            teacher_id: Set(teacher_id.to_string()),
            academic_year: Set(academic_year.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_teacher_enrollment", e))
    }

    pub async fn assign_inspector(
        &self,
        inspector_id: &str,
        teacher_id: &str,
        academic_year: &str,
    ) -> Result<inspector_assignment::Model, InternalError> {
        inspector_assignment::ActiveModel {
            inspector_id: Set(inspector_id.to_string()),
            teacher_id: Set(teacher_id.to_string()),
            academic_year: Set(academic_year.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_inspector_assignment", e))
    }

    /// Ids of the inspectors following `teacher_id` in `academic_year`, without duplicates
    pub async fn inspectors_for_teacher(
        &self,
        teacher_id: &str,
        academic_year: &str,
    ) -> Result<Vec<String>, InternalError> {
        let rows = inspector_assignment::Entity::find()
            .filter(inspector_assignment::Column::TeacherId.eq(teacher_id))
            .filter(inspector_assignment::Column::AcademicYear.eq(academic_year))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_inspectors_for_teacher", e))?;

        let mut ids: Vec<String> = rows.into_iter().map(|r| r.inspector_id).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
