use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::internal::CatalogError;
use crate::errors::InternalError;
use crate::types::db::{level, subject};
use crate::types::dto::admin::{CreateLevelRequest, CreateSubjectRequest};

/// Trim a required text field, failing when nothing is left
fn required(field: &str, value: &str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// CatalogStore manages subjects (shared across years) and levels (per year)
#[derive(Debug)]
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_subjects(&self) -> Result<Vec<subject::Model>, InternalError> {
        subject::Entity::find()
            .order_by_asc(subject::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_subjects", e))
    }

    /// Create a subject; the code is stored uppercased and must be unique
    pub async fn create_subject(
        &self,
        req: CreateSubjectRequest,
    ) -> Result<subject::Model, InternalError> {
        let name = required("name", &req.name)?;
        let code = required("code", &req.code)?.to_uppercase();
        let description = req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let existing = subject::Entity::find()
            .filter(subject::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_subject_by_code", e))?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateCode(code).into());
        }

        let created = subject::ActiveModel {
            name: Set(name),
            code: Set(code),
            description: Set(description),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_subject", e))?;

        tracing::info!(subject_id = created.id, code = %created.code, "Subject created");
        Ok(created)
    }

    pub async fn list_levels(&self, academic_year: &str) -> Result<Vec<level::Model>, InternalError> {
        level::Entity::find()
            .filter(level::Column::AcademicYear.eq(academic_year))
            .order_by_asc(level::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_levels", e))
    }

    /// Create a level in `academic_year`; the code is unique within that year
    pub async fn create_level(
        &self,
        req: CreateLevelRequest,
        academic_year: &str,
    ) -> Result<level::Model, InternalError> {
        let name = required("name", &req.name)?;
        let code = required("code", &req.code)?.to_uppercase();

        let existing = level::Entity::find()
            .filter(level::Column::AcademicYear.eq(academic_year))
            .filter(level::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_level_by_code", e))?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateCode(code).into());
        }

        let created = level::ActiveModel {
            name: Set(name),
            code: Set(code),
            category: Set(req.category.as_str().to_string()),
            academic_year: Set(academic_year.to_string()),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_level", e))?;

        tracing::info!(level_id = created.id, year = academic_year, "Level created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;
    use crate::types::dto::admin::LevelCategory;

    fn subject_req(name: &str, code: &str) -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: name.to_string(),
            code: code.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_subject_code_is_trimmed_and_uppercased() {
        let store = CatalogStore::new(setup_test_db().await);
        let created = store
            .create_subject(subject_req(" Mathématiques ", " math "))
            .await
            .unwrap();

        assert_eq!(created.name, "Mathématiques");
        assert_eq!(created.code, "MATH");
    }

    #[tokio::test]
    async fn test_duplicate_subject_code_conflicts() {
        let store = CatalogStore::new(setup_test_db().await);
        store.create_subject(subject_req("Maths", "MATH")).await.unwrap();

        let result = store.create_subject(subject_req("Maths bis", "math")).await;
        assert!(matches!(
            result,
            Err(InternalError::Catalog(CatalogError::DuplicateCode(ref c))) if c == "MATH"
        ));
    }

    #[tokio::test]
    async fn test_subject_requires_name_and_code() {
        let store = CatalogStore::new(setup_test_db().await);

        assert!(matches!(
            store.create_subject(subject_req("", "MATH")).await,
            Err(InternalError::Catalog(CatalogError::Validation(_)))
        ));
        assert!(matches!(
            store.create_subject(subject_req("Maths", "   ")).await,
            Err(InternalError::Catalog(CatalogError::Validation(_)))
        ));
        assert!(store.list_subjects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_levels_are_scoped_to_their_year() {
        let store = CatalogStore::new(setup_test_db().await);
        let req = CreateLevelRequest {
            name: "Sixième".to_string(),
            code: "6e".to_string(),
            category: LevelCategory::College,
        };

        let created = store.create_level(req.clone(), "2024-2025").await.unwrap();
        assert_eq!(created.code, "6E");
        assert_eq!(created.category, "collège");

        // Same code is fine in another year, not in the same one
        store.create_level(req.clone(), "2025-2026").await.unwrap();
        assert!(matches!(
            store.create_level(req, "2024-2025").await,
            Err(InternalError::Catalog(CatalogError::DuplicateCode(_)))
        ));

        assert_eq!(store.list_levels("2024-2025").await.unwrap().len(), 1);
        assert!(store.list_levels("2023-2024").await.unwrap().is_empty());
    }
}
