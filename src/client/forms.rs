use async_trait::async_trait;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientError;
use crate::client::query_cache::{keys, QueryCache};
use crate::types::dto::admin::{
    CreateLevelRequest, CreateSubjectRequest, LevelCategory, LevelResponse, SubjectResponse,
};

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn create_subject(&self, request: &CreateSubjectRequest) -> Result<SubjectResponse, ClientError>;
    async fn create_level(&self, request: &CreateLevelRequest) -> Result<LevelResponse, ClientError>;
}

#[async_trait]
impl CatalogGateway for ApiClient {
    async fn create_subject(&self, request: &CreateSubjectRequest) -> Result<SubjectResponse, ClientError> {
        ApiClient::create_subject(self, request).await
    }

    async fn create_level(&self, request: &CreateLevelRequest) -> Result<LevelResponse, ClientError> {
        ApiClient::create_level(self, request).await
    }
}

fn required(value: &str, field: &str) -> Result<String, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ClientError::validation(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Form adding a subject to the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectForm {
    pub name: String,
    pub code: String,
    pub description: String,
}

impl SubjectForm {
    pub fn validate(&self) -> Result<CreateSubjectRequest, ClientError> {
        let description = self.description.trim();
        Ok(CreateSubjectRequest {
            name: required(&self.name, "Name")?,
            code: required(&self.code, "Code")?.to_uppercase(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }

    /// Create the subject; the form is cleared only on success
    pub async fn submit(
        &mut self,
        gateway: &dyn CatalogGateway,
        cache: &QueryCache,
    ) -> Result<SubjectResponse, ClientError> {
        let request = self.validate()?;
        let created = gateway.create_subject(&request).await?;
        cache.invalidate(keys::SUBJECTS);
        *self = Self::default();
        Ok(created)
    }
}

/// Form adding a level to the active academic year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelForm {
    pub name: String,
    pub code: String,
    pub category: Option<LevelCategory>,
}

impl LevelForm {
    pub fn validate(&self) -> Result<CreateLevelRequest, ClientError> {
        let name = required(&self.name, "Name")?;
        let code = required(&self.code, "Code")?.to_uppercase();
        let category = self
            .category
            .ok_or_else(|| ClientError::validation("Category is required"))?;

        Ok(CreateLevelRequest { name, code, category })
    }

    pub async fn submit(
        &mut self,
        gateway: &dyn CatalogGateway,
        cache: &QueryCache,
    ) -> Result<LevelResponse, ClientError> {
        let request = self.validate()?;
        let created = gateway.create_level(&request).await?;
        cache.invalidate_prefix(keys::LEVELS);
        *self = Self::default();
        Ok(created)
    }
}
