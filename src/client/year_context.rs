use async_trait::async_trait;
use std::sync::Arc;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientError;
use crate::client::query_cache::QueryCache;
use crate::client::storage::{KeyValueStorage, SELECTED_YEAR_KEY};
use crate::types::dto::academic_year::{AcademicYearResponse, CreateAcademicYearRequest};

/// Year selected before anything has been chosen or fetched
pub const DEFAULT_ACADEMIC_YEAR: &str = "2024-2025";

/// Server operations on academic years used by the context and the wizard
#[async_trait]
pub trait AcademicYearGateway: Send + Sync {
    async fn list_years(&self) -> Result<Vec<String>, ClientError>;

    async fn create_year(
        &self,
        request: &CreateAcademicYearRequest,
    ) -> Result<AcademicYearResponse, ClientError>;
}

#[async_trait]
impl AcademicYearGateway for ApiClient {
    async fn list_years(&self) -> Result<Vec<String>, ClientError> {
        self.academic_years().await
    }

    async fn create_year(
        &self,
        request: &CreateAcademicYearRequest,
    ) -> Result<AcademicYearResponse, ClientError> {
        self.create_academic_year(request).await
    }
}

/// The academic year every year-scoped view filters on
///
/// Passed explicitly to the components that need it. Every change is
/// written to storage right away and drops the whole query cache.
pub struct AcademicYearContext {
    storage: Arc<dyn KeyValueStorage>,
    cache: Arc<QueryCache>,
    selected_year: String,
    available_years: Vec<String>,
}

impl AcademicYearContext {
    /// Adopt the stored year if it is one of `available_years`, otherwise keep `default_year`
    pub fn init(
        storage: Arc<dyn KeyValueStorage>,
        cache: Arc<QueryCache>,
        default_year: &str,
        available_years: Vec<String>,
    ) -> Self {
        let selected_year = storage
            .get(SELECTED_YEAR_KEY)
            .filter(|stored| available_years.contains(stored))
            .unwrap_or_else(|| default_year.to_string());

        Self {
            storage,
            cache,
            selected_year,
            available_years,
        }
    }

    pub fn selected_year(&self) -> &str {
        &self.selected_year
    }

    pub fn available_years(&self) -> &[String] {
        &self.available_years
    }

    pub fn set_selected_year(&mut self, year: &str) {
        self.storage.set(SELECTED_YEAR_KEY, year);
        if self.selected_year != year {
            self.selected_year = year.to_string();
            self.cache.invalidate_all();
            tracing::debug!(year, "Selected academic year changed");
        }
    }

    pub fn set_available_years(&mut self, years: Vec<String>) {
        self.available_years = years;
    }

    /// Reload the year list; failures keep the current list and are not reported
    pub async fn refresh_available_years(&mut self, gateway: &dyn AcademicYearGateway) {
        match gateway.list_years().await {
            Ok(years) => self.set_available_years(years),
            Err(e) => tracing::debug!(error = %e, "Academic year list refresh failed"),
        }
    }
}
