use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::api::helpers::{authenticated_context, caller};
use crate::errors::ApiError;
use crate::services::AuthService;
use crate::stores::AcademicYearStore;
use crate::types::dto::academic_year::AcademicYearResponse;

/// Academic year listing, available to every role
pub struct AcademicYearApi {
    auth_service: Arc<AuthService>,
    academic_year_store: Arc<AcademicYearStore>,
}

impl AcademicYearApi {
    pub fn new(auth_service: Arc<AuthService>, academic_year_store: Arc<AcademicYearStore>) -> Self {
        Self {
            auth_service,
            academic_year_store,
        }
    }
}

#[derive(Tags)]
enum YearTags {
    /// Academic years
    AcademicYears,
}

#[OpenApi]
impl AcademicYearApi {
    /// All academic year names, oldest first
    #[oai(path = "/academic-years", method = "get", tag = "YearTags::AcademicYears")]
    async fn list(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<String>>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        caller(&ctx)?;
        Ok(Json(self.academic_year_store.list_names().await?))
    }

    /// The currently active academic year
    #[oai(path = "/academic-years/active", method = "get", tag = "YearTags::AcademicYears")]
    async fn active(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<AcademicYearResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        caller(&ctx)?;
        let year_name = self.academic_year_store.require_active_name().await?;
        Ok(Json(AcademicYearResponse { year_name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_user, setup_test_app};
    use crate::types::dto::academic_year::CopyOptions;
    use crate::types::internal::{RequestContext, Role};
    use poem_openapi::auth::Bearer;

    async fn setup() -> (AcademicYearApi, BearerAuth, Arc<crate::app_data::AppData>) {
        let app = setup_test_app().await;
        app.credential_store
            .add_user(new_user("teacher", "pw", Role::Teacher))
            .await
            .unwrap();
        let token = app
            .auth_service
            .login(&RequestContext::for_system("test"), "teacher", "pw")
            .await
            .unwrap()
            .token;
        let api = AcademicYearApi::new(app.auth_service.clone(), app.academic_year_store.clone());
        (api, BearerAuth(Bearer { token }), app)
    }

    #[tokio::test]
    async fn test_list_is_ascending() {
        let (api, auth, app) = setup().await;
        app.academic_year_store
            .create_year("2024-2025", &CopyOptions::default())
            .await
            .unwrap();
        app.academic_year_store
            .create_year("2023-2024", &CopyOptions::default())
            .await
            .unwrap();

        let req = Request::builder().finish();
        let Json(names) = api.list(&req, auth).await.unwrap();
        assert_eq!(names, vec!["2023-2024", "2024-2025"]);
    }

    #[tokio::test]
    async fn test_active_year_not_found_when_empty() {
        let (api, auth, _app) = setup().await;
        let req = Request::builder().finish();

        assert!(matches!(
            api.active(&req, auth).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_active_year_is_the_latest_created() {
        let (api, auth, app) = setup().await;
        app.academic_year_store
            .create_year("2024-2025", &CopyOptions::default())
            .await
            .unwrap();
        app.academic_year_store
            .create_year("2025-2026", &CopyOptions::default())
            .await
            .unwrap();

        let req = Request::builder().finish();
        let Json(active) = api.active(&req, auth).await.unwrap();
        assert_eq!(active.year_name, "2025-2026");
    }
}
