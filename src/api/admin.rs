use poem::Request;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::api::helpers::{authenticated_context, require_role};
use crate::errors::ApiError;
use crate::services::AuthService;
use crate::stores::{AcademicYearStore, CatalogStore, LessonStore};
use crate::types::dto::academic_year::{AcademicYearResponse, CreateAcademicYearRequest};
use crate::types::dto::admin::{
    CreateLevelRequest, CreateSubjectRequest, LessonWithDetails, LevelResponse, SubjectResponse,
};
use crate::types::internal::Role;

/// Roles allowed to change school structure
const WRITERS: &[Role] = &[Role::Admin];

/// Roles allowed to read school structure
const READERS: &[Role] = &[Role::Admin, Role::Founder];

/// Administration of years, subjects, levels and lessons
pub struct AdminApi {
    auth_service: Arc<AuthService>,
    academic_year_store: Arc<AcademicYearStore>,
    catalog_store: Arc<CatalogStore>,
    lesson_store: Arc<LessonStore>,
}

impl AdminApi {
    pub fn new(
        auth_service: Arc<AuthService>,
        academic_year_store: Arc<AcademicYearStore>,
        catalog_store: Arc<CatalogStore>,
        lesson_store: Arc<LessonStore>,
    ) -> Self {
        Self {
            auth_service,
            academic_year_store,
            catalog_store,
            lesson_store,
        }
    }

    /// The requested year, or the active one when none was given
    async fn resolve_year(&self, requested: Option<String>) -> Result<String, ApiError> {
        match requested.map(|y| y.trim().to_string()).filter(|y| !y.is_empty()) {
            Some(year) => Ok(year),
            None => Ok(self.academic_year_store.require_active_name().await?),
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// School structure administration
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Create a new academic year and make it active
    ///
    /// Records selected in `copyOptions` are copied from the previously
    /// active year. The whole operation is atomic.
    #[oai(path = "/create-academic-year", method = "post", tag = "AdminTags::Admin")]
    async fn create_academic_year(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateAcademicYearRequest>,
    ) -> Result<Json<AcademicYearResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        require_role(&ctx, WRITERS)?;

        let rollover = self
            .academic_year_store
            .create_year(&body.year_name, &body.copy_options)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            year = %rollover.year.name,
            "Academic year rollover"
        );
        Ok(Json(AcademicYearResponse {
            year_name: rollover.year.name,
        }))
    }

    #[oai(path = "/subjects", method = "get", tag = "AdminTags::Admin")]
    async fn list_subjects(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        require_role(&ctx, READERS)?;

        let subjects = self.catalog_store.list_subjects().await?;
        Ok(Json(subjects.into_iter().map(SubjectResponse::from).collect()))
    }

    #[oai(path = "/subjects", method = "post", tag = "AdminTags::Admin")]
    async fn create_subject(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateSubjectRequest>,
    ) -> Result<Json<SubjectResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        require_role(&ctx, WRITERS)?;

        let created = self.catalog_store.create_subject(body.0).await?;
        Ok(Json(SubjectResponse::from(created)))
    }

    /// Levels of an academic year (defaults to the active year)
    #[oai(path = "/levels", method = "get", tag = "AdminTags::Admin")]
    async fn list_levels(
        &self,
        req: &Request,
        auth: BearerAuth,
        #[oai(name = "academicYear")] academic_year: Query<Option<String>>,
    ) -> Result<Json<Vec<LevelResponse>>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        require_role(&ctx, READERS)?;

        let year = self.resolve_year(academic_year.0).await?;
        let levels = self.catalog_store.list_levels(&year).await?;
        Ok(Json(levels.into_iter().map(LevelResponse::from).collect()))
    }

    /// Create a level in the active academic year
    #[oai(path = "/levels", method = "post", tag = "AdminTags::Admin")]
    async fn create_level(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateLevelRequest>,
    ) -> Result<Json<LevelResponse>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        require_role(&ctx, WRITERS)?;

        let year = self.academic_year_store.require_active_name().await?;
        let created = self.catalog_store.create_level(body.0, &year).await?;
        Ok(Json(LevelResponse::from(created)))
    }

    /// Lessons of an academic year with chapter, subject and level
    #[oai(path = "/lessons", method = "get", tag = "AdminTags::Admin")]
    async fn list_lessons(
        &self,
        req: &Request,
        auth: BearerAuth,
        #[oai(name = "academicYear")] academic_year: Query<Option<String>>,
    ) -> Result<Json<Vec<LessonWithDetails>>, ApiError> {
        let ctx = authenticated_context(&self.auth_service, req, &auth).await?;
        require_role(&ctx, READERS)?;

        let year = self.resolve_year(academic_year.0).await?;
        Ok(Json(self.lesson_store.list_with_details(&year).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_data::AppData;
    use crate::test::utils::{new_user, seed_year_fixture, setup_test_app};
    use crate::types::dto::academic_year::CopyOptions;
    use crate::types::dto::admin::LevelCategory;
    use crate::types::internal::RequestContext;
    use poem_openapi::auth::Bearer;

    async fn token_for(app: &AppData, username: &str, role: Role) -> String {
        app.credential_store
            .add_user(new_user(username, "pw", role))
            .await
            .unwrap();
        app.auth_service
            .login(&RequestContext::for_system("test"), username, "pw")
            .await
            .unwrap()
            .token
    }

    fn bearer(token: &str) -> BearerAuth {
        BearerAuth(Bearer {
            token: token.to_string(),
        })
    }

    fn api(app: &AppData) -> AdminApi {
        AdminApi::new(
            app.auth_service.clone(),
            app.academic_year_store.clone(),
            app.catalog_store.clone(),
            app.lesson_store.clone(),
        )
    }

    fn year_request(name: &str) -> Json<CreateAcademicYearRequest> {
        Json(CreateAcademicYearRequest {
            year_name: name.to_string(),
            copy_options: CopyOptions::default(),
        })
    }

    #[tokio::test]
    async fn test_admin_creates_academic_year() {
        let app = setup_test_app().await;
        let auth = bearer(&token_for(&app, "admin", Role::Admin).await);
        let req = Request::builder().finish();

        let Json(created) = api(&app)
            .create_academic_year(&req, auth, year_request("2025-2026"))
            .await
            .unwrap();
        assert_eq!(created.year_name, "2025-2026");
        assert_eq!(
            app.academic_year_store.require_active_name().await.unwrap(),
            "2025-2026"
        );
    }

    #[tokio::test]
    async fn test_duplicate_year_conflicts() {
        let app = setup_test_app().await;
        let req = Request::builder().finish();
        let api = api(&app);

        let token = token_for(&app, "admin", Role::Admin).await;

        api.create_academic_year(&req, bearer(&token), year_request("2025-2026"))
            .await
            .unwrap();

        match api
            .create_academic_year(&req, bearer(&token), year_request("2025-2026"))
            .await
        {
            Err(ApiError::Conflict(json)) => assert_eq!(json.0.status_code, 409),
            other => panic!("expected conflict, got {:?}", other.map(|j| j.0)),
        }
    }

    #[tokio::test]
    async fn test_empty_year_name_is_bad_request() {
        let app = setup_test_app().await;
        let auth = bearer(&token_for(&app, "admin", Role::Admin).await);
        let req = Request::builder().finish();

        assert!(matches!(
            api(&app).create_academic_year(&req, auth, year_request("")).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_teacher_cannot_create_year() {
        let app = setup_test_app().await;
        let auth = bearer(&token_for(&app, "teacher", Role::Teacher).await);
        let req = Request::builder().finish();

        assert!(matches!(
            api(&app)
                .create_academic_year(&req, auth, year_request("2025-2026"))
                .await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(app.academic_year_store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_founder_can_read_but_not_write() {
        let app = setup_test_app().await;
        let req = Request::builder().finish();
        let api = api(&app);

        let token = token_for(&app, "founder", Role::Founder).await;
        assert!(api.list_subjects(&req, bearer(&token)).await.unwrap().0.is_empty());

        let body = Json(CreateSubjectRequest {
            name: "Physique".to_string(),
            code: "PHY".to_string(),
            description: None,
        });
        assert!(matches!(
            api.create_subject(&req, bearer(&token), body).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_level_is_created_in_active_year() {
        let app = setup_test_app().await;
        app.academic_year_store
            .create_year("2024-2025", &CopyOptions::default())
            .await
            .unwrap();
        let auth = bearer(&token_for(&app, "admin", Role::Admin).await);
        let req = Request::builder().finish();

        let Json(level) = api(&app)
            .create_level(
                &req,
                auth,
                Json(CreateLevelRequest {
                    name: "Seconde".to_string(),
                    code: "2nde".to_string(),
                    category: LevelCategory::Lycee,
                }),
            )
            .await
            .unwrap();

        assert_eq!(level.academic_year, "2024-2025");
        assert_eq!(level.code, "2NDE");
        assert_eq!(level.category, "lycée");
    }

    #[tokio::test]
    async fn test_lessons_default_to_active_year() {
        let app = setup_test_app().await;
        seed_year_fixture(&app.db, "2024-2025").await;
        let auth = bearer(&token_for(&app, "admin", Role::Admin).await);
        let req = Request::builder().finish();

        let Json(lessons) = api(&app)
            .list_lessons(&req, auth, Query(None))
            .await
            .unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].chapter.name, "Nombres entiers");
    }
}
