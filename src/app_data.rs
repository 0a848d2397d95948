use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::SecretManager;
use crate::services::{AuthService, NotificationService, TokenService};
use crate::stores::{
    AcademicYearStore, AssignmentStore, CatalogStore, CredentialStore, LessonStore,
    NotificationStore, SessionStore,
};

/// Centralized application data following the main-owned stores pattern
///
/// Every store and service is created once in main.rs and shared by the API
/// structs through `Arc<AppData>`.
///
/// ```text
/// main.rs
///   ↓
/// AppData::new(db, secrets, ttl)
///   ├─ stores (credential, session, academic_year, catalog, lesson, assignment, notification)
///   └─ services (token, auth, notification)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to api::build_app
/// ```
#[derive(Debug)]
pub struct AppData {
    pub db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub session_store: Arc<SessionStore>,
    pub academic_year_store: Arc<AcademicYearStore>,
    pub catalog_store: Arc<CatalogStore>,
    pub lesson_store: Arc<LessonStore>,
    pub assignment_store: Arc<AssignmentStore>,
    pub notification_store: Arc<NotificationStore>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppData {
    /// Build all stores and services on top of a migrated database
    pub fn new(db: DatabaseConnection, secrets: &SecretManager, session_ttl_hours: i64) -> Self {
        tracing::debug!("Creating stores...");
        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            secrets.password_pepper().to_string(),
        ));
        let session_store = Arc::new(SessionStore::new(db.clone()));
        let academic_year_store = Arc::new(AcademicYearStore::new(db.clone()));
        let catalog_store = Arc::new(CatalogStore::new(db.clone()));
        let lesson_store = Arc::new(LessonStore::new(db.clone()));
        let assignment_store = Arc::new(AssignmentStore::new(db.clone()));
        let notification_store = Arc::new(NotificationStore::new(db.clone()));

        tracing::debug!("Creating services...");
        let token_service = Arc::new(TokenService::new(
            secrets.jwt_secret().to_string(),
            session_ttl_hours,
        ));
        let auth_service = Arc::new(AuthService::new(
            credential_store.clone(),
            session_store.clone(),
            token_service.clone(),
        ));
        let notification_service = Arc::new(NotificationService::new(
            notification_store.clone(),
            academic_year_store.clone(),
            lesson_store.clone(),
            assignment_store.clone(),
            credential_store.clone(),
        ));

        tracing::info!("AppData initialization complete");

        Self {
            db,
            credential_store,
            session_store,
            academic_year_store,
            catalog_store,
            lesson_store,
            assignment_store,
            notification_store,
            token_service,
            auth_service,
            notification_service,
        }
    }
}
