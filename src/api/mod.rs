// API layer - HTTP endpoints
pub mod academic_years;
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod notifications;

use poem::{get, Route};
use poem_openapi::OpenApiService;
use std::sync::Arc;

pub use academic_years::AcademicYearApi;
pub use admin::AdminApi;
pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use notifications::NotificationApi;

use crate::app_data::AppData;

/// Compose every endpoint group into the application route tree
///
/// * `/` and `/health` - plain status probe
/// * `/api/...` - OpenAPI endpoints
/// * `/swagger` - Swagger UI for the API
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> Route {
    let auth_api = AuthApi::new(app_data.auth_service.clone());
    let year_api = AcademicYearApi::new(
        app_data.auth_service.clone(),
        app_data.academic_year_store.clone(),
    );
    let admin_api = AdminApi::new(
        app_data.auth_service.clone(),
        app_data.academic_year_store.clone(),
        app_data.catalog_store.clone(),
        app_data.lesson_store.clone(),
    );
    let notification_api = NotificationApi::new(
        app_data.auth_service.clone(),
        app_data.notification_store.clone(),
        app_data.notification_service.clone(),
    );

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, year_api, admin_api, notification_api),
        "EduTrack API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);

    let ui = api_service.swagger_ui();

    Route::new()
        .at("/", get(health::service_status))
        .at("/health", get(health::service_status))
        .nest("/api", api_service)
        .nest("/swagger", ui)
}
