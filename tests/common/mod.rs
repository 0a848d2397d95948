// Common test utilities for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use poem::test::TestClient;
use poem::Route;
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use edutrack_backend::api::build_app;
use edutrack_backend::app_data::AppData;
use edutrack_backend::client::api_client::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use edutrack_backend::client::ClientError;
use edutrack_backend::config::SecretManager;
use edutrack_backend::services::seeder;

pub const TEST_JWT_SECRET: &str = "integration-jwt-secret-at-least-32-characters";
pub const TEST_PEPPER: &str = "integration-pepper";
pub const DEMO_PASSWORD: &str = seeder::DEMO_PASSWORD;

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Full application with demo accounts and the initial year seeded
pub async fn setup_app() -> (Arc<AppData>, TestClient<Route>) {
    let (app_data, route) = setup_route().await;
    (app_data, TestClient::new(route))
}

/// Seeded application route, for serving over a real listener
pub async fn setup_route() -> (Arc<AppData>, Route) {
    let db = setup_test_db().await;
    let secrets = SecretManager::from_values(TEST_JWT_SECRET, TEST_PEPPER);
    let app_data = Arc::new(AppData::new(db, &secrets, 1));

    seeder::seed(
        &app_data.credential_store,
        &app_data.academic_year_store,
        &app_data.assignment_store,
        true,
    )
    .await
    .expect("Failed to seed database");

    let route = build_app(app_data.clone(), "http://localhost:3000/api");
    (app_data, route)
}

/// Log a demo account in over HTTP and return its token
pub async fn login(cli: &TestClient<Route>, username: &str) -> String {
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({"username": username, "password": DEMO_PASSWORD}))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body: Value = resp.json().await.value().deserialize();
    body["token"].as_str().expect("token in login response").to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Client transport that runs requests against the in-process app
///
/// Every request is recorded so tests can assert on what the client sent.
pub struct PoemTransport {
    client: TestClient<Route>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl PoemTransport {
    pub fn new(client: TestClient<Route>) -> Self {
        Self {
            client,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for PoemTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.sent.lock().unwrap().push(request.clone());

        let uri = format!("/api{}", request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(uri),
            HttpMethod::Post => self.client.post(uri),
            HttpMethod::Delete => self.client.delete(uri),
        };
        if let Some(token) = &request.bearer_token {
            builder = builder.header("Authorization", bearer(token));
        }
        if let Some(body) = &request.body {
            builder = builder.body_json(body);
        }

        let resp = builder.send().await;
        let status = resp.0.status().as_u16();
        let body = resp
            .0
            .into_body()
            .into_string()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            std::env::remove_var(var);
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            std::env::remove_var(var);
        }
    }
}

/// Global mutex for tests that modify environment variables
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
