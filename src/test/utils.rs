// Test utilities shared across unit tests
// Only compiled when running tests

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::SecretManager;
use crate::services::AuthService;
use crate::stores::{CredentialStore, NewUser};
use crate::types::db::{
    academic_year, chapter, class, inspector_assignment, lesson, level, sg_assignment, subject,
    teacher_enrollment, user,
};
use crate::types::internal::Role;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

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

pub fn new_user(username: &str, password: &str, role: Role) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: password.to_string(),
        role,
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        email: format!("{}@school.test", username),
        hourly_rate: None,
    }
}

/// Full application state on a fresh database
pub async fn setup_test_app() -> Arc<AppData> {
    let db = setup_test_db().await;
    let secrets = SecretManager::from_values(TEST_JWT_SECRET, TEST_PEPPER);
    Arc::new(AppData::new(db, &secrets, 24))
}

/// Returns (auth_service, credential_store) sharing one database
pub async fn setup_test_auth() -> (Arc<AuthService>, Arc<CredentialStore>) {
    let app = setup_test_app().await;
    (app.auth_service.clone(), app.credential_store.clone())
}

/// Rows inserted by [`seed_year_fixture`]
#[derive(Debug, Clone)]
pub struct YearFixture {
    pub teacher_id: String,
    pub inspector_id: String,
    pub sg_id: String,
    pub subject_id: i32,
    pub level_ids: Vec<i32>,
    pub chapter_id: i32,
    pub completed_lesson_id: i32,
    pub pending_lesson_id: i32,
}

async fn insert_user(db: &DatabaseConnection, username: &str, role: Role) -> String {
    let now = Utc::now().timestamp();
    user::ActiveModel {
        id: Set(format!("{}-id", username)),
        username: Set(username.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        role: Set(role.to_string()),
        first_name: Set("Fixture".to_string()),
        last_name: Set(username.to_string()),
        email: Set(format!("{}@school.test", username)),
        hourly_rate: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture user")
    .id
}

/// Populate one active academic year with a small but complete data set
///
/// * a teacher, an inspector following that teacher, and a supervisor
/// * subject MATH, levels 6E and 5E, one class on 6E
/// * one chapter on 6E with two lessons: 2024-10-01 (completed) and 2024-10-08 (pending)
pub async fn seed_year_fixture(db: &DatabaseConnection, year: &str) -> YearFixture {
    let now = Utc::now().timestamp();

    academic_year::ActiveModel {
        name: Set(year.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture year");

    let teacher_id = insert_user(db, "fixture-teacher", Role::Teacher).await;
    let inspector_id = insert_user(db, "fixture-inspector", Role::Inspector).await;
    let sg_id = insert_user(db, "fixture-sg", Role::Sg).await;

    let subject_id = subject::ActiveModel {
        name: Set("Mathématiques".to_string()),
        code: Set("MATH".to_string()),
        description: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture subject")
    .id;

    let mut level_ids = Vec::new();
    for (name, code) in [("Sixième", "6E"), ("Cinquième", "5E")] {
        let inserted = level::ActiveModel {
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            category: Set("collège".to_string()),
            academic_year: Set(year.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert fixture level");
        level_ids.push(inserted.id);
    }

    class::ActiveModel {
        name: Set("6e A".to_string()),
        level_id: Set(level_ids[0]),
        academic_year: Set(year.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture class");

    teacher_enrollment::ActiveModel {
        teacher_id: Set(teacher_id.clone()),
        academic_year: Set(year.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture enrollment");

    inspector_assignment::ActiveModel {
        inspector_id: Set(inspector_id.clone()),
        teacher_id: Set(teacher_id.clone()),
        academic_year: Set(year.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture inspector assignment");

    sg_assignment::ActiveModel {
        sg_id: Set(sg_id.clone()),
        level_id: Set(level_ids[1]),
        academic_year: Set(year.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture sg assignment");

    let chapter_id = chapter::ActiveModel {
        name: Set("Nombres entiers".to_string()),
        subject_id: Set(subject_id),
        level_id: Set(level_ids[0]),
        academic_year: Set(year.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert fixture chapter")
    .id;

    let mut lesson_ids = Vec::new();
    for (index, (title, date, completed_at)) in [
        ("Addition", "2024-10-01", Some(now)),
        ("Soustraction", "2024-10-08", None),
    ]
    .into_iter()
    .enumerate()
    {
        let inserted = lesson::ActiveModel {
            chapter_id: Set(chapter_id),
            teacher_id: Set(teacher_id.clone()),
            title: Set(title.to_string()),
            objectives: Set(None),
            planned_date: Set(date.to_string()),
            planned_duration: Set(55),
            order_index: Set(index as i32),
            completed_at: Set(completed_at),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert fixture lesson");
        lesson_ids.push(inserted.id);
    }

    YearFixture {
        teacher_id,
        inspector_id,
        sg_id,
        subject_id,
        level_ids,
        chapter_id,
        completed_lesson_id: lesson_ids[0],
        pending_lesson_id: lesson_ids[1],
    }
}
