use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::stores::{AcademicYearStore, AssignmentStore, CredentialStore, NewUser};
use crate::types::internal::Role;

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "password123";

/// Year created when the database holds none
pub const INITIAL_ACADEMIC_YEAR: &str = "2024-2025";

struct DemoAccount {
    role: Role,
    first_name: &'static str,
    last_name: &'static str,
    hourly_rate: Option<f64>,
}

const DEMO_ACCOUNTS: [DemoAccount; 5] = [
    DemoAccount { role: Role::Teacher, first_name: "Karim", last_name: "Haddad", hourly_rate: Some(30.0) },
    DemoAccount { role: Role::Inspector, first_name: "Nadia", last_name: "Mansouri", hourly_rate: None },
    DemoAccount { role: Role::Founder, first_name: "Youssef", last_name: "Alaoui", hourly_rate: None },
    DemoAccount { role: Role::Admin, first_name: "Leila", last_name: "Benani", hourly_rate: None },
    DemoAccount { role: Role::Sg, first_name: "Omar", last_name: "Tazi", hourly_rate: None },
];

/// What a seeding run actually inserted
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub accounts_created: usize,
    pub year_created: bool,
}

/// Make sure an academic year exists, and optionally the demo accounts
///
/// Demo accounts use their role as username (`teacher`, `inspector`, ...)
/// and [`DEMO_PASSWORD`]. Accounts that already exist are left untouched,
/// so running the seeder twice is a no-op.
pub async fn seed(
    credential_store: &CredentialStore,
    academic_year_store: &AcademicYearStore,
    assignment_store: &AssignmentStore,
    with_demo_accounts: bool,
) -> Result<SeedReport, InternalError> {
    let mut report = SeedReport {
        year_created: academic_year_store
            .ensure_initial_year(INITIAL_ACADEMIC_YEAR)
            .await?,
        ..SeedReport::default()
    };

    if !with_demo_accounts {
        return Ok(report);
    }

    let mut teacher_id = None;
    let mut inspector_id = None;

    for account in &DEMO_ACCOUNTS {
        let username = account.role.as_str();
        let result = credential_store
            .add_user(NewUser {
                username: username.to_string(),
                password: DEMO_PASSWORD.to_string(),
                role: account.role,
                first_name: account.first_name.to_string(),
                last_name: account.last_name.to_string(),
                email: format!("{}@edutrack.local", username),
                hourly_rate: account.hourly_rate,
            })
            .await;

        match result {
            Ok(user) => {
                report.accounts_created += 1;
                match account.role {
                    Role::Teacher => teacher_id = Some(user.id),
                    Role::Inspector => inspector_id = Some(user.id),
                    _ => {}
                }
            }
            Err(InternalError::Credential(CredentialError::DuplicateUsername(_))) => {
                tracing::debug!(username, "Demo account already present");
            }
            Err(e) => return Err(e),
        }
    }

    // Link the demo teacher and inspector the first time they are created
    if let (Some(teacher), Some(inspector)) = (teacher_id, inspector_id) {
        let year = academic_year_store.require_active_name().await?;
        assignment_store.enroll_teacher(&teacher, &year).await?;
        assignment_store
            .assign_inspector(&inspector, &teacher, &year)
            .await?;
    }

    tracing::info!(
        accounts_created = report.accounts_created,
        year_created = report.year_created,
        "Seeding complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app;

    #[tokio::test]
    async fn test_seed_creates_year_and_accounts_once() {
        let app = setup_test_app().await;

        let first = seed(
            &app.credential_store,
            &app.academic_year_store,
            &app.assignment_store,
            true,
        )
        .await
        .unwrap();
        assert_eq!(
            first,
            SeedReport {
                accounts_created: 5,
                year_created: true
            }
        );

        let second = seed(
            &app.credential_store,
            &app.academic_year_store,
            &app.assignment_store,
            true,
        )
        .await
        .unwrap();
        assert_eq!(second, SeedReport::default());
    }

    #[tokio::test]
    async fn test_every_demo_account_can_log_in_with_its_role() {
        let app = setup_test_app().await;
        seed(
            &app.credential_store,
            &app.academic_year_store,
            &app.assignment_store,
            true,
        )
        .await
        .unwrap();

        for role in Role::ALL {
            let user = app
                .credential_store
                .verify_credentials(role.as_str(), DEMO_PASSWORD)
                .await
                .unwrap();
            assert_eq!(user.role, role.as_str());
        }
    }

    #[tokio::test]
    async fn test_demo_inspector_follows_demo_teacher() {
        let app = setup_test_app().await;
        seed(
            &app.credential_store,
            &app.academic_year_store,
            &app.assignment_store,
            true,
        )
        .await
        .unwrap();

        let teacher = app.credential_store.find_by_username("teacher").await.unwrap().unwrap();
        let inspector = app.credential_store.find_by_username("inspector").await.unwrap().unwrap();
        let inspectors = app
            .assignment_store
            .inspectors_for_teacher(&teacher.id, INITIAL_ACADEMIC_YEAR)
            .await
            .unwrap();
        assert_eq!(inspectors, vec![inspector.id]);
    }

    #[tokio::test]
    async fn test_seed_without_demo_accounts_only_creates_year() {
        let app = setup_test_app().await;
        let report = seed(
            &app.credential_store,
            &app.academic_year_store,
            &app.assignment_store,
            false,
        )
        .await
        .unwrap();

        assert!(report.year_created);
        assert_eq!(report.accounts_created, 0);
        assert!(app.credential_store.find_by_username("admin").await.unwrap().is_none());
    }
}
