use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use edutrack_backend::api::build_app;
use edutrack_backend::app_data::AppData;
use edutrack_backend::cli::{execute_command, Cli, Commands};
use edutrack_backend::config::database::{init_database, migrate_database};
use edutrack_backend::config::{init_logging, BootstrapSettings, SecretManager};
use edutrack_backend::services::seeder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let command = cli.command();

    let settings = BootstrapSettings::from_env()?;
    tracing::debug!(?settings, "Bootstrap settings loaded");

    let db = init_database(&settings).await?;
    migrate_database(&db).await?;

    if command == Commands::Migrate {
        tracing::info!("Migrations applied");
        return Ok(());
    }

    let secrets = SecretManager::init()?;
    let app_data = Arc::new(AppData::new(db, &secrets, settings.session_ttl_hours()));

    if command != Commands::Serve {
        return execute_command(command, &app_data).await;
    }

    let report = seeder::seed(
        &app_data.credential_store,
        &app_data.academic_year_store,
        &app_data.assignment_store,
        settings.seed_demo_accounts(),
    )
    .await?;
    tracing::info!(
        accounts_created = report.accounts_created,
        year_created = report.year_created,
        "Seeding finished"
    );

    let purged = app_data.session_store.purge_expired().await?;
    if purged > 0 {
        tracing::info!(purged, "Expired sessions removed");
    }

    let address = settings.server_address();
    let app = build_app(app_data, &format!("http://{}/api", address));

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
