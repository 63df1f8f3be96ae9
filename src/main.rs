use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use coursehub_backend::api::build_app;
use coursehub_backend::cli::{bootstrap, migrate, seed, Cli, Commands};
use coursehub_backend::config::{
    connect_database, init_logging, migrate_database, ApplicationSettings, BootstrapSettings, LoggingConfig,
    SecretManager, SystemEnvironment,
};
use coursehub_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let logging_config = LoggingConfig::from_env_provider(Arc::new(SystemEnvironment));
    init_logging(&logging_config)?;

    let bootstrap_settings = BootstrapSettings::from_env()?;
    tracing::debug!(?bootstrap_settings, "Bootstrap settings loaded");

    if cli.command() == Commands::Migrate {
        return migrate::run_migrations(&bootstrap_settings).await;
    }

    let settings = ApplicationSettings::from_env()?;
    let secret_manager = SecretManager::from_env()?;

    let db = connect_database(bootstrap_settings.database_url()).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db, secret_manager, &settings));

    match cli.command() {
        Commands::BootstrapAdmin => {
            let outcome = bootstrap::ensure_protected_admin(
                &app_data,
                settings.admin_username(),
                settings.admin_email(),
                settings.admin_password(),
            )
            .await?;
            bootstrap::report(&outcome);
            Ok(())
        }
        Commands::Seed => {
            let added = seed::seed_demo_courses(&app_data).await?;
            println!("Added {} demo course(s)", added);
            Ok(())
        }
        Commands::Serve | Commands::Migrate => serve(app_data, &bootstrap_settings, &settings).await,
    }
}

async fn serve(
    app_data: Arc<AppData>,
    bootstrap_settings: &BootstrapSettings,
    settings: &ApplicationSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = bootstrap::ensure_protected_admin(
        &app_data,
        settings.admin_username(),
        settings.admin_email(),
        settings.admin_password(),
    )
    .await?;
    bootstrap::report(&outcome);

    if settings.seed_demo_courses() {
        seed::seed_demo_courses(&app_data).await?;
    }

    let address = bootstrap_settings.server_address();
    let public_url = format!("http://localhost:{}", bootstrap_settings.server_port());
    let app = build_app(app_data, &public_url);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", public_url);
    tracing::info!("API endpoints available at {}/api", public_url);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
