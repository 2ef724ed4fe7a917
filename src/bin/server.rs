use anyhow::Context;
use clap::{Parser, Subcommand};
use dsa_tracker::auth::SessionManager;
use dsa_tracker::configuration::{Environment, Settings};
use dsa_tracker::db::{establish_connection, run_migrations};
use dsa_tracker::server::app::run_server;
use dsa_tracker::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and serve HTTP (default)
    Serve,
    /// Run migrations and exit
    Migrate,
    /// Delete sessions whose expiry has passed
    PurgeSessions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load configuration")?;
    let pool = establish_connection(&settings.database)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database.path))?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(pool, &settings).await?,
        Commands::Migrate => tracing::info!("Migrations applied"),
        Commands::PurgeSessions => {
            let secure = settings.application.environment == Environment::Production;
            let sessions = SessionManager::new(pool, &settings.session, secure);
            let removed = sessions.delete_expired_sessions().await?;
            tracing::info!(removed, "Expired sessions purged");
        }
    }
    Ok(())
}
