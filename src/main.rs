use anyhow::Result;
use clap::{Parser, Subcommand};
use students_core::{config::Config, migration, server, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "students-core", version, about = "Student records service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database if needed and apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let metrics_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Students Core Service");
            server::run(config, metrics_handle).await
        }
        Command::Migrate => migration::run_migrations(&config).await,
    }
}
