use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use aidbridge::AppError;
use aidbridge::cli::{Cli, Commands, execute_command};
use aidbridge::config::Config;
use aidbridge::db::Database;
use aidbridge::events::{EventBus, EventType};
use aidbridge::services::ServiceContext;
use aidbridge::services::core::SeedService;

/// sysexits EX_TEMPFAIL
const EXIT_TEMPFAIL: i32 = 75;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(database) = &cli.database {
        config.database.path = Some(database.clone());
    }

    // RUST_LOG takes precedence over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.general.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting aidbridge");

    let db = Database::open(&config.database).await?;
    db.migrate().await?;

    let bus = Arc::new(EventBus::new(config.events.capacity));
    bus.emit_system(EventType::DatabaseMigrated, "Schema up to date".to_string(), None)
        .await?;

    let ctx = ServiceContext::from_config(db.get_connection(), &config).with_events(bus.clone());

    // `init` seeds explicitly
    if config.seed.demo_data && !matches!(cli.command, Commands::Init) {
        let summary = SeedService::initialize(&ctx).await?;
        debug!("Startup seeding: {:?}", summary);
    }

    let output = match execute_command(&ctx, cli.command).await {
        Ok(output) => output,
        Err(e) if e.downcast_ref::<AppError>().is_some_and(AppError::is_store_failure) => {
            error!("Store unavailable, nothing was applied: {:#}", e);
            std::process::exit(EXIT_TEMPFAIL);
        }
        Err(e) => return Err(e),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if cli.show_events {
        let events = bus.get_history().await;
        eprintln!("{}", serde_json::to_string_pretty(&events)?);
    }

    Ok(())
}
