use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaOrmDatabase, DatabaseBackend,
    DatabaseConnection as SeaOrmConnection, Statement,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

pub type DatabaseConnection = Arc<SeaOrmConnection>;

/// Run once the pool is up. WAL mode persists in the file itself.
const PRAGMAS: &[(&str, &str)] = &[
    ("PRAGMA foreign_keys = ON", "enable foreign keys"),
    ("PRAGMA journal_mode = WAL", "switch to WAL journaling"),
];

/// The SQLite store holding users, requests, offers and help proposals
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the database described by the config, falling back to the default location
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let db_path = match &config.path {
            Some(path) => path.clone(),
            None => Self::db_path()?,
        };
        Self::connect_with(&db_path, config.max_connections).await
    }

    /// Connect to a specific database path
    pub async fn connect(path: &Path) -> Result<Self> {
        Self::connect_with(path, DatabaseConfig::default().max_connections).await
    }

    async fn connect_with(path: &Path, max_connections: u32) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", path.display());
        debug!("Opening {}", db_url);

        let mut opt = ConnectOptions::new(db_url);
        opt.max_connections(max_connections.max(1))
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8))
            .sqlx_logging(false);

        let connection = SeaOrmDatabase::connect(opt)
            .await
            .context("Failed to connect to database")?;

        for (pragma, what) in PRAGMAS {
            connection
                .execute(Statement::from_string(DatabaseBackend::Sqlite, *pragma))
                .await
                .with_context(|| format!("Failed to {}", what))?;
        }

        info!("Store ready at {}", path.display());

        Ok(Self {
            connection: Arc::new(connection),
        })
    }

    /// Shared handle for a `ServiceContext`
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// `<data_dir>/aidbridge/aidbridge.db`, used when the config names no path
    pub fn db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join("aidbridge").join("aidbridge.db"))
    }

    /// Bring the schema up to date
    pub async fn migrate(&self) -> Result<()> {
        use crate::db::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        let pending_count = Migrator::get_pending_migrations(&*self.connection)
            .await
            .context("Failed to get pending migrations")?
            .len();

        if pending_count > 0 {
            Migrator::up(&*self.connection, None)
                .await
                .context("Failed to run migrations")?;

            info!("Applied {} database migrations", pending_count);
        } else {
            debug!("Schema already current");
        }

        Ok(())
    }
}
