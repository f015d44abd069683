/// Schema migrations
///
/// The SQL files under `coursehub-shared/migrations/` are embedded at compile
/// time with `sqlx::migrate!`. Each migration is a reversible
/// `{version}_{name}.up.sql` / `.down.sql` pair:
///
/// - `create_users`: `users` table, `citext` extension, unique email
/// - `create_courses`: `courses` table with a cascading owner foreign key
/// - `widen_text_columns`: `VARCHAR(255)` columns become unbounded `TEXT`
///
/// # Example
///
/// ```no_run
/// use coursehub_shared::db::migrations::{ensure_database_exists, migration_status, run_migrations};
/// use coursehub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = std::env::var("DATABASE_URL")?;
/// ensure_database_exists(&url).await?;
///
/// let pool = create_pool(DatabaseConfig { url, ..Default::default() }).await?;
/// run_migrations(&pool).await?;
///
/// let status = migration_status(&pool).await?;
/// println!("{} migrations applied", status.applied);
/// # Ok(())
/// # }
/// ```

use sqlx::migrate::{MigrateDatabase, MigrateError, Migrator};
use sqlx::postgres::PgPool;
use sqlx::Postgres;
use tracing::{debug, error, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applied migrations as recorded in `_sqlx_migrations`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: usize,
    pub latest_version: Option<i64>,
}

impl MigrationStatus {
    /// True when every embedded migration has been applied
    pub fn is_current(&self) -> bool {
        self.latest_version == latest_embedded_version()
    }
}

/// Highest migration version compiled into the binary
pub fn latest_embedded_version() -> Option<i64> {
    MIGRATOR.iter().map(|m| m.version).max()
}

/// Applies all pending migrations
///
/// # Errors
///
/// Fails if a migration script errors or an applied migration no longer
/// matches its embedded checksum.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!("Running database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema is up to date");
    Ok(())
}

/// Reads the migration bookkeeping table
///
/// A database that has never been migrated reports zero applied migrations.
pub async fn migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied: 0,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(MigrationStatus {
        applied: usize::try_from(count).unwrap_or_default(),
        latest_version,
    })
}

/// Creates the database named in `database_url` if it is missing
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Database does not exist, creating it");
    Postgres::create_database(database_url).await
}
