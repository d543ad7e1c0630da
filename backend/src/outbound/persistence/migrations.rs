//! Embedded schema migrations for both databases.
//!
//! Diesel's migration harness needs a synchronous connection, so migrations
//! run on a blocking thread before the async pools are built.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Users, files, element categories and seeded elements.
pub const RELATIONAL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/relational");

/// The `observation_points` table and its indexes.
pub const OBSERVATION_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("migrations/observations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply pending migrations to the database at `database_url`.
///
/// # Errors
///
/// Returns [`MigrationError`] if the connection or any migration fails.
pub async fn run_migrations(
    database_url: String,
    migrations: EmbeddedMigrations,
) -> Result<(), MigrationError> {
    tokio::task::spawn_blocking(move || {
        let mut conn =
            PgConnection::establish(&database_url).map_err(|err| MigrationError::Connection {
                message: err.to_string(),
            })?;
        let applied = conn
            .run_pending_migrations(migrations)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        info!(count = applied.len(), "applied pending migrations");
        Ok(())
    })
    .await
    .map_err(|err| MigrationError::Apply {
        message: format!("migration task panicked: {err}"),
    })?
}
