use rusqlite::Connection;
use tracing::info;

use super::{table_definitions, Dialect};
use crate::database::DatabaseError;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    for definition in table_definitions() {
        info!("Creating {} table if not exists", definition.table);

        conn.execute(&definition.create_table_sql(Dialect::Sqlite), [])
            .map_err(|e| DatabaseError::MigrationError(format!("{}: {}", definition.table, e)))?;

        conn.execute(&definition.create_index_sql(), [])
            .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index on {}: {}", definition.table, e)))?;
    }

    info!("SQLite migrations completed successfully");
    Ok(())
}
