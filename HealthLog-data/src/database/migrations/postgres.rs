use tokio_postgres::Client;
use tracing::info;

use super::{table_definitions, Dialect};
use crate::database::DatabaseError;

/// Run PostgreSQL database migrations
pub async fn run_migrations(client: &Client) -> Result<(), DatabaseError> {
    info!("Running PostgreSQL migrations");

    for definition in table_definitions() {
        info!("Creating {} table if not exists", definition.table);

        client.execute(definition.create_table_sql(Dialect::Postgres).as_str(), &[])
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("{}: {}", definition.table, e)))?;

        client.execute(definition.create_index_sql().as_str(), &[])
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index on {}: {}", definition.table, e)))?;
    }

    info!("PostgreSQL migrations completed successfully");
    Ok(())
}
