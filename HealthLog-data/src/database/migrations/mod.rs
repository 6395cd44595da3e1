//! Schema for the log tables.
//!
//! Table definitions are generated from each record's column list, so adding a
//! column to a record type is enough to change its table.

use crate::models::{
    BloodGlucoseRecord, BloodPressureRecord, Column, ColumnKind, InsulinRecord, LogRecord,
    MealRecord, WaterRecord, WeightRecord,
};

#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::run_migrations as run_sqlite_migrations;

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::run_migrations as run_postgres_migrations;

/// SQL flavour used when rendering DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    fn column_type(self, kind: ColumnKind) -> &'static str {
        match (self, kind) {
            (_, ColumnKind::Text) => "TEXT",
            (Dialect::Sqlite, ColumnKind::Integer) => "INTEGER",
            (Dialect::Sqlite, ColumnKind::Real) => "REAL",
            (Dialect::Postgres, ColumnKind::Integer) => "BIGINT",
            (Dialect::Postgres, ColumnKind::Real) => "DOUBLE PRECISION",
        }
    }
}

/// A table to create during migrations
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub table: &'static str,
    pub columns: Vec<Column>,
}

impl TableDefinition {
    pub fn of<T: LogRecord>() -> Self {
        Self {
            table: T::TABLE,
            columns: T::columns(),
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statement
    pub fn create_table_sql(&self, dialect: Dialect) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let mut definition = format!("{} {}", column.name, dialect.column_type(column.kind));
                if column.name == "id" {
                    definition.push_str(" PRIMARY KEY");
                } else if !column.nullable {
                    definition.push_str(" NOT NULL");
                }
                definition
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table,
            columns.join(",\n    ")
        )
    }

    /// Index backing per-user history queries
    pub fn create_index_sql(&self) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_user_timestamp ON {table} (user_id, timestamp DESC)",
            table = self.table
        )
    }
}

/// Every log table, in creation order
pub fn table_definitions() -> Vec<TableDefinition> {
    vec![
        TableDefinition::of::<BloodGlucoseRecord>(),
        TableDefinition::of::<BloodPressureRecord>(),
        TableDefinition::of::<MealRecord>(),
        TableDefinition::of::<WaterRecord>(),
        TableDefinition::of::<InsulinRecord>(),
        TableDefinition::of::<WeightRecord>(),
    ]
}
