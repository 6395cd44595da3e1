use tracing::debug;

use crate::database::DatabasePool;
use crate::models::{Column, LogRecord, SqlValue};
use super::errors::RepositoryError;
use super::filter::EntryFilter;

/// Database storage operations shared by every log table
pub struct DatabaseStorage;

/// Parameterised SELECT and COUNT for one page of a user's history
#[derive(Debug, Clone, PartialEq)]
struct ListQuery {
    select: String,
    count: String,
    params: Vec<SqlValue>,
}

impl ListQuery {
    fn build<T: LogRecord>(
        user_id: &str,
        filter: &EntryFilter,
        placeholder: fn(usize) -> String,
        unlimited: Option<&str>,
    ) -> Self {
        let mut conditions = vec![format!("user_id = {}", placeholder(1))];
        let mut params = vec![SqlValue::Text(user_id.to_string())];

        if let Some(start) = &filter.start {
            params.push(SqlValue::Text(start.clone()));
            conditions.push(format!("timestamp >= {}", placeholder(params.len())));
        }
        if let Some(end) = &filter.end {
            params.push(SqlValue::Text(end.clone()));
            conditions.push(format!("timestamp <= {}", placeholder(params.len())));
        }

        let where_clause = conditions.join(" AND ");
        let column_list = column_names(&T::columns());
        let direction = if filter.is_descending() { "DESC" } else { "ASC" };

        let mut select = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY timestamp {}, id {}",
            column_list, T::TABLE, where_clause, direction, direction
        );

        match (filter.limit, filter.offset) {
            (Some(limit), offset) => {
                select.push_str(&format!(" LIMIT {}", limit));
                if let Some(offset) = offset {
                    select.push_str(&format!(" OFFSET {}", offset));
                }
            }
            (None, Some(offset)) => {
                // SQLite only accepts OFFSET after a LIMIT
                if let Some(unlimited) = unlimited {
                    select.push_str(&format!(" LIMIT {}", unlimited));
                }
                select.push_str(&format!(" OFFSET {}", offset));
            }
            (None, None) => {}
        }

        let count = format!("SELECT COUNT(*) FROM {} WHERE {}", T::TABLE, where_clause);

        Self { select, count, params }
    }
}

fn column_names(columns: &[Column]) -> String {
    columns.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}

fn insert_sql<T: LogRecord>(placeholder: fn(usize) -> String) -> String {
    let columns = T::columns();
    let placeholders: Vec<String> = (1..=columns.len()).map(placeholder).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::TABLE,
        column_names(&columns),
        placeholders.join(", ")
    )
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use rusqlite::types::Value;

    use super::*;

    pub fn placeholder(index: usize) -> String {
        format!("?{}", index)
    }

    pub fn to_value(value: SqlValue) -> Value {
        match value {
            SqlValue::Null => Value::Null,
            SqlValue::Text(text) => Value::Text(text),
            SqlValue::Integer(integer) => Value::Integer(integer),
            SqlValue::Real(real) => Value::Real(real),
        }
    }

    pub fn from_value(table: &str, value: Value) -> Result<SqlValue, RepositoryError> {
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Text(text) => Ok(SqlValue::Text(text)),
            Value::Integer(integer) => Ok(SqlValue::Integer(integer)),
            Value::Real(real) => Ok(SqlValue::Real(real)),
            Value::Blob(_) => Err(RepositoryError::Decode(format!("{}: unexpected blob column", table))),
        }
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    use tokio_postgres::types::ToSql;
    use tokio_postgres::Row;

    use super::*;
    use crate::models::ColumnKind;

    pub type Param = Box<dyn ToSql + Sync + Send>;

    pub fn placeholder(index: usize) -> String {
        format!("${}", index)
    }

    /// Postgres checks parameter types, so NULLs need the column's type
    pub fn to_param(value: SqlValue, kind: ColumnKind) -> Param {
        match (value, kind) {
            (SqlValue::Null, ColumnKind::Text) => Box::new(None::<String>),
            (SqlValue::Null, ColumnKind::Integer) => Box::new(None::<i64>),
            (SqlValue::Null, ColumnKind::Real) => Box::new(None::<f64>),
            (SqlValue::Integer(integer), ColumnKind::Real) => Box::new(integer as f64),
            (SqlValue::Text(text), _) => Box::new(text),
            (SqlValue::Integer(integer), _) => Box::new(integer),
            (SqlValue::Real(real), _) => Box::new(real),
        }
    }

    pub fn read_row(row: &Row, columns: &[Column]) -> Result<Vec<SqlValue>, RepositoryError> {
        columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let value = match column.kind {
                    ColumnKind::Text => row.try_get::<_, Option<String>>(index)?.into(),
                    ColumnKind::Integer => row.try_get::<_, Option<i64>>(index)?.into(),
                    ColumnKind::Real => row.try_get::<_, Option<f64>>(index)?.into(),
                };
                Ok(value)
            })
            .collect()
    }
}

impl DatabaseStorage {
    /// Insert one record into its table
    pub async fn insert<T: LogRecord>(pool: &DatabasePool, record: &T) -> Result<(), RepositoryError> {
        debug!("Storing record in {}: id={}", T::TABLE, record.header().id);

        match pool {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let sql = insert_sql::<T>(sqlite::placeholder);
                let values = record.values().into_iter().map(sqlite::to_value);

                conn.execute(&sql, rusqlite::params_from_iter(values))?;

                Ok(())
            },

            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                let client = pool.get().await
                    .map_err(|e| RepositoryError::Database(crate::database::DatabaseError::GenericError(e.to_string())))?;

                let sql = insert_sql::<T>(postgres::placeholder);
                let params: Vec<postgres::Param> = record
                    .values()
                    .into_iter()
                    .zip(T::columns())
                    .map(|(value, column)| postgres::to_param(value, column.kind))
                    .collect();
                let refs: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> =
                    params.iter().map(|p| p.as_ref() as &(dyn tokio_postgres::types::ToSql + Sync)).collect();

                client.execute(sql.as_str(), &refs).await?;

                Ok(())
            },
        }
    }

    /// One page of a user's records plus the total number matching the filter
    pub async fn list_for_user<T: LogRecord>(
        pool: &DatabasePool,
        user_id: &str,
        filter: &EntryFilter,
    ) -> Result<(Vec<T>, usize), RepositoryError> {
        debug!("Listing {} for user {} with filter {:?}", T::TABLE, user_id, filter);

        match pool {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let query = ListQuery::build::<T>(user_id, filter, sqlite::placeholder, Some("-1"));
                let params: Vec<rusqlite::types::Value> =
                    query.params.into_iter().map(sqlite::to_value).collect();

                let total: i64 = conn.query_row(
                    &query.count,
                    rusqlite::params_from_iter(params.iter()),
                    |row| row.get(0),
                )?;

                let column_count = T::columns().len();
                let mut stmt = conn.prepare(&query.select)?;
                let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
                    (0..column_count)
                        .map(|index| row.get::<_, rusqlite::types::Value>(index))
                        .collect::<Result<Vec<_>, _>>()
                })?;

                let mut records = Vec::new();
                for row in rows {
                    let values = row?
                        .into_iter()
                        .map(|value| sqlite::from_value(T::TABLE, value))
                        .collect::<Result<Vec<_>, _>>()?;
                    records.push(T::from_values(values)?);
                }

                Ok((records, total as usize))
            },

            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                let client = pool.get().await
                    .map_err(|e| RepositoryError::Database(crate::database::DatabaseError::GenericError(e.to_string())))?;

                let query = ListQuery::build::<T>(user_id, filter, postgres::placeholder, None);
                // every filter parameter is text
                let params: Vec<postgres::Param> = query
                    .params
                    .into_iter()
                    .map(|value| postgres::to_param(value, crate::models::ColumnKind::Text))
                    .collect();
                let refs: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> =
                    params.iter().map(|p| p.as_ref() as &(dyn tokio_postgres::types::ToSql + Sync)).collect();

                let total: i64 = client.query_one(query.count.as_str(), &refs).await?.try_get(0)?;

                let columns = T::columns();
                let mut records = Vec::new();
                for row in client.query(query.select.as_str(), &refs).await? {
                    records.push(T::from_values(postgres::read_row(&row, &columns)?)?);
                }

                Ok((records, total as usize))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::water::{NewWaterRecord, WaterRecord};

    fn numbered(index: usize) -> String {
        format!("?{}", index)
    }

    #[test]
    fn test_insert_sql_lists_every_column() {
        let sql = insert_sql::<WaterRecord>(numbered);
        assert_eq!(
            sql,
            "INSERT INTO water_entries (id, user_id, timestamp, created_at, ml) VALUES (?1, ?2, ?3, ?4, ?5)"
        );
    }

    #[test]
    fn test_list_query_with_bounds_and_page() {
        let filter = EntryFilter {
            start: Some("2024-01-01T00:00:00.000Z".to_string()),
            end: Some("2024-02-01T00:00:00.000Z".to_string()),
            limit: Some(10),
            offset: Some(20),
            sort_desc: Some(false),
        };

        let query = ListQuery::build::<WaterRecord>("alice", &filter, numbered, Some("-1"));

        assert!(query.select.contains("WHERE user_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3"));
        assert!(query.select.contains("ORDER BY timestamp ASC"));
        assert!(query.select.ends_with("LIMIT 10 OFFSET 20"));
        assert_eq!(query.count, "SELECT COUNT(*) FROM water_entries WHERE user_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3");
        assert_eq!(query.params.len(), 3);
    }

    #[test]
    fn test_offset_without_limit_uses_unlimited_marker() {
        let filter = EntryFilter {
            offset: Some(5),
            ..Default::default()
        };

        let query = ListQuery::build::<WaterRecord>("alice", &filter, numbered, Some("-1"));
        assert!(query.select.ends_with("LIMIT -1 OFFSET 5"));

        let query = ListQuery::build::<WaterRecord>("alice", &filter, numbered, None);
        assert!(query.select.ends_with("DESC OFFSET 5"));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_sqlite_insert_and_list() {
        use crate::database::{in_memory_sqlite_pool, run_migrations, DatabaseConfig};

        let pool = in_memory_sqlite_pool(&DatabaseConfig::default()).unwrap();
        run_migrations(&pool).await.unwrap();

        for (id, user, ml, ts) in [
            ("1", "alice", 250, "2024-01-01T08:00:00.000Z"),
            ("2", "alice", 500, "2024-01-02T08:00:00.000Z"),
            ("3", "bob", 750, "2024-01-03T08:00:00.000Z"),
        ] {
            let record = WaterRecord::from_new(
                id.to_string(),
                ts.to_string(),
                NewWaterRecord {
                    user_id: user.to_string(),
                    ml,
                    timestamp: ts.to_string(),
                },
            );
            DatabaseStorage::insert(&pool, &record).await.unwrap();
        }

        let (records, total) = DatabaseStorage::list_for_user::<WaterRecord>(
            &pool,
            "alice",
            &EntryFilter { limit: Some(1), ..Default::default() },
        )
        .await
        .unwrap();

        assert_eq!(total, 2);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "2");
        assert_eq!(records[0].ml, 500);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_sqlite_duplicate_id_is_constraint() {
        use crate::database::{in_memory_sqlite_pool, run_migrations, DatabaseConfig};

        let pool = in_memory_sqlite_pool(&DatabaseConfig::default()).unwrap();
        run_migrations(&pool).await.unwrap();

        let record = WaterRecord::from_new(
            "dup".to_string(),
            "2024-01-01T08:00:00.000Z".to_string(),
            NewWaterRecord {
                user_id: "alice".to_string(),
                ml: 100,
                timestamp: "2024-01-01T08:00:00.000Z".to_string(),
            },
        );

        DatabaseStorage::insert(&pool, &record).await.unwrap();
        let err = DatabaseStorage::insert(&pool, &record).await.unwrap_err();
        assert!(err.is_rejection());
    }
}
