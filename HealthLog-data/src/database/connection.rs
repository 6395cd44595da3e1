//! Database connection module for the HealthLog application
//!
//! This module provides database connectivity with support for multiple database backends:
//! - SQLite (default)
//! - PostgreSQL (optional)

use std::env;
use std::sync::Arc;
use thiserror::Error;
use once_cell::sync::OnceCell;
use tracing::{info, error, warn};

use super::migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
    /// PostgreSQL database
    PostgreSQL,
}

impl std::str::FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            "postgresql" | "postgres" => Ok(DatabaseType::PostgreSQL),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database connection pool enum for different database types
#[derive(Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    #[cfg(feature = "sqlite")]
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),

    /// PostgreSQL connection pool
    #[cfg(feature = "postgres")]
    PostgreSQL(Arc<deadpool_postgres::Pool>),
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(_) => write!(f, "DatabasePool::SQLite"),
            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(_) => write!(f, "DatabasePool::PostgreSQL"),
            #[allow(unreachable_patterns)]
            _ => write!(f, "DatabasePool"),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    /// PostgreSQL error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    PostgresError(#[from] tokio_postgres::Error),

    /// Database pool already initialized
    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// Generic database error
    #[error("Database error: {0}")]
    GenericError(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database type (sqlite, postgresql)
    pub db_type: DatabaseType,
    /// Connection string for PostgreSQL
    pub connection_string: Option<String>,
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Connection pool size
    pub pool_size: u32,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            connection_string: None,
            sqlite_path: Some("./data/health_log.db".to_string()),
            pool_size: 5,
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let db_type_str = env::var("DB_TYPE").unwrap_or_else(|_| "sqlite".to_string());
        let db_type: DatabaseType = db_type_str.parse()?;

        // Used for PostgreSQL
        let connection_string = env::var("DB_CONNECTION").ok();

        let sqlite_path = env::var("DB_SQLITE_PATH").ok();

        match db_type {
            DatabaseType::Sqlite => {
                if let Some(ref path) = sqlite_path {
                    info!("Using SQLite database at: {}", path);
                } else {
                    info!("No DB_SQLITE_PATH provided, will use default path: data/health_log.db");
                }
            },
            DatabaseType::PostgreSQL => {
                if connection_string.is_none() {
                    return Err(DatabaseError::EnvVarNotFound("DB_CONNECTION".to_string()));
                }
                info!("Using PostgreSQL database with provided connection string");
            },
        }

        let pool_size = env::var("DB_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(20);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!("Database configuration: pool_size={}, max_connections={}, timeout={}s",
            pool_size, max_connections, timeout_seconds);

        Ok(DatabaseConfig {
            db_type,
            connection_string,
            sqlite_path,
            pool_size,
            max_connections,
            timeout_seconds,
        })
    }
}

/// Initialize the global database connection pool and run migrations
pub async fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env()?;

    info!("Initializing database pool with type: {:?}", config.db_type);

    let pool = create_pool(&config)?;
    run_migrations(&pool).await?;

    DB_POOL.set(pool).map_err(|_| DatabaseError::PoolAlreadyInitialized)
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get()
        .cloned()
        .ok_or(DatabaseError::PoolNotInitialized)
}

/// Build a pool for the configured backend without registering it globally
pub fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    match config.db_type {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => initialize_sqlite_pool(config),
        #[cfg(feature = "postgres")]
        DatabaseType::PostgreSQL => initialize_postgres_pool(config),
        #[allow(unreachable_patterns)]
        other => Err(DatabaseError::UnsupportedDatabaseType(format!(
            "{:?} (feature not enabled)",
            other
        ))),
    }
}

/// Initialize SQLite connection pool
#[cfg(feature = "sqlite")]
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    let sqlite_path = config.sqlite_path.clone()
        .unwrap_or_else(|| "data/health_log.db".to_string());

    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager) {
            Ok(pool) => {
                info!("SQLite connection pool created successfully");
                Ok(DatabasePool::SQLite(Arc::new(pool)))
            },
            Err(e) => {
                error!("Failed to create SQLite connection pool: {}", e);
                warn!("Falling back to in-memory SQLite database");
                in_memory_sqlite_pool(config)
            }
        }
}

/// Create an in-memory SQLite pool.
///
/// Every SQLite memory connection is its own database, so the pool holds a
/// single connection.
#[cfg(feature = "sqlite")]
pub fn in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = r2d2_sqlite::SqliteConnectionManager::memory();

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Initialize PostgreSQL connection pool
#[cfg(feature = "postgres")]
fn initialize_postgres_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use deadpool_postgres::{Config, ManagerConfig, PoolConfig, RecyclingMethod, Runtime};

    let connection_string = config.connection_string
        .as_ref()
        .ok_or_else(|| DatabaseError::EnvVarNotFound("DB_CONNECTION".to_string()))?;

    let mut pool_config = Config::new();
    pool_config.url = Some(connection_string.clone());
    pool_config.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    pool_config.pool = Some(PoolConfig {
        max_size: config.pool_size as usize,
        ..Default::default()
    });

    let pool = pool_config.create_pool(Some(Runtime::Tokio1), tokio_postgres::NoTls)
        .map_err(|e| DatabaseError::GenericError(format!("Failed to create PostgreSQL pool: {}", e)))?;

    info!("PostgreSQL connection pool created");
    Ok(DatabasePool::PostgreSQL(Arc::new(pool)))
}

/// Create every log table on the given pool
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    match pool {
        #[cfg(feature = "sqlite")]
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            migrations::run_sqlite_migrations(&conn)?;
        },
        #[cfg(feature = "postgres")]
        DatabasePool::PostgreSQL(pool) => {
            let client = pool.get().await
                .map_err(|e| DatabaseError::GenericError(e.to_string()))?;
            migrations::run_postgres_migrations(&client).await?;
        },
    }

    info!("Database migrations completed successfully");

    Ok(())
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    let pool = DB_POOL.get()?;
    Some(describe_pool(pool))
}

/// Human-readable description of a pool and its state
pub fn describe_pool(pool: &DatabasePool) -> String {
    match pool {
        #[cfg(feature = "sqlite")]
        DatabasePool::SQLite(pool) => match pool.get() {
            Ok(conn) => {
                let location = match conn.query_row(
                    "PRAGMA database_list",
                    [],
                    |row| row.get::<_, String>(2),
                ) {
                    Ok(path) if path.is_empty() || path == ":memory:" => "SQLite in-memory database".to_string(),
                    Ok(path) => format!("SQLite database at {}", path),
                    Err(_) => "SQLite database (path unknown)".to_string(),
                };

                let state = pool.state();
                format!("{} (connections: active={}, idle={})",
                    location,
                    state.connections,
                    state.idle_connections
                )
            },
            Err(e) => {
                error!("Failed to get SQLite connection: {}", e);
                format!("SQLite connection error: {}", e)
            }
        },
        #[cfg(feature = "postgres")]
        DatabasePool::PostgreSQL(pool) => {
            let status = pool.status();
            format!(
                "PostgreSQL database configured (size={}, available={})",
                status.size,
                status.available
            )
        }
    }
}
