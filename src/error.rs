use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} not found")]
    MissingVar(&'static str),

    #[error("failed to read environment file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a database backend
#[derive(Error, Debug)]
pub enum DbError {
    #[error("failed to connect to the database: {0}")]
    Connection(String),

    #[error("unsupported database URL '{0}' (expected postgres:// or sqlite:)")]
    UnsupportedUrl(String),

    #[error(transparent)]
    Postgres(#[from] postgres::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Result alias for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while executing a bootstrap SQL file
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to read SQL file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to execute SQL file {}: {source}", path.display())]
    Execute {
        path: PathBuf,
        #[source]
        source: DbError,
    },
}
