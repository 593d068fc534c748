//! Database backends behind a common trait.
//!
//! The backend is chosen from the connection string scheme: `postgres://` and
//! `postgresql://` use the `postgres` driver, `sqlite:` URLs use `rusqlite`.

mod postgres;
mod sqlite;

pub use self::postgres::PostgresDatabase;
pub use self::sqlite::SqliteDatabase;

use crate::error::{DbError, DbResult};
use tracing::info;

/// Operations the inspector and bootstrapper need from a connection
pub trait Database {
    /// Checks the catalog for a table with the given name
    fn table_exists(&mut self, table: &str) -> DbResult<bool>;

    /// Counts the rows of an existing table
    fn count_rows(&mut self, table: &str) -> DbResult<i64>;

    /// Executes a whole SQL script inside one transaction.
    ///
    /// The transaction is rolled back if any statement fails.
    fn execute_script(&mut self, sql: &str) -> DbResult<()>;

    /// Closes the connection
    fn close(self: Box<Self>) -> DbResult<()>;

    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;
}

/// Opens a connection for the given URL
pub fn connect(url: &str) -> DbResult<Box<dyn Database>> {
    let is_postgres = url.starts_with("postgres://") || url.starts_with("postgresql://");
    let db: Box<dyn Database> = if is_postgres {
        Box::new(PostgresDatabase::connect(url)?)
    } else if let Some(path) = sqlite_path(url) {
        Box::new(SqliteDatabase::open(path)?)
    } else {
        return Err(DbError::UnsupportedUrl(url.to_string()));
    };

    info!(backend = db.backend_name(), "connected to database");
    Ok(db)
}

/// Extracts the file path (or `:memory:`) from a `sqlite:` URL
fn sqlite_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite:")?;
    let path = rest.strip_prefix("//").unwrap_or(rest);
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Quotes a table name for interpolation into SQL
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
