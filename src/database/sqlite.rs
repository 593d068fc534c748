use super::{quote_identifier, Database};
use crate::error::DbResult;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, warn};

/// A SQLite connection, on disk or in memory
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Opens (or creates) the database at `path`; `:memory:` opens an in-memory database
    pub fn open(path: &str) -> DbResult<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        Ok(SqliteDatabase { conn })
    }

    /// Runs a script that opens its own transaction, without wrapping it
    fn execute_self_managed(&self, sql: &str) -> DbResult<()> {
        if let Err(e) = self.conn.execute_batch(sql) {
            self.rollback_open_transaction();
            return Err(e.into());
        }
        self.commit_open_transaction()
    }

    // The script may already have ended the transaction with COMMIT or ROLLBACK
    fn commit_open_transaction(&self) -> DbResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback_open_transaction(&self) {
        if self.conn.is_autocommit() {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!(error = %e, "rollback failed");
        }
    }
}

fn is_nested_begin(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(message))
            if message.contains("cannot start a transaction within a transaction")
    )
}

impl Database for SqliteDatabase {
    fn table_exists(&mut self, table: &str) -> DbResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn count_rows(&mut self, table: &str) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    fn execute_script(&mut self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch("BEGIN")?;
        match self.conn.execute_batch(sql) {
            Ok(()) => self.commit_open_transaction(),
            Err(e) if is_nested_begin(&e) => {
                debug!("script manages its own transaction");
                self.rollback_open_transaction();
                self.execute_self_managed(sql)
            }
            Err(e) => {
                debug!(error = %e, "rolling back script");
                self.rollback_open_transaction();
                Err(e.into())
            }
        }
    }

    fn close(self: Box<Self>) -> DbResult<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
