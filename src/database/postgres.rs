use super::{quote_identifier, Database};
use crate::error::{DbError, DbResult};
use ::postgres::{Client, NoTls};
use tracing::{debug, warn};

const TABLE_EXISTS_SQL: &str = "SELECT EXISTS (
        SELECT FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_name = $1
    )";

/// A PostgreSQL connection
pub struct PostgresDatabase {
    client: Client,
}

impl PostgresDatabase {
    /// Connects using a `postgres://` connection string
    pub fn connect(url: &str) -> DbResult<Self> {
        let client = Client::connect(url, NoTls).map_err(|e| DbError::Connection(e.to_string()))?;
        Ok(PostgresDatabase { client })
    }
}

impl Database for PostgresDatabase {
    fn table_exists(&mut self, table: &str) -> DbResult<bool> {
        let row = self.client.query_one(TABLE_EXISTS_SQL, &[&table])?;
        Ok(row.try_get(0)?)
    }

    fn count_rows(&mut self, table: &str) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let row = self.client.query_one(sql.as_str(), &[])?;
        Ok(row.try_get(0)?)
    }

    fn execute_script(&mut self, sql: &str) -> DbResult<()> {
        let mut tx = self.client.transaction()?;
        // Simple query protocol, so the whole file goes over as one batch
        match tx.batch_execute(sql) {
            Ok(()) => {
                tx.commit()?;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "rolling back script");
                if let Err(rollback) = tx.rollback() {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(e.into())
            }
        }
    }

    fn close(self: Box<Self>) -> DbResult<()> {
        self.client.close()?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
