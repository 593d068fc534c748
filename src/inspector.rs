use crate::database::Database;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Tables checked on every inspection pass, in report order
pub const TRACKED_TABLES: [&str; 5] = [
    "categories",
    "products",
    "customers",
    "orders",
    "order_items",
];

/// What an inspection pass found for one table
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum TableStatus {
    /// The table exists and holds this many rows
    Rows(i64),
    /// The table is not in the catalog
    Missing,
    /// The existence check or the count failed
    Failed(String),
}

impl TableStatus {
    pub fn row_count(&self) -> Option<i64> {
        match self {
            TableStatus::Rows(count) => Some(*count),
            _ => None,
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Rows(count) => write!(f, "{} rows", count),
            TableStatus::Missing => write!(f, "table does not exist"),
            TableStatus::Failed(message) => write!(f, "error: {}", message),
        }
    }
}

/// Status of a single tracked table
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TableReport {
    pub table: String,
    #[serde(flatten)]
    pub status: TableStatus,
}

/// Result of one inspection pass over the tracked tables
#[derive(Serialize, Debug, Clone)]
pub struct InspectionReport {
    pub inspected_at: DateTime<Utc>,
    pub tables: Vec<TableReport>,
}

impl InspectionReport {
    /// Looks up the status recorded for a table
    pub fn status(&self, table: &str) -> Option<&TableStatus> {
        self.tables
            .iter()
            .find(|report| report.table == table)
            .map(|report| &report.status)
    }

    /// Sums the row counts of tables that were counted.
    ///
    /// Missing and failed tables contribute nothing.
    pub fn total_rows(&self) -> i64 {
        self.tables
            .iter()
            .filter_map(|report| report.status.row_count())
            .sum()
    }

    /// True when no counted table holds any row
    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.tables {
            writeln!(f, "  {}: {}", report.table, report.status)?;
        }
        Ok(())
    }
}

/// Runs one inspection pass.
///
/// Each table gets an existence check and, if it exists, a row count. A
/// failure on one table is recorded in its status and does not stop the pass.
pub fn inspect(db: &mut dyn Database, tables: &[&str]) -> InspectionReport {
    let inspected_at = Utc::now();
    let tables = tables
        .iter()
        .map(|table| TableReport {
            table: table.to_string(),
            status: inspect_table(db, table),
        })
        .collect();

    InspectionReport {
        inspected_at,
        tables,
    }
}

fn inspect_table(db: &mut dyn Database, table: &str) -> TableStatus {
    let exists = match db.table_exists(table) {
        Ok(exists) => exists,
        Err(e) => {
            warn!(table, error = %e, "existence check failed");
            return TableStatus::Failed(e.to_string());
        }
    };

    if !exists {
        debug!(table, "table not found");
        return TableStatus::Missing;
    }

    match db.count_rows(table) {
        Ok(count) => {
            debug!(table, count, "counted rows");
            TableStatus::Rows(count)
        }
        Err(e) => {
            warn!(table, error = %e, "row count failed");
            TableStatus::Failed(e.to_string())
        }
    }
}
