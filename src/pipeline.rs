use crate::bootstrap::{bootstrap, BootstrapFiles};
use crate::database::Database;
use crate::error::BootstrapError;
use crate::inspector::{inspect, InspectionReport, TRACKED_TABLES};
use tracing::info;

/// How a check run ended
#[derive(Debug)]
pub enum CheckOutcome {
    /// At least one tracked table held rows, nothing was executed
    AlreadyPopulated(InspectionReport),
    /// The database was empty and has been populated
    Bootstrapped {
        before: InspectionReport,
        after: InspectionReport,
    },
}

/// Inspects the tracked tables and populates the database if they are all empty
pub fn run_check(
    db: &mut dyn Database,
    files: &BootstrapFiles,
) -> Result<CheckOutcome, BootstrapError> {
    println!("\nChecking tables...");
    let before = inspect(db, &TRACKED_TABLES);
    print!("{}", before);

    if !before.is_empty() {
        info!(total_rows = before.total_rows(), "database already populated");
        return Ok(CheckOutcome::AlreadyPopulated(before));
    }

    println!("\nDatabase is empty. Populating with sample data...");
    bootstrap(db, files)?;

    println!("\nChecking tables after population...");
    let after = inspect(db, &TRACKED_TABLES);
    print!("{}", after);

    Ok(CheckOutcome::Bootstrapped { before, after })
}
