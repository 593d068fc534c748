use crate::database::Database;
use crate::error::BootstrapError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the SQL files used to populate an empty database
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapFiles {
    pub schema: PathBuf,
    pub sample_data: PathBuf,
}

/// Reads a SQL file whole and executes it as one transactional script
pub fn execute_sql_file(db: &mut dyn Database, path: &Path) -> Result<(), BootstrapError> {
    let sql = fs::read_to_string(path).map_err(|source| BootstrapError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), bytes = sql.len(), "executing SQL file");
    db.execute_script(&sql)
        .map_err(|source| BootstrapError::Execute {
            path: path.to_path_buf(),
            source,
        })
}

/// Creates the schema, then loads the sample data.
///
/// Stops at the first failing file, so the sample data never runs against a
/// schema that failed to apply.
pub fn bootstrap(db: &mut dyn Database, files: &BootstrapFiles) -> Result<(), BootstrapError> {
    execute_sql_file(db, &files.schema)?;
    println!("Schema created successfully");

    execute_sql_file(db, &files.sample_data)?;
    println!("Sample data inserted successfully");

    Ok(())
}
