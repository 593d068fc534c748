use crate::error::ConfigError;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Name of the variable holding the database connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Connection settings required by the tool
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVar(DATABASE_URL_VAR))?;

        Ok(Config { database_url })
    }
}

/// Parses an environment file into `KEY=VALUE` pairs.
///
/// Each line is split once on the first `=` and the value is kept literally:
/// quotes, `$` and `#` are ordinary characters. Blank lines, `#` comments,
/// lines without `=` and lines with an empty key are skipped. Invalid UTF-8 is
/// replaced rather than rejected. A file that does not exist yields no pairs.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no environment file found");
        return Ok(Vec::new());
    }

    let bytes = fs::read(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_env_lines(&String::from_utf8_lossy(&bytes)))
}

fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                pairs.push((key.trim().to_string(), value.to_string()));
            }
            _ => trace!(line, "skipping malformed environment line"),
        }
    }
    pairs
}

/// Loads an environment file into the process environment, overriding
/// existing values. Returns the number of variables applied.
pub fn load_env_file(path: &Path) -> Result<usize, ConfigError> {
    let pairs = read_env_file(path)?;
    for (key, value) in &pairs {
        env::set_var(key, value);
    }

    debug!(path = %path.display(), count = pairs.len(), "loaded environment file");
    Ok(pairs.len())
}
