use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

const SCHEMA: &str = include_str!("fixtures/schema.sql");
const SAMPLE_DATA: &str = include_str!("fixtures/sample_data.sql");

// Lays out backend/.env and database/*.sql the way the tool expects them
fn project_dir(env_file: Option<&str>, schema: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("backend")).unwrap();
    fs::create_dir_all(dir.path().join("database")).unwrap();

    if let Some(contents) = env_file {
        fs::write(dir.path().join("backend").join(".env"), contents).unwrap();
    }
    fs::write(dir.path().join("database").join("schema.sql"), schema).unwrap();
    fs::write(dir.path().join("database").join("sample_data.sql"), SAMPLE_DATA).unwrap();
    dir
}

fn run_tool(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shop-db-check"))
        .args(args)
        .current_dir(dir)
        .env_clear()
        .output()
        .unwrap()
}

fn sqlite_url(dir: &Path) -> String {
    format!("sqlite://{}", dir.join("shop.db").display())
}

#[test]
fn test_missing_database_url_exits_with_failure() {
    let dir = project_dir(None, SCHEMA);

    let output = run_tool(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DATABASE_URL"));
    assert!(!dir.path().join("shop.db").exists());
}

#[test]
fn test_bootstraps_empty_database_despite_malformed_env_lines() {
    let dir = project_dir(None, SCHEMA);
    let env_file = format!(
        "# local settings\n\nnot a valid line\nDATABASE_URL={}\n",
        sqlite_url(dir.path())
    );
    fs::write(dir.path().join("backend").join(".env"), env_file).unwrap();

    let output = run_tool(dir.path(), &[]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert!(stdout.contains("categories: table does not exist"));
    assert!(stdout.contains("Schema created successfully"));
    assert!(stdout.contains("Sample data inserted successfully"));
    assert!(stdout.contains("order_items: 3 rows"));
    assert!(stdout.contains("Check complete!"));
}

#[test]
fn test_second_run_leaves_database_alone() {
    let dir = project_dir(None, SCHEMA);
    let env_file = format!("DATABASE_URL={}\n", sqlite_url(dir.path()));
    fs::write(dir.path().join("backend").join(".env"), env_file).unwrap();

    let first = run_tool(dir.path(), &[]);
    assert_eq!(first.status.code(), Some(0));

    let second = run_tool(dir.path(), &[]);
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert_eq!(second.status.code(), Some(0));
    assert!(stdout.contains("categories: 2 rows"));
    assert!(!stdout.contains("Populating"));
}

#[test]
fn test_failing_schema_exits_with_failure() {
    let dir = project_dir(None, "CREATE TABLE categories (id INTEGER);\nTHIS IS NOT SQL;");
    let env_file = format!("DATABASE_URL={}\n", sqlite_url(dir.path()));
    fs::write(dir.path().join("backend").join(".env"), env_file).unwrap();

    let output = run_tool(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Sample data inserted"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schema.sql"));
}

#[test]
fn test_inspect_json_does_not_modify_database() {
    let dir = project_dir(None, SCHEMA);
    let env_file = format!("DATABASE_URL={}\n", sqlite_url(dir.path()));
    fs::write(dir.path().join("backend").join(".env"), env_file).unwrap();

    let output = run_tool(dir.path(), &["inspect", "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tables = report["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 5);
    assert!(tables.iter().all(|t| t["status"] == "missing"));
}

#[test]
fn test_broken_env_lines_do_not_hide_database_url() {
    let dir = project_dir(None, SCHEMA);
    let mut env_file = b"GREETING=it's broken\nNOTE=caf\xe9\n".to_vec();
    env_file.extend_from_slice(format!("DATABASE_URL={}\n", sqlite_url(dir.path())).as_bytes());
    fs::write(dir.path().join("backend").join(".env"), env_file).unwrap();

    let output = run_tool(dir.path(), &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr);
    assert!(dir.path().join("shop.db").exists());
}
