use clap::{Parser, Subcommand};
use shop_db_check::bootstrap::BootstrapFiles;
use shop_db_check::config::{load_env_file, Config};
use shop_db_check::database::{self, Database};
use shop_db_check::inspector::{inspect, TRACKED_TABLES};
use shop_db_check::pipeline::run_check;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Check the shop database and populate it when empty",
    long_about = None
)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    /// Environment file loaded before reading DATABASE_URL
    #[arg(long, value_name = "FILE", default_value = "backend/.env")]
    env_file: PathBuf,

    /// Schema file executed when the database is empty
    #[arg(long, value_name = "FILE", default_value = "database/schema.sql")]
    schema: PathBuf,

    /// Sample data file executed after the schema
    #[arg(long, value_name = "FILE", default_value = "database/sample_data.sql")]
    sample_data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report row counts and populate the database if it is empty (default)
    Check,

    /// Report row counts without modifying the database
    Inspect {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(debug: u8) {
    let default_level = match debug {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads configuration and opens the connection; any failure here ends the process
fn connect(cli: &Cli) -> Result<Box<dyn Database>, ExitCode> {
    if let Err(e) = load_env_file(&cli.env_file) {
        eprintln!("Error: {}", e);
        return Err(ExitCode::FAILURE);
    }

    let config = Config::from_env().map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    })?;

    database::connect(&config.database_url).map_err(|e| {
        eprintln!("Error connecting to the database: {}", e);
        ExitCode::FAILURE
    })
}

fn close(db: Box<dyn Database>) {
    if let Err(e) = db.close() {
        error!(error = %e, "failed to close connection");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let quiet = matches!(cli.command, Some(Commands::Inspect { json: true }));
    if !quiet {
        println!("Checking database...");
    }

    let mut db = match connect(&cli) {
        Ok(db) => db,
        Err(code) => return code,
    };

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => {
            let files = BootstrapFiles {
                schema: cli.schema,
                sample_data: cli.sample_data,
            };

            if let Err(e) = run_check(db.as_mut(), &files) {
                eprintln!("Error: {}", e);
                close(db);
                return ExitCode::FAILURE;
            }
        }

        Commands::Inspect { json } => {
            let report = inspect(db.as_mut(), &TRACKED_TABLES);
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error: failed to serialize report: {}", e);
                        close(db);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{}", report);
            }
        }
    }

    close(db);
    if !quiet {
        println!("\nCheck complete!");
    }
    ExitCode::SUCCESS
}
