//! ora-export CLI - export table DDL and sync DML from a live Oracle database.

use clap::{ArgGroup, Parser};
use ora_export::{Config, ExportError, ExportMode, Exporter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "ora-export")]
#[command(about = "Export table DDL and synchronization DML from a live Oracle database")]
#[command(version)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .multiple(true)
        .args(["ddl", "sync_dml"])
))]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Database schema owning the tables
    #[arg(long)]
    schema: String,

    /// Generate CREATE TABLE DDL scripts
    #[arg(long)]
    ddl: bool,

    /// Generate synchronization DML scripts (INSERT/UPDATE/DELETE)
    #[arg(long)]
    sync_dml: bool,

    /// Override the output directory from the configuration file
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the run summary as JSON to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    /// Tables to export
    #[arg(required = true)]
    tables: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, ExportError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(ExportError::Config)?;

    let mut config = Config::load(&cli.config)?;
    if let Some(dir) = cli.output_dir {
        config.export.output_dir = dir;
    }
    info!("Loaded configuration from {:?}", cli.config);

    let mut modes = Vec::new();
    if cli.ddl {
        modes.push(ExportMode::Ddl);
    }
    if cli.sync_dml {
        modes.push(ExportMode::SyncDml);
    }

    let exporter = Exporter::new(&config).await?;
    let result = exporter.run(&modes, &cli.schema, &cli.tables).await?;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        println!("\nExport completed!");
        println!("  Duration: {:.2}s", result.duration_seconds);
        println!(
            "  Tables: {}/{}",
            result.tables_success, result.tables_total
        );
        println!("  Files: {}", result.files_written.len());
        if !result.failed_tables.is_empty() {
            println!("  Failed tables: {:?}", result.failed_tables);
        }
    }

    if result.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(3))
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
