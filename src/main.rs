use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use chronicle::backup::RestoreStatus;
use chronicle::{AppContext, Config, DataPaths};

#[derive(Parser)]
#[command(
    name = "chronicle",
    version,
    about = "Back up, restore and exchange game records",
    long_about = "Chronicle keeps achievement progress, gacha history and abyss \
                  records in a local store, backs them up to a directory and \
                  exchanges them with other tools as UIAF/UIGF files."
)]
struct Cli {
    /// Data directory (defaults to ~/.chronicle)
    #[arg(long, global = true, env = "CHRONICLE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every category to a backup directory
    Backup {
        /// Target directory (defaults to the configured backup directory)
        dir: Option<PathBuf>,
    },

    /// Merge a backup directory into the local store
    Restore {
        /// Source directory (defaults to the configured backup directory)
        dir: Option<PathBuf>,
    },

    /// Merge a single UIAF or UIGF file
    #[command(subcommand)]
    Import(ImportCommands),

    /// Write a single UIAF or UIGF file
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show what an interchange file contains without importing it
    Inspect { file: PathBuf },

    /// Summarize the local store
    Status,

    /// Delete the gacha history of one uid
    ClearGacha { uid: String },
}

#[derive(Subcommand)]
enum ImportCommands {
    /// Import a UIAF achievement file
    Achievements { file: PathBuf },
    /// Import a UIGF gacha file
    Gacha { file: PathBuf },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Export achievements as UIAF
    Achievements { file: PathBuf },
    /// Export the gacha history of a uid as UIGF
    Gacha { uid: String, file: PathBuf },
}

fn init_logging(paths: &DataPaths, default_level: &str) -> Result<()> {
    fs::create_dir_all(paths.logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths.log_file_path())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = DataPaths::new(cli.data_dir);
    // The log level lives in the config file, so read it before logging starts
    let log_level = match Config::load(&paths.config_path()) {
        Ok(config) => config.log_level,
        Err(e) => {
            eprintln!(
                "warning: ignoring {}: {e}",
                paths.config_path().display()
            );
            "info".to_string()
        }
    };
    init_logging(&paths, &log_level)?;

    let ctx = AppContext::open(paths.clone())
        .with_context(|| format!("opening data directory {}", paths.data_dir().display()))?;
    let orchestrator = ctx.orchestrator();

    match cli.command {
        Commands::Backup { dir } => {
            let dir = dir.unwrap_or_else(|| ctx.backup_dir());
            let report = orchestrator.backup(&dir).await?;
            if cli.json {
                return print_json(&report);
            }
            println!("Backup written to {}", report.dir.display());
            for file in &report.files {
                println!("  {:<24} {:>6} records", file.name, file.records);
            }
        }
        Commands::Restore { dir } => {
            let dir = dir.unwrap_or_else(|| ctx.backup_dir());
            let report = orchestrator.restore(&dir).await?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("Restoring from {}", dir.display());
                for outcome in &report.outcomes {
                    let file = outcome.file.as_deref().unwrap_or("-");
                    match &outcome.status {
                        RestoreStatus::Merged { summary } => {
                            println!("  {:<13} {:<24} {}", outcome.category, file, summary)
                        }
                        RestoreStatus::NotFound => {
                            println!("  {:<13} {:<24} not found", outcome.category, file)
                        }
                        RestoreStatus::Failed { reason } => {
                            println!("  {:<13} {:<24} FAILED: {}", outcome.category, file, reason)
                        }
                    }
                }
                println!(
                    "{} restored, {} not found, {} failed",
                    report.succeeded(),
                    report.not_found(),
                    report.failed()
                );
            }
            if !report.is_success() {
                bail!("restore finished with {} failed categories", report.failed());
            }
        }
        Commands::Import(ImportCommands::Achievements { file }) => {
            let report = orchestrator.import_achievements(&file).await?;
            if cli.json {
                return print_json(&report);
            }
            println!("Achievements: {report}");
        }
        Commands::Import(ImportCommands::Gacha { file }) => {
            let (uid, report) = orchestrator.import_gacha(&file).await?;
            if cli.json {
                return print_json(&serde_json::json!({ "uid": uid, "report": report }));
            }
            println!("Gacha uid {uid}: {report}");
        }
        Commands::Export(ExportCommands::Achievements { file }) => {
            let records = orchestrator.export_achievements(&file).await?;
            if cli.json {
                return print_json(&serde_json::json!({ "file": file, "records": records }));
            }
            println!("Exported {records} achievements to {}", file.display());
        }
        Commands::Export(ExportCommands::Gacha { uid, file }) => {
            let records = orchestrator.export_gacha(&uid, &file).await?;
            if cli.json {
                return print_json(
                    &serde_json::json!({ "uid": uid, "file": file, "records": records }),
                );
            }
            println!("Exported {records} gacha records of uid {uid} to {}", file.display());
        }
        Commands::Inspect { file } => {
            let summary = orchestrator.inspect(&file).await?;
            if cli.json {
                return print_json(&summary);
            }
            println!("Format:   {} {}", summary.format, summary.version);
            if let Some(uid) = &summary.uid {
                println!("Uid:      {uid}");
            }
            println!(
                "Exporter: {}",
                summary.export_app.as_deref().unwrap_or("unknown")
            );
            println!("Exported: {}", summary.export_timestamp);
            println!("Records:  {}", summary.records);
        }
        Commands::Status => {
            let status = ctx.status()?;
            if cli.json {
                return print_json(&status);
            }
            println!("Data directory: {}", ctx.paths.data_dir().display());
            println!(
                "Achievements:   {} tracked, {} in progress, {} completed",
                status.achievements.total,
                status.achievements.in_progress,
                status.achievements.completed
            );
            if status.gacha.is_empty() {
                println!("Gacha:          none");
            }
            for (uid, count) in &status.gacha {
                println!("Gacha:          uid {uid}, {count} records");
            }
            println!("Abyss:          {} records", status.abyss_records);
            println!("Cookie:         {} entries", status.cookie_keys);
        }
        Commands::ClearGacha { uid } => {
            let removed = ctx.stores.gacha.delete_by_uid(&uid)?;
            tracing::info!(uid = %uid, removed, "Cleared gacha records");
            if cli.json {
                return print_json(&serde_json::json!({ "uid": uid, "removed": removed }));
            }
            println!("Removed {removed} gacha records of uid {uid}");
        }
    }

    Ok(())
}
