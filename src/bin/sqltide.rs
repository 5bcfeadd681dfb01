//! sqltide command-line interface.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sqlx::PgPool;

use sqltide::{Config, MigrationRunner, PgExecutor, PgHistoryStore, config, runner};

#[derive(Parser)]
#[command(name = "sqltide", version, about = "Forward/backward SQL schema migrations")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Connection string for the target database
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Roll back the most recently applied migrations
    Down {
        /// How many migrations to roll back
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Create a new timestamped migration file
    New {
        /// Human-readable migration name, e.g. "add users table"
        name: String,
    },
    /// Show applied and pending migrations
    Status,
    /// Write a starter configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config: config_path,
        database_url,
        command,
    } = Cli::parse();

    match command {
        Command::Init => {
            Config::init(&config_path)?;
            println!("{} {}", "Created".green().bold(), config_path.display());
            println!("Fill in `connection_string` before running `sqltide up`.");
        }
        Command::New { name } => {
            let config = Config::load(&config_path, database_url)?;
            let path = runner::create_migration(&config.migrations_dir, &name)?;
            println!("{} {}", "Created".green().bold(), path.display());
        }
        Command::Up => {
            let runner = connect(&config_path, database_url).await?;
            let summary = runner.migrate_up().await?;
            if summary.applied.is_empty() {
                println!("{}", "Nothing to apply, database is up to date.".green());
            } else {
                println!(
                    "{}",
                    format!("✓ applied {} migration(s)", summary.applied.len())
                        .green()
                        .bold()
                );
            }
        }
        Command::Down { count } => {
            let runner = connect(&config_path, database_url).await?;
            let summary = runner.rollback_last(count).await?;
            if summary.rolled_back.is_empty() {
                println!("{}", "No migrations have been applied.".green());
            } else {
                println!(
                    "{}",
                    format!("✓ rolled back {} migration(s)", summary.rolled_back.len())
                        .green()
                        .bold()
                );
            }
        }
        Command::Status => {
            let runner = connect(&config_path, database_url).await?;
            let report = runner.status().await?;
            if report.applied.is_empty() && report.pending.is_empty() {
                println!("No migrations found.");
                return Ok(());
            }
            for file in &report.applied {
                println!("  {} {}", "applied".green(), file);
            }
            for file in &report.pending {
                println!("  {} {}", "pending".yellow(), file);
            }
            println!(
                "{} applied, {} pending",
                report.applied.len(),
                report.pending.len()
            );
        }
    }
    Ok(())
}

async fn connect(
    config_path: &Path,
    database_url: Option<String>,
) -> Result<MigrationRunner<PgExecutor, PgHistoryStore>> {
    let config = Config::load(config_path, database_url)?;
    let pool = PgPool::connect(&config.connection_string)
        .await
        .context("failed to connect to the database")?;
    let runner = MigrationRunner::new(
        PgExecutor::new(pool.clone()),
        PgHistoryStore::new(pool),
        config.migrations_dir,
    )?;
    Ok(runner)
}
