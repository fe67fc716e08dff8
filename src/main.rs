//! Clergy Import - spreadsheet import for the diocesan clergy registry
//!
//! Reads registry spreadsheets and contact lists, normalizes them into
//! person records and writes them to PostgreSQL.

mod cli;
mod config;
mod db;
mod defaults;
mod services;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::PgPool;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::services::grid::load_grid;
use crate::services::person_import::PersonImportProcessor;
use crate::services::phone_merge::{merge_phones, parse_directory};
use crate::services::stats::RegistryStats;
use crate::services::store::create_person_store;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.logs_dir, "import.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,clergy_import=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer()) // stdout
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false)) // file
        .init();

    match cli.command {
        Command::Import {
            file,
            layout,
            update_existing,
            dry_run,
            json,
        } => {
            let kind = layout.unwrap_or(config.default_layout);
            let pool = if dry_run {
                info!("Dry run: importing into an empty in-memory registry");
                None
            } else {
                Some(connect(&config).await?)
            };
            let store = create_person_store(pool);

            let processor = PersonImportProcessor::new(store.as_ref(), update_existing);
            let result = processor.import_file(&file, kind).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.summary());
                println!();
                println!("{}", result.error_report());
            }
        }
        Command::Phones { file, dry_run } => {
            let rows = load_grid(&file)?;
            let entries = parse_directory(&rows);
            info!("Contact list {}: {} entries", file.display(), entries.len());

            let store = create_person_store(Some(connect(&config).await?));
            let result = merge_phones(store.as_ref(), entries, dry_run).await?;
            println!("{}", result.report());
        }
        Command::Find { query } => {
            let store = create_person_store(Some(connect(&config).await?));
            let found = store.find_by_name_query(&query).await?;

            if found.is_empty() {
                println!("Ничего не найдено по запросу '{}'", query);
            }
            for (i, person) in found.iter().enumerate() {
                println!("{}. {} - {}", i + 1, person.full_name(), person.status);
            }
        }
        Command::Stats => {
            let store = create_person_store(Some(connect(&config).await?));
            let persons = store.list_all().await?;
            print!("{}", RegistryStats::collect(&persons).report());
        }
        Command::Migrate => {
            connect(&config).await?;
            info!("Migrations applied, exiting");
        }
    }

    Ok(())
}

/// Connect and bring the schema up to date
async fn connect(config: &Config) -> Result<PgPool> {
    let pool = db::create_pool(config.require_database_url()?)
        .await
        .context("Database is not reachable")?;
    info!("Connected to PostgreSQL");

    db::run_migrations(&pool).await?;
    Ok(pool)
}
