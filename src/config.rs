//! Configuration management

use anyhow::{Context, Result};

use crate::defaults::DEFAULT_LOGS_DIR;
use crate::types::LayoutKind;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string (only commands that touch the registry need it)
    pub database_url: Option<String>,

    /// Directory for the rotated import log
    pub logs_dir: String,

    /// Layout used when the command line does not name one
    pub default_layout: LayoutKind,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any variable source
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = var("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let logs_dir = var("LOGS_DIR").unwrap_or_else(|| DEFAULT_LOGS_DIR.to_string());

        let default_layout = match var("IMPORT_LAYOUT") {
            Some(name) => LayoutKind::parse(&name)
                .with_context(|| format!("IMPORT_LAYOUT has unknown value '{}' (expected odessa or flat)", name))?,
            None => LayoutKind::Odessa,
        };

        Ok(Self {
            database_url,
            logs_dir,
            default_layout,
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set (or use --dry-run)")
    }
}
