use std::path::{Path, PathBuf};

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Destination of the CSV export
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,

    /// Default tracing filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/clients_database.db")
}

fn default_export_path() -> PathBuf {
    PathBuf::from("exports/clients.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            export_path: default_export_path(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Build a configuration from an explicit set of key/value pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(pairs)?)
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    dotenv().ok();

    let config = Config::load()?;

    Ok(config)
}
