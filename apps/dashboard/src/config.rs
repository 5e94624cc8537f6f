use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

const DEFAULT_DATA_PATH: &str = "consolidated_profiles.json";

/// Command-line overrides. Anything given here wins over the environment.
#[derive(Debug, Default, Parser)]
#[command(version, about = "Read-only analytics API over a consolidated profiles dataset")]
pub struct Cli {
    /// Path to the consolidated profiles JSON document.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Port to listen on.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            data_path: lookup("DASHBOARD_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(data) = &cli.data {
            self.data_path = data.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        self
    }
}
