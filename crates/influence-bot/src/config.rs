//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Application configuration.
///
/// `DISCORD_TOKEN` is the only required variable; everything else has a
/// default or degrades the affected feature when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Discord bot token. Startup fails without it.
    pub discord_token: SecretString,

    /// Command prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// When set, only messages from this username are processed.
    #[serde(default)]
    pub test_user: Option<String>,

    /// URL of the page where users sign their verification challenge.
    /// Absent: verification replies "unavailable".
    #[serde(default)]
    pub verification_link: Option<String>,

    /// Infura credentials. Absent: on-chain commands reply "unavailable"
    /// and the announcer does not start.
    #[serde(default)]
    pub infura_project_id: Option<String>,

    #[serde(default)]
    pub infura_project_secret: Option<SecretString>,

    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Asteroid token contract address.
    #[serde(default = "default_asteroid_contract")]
    pub asteroid_contract: String,

    /// Announcer poll cadence.
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_prefix() -> String {
    "#".into()
}

fn default_database_path() -> String {
    "./database.sqlite".into()
}

fn default_asteroid_contract() -> String {
    influence_client::DEFAULT_ASTEROID_CONTRACT.to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(15)
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    // Keep strings as strings; snowflakes and hex values must
                    // not be parsed as numbers.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
