use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags override whatever is set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: String,
    /// Seed for sampling and shuffling. Unset means a fresh random seed per run.
    pub seed: Option<u64>,
    /// Where `export` writes CSV files
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `load`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup("MYTHOSCIFI_SEED").filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("MYTHOSCIFI_SEED must be an unsigned integer, got '{raw}'"))?,
            ),
            None => None,
        };

        Ok(Self {
            db_path: lookup("MYTHOSCIFI_DB_PATH").unwrap_or_else(|| "./mythoscifi.db".to_string()),
            seed,
            output_dir: lookup("MYTHOSCIFI_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output")),
        })
    }
}
