use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::StartupError;
use crate::store::FeatureSchema;

/// File name of the dataset shipped next to the executable
pub const DEFAULT_DATASET_FILE: &str = "GenerosListo.csv";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Dataset location, overriding the file next to the executable
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Comma-separated feature columns; inferred from the header when unset
    #[serde(default)]
    pub feature_columns: Option<Vec<String>>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Resolves the dataset file, defaulting to the executable's directory
    pub fn dataset_path(&self) -> Result<PathBuf, StartupError> {
        if let Some(path) = &self.dataset_path {
            return Ok(path.clone());
        }

        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(DEFAULT_DATASET_FILE))
    }

    pub fn feature_schema(&self) -> FeatureSchema {
        match &self.feature_columns {
            Some(columns) => FeatureSchema::Explicit(
                columns
                    .iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            ),
            None => FeatureSchema::Inferred,
        }
    }
}
