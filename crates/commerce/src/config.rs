//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPHUB_DATA_DIR` - Directory holding the persisted cart and
//!   profile records (default: `./data`)

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "SHOPHUB_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "./data";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Commerce engine configuration.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Directory holding the persisted records.
    pub data_dir: PathBuf,
}

impl CommerceConfig {
    /// Build a config pointing at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load configuration from the environment, reading a `.env` file
    /// first when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `SHOPHUB_DATA_DIR` is
    /// set but not valid unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let data_dir = match std::env::var(ENV_DATA_DIR) {
            Ok(dir) => PathBuf::from(dir),
            Err(std::env::VarError::NotPresent) => PathBuf::from(DEFAULT_DATA_DIR),
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::InvalidEnvVar(
                    ENV_DATA_DIR.to_owned(),
                    "value is not valid unicode".to_owned(),
                ));
            }
        };
        Ok(Self { data_dir })
    }
}
