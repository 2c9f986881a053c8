use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found. Run 'devlink login' first.")]
    NotFound,
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Not logged in. Run 'devlink login' first.")]
    NoSession,
}

/// CLI configuration stored in ~/.devlink/config.json
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub session: Option<SessionConfig>,
}

/// Stored session credentials
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionConfig {
    pub user_id: String,
    pub username: String,
    pub token: String,
    pub expires_at: i64,
}

impl CliConfig {
    /// Load config from default path (~/.devlink/config.json)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config from custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound
            } else {
                ConfigError::Read(e)
            }
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load config, falling back to defaults when none exists yet
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Save config to custom path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The stored session, or an error directing the user to log in
    pub fn session(&self) -> Result<&SessionConfig, ConfigError> {
        self.session.as_ref().ok_or(ConfigError::NoSession)
    }

    /// Default config path (~/.devlink/config.json)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".devlink")
            .join("config.json")
    }
}
