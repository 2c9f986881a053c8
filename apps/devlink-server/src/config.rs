//! Server configuration.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! # Sessions
//! DEVLINK_SESSION_TTL_HOURS=720
//!
//! # Media storage (profile picture ingestion; see devlink-media)
//! DEVLINK_MEDIA_ENDPOINT=https://storage.example.com/v1/upload
//! DEVLINK_MEDIA_API_KEY=sk_...
//! ```

use std::env;
use thiserror::Error;

const DEFAULT_SESSION_TTL_HOURS: i64 = 720;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Lifetime of a login session, in hours.
    pub session_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid DEVLINK_SESSION_TTL_HOURS: {0}")]
    InvalidSessionTtl(String),
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let session_ttl_hours = match env::var("DEVLINK_SESSION_TTL_HOURS") {
            Ok(v) => v
                .parse::<i64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::InvalidSessionTtl(v))?,
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self { session_ttl_hours })
    }
}
