//! Media ingestion for devlink.
//!
//! Converts client-supplied binary attachments into durable, publicly
//! addressable URLs by handing them to an external object-storage service.
//! One upload attempt per call; retry and availability policy belong to the
//! provider, not to callers.
//!
//! # Configuration
//!
//! ```bash
//! DEVLINK_MEDIA_ENDPOINT=https://storage.example.com/v1/upload
//! DEVLINK_MEDIA_API_KEY=sk_...
//! ```

use async_trait::async_trait;
use thiserror::Error;

mod http;
pub use http::HttpMediaStore;

/// Logical namespace uploads are scoped under at the storage provider.
pub const PROFILE_PICTURES_FOLDER: &str = "profile-pictures";

/// Media ingestion errors.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("invalid response from storage provider: {0}")]
    Response(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Trait for media storage providers.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a binary blob, returning its durable public URL.
    async fn upload(&self, data: &[u8], content_type: &str) -> Result<String, MediaError>;
}

/// Configuration for the HTTP media provider.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Upload endpoint of the object-storage service.
    pub endpoint: String,
    /// Bearer API key.
    pub api_key: String,
    /// Folder uploads land in.
    pub folder: String,
}

impl MediaConfig {
    /// Read provider settings from the environment.
    ///
    /// Returns `Ok(None)` when no endpoint is configured (media ingestion
    /// disabled); an endpoint without an API key is a configuration error.
    pub fn from_env() -> Result<Option<Self>, MediaError> {
        let endpoint = match std::env::var("DEVLINK_MEDIA_ENDPOINT") {
            Ok(v) if !v.is_empty() => v,
            _ => return Ok(None),
        };

        let api_key = std::env::var("DEVLINK_MEDIA_API_KEY").map_err(|_| {
            MediaError::Config(
                "DEVLINK_MEDIA_API_KEY is required when DEVLINK_MEDIA_ENDPOINT is set".into(),
            )
        })?;

        Ok(Some(Self {
            endpoint,
            api_key,
            folder: PROFILE_PICTURES_FOLDER.to_string(),
        }))
    }
}
