//! HTTP object-storage provider.

use base64::Engine;
use serde::Deserialize;

use crate::{MediaConfig, MediaError, MediaStore};

/// Provider that submits base64 data URLs to an object-storage HTTP endpoint.
pub struct HttpMediaStore {
    client: reqwest::Client,
    config: MediaConfig,
}

impl HttpMediaStore {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

/// Encode a binary payload as a `data:` URL embedding its media type.
pub fn encode_data_url(data: &[u8], content_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[async_trait::async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, data: &[u8], content_type: &str) -> Result<String, MediaError> {
        let body = serde_json::json!({
            "file": encode_data_url(data, content_type),
            "folder": self.config.folder,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MediaError::Rejected(format!("{}: {}", status, text)));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Response(e.to_string()))?;

        let url = parsed
            .secure_url
            .ok_or_else(|| MediaError::Response("missing secure_url".into()))?;

        tracing::debug!(folder = %self.config.folder, %url, "uploaded media asset");
        Ok(url)
    }
}
