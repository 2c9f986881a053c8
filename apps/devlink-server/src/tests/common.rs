//! Common test helpers and utilities for server tests.
//!
//! This module provides shared test infrastructure including:
//! - Test server creation over in-memory SQLite
//! - Media store stubs that record upload attempts
//! - User creation and authenticated-request helpers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tonic::metadata::MetadataValue;
use tonic::Request;

use devlink_media::{MediaError, MediaStore};
use devlink_proto::devlink_service_server::DevlinkService;
use devlink_proto::{LoginRequest, RegisterRequest};
use devlink_store_sqlite::SqliteStore;

use crate::config::ServerConfig;
use crate::server::DevlinkServer;

/// Media stub that records upload attempts and returns a fixed URL (or fails).
pub struct StubMediaStore {
    pub uploads: AtomicUsize,
    url: String,
    fail: bool,
}

impl StubMediaStore {
    pub fn ok(url: &str) -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            url: url.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            url: String::new(),
            fail: true,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaStore for StubMediaStore {
    async fn upload(&self, _data: &[u8], _content_type: &str) -> Result<String, MediaError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(MediaError::Rejected("storage unavailable".to_string()))
        } else {
            Ok(self.url.clone())
        }
    }
}

/// Test helper: Create a DevlinkServer with in-memory SQLite and no media store.
pub async fn create_test_server() -> DevlinkServer {
    create_test_server_with_media(None).await
}

/// Test helper: Create a DevlinkServer with in-memory SQLite and a media stub.
pub async fn create_test_server_with_media(media: Option<Arc<StubMediaStore>>) -> DevlinkServer {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let media = media.map(|m| m as Arc<dyn MediaStore>);
    DevlinkServer::new(store, media, ServerConfig::default())
}

/// Test helper: Register a user and log in.
/// Returns (user_id, session_token).
pub async fn create_test_user(server: &DevlinkServer, username: &str) -> (String, String) {
    let registered = server
        .register(Request::new(RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct horse".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();

    let login = server
        .login(Request::new(LoginRequest {
            username: username.to_string(),
            password: "correct horse".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();

    (registered.user_id, login.token)
}

/// Test helper: Build a request carrying a bearer session token.
pub fn authed_request<T>(token: &str, message: T) -> Request<T> {
    let mut request = Request::new(message);
    request.metadata_mut().insert(
        "authorization",
        MetadataValue::try_from(format!("Bearer {}", token)).unwrap(),
    );
    request
}
