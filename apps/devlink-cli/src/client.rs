//! Client transport traits for testability.
//!
//! This module provides a trait abstraction over the gRPC client so profile
//! state can be exercised in unit tests without a real server connection.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tonic::Status;

use devlink_proto::{ProfileRecord, PublicProfile, UpdateProfileRequest};

/// Fallback message when the server supplies none.
pub const GENERIC_UPDATE_ERROR: &str = "Failed to update profile. Please try again.";

/// Errors surfaced by profile operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server reported a failure; the message is the server's own text.
    #[error("{0}")]
    Server(String),

    #[error("Failed to reach server: {0}")]
    Transport(String),

    #[error("An update is already in flight")]
    UpdateInFlight,
}

impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        if status.message().is_empty() {
            ClientError::Server(GENERIC_UPDATE_ERROR.to_string())
        } else {
            ClientError::Server(status.message().to_string())
        }
    }
}

/// Trait for profile operations against the server.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileTransport: Send + Sync {
    async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<ProfileRecord, ClientError>;

    async fn get_profile(&self, user_id: &str) -> Result<PublicProfile, ClientError>;
}

/// Real transport over the tonic client.
pub struct GrpcProfileTransport {
    server_url: String,
    token: String,
}

impl GrpcProfileTransport {
    pub fn new(server_url: String, token: String) -> Self {
        Self { server_url, token }
    }
}

#[async_trait]
impl ProfileTransport for GrpcProfileTransport {
    async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<ProfileRecord, ClientError> {
        let mut client = crate::grpc::connect(&self.server_url)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let request = crate::grpc::with_token(request, &self.token)?;
        let response = client
            .update_profile(request)
            .await
            .map_err(ClientError::from)?
            .into_inner();

        response
            .user
            .ok_or_else(|| ClientError::Server(GENERIC_UPDATE_ERROR.to_string()))
    }

    async fn get_profile(&self, user_id: &str) -> Result<PublicProfile, ClientError> {
        let mut client = crate::grpc::connect(&self.server_url)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let request = crate::grpc::with_token(
            devlink_proto::GetProfileRequest {
                user_id: user_id.to_string(),
            },
            &self.token,
        )?;

        Ok(client
            .get_profile(request)
            .await
            .map_err(ClientError::from)?
            .into_inner())
    }
}
