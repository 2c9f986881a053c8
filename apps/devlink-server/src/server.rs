use std::sync::Arc;

use chrono::Utc;
use tonic::{Request, Status};

use devlink_media::MediaStore;
use devlink_storage::{Store, StoreError, UserId};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct DevlinkServer {
    pub store: Arc<dyn Store>,
    pub media: Option<Arc<dyn MediaStore>>,
    pub config: ServerConfig,
}

impl DevlinkServer {
    pub fn new(
        store: Arc<dyn Store>,
        media: Option<Arc<dyn MediaStore>>,
        config: ServerConfig,
    ) -> Self {
        Self {
            store,
            media,
            config,
        }
    }

    /// Resolve the bearer session token on a request to the actor identity.
    ///
    /// Handlers never take the actor id from the request payload; a missing,
    /// unknown, or expired token terminates the request here.
    pub async fn verify_session<T>(&self, request: &Request<T>) -> Result<UserId, Status> {
        let token = extract_bearer_token(request)?;

        let session = self
            .store
            .get_session_by_token(&token)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => Status::unauthenticated("Invalid session token"),
                _ => Status::internal(format!("Failed to look up session: {}", e)),
            })?;

        if Utc::now() > session.expires_at {
            return Err(Status::unauthenticated("Session expired"));
        }

        Ok(session.user_id)
    }
}

/// Pull the `authorization: Bearer <token>` metadata off a request.
pub fn extract_bearer_token<T>(request: &Request<T>) -> Result<String, Status> {
    let value = request
        .metadata()
        .get("authorization")
        .ok_or_else(|| Status::unauthenticated("Missing authorization metadata"))?;

    let value = value
        .to_str()
        .map_err(|_| Status::unauthenticated("Invalid authorization metadata"))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Status::unauthenticated("Authorization must be a bearer token"))?;

    Ok(token.to_string())
}
