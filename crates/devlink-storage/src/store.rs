//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The storage trait the server depends on.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    /// Create a new user (returns the generated ID).
    async fn create_user(&self, params: &CreateUserParams) -> Result<UserId, StoreError>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError>;

    /// Get user by username (login path).
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError>;

    /// Merge a partial update into a user's record.
    ///
    /// Only fields present in `update` are overwritten; every other stored
    /// field keeps its value, including under concurrent updates to disjoint
    /// fields. Returns the full post-merge record.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, StoreError>;

    // ───────────────────────────────────── Sessions ───────────────────────────────────────

    /// Create a session (login).
    async fn create_session(&self, params: &CreateSessionParams) -> Result<Session, StoreError>;

    /// Get a session by its bearer token.
    async fn get_session_by_token(&self, token: &str) -> Result<Session, StoreError>;

    /// Delete a session (logout). Deleting a missing session is not an error.
    async fn delete_session(&self, token: &str) -> Result<(), StoreError>;

    /// Delete all expired sessions. Returns the number of deleted records.
    async fn cleanup_expired_sessions(&self) -> Result<u64, StoreError>;
}
