//! Session types.

use chrono::{DateTime, Utc};

use super::{SessionId, UserId};

/// An authenticated session. Resolving a bearer token to a session yields
/// the actor identity handlers operate on.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Parameters for creating a session (login flow).
#[derive(Clone, Debug)]
pub struct CreateSessionParams {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
