//! User record types.

use chrono::{DateTime, Utc};

use super::{ProjectId, TaskId, UserId};

/// Canonical user record as stored by the backend.
///
/// `password_hash` and `password_salt` never leave the server process; the
/// wire types in devlink-proto have no fields for them.
#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: Vec<u8>,
    pub first_name: String,
    pub last_name: String,
    pub about: String,
    /// Ordered, duplicates allowed; replaced wholesale when an update sets it.
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub linkedin: String,
    pub github: String,
    /// URL of the ingested profile picture; empty when unset.
    pub profile_picture: String,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub verification_expires_at: Option<DateTime<Utc>>,
    /// Owned-collection back-references; profile updates never write these.
    pub projects: Vec<ProjectId>,
    pub tasks: Vec<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a user (registration flow).
#[derive(Clone, Debug)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: Vec<u8>,
}

/// A partial profile update.
///
/// `None` fields are left untouched by [`crate::Store::update_profile`];
/// `Some` fields overwrite the stored value. Omitted is not the same as
/// cleared: there is no way to reset a field to empty through this type.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub about: Option<String>,
    /// Replaces the stored sequence wholesale when present.
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    /// Set by the media ingestion step only, never from raw client input.
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    /// True when no field is set; applying such an update only bumps
    /// `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.about.is_none()
            && self.skills.is_none()
            && self.experience.is_none()
            && self.education.is_none()
            && self.linkedin.is_none()
            && self.github.is_none()
            && self.profile_picture.is_none()
    }
}
