//! gRPC handlers, grouped by feature area.

pub mod auth;
pub mod profile;

use devlink_proto::{ProfileRecord, PublicProfile};
use devlink_storage::User;

/// Owner view of a record: everything except credentials.
pub(crate) fn to_profile_record(user: &User) -> ProfileRecord {
    ProfileRecord {
        id: user.id.0.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        about: user.about.clone(),
        skills: user.skills.clone(),
        experience: user.experience.clone(),
        education: user.education.clone(),
        linkedin: user.linkedin.clone(),
        github: user.github.clone(),
        profile_picture: user.profile_picture.clone(),
        verified: user.verified,
        project_ids: user.projects.iter().map(|p| p.0.to_string()).collect(),
        task_ids: user.tasks.iter().map(|t| t.0.to_string()).collect(),
        created_at: user.created_at.timestamp(),
        updated_at: user.updated_at.timestamp(),
    }
}

/// Public projection: display fields and owned-collection references only.
/// No email, no verification internals, and (structurally) no credentials.
pub(crate) fn to_public_profile(user: &User) -> PublicProfile {
    PublicProfile {
        id: user.id.0.to_string(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        about: user.about.clone(),
        skills: user.skills.clone(),
        experience: user.experience.clone(),
        education: user.education.clone(),
        linkedin: user.linkedin.clone(),
        github: user.github.clone(),
        profile_picture: user.profile_picture.clone(),
        project_ids: user.projects.iter().map(|p| p.0.to_string()).collect(),
        task_ids: user.tasks.iter().map(|t| t.0.to_string()).collect(),
    }
}
