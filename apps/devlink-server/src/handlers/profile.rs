//! Profile handlers: partial update with optional media ingestion, public read

use tonic::{Request, Response, Status};
use uuid::Uuid;

use devlink_proto::{GetProfileRequest, PublicProfile, UpdateProfileRequest, UpdateProfileResponse};
use devlink_storage::{ProfileUpdate, Store, StoreError, UserId};

use crate::handlers::{to_profile_record, to_public_profile};
use crate::server::DevlinkServer;

/// Build a typed patch from the update request.
///
/// Present-but-empty scalars count as absent: this path cannot clear a field
/// to the empty string. `skills` must decode as a JSON array of strings or
/// the whole request is rejected, before any upload or persistence happens.
pub fn build_profile_update(req: &UpdateProfileRequest) -> Result<ProfileUpdate, Status> {
    let skills = match non_empty(&req.skills) {
        Some(raw) => Some(serde_json::from_str::<Vec<String>>(&raw).map_err(|e| {
            Status::invalid_argument(format!("skills must be a JSON array of strings: {}", e))
        })?),
        None => None,
    };

    Ok(ProfileUpdate {
        first_name: non_empty(&req.first_name),
        last_name: non_empty(&req.last_name),
        about: non_empty(&req.about),
        skills,
        experience: non_empty(&req.experience),
        education: non_empty(&req.education),
        linkedin: non_empty(&req.linkedin),
        github: non_empty(&req.github),
        // Only ever set from the media ingestion step below.
        profile_picture: None,
    })
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field.as_deref().filter(|v| !v.is_empty()).map(String::from)
}

pub async fn update_profile(
    server: &DevlinkServer,
    request: Request<UpdateProfileRequest>,
) -> Result<Response<UpdateProfileResponse>, Status> {
    let user_id = server.verify_session(&request).await?;
    let req = request.into_inner();

    // Reject malformed input before touching the media provider or the store.
    let mut update = build_profile_update(&req)?;

    if let Some(attachment) = &req.profile_picture {
        let media = server.media.as_ref().ok_or_else(|| {
            Status::failed_precondition("No media storage provider is configured")
        })?;

        let url = media
            .upload(&attachment.data, &attachment.content_type)
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %user_id.0, error = %e, "profile picture upload failed");
                Status::internal(format!("Failed to store profile picture: {}", e))
            })?;

        update.profile_picture = Some(url);
    }

    let user = server
        .store
        .update_profile(&user_id, &update)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => Status::not_found("User not found"),
            _ => Status::internal(format!("Failed to update profile: {}", e)),
        })?;

    tracing::debug!(user_id = %user.id.0, "profile updated");

    Ok(Response::new(UpdateProfileResponse {
        user: Some(to_profile_record(&user)),
    }))
}

pub async fn get_profile(
    server: &DevlinkServer,
    request: Request<GetProfileRequest>,
) -> Result<Response<PublicProfile>, Status> {
    server.verify_session(&request).await?;
    let req = request.into_inner();

    let user_id = Uuid::parse_str(&req.user_id)
        .map(UserId)
        .map_err(|_| Status::invalid_argument("Invalid user ID"))?;

    let user = server
        .store
        .get_user_by_id(&user_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => Status::not_found("No user found"),
            _ => Status::internal(format!("Failed to get user: {}", e)),
        })?;

    Ok(Response::new(to_public_profile(&user)))
}
