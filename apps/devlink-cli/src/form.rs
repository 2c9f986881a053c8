//! Local form state and wire encoding for profile updates.

use std::path::Path;

use thiserror::Error;

use devlink_proto::{ProfileAttachment, UpdateProfileRequest};

/// An in-memory profile picture selection.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Local form state for a profile update.
///
/// `None` fields are omitted from the wire payload entirely; the server
/// treats omitted as "leave untouched", so this is how selective updates are
/// expressed.
#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub about: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub picture: Option<Attachment>,
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unsupported image type: {0} (expected jpeg, png, gif or webp)")]
    UnsupportedImage(String),
    #[error("Failed to read picture: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to encode skills: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serialize form state into the wire payload the server expects: each
/// provided scalar as a discrete field, skills JSON-encoded to the exact form
/// the server decodes, and the picture only when one was selected.
pub fn encode_update_request(form: &ProfileForm) -> Result<UpdateProfileRequest, FormError> {
    let skills = match &form.skills {
        Some(skills) => Some(serde_json::to_string(skills)?),
        None => None,
    };

    Ok(UpdateProfileRequest {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        about: form.about.clone(),
        skills,
        experience: form.experience.clone(),
        education: form.education.clone(),
        linkedin: form.linkedin.clone(),
        github: form.github.clone(),
        profile_picture: form.picture.as_ref().map(|p| ProfileAttachment {
            data: p.data.clone(),
            content_type: p.content_type.clone(),
        }),
    })
}

/// Read a picture file into an attachment, deriving its media type from the
/// file extension. Accepted types match what the server side stores.
pub fn read_attachment(path: &Path) -> Result<Attachment, FormError> {
    let content_type = content_type_for(path)?;
    let data = std::fs::read(path)?;
    Ok(Attachment {
        data,
        content_type: content_type.to_string(),
    })
}

fn content_type_for(path: &Path) -> Result<&'static str, FormError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        Some("gif") => Ok("image/gif"),
        Some("webp") => Ok("image/webp"),
        other => Err(FormError::UnsupportedImage(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}
