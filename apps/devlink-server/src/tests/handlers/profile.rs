//! Profile update and read-projection tests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use devlink_proto::devlink_service_server::DevlinkService;
use devlink_proto::{GetProfileRequest, ProfileAttachment, UpdateProfileRequest};
use devlink_storage::{CreateSessionParams, Store, UserId};

use super::super::common::*;
use crate::handlers::profile::build_profile_update;

fn text_update(about: &str, skills_json: &str) -> UpdateProfileRequest {
    UpdateProfileRequest {
        about: Some(about.to_string()),
        skills: Some(skills_json.to_string()),
        ..Default::default()
    }
}

fn attachment() -> ProfileAttachment {
    ProfileAttachment {
        data: vec![0xff, 0xd8, 0xff, 0xe0],
        content_type: "image/jpeg".to_string(),
    }
}

// ───────────────────────────── Patch building ─────────────────────────────

#[test]
fn patch_keeps_only_provided_fields() {
    let req = UpdateProfileRequest {
        first_name: Some("Ada".to_string()),
        skills: Some(r#"["Go","SQL"]"#.to_string()),
        ..Default::default()
    };

    let update = build_profile_update(&req).unwrap();
    assert_eq!(update.first_name.as_deref(), Some("Ada"));
    assert_eq!(
        update.skills,
        Some(vec!["Go".to_string(), "SQL".to_string()])
    );
    assert!(update.last_name.is_none());
    assert!(update.about.is_none());
    assert!(update.profile_picture.is_none());
}

#[test]
fn patch_treats_empty_strings_as_absent() {
    let req = UpdateProfileRequest {
        first_name: Some(String::new()),
        about: Some(String::new()),
        skills: Some(String::new()),
        ..Default::default()
    };

    let update = build_profile_update(&req).unwrap();
    assert!(update.is_empty());
}

#[test]
fn patch_rejects_undecodable_skills() {
    let err = build_profile_update(&text_update("Backend engineer", "not-json")).unwrap_err();
    assert_eq!(err.code(), tonic::Code::InvalidArgument);

    // A JSON value of the wrong shape is just as malformed.
    let err =
        build_profile_update(&text_update("Backend engineer", r#"{"Go":true}"#)).unwrap_err();
    assert_eq!(err.code(), tonic::Code::InvalidArgument);
}

// ───────────────────────────── Update pipeline ─────────────────────────────

#[tokio::test]
async fn update_merges_selectively() {
    let server = create_test_server().await;
    let (user_id, token) = create_test_user(&server, "ada").await;

    server
        .update_profile(authed_request(
            &token,
            UpdateProfileRequest {
                experience: Some("3 years".to_string()),
                ..Default::default()
            },
        ))
        .await
        .unwrap();

    let updated = server
        .update_profile(authed_request(
            &token,
            text_update("Backend engineer", r#"["Go","SQL"]"#),
        ))
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();

    assert_eq!(updated.id, user_id);
    assert_eq!(updated.about, "Backend engineer");
    assert_eq!(updated.skills, vec!["Go", "SQL"]);
    // Untouched by the second patch.
    assert_eq!(updated.experience, "3 years");
}

#[tokio::test]
async fn update_ignores_empty_string_fields() {
    let server = create_test_server().await;
    let (_user_id, token) = create_test_user(&server, "ada").await;

    server
        .update_profile(authed_request(
            &token,
            UpdateProfileRequest {
                about: Some("Backend engineer".to_string()),
                ..Default::default()
            },
        ))
        .await
        .unwrap();

    let updated = server
        .update_profile(authed_request(
            &token,
            UpdateProfileRequest {
                about: Some(String::new()),
                first_name: Some("Ada".to_string()),
                ..Default::default()
            },
        ))
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();

    // Empty string cannot clear a field through this path.
    assert_eq!(updated.about, "Backend engineer");
    assert_eq!(updated.first_name, "Ada");
}

#[tokio::test]
async fn malformed_skills_aborts_before_upload_and_persistence() {
    let media = Arc::new(StubMediaStore::ok("https://cdn.example.com/pic.jpg"));
    let server = create_test_server_with_media(Some(media.clone())).await;
    let (user_id, token) = create_test_user(&server, "ada").await;

    let mut request = text_update("new about", "not-json");
    request.profile_picture = Some(attachment());

    let err = server
        .update_profile(authed_request(&token, request))
        .await
        .unwrap_err();
    assert_eq!(err.code(), tonic::Code::InvalidArgument);

    // No upload was attempted and nothing was persisted.
    assert_eq!(media.upload_count(), 0);
    let profile = server
        .get_profile(authed_request(&token, GetProfileRequest { user_id }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(profile.about, "");
}

#[tokio::test]
async fn attachment_sets_profile_picture_to_adapter_url() {
    let media = Arc::new(StubMediaStore::ok("https://cdn.example.com/pic.jpg"));
    let server = create_test_server_with_media(Some(media.clone())).await;
    let (_user_id, token) = create_test_user(&server, "ada").await;

    let mut request = text_update("Backend engineer", r#"["Go"]"#);
    request.profile_picture = Some(attachment());

    let updated = server
        .update_profile(authed_request(&token, request))
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();

    assert_eq!(media.upload_count(), 1);
    assert_eq!(updated.profile_picture, "https://cdn.example.com/pic.jpg");
    assert_eq!(updated.about, "Backend engineer");
}

#[tokio::test]
async fn upload_failure_aborts_the_whole_update() {
    let media = Arc::new(StubMediaStore::failing());
    let server = create_test_server_with_media(Some(media.clone())).await;
    let (user_id, token) = create_test_user(&server, "ada").await;

    let mut request = text_update("new about", r#"["Go"]"#);
    request.profile_picture = Some(attachment());

    let err = server
        .update_profile(authed_request(&token, request))
        .await
        .unwrap_err();
    assert_eq!(err.code(), tonic::Code::Internal);
    assert_eq!(media.upload_count(), 1);

    // No partial success: text fields were not persisted either.
    let profile = server
        .get_profile(authed_request(&token, GetProfileRequest { user_id }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(profile.about, "");
    assert!(profile.skills.is_empty());
    assert_eq!(profile.profile_picture, "");
}

#[tokio::test]
async fn attachment_without_media_provider_fails() {
    let server = create_test_server().await;
    let (_user_id, token) = create_test_user(&server, "ada").await;

    let request = UpdateProfileRequest {
        profile_picture: Some(attachment()),
        ..Default::default()
    };

    let err = server
        .update_profile(authed_request(&token, request))
        .await
        .unwrap_err();
    assert_eq!(err.code(), tonic::Code::FailedPrecondition);
}

#[tokio::test]
async fn text_only_update_never_touches_the_media_store() {
    let media = Arc::new(StubMediaStore::ok("https://cdn.example.com/pic.jpg"));
    let server = create_test_server_with_media(Some(media.clone())).await;
    let (_user_id, token) = create_test_user(&server, "ada").await;

    server
        .update_profile(authed_request(
            &token,
            text_update("Backend engineer", r#"["Go"]"#),
        ))
        .await
        .unwrap();

    assert_eq!(media.upload_count(), 0);
}

#[tokio::test]
async fn update_for_vanished_user_is_not_found() {
    let server = create_test_server().await;
    create_test_user(&server, "ada").await;

    // A session whose user no longer exists (deleted between authentication
    // and update).
    let ghost = UserId(uuid::Uuid::now_v7());
    server
        .store
        .create_session(&CreateSessionParams {
            user_id: ghost,
            token: "orphan".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();

    let err = server
        .update_profile(authed_request(
            "orphan",
            UpdateProfileRequest {
                about: Some("boo".to_string()),
                ..Default::default()
            },
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code(), tonic::Code::NotFound);
}

// ───────────────────────────── Read projection ─────────────────────────────

#[tokio::test]
async fn get_profile_returns_public_projection() {
    let server = create_test_server().await;
    let (user_id, token) = create_test_user(&server, "ada").await;

    server
        .update_profile(authed_request(
            &token,
            UpdateProfileRequest {
                first_name: Some("Ada".to_string()),
                skills: Some(r#"["Rust","Rust"]"#.to_string()),
                ..Default::default()
            },
        ))
        .await
        .unwrap();

    // Another authenticated user can read the projection.
    let (_other_id, other_token) = create_test_user(&server, "grace").await;
    let profile = server
        .get_profile(authed_request(&other_token, GetProfileRequest { user_id }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(profile.username, "ada");
    assert_eq!(profile.first_name, "Ada");
    assert_eq!(profile.skills, vec!["Rust", "Rust"]);
    assert!(profile.project_ids.is_empty());
    assert!(profile.task_ids.is_empty());
    // The projection type has no email or credential fields; the strongest
    // check left to make is that nothing leaked into the free-text fields.
    let debug = format!("{:?}", profile);
    assert!(!debug.contains("example.com"));
    assert!(!debug.contains("correct horse"));
}

#[tokio::test]
async fn get_profile_distinguishes_bad_id_from_missing_record() {
    let server = create_test_server().await;
    let (_user_id, token) = create_test_user(&server, "ada").await;

    let invalid = server
        .get_profile(authed_request(
            &token,
            GetProfileRequest {
                user_id: "not-a-uuid".to_string(),
            },
        ))
        .await
        .unwrap_err();
    assert_eq!(invalid.code(), tonic::Code::InvalidArgument);

    let missing = server
        .get_profile(authed_request(
            &token,
            GetProfileRequest {
                user_id: uuid::Uuid::now_v7().to_string(),
            },
        ))
        .await
        .unwrap_err();
    assert_eq!(missing.code(), tonic::Code::NotFound);
}
