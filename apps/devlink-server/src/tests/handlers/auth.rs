//! Registration, login and session tests.

use chrono::{Duration, Utc};
use tonic::Request;

use devlink_proto::devlink_service_server::DevlinkService;
use devlink_proto::{GetProfileRequest, LoginRequest, LogoutRequest, RegisterRequest};
use devlink_storage::{CreateSessionParams, Store};

use super::super::common::*;

#[tokio::test]
async fn register_rejects_missing_fields() {
    let server = create_test_server().await;

    let result = server
        .register(Request::new(RegisterRequest {
            username: "ada".to_string(),
            email: String::new(),
            password: "pw".to_string(),
        }))
        .await;

    assert_eq!(result.unwrap_err().code(), tonic::Code::InvalidArgument);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let server = create_test_server().await;
    create_test_user(&server, "ada").await;

    let result = server
        .register(Request::new(RegisterRequest {
            username: "ada".to_string(),
            email: "other@example.com".to_string(),
            password: "pw".to_string(),
        }))
        .await;

    assert_eq!(result.unwrap_err().code(), tonic::Code::AlreadyExists);
}

#[tokio::test]
async fn register_normalizes_email_to_lowercase() {
    let server = create_test_server().await;

    server
        .register(Request::new(RegisterRequest {
            username: "ada".to_string(),
            email: "Ada@Example.COM".to_string(),
            password: "pw".to_string(),
        }))
        .await
        .unwrap();

    let user = server.store.get_user_by_username("ada").await.unwrap();
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn login_returns_stripped_record_and_usable_token() {
    let server = create_test_server().await;
    create_test_user(&server, "ada").await;

    let login = server
        .login(Request::new(LoginRequest {
            username: "ada".to_string(),
            password: "correct horse".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();

    assert!(!login.token.is_empty());
    assert!(login.expires_at > Utc::now().timestamp());

    let record = login.user.unwrap();
    assert_eq!(record.username, "ada");
    assert_eq!(record.email, "ada@example.com");

    // The token authenticates subsequent calls.
    let profile = server
        .get_profile(authed_request(
            &login.token,
            GetProfileRequest {
                user_id: record.id.clone(),
            },
        ))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(profile.username, "ada");
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user() {
    let server = create_test_server().await;
    create_test_user(&server, "ada").await;

    let wrong = server
        .login(Request::new(LoginRequest {
            username: "ada".to_string(),
            password: "wrong".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(wrong.code(), tonic::Code::Unauthenticated);

    let unknown = server
        .login(Request::new(LoginRequest {
            username: "nobody".to_string(),
            password: "wrong".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(unknown.code(), tonic::Code::Unauthenticated);

    // Indistinguishable responses for the two failure modes.
    assert_eq!(wrong.message(), unknown.message());
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let server = create_test_server().await;
    let (user_id, token) = create_test_user(&server, "ada").await;

    server
        .logout(Request::new(LogoutRequest {
            token: token.clone(),
        }))
        .await
        .unwrap();

    let result = server
        .get_profile(authed_request(&token, GetProfileRequest { user_id }))
        .await;
    assert_eq!(result.unwrap_err().code(), tonic::Code::Unauthenticated);
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let server = create_test_server().await;
    let (user_id, _token) = create_test_user(&server, "ada").await;

    let user = server.store.get_user_by_username("ada").await.unwrap();
    server
        .store
        .create_session(&CreateSessionParams {
            user_id: user.id,
            token: "stale".to_string(),
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();

    let result = server
        .get_profile(authed_request("stale", GetProfileRequest { user_id }))
        .await;
    assert_eq!(result.unwrap_err().code(), tonic::Code::Unauthenticated);
}

#[tokio::test]
async fn missing_or_malformed_authorization_is_rejected() {
    let server = create_test_server().await;
    let (user_id, _token) = create_test_user(&server, "ada").await;

    let bare = server
        .get_profile(Request::new(GetProfileRequest {
            user_id: user_id.clone(),
        }))
        .await;
    assert_eq!(bare.unwrap_err().code(), tonic::Code::Unauthenticated);

    // Token without the Bearer prefix.
    let mut request = Request::new(GetProfileRequest { user_id });
    request.metadata_mut().insert(
        "authorization",
        tonic::metadata::MetadataValue::try_from("sometoken").unwrap(),
    );
    let result = server.get_profile(request).await;
    assert_eq!(result.unwrap_err().code(), tonic::Code::Unauthenticated);
}
