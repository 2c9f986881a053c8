//! Authentication handlers: register, login, logout

use chrono::{Duration, Utc};
use tonic::{Request, Response, Status};

use devlink_crypto::{generate_salt, generate_token, hash_password, verify_password};
use devlink_proto::{
    Empty, LoginRequest, LoginResponse, LogoutRequest, RegisterRequest, RegisterResponse,
};
use devlink_storage::{CreateSessionParams, CreateUserParams, Store, StoreError};

use crate::handlers::to_profile_record;
use crate::server::DevlinkServer;

pub async fn register(
    server: &DevlinkServer,
    request: Request<RegisterRequest>,
) -> Result<Response<RegisterResponse>, Status> {
    let req = request.into_inner();

    if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(Status::invalid_argument(
            "username, email and password are required",
        ));
    }

    // Normalize email to lowercase for consistent comparison
    let email = req.email.to_lowercase();

    let salt = generate_salt();
    let password_hash = hash_password(&req.password, &salt)
        .map_err(|e| Status::internal(format!("Failed to hash password: {}", e)))?;

    let user_id = server
        .store
        .create_user(&CreateUserParams {
            username: req.username,
            email,
            password_hash,
            password_salt: salt.to_vec(),
        })
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => Status::already_exists("Username or email already taken"),
            _ => Status::internal(format!("Failed to create user: {}", e)),
        })?;

    tracing::info!(user_id = %user_id.0, "registered user");

    Ok(Response::new(RegisterResponse {
        user_id: user_id.0.to_string(),
    }))
}

pub async fn login(
    server: &DevlinkServer,
    request: Request<LoginRequest>,
) -> Result<Response<LoginResponse>, Status> {
    let req = request.into_inner();

    let user = server
        .store
        .get_user_by_username(&req.username)
        .await
        .map_err(|e| match e {
            // Same message for unknown user and wrong password.
            StoreError::NotFound => Status::unauthenticated("Invalid username or password"),
            _ => Status::internal(format!("Failed to get user: {}", e)),
        })?;

    let ok = verify_password(&req.password, &user.password_salt, &user.password_hash)
        .map_err(|e| Status::internal(format!("Failed to verify password: {}", e)))?;
    if !ok {
        return Err(Status::unauthenticated("Invalid username or password"));
    }

    let session = server
        .store
        .create_session(&CreateSessionParams {
            user_id: user.id.clone(),
            token: generate_token(),
            expires_at: Utc::now() + Duration::hours(server.config.session_ttl_hours),
        })
        .await
        .map_err(|e| Status::internal(format!("Failed to create session: {}", e)))?;

    tracing::debug!(user_id = %user.id.0, "logged in");

    Ok(Response::new(LoginResponse {
        token: session.token,
        expires_at: session.expires_at.timestamp(),
        user: Some(to_profile_record(&user)),
    }))
}

pub async fn logout(
    server: &DevlinkServer,
    request: Request<LogoutRequest>,
) -> Result<Response<Empty>, Status> {
    let req = request.into_inner();

    server
        .store
        .delete_session(&req.token)
        .await
        .map_err(|e| Status::internal(format!("Failed to delete session: {}", e)))?;

    Ok(Response::new(Empty {}))
}
