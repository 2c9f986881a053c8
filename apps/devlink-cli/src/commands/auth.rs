//! Account commands: register, login, logout

use devlink_proto::{LoginRequest, LogoutRequest, RegisterRequest};

use crate::config::{CliConfig, SessionConfig};
use crate::grpc::connect;

pub async fn cmd_register(
    server: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = connect(server).await?;

    let response = client
        .register(RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?
        .into_inner();

    println!("✓ Account created!");
    println!("User ID: {}", response.user_id);
    println!("\nLog in with: devlink login {} --password ...", username);
    Ok(())
}

pub async fn cmd_login(
    server: &str,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = connect(server).await?;

    let response = client
        .login(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?
        .into_inner();

    let user_id = response
        .user
        .as_ref()
        .map(|u| u.id.clone())
        .unwrap_or_default();

    let mut config = CliConfig::load_or_default()?;
    config.session = Some(SessionConfig {
        user_id,
        username: username.to_string(),
        token: response.token,
        expires_at: response.expires_at,
    });
    config.save()?;

    println!("✓ Logged in as {}", username);
    Ok(())
}

pub async fn cmd_logout(server: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match CliConfig::load() {
        Ok(config) => config,
        Err(crate::config::ConfigError::NotFound) => {
            println!("Not logged in.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(session) = config.session.take() {
        // Best effort: drop the server-side session, then the local one.
        if let Ok(mut client) = connect(server).await {
            let _ = client
                .logout(LogoutRequest {
                    token: session.token,
                })
                .await;
        }
        config.save()?;
        println!("✓ Logged out");
    } else {
        println!("Not logged in.");
    }

    Ok(())
}
