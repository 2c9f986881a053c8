mod cli;
mod client;
mod commands;
mod config;
mod form;
mod grpc;
mod state;

use clap::Parser;

use cli::{Cli, Command, ProfileCommand};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => commands::auth::cmd_register(&cli.server, &username, &email, &password).await,
        Command::Login { username, password } => {
            commands::auth::cmd_login(&cli.server, &username, &password).await
        }
        Command::Logout => commands::auth::cmd_logout(&cli.server).await,
        Command::Profile { profile_cmd } => match profile_cmd {
            ProfileCommand::Update(args) => {
                commands::profile::cmd_profile_update(&cli.server, args).await
            }
            ProfileCommand::Show { user_id } => {
                commands::profile::cmd_profile_show(&cli.server, user_id.as_deref()).await
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
