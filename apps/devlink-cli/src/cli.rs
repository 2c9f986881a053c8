use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devlink")]
#[command(about = "Devlink developer-profile CLI")]
pub struct Cli {
    /// Server address
    #[arg(long, env = "DEVLINK_SERVER", default_value = "http://127.0.0.1:50051")]
    pub server: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account on the server
    Register {
        /// Username (unique, used to log in)
        username: String,

        /// Your email
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },
    /// Log in and store a session token
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Profile commands
    Profile {
        #[command(subcommand)]
        profile_cmd: ProfileCommand,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Update your profile; only the fields you pass are changed
    Update(UpdateArgs),
    /// Show a user's public profile
    Show {
        /// User ID (defaults to your own)
        user_id: Option<String>,
    },
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub about: Option<String>,

    /// Comma-separated list; replaces the stored skills wholesale
    #[arg(long, value_delimiter = ',')]
    pub skills: Option<Vec<String>>,

    #[arg(long)]
    pub experience: Option<String>,

    #[arg(long)]
    pub education: Option<String>,

    #[arg(long)]
    pub linkedin: Option<String>,

    #[arg(long)]
    pub github: Option<String>,

    /// Path to a profile picture (jpeg, png, gif or webp)
    #[arg(long)]
    pub picture: Option<PathBuf>,
}
