use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kubechat: terminal client for the Kubernetes assistant.
#[derive(Parser, Debug)]
#[command(name = "kubechat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Account to sign in with. Prompted for when omitted.
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat console (default).
    Chat,
    /// Create an account.
    Signup {
        #[arg(long)]
        email: String,
    },
    /// End the backend session and forget the cached profile.
    Logout,
    /// Show the cached profile of the last signed-in user.
    Whoami,
    /// Check that the backend is up.
    Health,
    /// Print the effective configuration as JSON.
    Config,
    /// Administration (admin accounts only).
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AdminCommand {
    /// Manage user accounts.
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Show recent activity.
    Logs {
        #[arg(long, default_value_t = 50)]
        limit: u32,
        /// Only this user's activity.
        #[arg(long)]
        user: Option<i64>,
    },
    /// Manage cluster kubeconfigs.
    Kubeconfigs {
        #[command(subcommand)]
        action: KubeconfigAction,
    },
    /// Manage AI provider API keys.
    ApiKeys {
        #[command(subcommand)]
        action: ApiKeyAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum UserAction {
    List,
    /// Create an account; the password is prompted for.
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Grant the admin role.
        #[arg(long)]
        admin: bool,
    },
    Ban { id: i64 },
    Unban { id: i64 },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum KubeconfigAction {
    List,
    /// Upload a kubeconfig file.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },
    /// Replace a stored kubeconfig.
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },
    #[command(flatten)]
    Common(ResourceAction),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ApiKeyAction {
    List,
    /// Store a key; the secret is prompted for.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        provider: Option<String>,
    },
    /// Replace a stored key; the secret is prompted for.
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        provider: Option<String>,
    },
    #[command(flatten)]
    Common(ResourceAction),
}

/// Actions shared by kubeconfigs and API keys.
#[derive(Subcommand, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResourceAction {
    Delete { id: i64 },
    /// Make this the one the backend uses.
    Activate { id: i64 },
    /// Ask the backend to try it.
    Test { id: i64 },
}

pub fn parse() -> Args {
    Args::parse()
}
