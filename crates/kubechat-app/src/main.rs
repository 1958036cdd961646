mod admin;
mod cli;
mod console;
mod context;
mod error;
mod input;
mod render;

use std::process::ExitCode;

use kubechat_config::KubechatConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};
use crate::context::AppContext;
use crate::error::CliError;
use crate::input::Input;

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Variables already set in the environment win.
fn load_dotenv() {
    let mut candidates = vec![std::path::PathBuf::from(".env")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("kubechat").join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn load_config(args: &Args) -> (KubechatConfig, Option<String>) {
    let loaded = match &args.config {
        Some(path) => kubechat_config::load_config_from(path),
        None => kubechat_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (KubechatConfig::default(), Some(e.to_string())),
    }
}

fn init_logging(args: &Args, config: &KubechatConfig) {
    let directive = match args.log_level.as_deref() {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("kubechat={level}"),
        None => format!("kubechat={}", config.logging.level.as_directive()),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "kubechat=info".parse().unwrap()),
            ),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let args = cli::parse();

    let (config, config_error) = load_config(&args);
    init_logging(&args, &config);

    tracing::info!("kubechat v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: KubechatConfig) -> Result<(), CliError> {
    let command = args.command.unwrap_or(Command::Chat);
    if command == Command::Config {
        println!("{}", kubechat_config::config_to_json(&config));
        return Ok(());
    }

    let ctx = AppContext::new(config, args.username)?;
    let mut input = Input::stdin();

    match command {
        Command::Chat => console::run(&ctx, &mut input).await,
        Command::Signup { email } => {
            let username = match ctx.username() {
                Some(name) => name.to_string(),
                None => input.required("Username: ").await?,
            };
            let password = input.required("Password: ").await?;
            let profile = ctx.client.signup(&username, &email, &password).await?;
            println!("Account created for {}.", profile.username);
            Ok(())
        }
        Command::Logout => {
            if let Err(e) = ctx.client.logout().await {
                tracing::debug!("backend logout: {e}");
            }
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            match ctx.client.current_user() {
                Some(profile) => println!(
                    "{} (id {}, {}){}",
                    profile.username,
                    profile.id,
                    profile.role,
                    profile
                        .email
                        .map(|e| format!(" <{e}>"))
                        .unwrap_or_default()
                ),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        Command::Health => {
            let health = ctx.client.health().await?;
            println!(
                "{} at {}: {}",
                health.service.as_deref().unwrap_or("backend"),
                ctx.client.base_url(),
                health.status
            );
            if health.is_healthy() {
                Ok(())
            } else {
                Err(CliError::Unhealthy(health.status))
            }
        }
        Command::Admin { command } => admin::run(&ctx, &mut input, command).await,
        Command::Config => Ok(()),
    }
}
