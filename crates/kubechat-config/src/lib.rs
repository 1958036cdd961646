//! kubechat configuration system.
//!
//! Provides TOML-based configuration with validation. All config sections
//! use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kubechat_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{KubechatConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use kubechat_common::ConfigError;

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "KUBECHAT_BACKEND_URL";

/// Load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creates a default
/// if none exists, applies environment overrides, and validates the result.
pub fn load_config() -> Result<KubechatConfig, ConfigError> {
    let mut config = toml_loader::load_default()?;
    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (the `--config` flag).
pub fn load_config_from(path: &Path) -> Result<KubechatConfig, ConfigError> {
    let mut config = toml_loader::load_from_path(path)?;
    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut KubechatConfig) {
    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        let url = url.trim();
        if !url.is_empty() {
            tracing::debug!(url, "backend url overridden from environment");
            config.backend.base_url = url.to_string();
        }
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &KubechatConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
