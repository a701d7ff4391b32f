//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.switchboard/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::client::DEFAULT_BACKEND_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SwitchboardConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_app: Option<String>,
    pub login_path: Option<String>,
    pub validation_timeout_secs: Option<u64>,
    pub load_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_VALIDATION_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend_url: String,
    pub default_app: Option<String>,
    pub login_path: String,
    pub validation_timeout: Duration,
    pub load_timeout: Duration,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            default_app: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            validation_timeout: Duration::from_secs(DEFAULT_VALIDATION_TIMEOUT_SECS),
            load_timeout: Duration::from_secs(DEFAULT_LOAD_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.switchboard/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".switchboard").join("config.toml"))
}

/// Load config from `~/.switchboard/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SwitchboardConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SwitchboardConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SwitchboardConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<SwitchboardConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(SwitchboardConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SwitchboardConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Switchboard Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_app = "reports"            # Opened right after sign-in (or --app)
# login_path = "/login"
# validation_timeout_secs = 10       # Session check; timing out counts as invalid
# load_timeout_secs = 15             # Module instantiation

# [backend]
# base_url = "http://localhost:8000" # Or set SWITCHBOARD_BACKEND_URL
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(
    config: &SwitchboardConfig,
    cli_backend_url: Option<&str>,
    cli_app: Option<&str>,
) -> ResolvedConfig {
    // Backend URL: CLI → env → config → default
    let backend_url = cli_backend_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SWITCHBOARD_BACKEND_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    // Initial app: CLI → env → config
    let default_app = cli_app
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SWITCHBOARD_DEFAULT_APP").ok())
        .or_else(|| config.general.default_app.clone())
        .filter(|code| !code.trim().is_empty());

    ResolvedConfig {
        backend_url,
        default_app,
        login_path: config
            .general
            .login_path
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
        validation_timeout: Duration::from_secs(
            config
                .general
                .validation_timeout_secs
                .unwrap_or(DEFAULT_VALIDATION_TIMEOUT_SECS),
        ),
        load_timeout: Duration::from_secs(
            config
                .general
                .load_timeout_secs
                .unwrap_or(DEFAULT_LOAD_TIMEOUT_SECS),
        ),
    }
}
