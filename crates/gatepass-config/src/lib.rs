//! Shared configuration for the gatepass CLI.
//!
//! TOML profiles, service-key resolution (env + keyring + plaintext),
//! and translation to `gatepass_core::LinkConfig` and a ready-to-use
//! `gatepass_store::StoreClient`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use gatepass_core::LinkConfig;
use gatepass_store::{StoreClient, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no service key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("no profile named '{profile}' in the config file")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named community profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named community deployment.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Record store project root (e.g., "https://abc.example-db.co").
    pub store_url: String,

    /// Service key (plaintext -- prefer keyring or env var).
    pub service_key: Option<String>,

    /// Environment variable name containing the service key.
    pub service_key_env: Option<String>,

    /// Resident id this machine issues passes as.
    pub host_id: Option<Uuid>,

    /// Community name printed on cards (e.g., "Tijani Ukay").
    #[serde(default = "default_community")]
    pub community: String,

    /// Public origin verification links point at.
    pub public_origin: String,

    /// Application base path under the origin. Empty for root.
    #[serde(default)]
    pub base_path: String,

    /// LAN origin substituted when `public_origin` is loopback.
    pub lan_dev_origin: Option<String>,

    /// TTF/OTF file used when composing share cards.
    pub font_path: Option<PathBuf>,

    /// Override store timeout (seconds).
    pub timeout: Option<u64>,
}

fn default_community() -> String {
    "Tijani Ukay".into()
}

impl Config {
    /// Look up a profile: the named one, or the default.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })?;
        Ok((name, profile))
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "gatepass", "gatepass").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gatepass");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit path, still merging `GATEPASS_*` env.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GATEPASS_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the store service key from the credential chain.
pub fn resolve_service_key(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_service_key_with_env(profile, profile_name, |var| std::env::var(var).ok())
}

/// Credential chain with the env lookup injected, so precedence is
/// testable without mutating process env.
fn resolve_service_key_with_env(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's service_key_env → env var lookup
    if let Some(ref env_name) = profile.service_key_env {
        if let Some(val) = env(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("gatepass", &format!("{profile_name}/service-key")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.service_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store the service key in the system keyring.
pub fn store_service_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("gatepass", &format!("{profile_name}/service-key")).map_err(
        |e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        },
    )?;
    entry.set_password(key).map_err(|e| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    })
}

// ── Translation to core/store types ─────────────────────────────────

/// Build the verification-link configuration from a profile.
pub fn profile_to_link_config(profile: &Profile) -> Result<LinkConfig, ConfigError> {
    let public_origin = parse_origin(&profile.public_origin, "public_origin")?;
    let lan_dev_origin = profile
        .lan_dev_origin
        .as_deref()
        .map(|s| parse_origin(s, "lan_dev_origin"))
        .transpose()?;

    Ok(LinkConfig {
        public_origin,
        base_path: profile.base_path.clone(),
        lan_dev_origin,
    })
}

fn parse_origin(raw: &str, field: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a ready-to-use store client from a profile, resolving the
/// service key through the credential chain. Timeout precedence is the
/// caller's concern; pass the final value.
pub fn profile_to_store_client(
    profile: &Profile,
    profile_name: &str,
    timeout_secs: u64,
) -> Result<StoreClient, ConfigError> {
    let base_url = parse_origin(&profile.store_url, "store_url")?;
    let key = resolve_service_key(profile, profile_name)?;
    let transport = TransportConfig {
        timeout: Duration::from_secs(timeout_secs),
    };

    StoreClient::new(base_url, &key, &transport).map_err(|e| ConfigError::Validation {
        field: "store_url".into(),
        reason: e.to_string(),
    })
}
