//! CLI-side context assembly.
//!
//! Resolves the active profile, builds the store client and link
//! configuration, and exposes everything command handlers need.

use std::path::PathBuf;

use uuid::Uuid;

use gatepass_config::{Config, load_config_or_default, profile_to_link_config, profile_to_store_client};
use gatepass_core::{HostIdentity, LinkConfig, RemoteSession, RemoteStore, SessionProvider};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a store-backed command needs, built once per invocation.
pub struct Context {
    pub profile_name: String,
    pub store: RemoteStore,
    pub link: LinkConfig,
    pub community: String,
    pub font_path: Option<PathBuf>,
    host_id: Option<Uuid>,
}

impl Context {
    /// The resident this machine issues passes as. Required for issue
    /// and list commands, not for verification.
    pub async fn host(&self) -> Result<HostIdentity, CliError> {
        let host_id = self.host_id.ok_or_else(|| CliError::Validation {
            field: "host_id".into(),
            reason: format!(
                "profile '{}' has no host_id; set it to your resident id",
                self.profile_name
            ),
        })?;

        let session = RemoteSession::new(self.store.clone(), host_id);
        session
            .current_host()
            .await
            .map_err(|e| CliError::from(gatepass_core::CoreError::from(e)))
    }
}

/// Build a [`Context`] from the config file and global flags.
pub fn build_context(global: &GlobalOpts) -> Result<Context, CliError> {
    let cfg = load_config_or_default();
    let (name, profile) = lookup_profile(&cfg, global)?;

    let link = profile_to_link_config(profile)?;
    // flag > profile > config default
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);
    let client = profile_to_store_client(profile, name, timeout)?;

    Ok(Context {
        profile_name: name.to_owned(),
        store: RemoteStore::new(client),
        link,
        community: profile.community.clone(),
        font_path: profile.font_path.clone(),
        host_id: profile.host_id,
    })
}

fn lookup_profile<'c>(
    cfg: &'c Config,
    global: &'c GlobalOpts,
) -> Result<(&'c str, &'c gatepass_config::Profile), CliError> {
    cfg.profile(global.profile.as_deref()).map_err(|e| {
        if let gatepass_config::ConfigError::UnknownProfile { profile } = e {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            CliError::ProfileNotFound {
                name: profile,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            }
        } else {
            e.into()
        }
    })
}
