//! Configuration command handlers.

use gatepass_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_service_key,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = load_config_or_default();
            // never echo plaintext keys back to the terminal
            for profile in cfg.profiles.values_mut() {
                if profile.service_key.is_some() {
                    profile.service_key = Some("********".into());
                }
            }
            let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
                message: e.to_string(),
            })?;
            print!("{rendered}");
            Ok(())
        }

        ConfigCommand::Init {
            store_url,
            public_origin,
        } => {
            let path = config_path();
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", path.display()),
                    global.yes,
                )?
            {
                return Ok(());
            }

            let name = global.profile.clone().unwrap_or_else(|| "default".into());
            let mut cfg = Config::default();
            cfg.default_profile = Some(name.clone());
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    store_url,
                    service_key: None,
                    service_key_env: None,
                    host_id: None,
                    community: "Tijani Ukay".into(),
                    public_origin,
                    base_path: String::new(),
                    lan_dev_origin: None,
                    font_path: None,
                    timeout: None,
                },
            );
            save_config(&cfg)?;

            if !global.quiet {
                eprintln!("Config written to {}", path.display());
                eprintln!("Next: gatepass config set-key --profile {name}");
            }
            Ok(())
        }

        ConfigCommand::SetKey => {
            let cfg = load_config_or_default();
            let name = global
                .profile
                .clone()
                .or(cfg.default_profile)
                .unwrap_or_else(|| "default".into());

            let key = dialoguer::Password::new()
                .with_prompt(format!("Service key for profile '{name}'"))
                .interact()
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

            store_service_key(&name, &key)?;
            if !global.quiet {
                eprintln!("Service key stored in the system keyring");
            }
            Ok(())
        }
    }
}
