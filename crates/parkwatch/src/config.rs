//! CLI configuration: a thin layer over `parkwatch_config` that applies
//! the global flag overrides (--server, --role, --token, ...).

use std::time::Duration;

use secrecy::SecretString;

use parkwatch_core::{MonitorConfig, Role};

use crate::cli::{GlobalOpts, RoleArg};
use crate::error::CliError;

pub use parkwatch_config::{
    Config, Profile, config_path, load_config_or_default, profile_to_monitor_config, save_config,
    store_session_token,
};

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::User => Role::User,
        }
    }
}

/// Resolve the active profile name from flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Sorted, comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Build a `MonitorConfig` from the config file, the profile, and the
/// global flags. Flags win over profile values.
pub fn build_monitor_config(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);
    resolve(global, &cfg, &name)
}

fn resolve(global: &GlobalOpts, cfg: &Config, name: &str) -> Result<MonitorConfig, CliError> {
    let mut profile = match (cfg.profiles.get(name), global.server.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(server)) => Profile::new(server),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: name.into(),
                available: available_profiles(cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(ref user) = global.user {
        profile.user = Some(user.clone());
    }
    if let Some(role) = global.role {
        profile.role = role.into();
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    let mut config = profile_to_monitor_config(&profile, name, &cfg.defaults)?;
    if let Some(ref token) = global.token {
        config.session_token = Some(SecretString::from(token.clone()));
    }
    config.timeout = Duration::from_secs(global.timeout);
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["parkwatch"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["counts"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_profile() -> Config {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://parking.example.com");
        profile.user = Some("jane".into());
        cfg.profiles.insert("default".into(), profile);
        cfg
    }

    #[test]
    fn flags_override_the_profile() {
        let cfg = config_with_profile();
        let opts = global(&["--role", "admin", "--user", "sam", "--timeout", "5"]);
        let config = resolve(&opts, &cfg, "default").unwrap();

        assert_eq!(config.role, Role::Admin);
        assert_eq!(config.user.as_deref(), Some("sam"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.url.as_str(), "https://parking.example.com/");
    }

    #[test]
    fn server_flag_works_without_a_profile() {
        let opts = global(&["--server", "http://127.0.0.1:8080"]);
        let config = resolve(&opts, &Config::default(), "default").unwrap();
        assert_eq!(config.url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.role, Role::User);
    }

    #[test]
    fn missing_named_profile_lists_alternatives() {
        let cfg = config_with_profile();
        let opts = global(&["--profile", "lot-b"]);
        let err = resolve(&opts, &cfg, "lot-b").unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "lot-b");
                assert_eq!(available, "default");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nothing_configured_is_an_auth_error() {
        let opts = global(&[]);
        let err = resolve(&opts, &Config::default(), "default").unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
