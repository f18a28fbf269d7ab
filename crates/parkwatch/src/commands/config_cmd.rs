//! Config subcommand handlers. None of these talk to the server.

use std::fmt::Write as _;

use tabled::Tabled;

use parkwatch_core::Role;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Role")]
    role: String,
}

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let d = &cfg.defaults;
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", d.output);
    let _ = writeln!(out, "color = \"{}\"", d.color);
    let _ = writeln!(out, "insecure = {}", d.insecure);
    let _ = writeln!(out, "timeout = {}", d.timeout);
    let _ = writeln!(out, "dashboard_interval_secs = {}", d.dashboard_interval_secs);
    let _ = writeln!(out, "map_interval_secs = {}", d.map_interval_secs);
    let _ = writeln!(out, "spot_interval_secs = {}", d.spot_interval_secs);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref user) = p.user {
            let _ = writeln!(out, "user = \"{user}\"");
        }
        let _ = writeln!(out, "role = \"{}\"", p.role);
        if p.session_token.is_some() {
            let _ = writeln!(out, "session_token = \"****\"");
        }
        if let Some(ref env) = p.session_token_env {
            let _ = writeln!(out, "session_token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Add or replace `name`. The first profile becomes the default.
fn upsert_profile(cfg: &mut Config, name: &str, profile: Profile) {
    let first = cfg.profiles.is_empty();
    cfg.profiles.insert(name.to_owned(), profile);
    if first {
        cfg.default_profile = Some(name.to_owned());
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            name,
            url,
            as_user,
            as_role,
            accept_invalid_certs,
        } => {
            url::Url::parse(&url).map_err(|e| CliError::Validation {
                field: "url".into(),
                reason: format!("{url}: {e}"),
            })?;

            let mut profile = Profile::new(url);
            profile.user = as_user;
            profile.role = Role::from(as_role);
            profile.insecure = accept_invalid_certs.then_some(true);

            let mut cfg = config::load_config_or_default();
            upsert_profile(&mut cfg, &name, profile);
            config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!(
                    "✓ Profile '{name}' saved to {}",
                    config::config_path().display()
                );
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.clone().unwrap_or_default();
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort();
            let rows: Vec<ProfileRow> = names
                .into_iter()
                .map(|name| {
                    let p = &cfg.profiles[name];
                    ProfileRow {
                        marker: if *name == default { "*" } else { "" },
                        name: name.clone(),
                        server: p.server.clone(),
                        user: p.user.clone().unwrap_or_default(),
                        role: p.role.to_string(),
                    }
                })
                .collect();
            output::print_output(&output::render_table(&rows), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetToken { for_profile, token } => {
            let cfg = config::load_config_or_default();
            let name = for_profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            config::store_session_token(&name, &token)?;
            if !global.quiet {
                eprintln!("✓ Session token for '{name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_view_masks_the_token() {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://parking.example.com");
        profile.session_token = Some("secret-token".into());
        profile.session_token_env = Some("LOT_A_TOKEN".into());
        cfg.profiles.insert("lot-a".into(), profile);

        let text = format_config_redacted(&cfg);
        assert!(text.contains("[profiles.lot-a]"));
        assert!(text.contains("session_token = \"****\""));
        assert!(text.contains("session_token_env = \"LOT_A_TOKEN\""));
        assert!(!text.contains("secret-token"));
    }

    #[test]
    fn first_profile_becomes_default() {
        let mut cfg = Config::default();
        upsert_profile(&mut cfg, "lot-a", Profile::new("https://a.example.com"));
        upsert_profile(&mut cfg, "lot-b", Profile::new("https://b.example.com"));
        assert_eq!(cfg.default_profile.as_deref(), Some("lot-a"));
        assert_eq!(cfg.profiles.len(), 2);
    }
}
