//! Shared configuration for the parkwatch CLI and TUI.
//!
//! TOML profiles, session-token resolution (env + keyring + plaintext),
//! and translation to `parkwatch_core::MonitorConfig`. Both binaries
//! depend on this crate; the CLI layers its global flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use parkwatch_core::{MonitorConfig, PollIntervals, Role, TlsVerification};

/// Keyring service name.
const KEYRING_SERVICE: &str = "parkwatch";

/// Session-token variable checked when the profile names none.
pub const TOKEN_ENV: &str = "PARKWATCH_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("keyring error: {0}")]
    Keyring(String),

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

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
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

impl Config {
    /// Name of the profile to use: explicit choice, then `default_profile`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Dashboard poll interval (counts and latest visits).
    #[serde(default = "default_dashboard_interval")]
    pub dashboard_interval_secs: u64,

    /// Map poll interval.
    #[serde(default = "default_page_interval")]
    pub map_interval_secs: u64,

    /// Spot detail poll interval.
    #[serde(default = "default_page_interval")]
    pub spot_interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            dashboard_interval_secs: default_dashboard_interval(),
            map_interval_secs: default_page_interval(),
            spot_interval_secs: default_page_interval(),
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
    30
}
fn default_dashboard_interval() -> u64 {
    5
}
fn default_page_interval() -> u64 {
    15
}

/// A named server profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://parking.example.com").
    pub server: String,

    /// Signed-in user name.
    pub user: Option<String>,

    /// "admin" or "user".
    #[serde(default)]
    pub role: Role,

    /// Session token (plaintext, prefer keyring or env var).
    pub session_token: Option<String>,

    /// Environment variable name containing the session token.
    pub session_token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            user: None,
            role: Role::User,
            session_token: None,
            session_token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "parkwatch", "parkwatch").map_or_else(
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
    p.push("parkwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, overlaid with `PARKWATCH_*` variables
/// (`__` separates nesting, e.g. `PARKWATCH_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PARKWATCH_").ignore(&["TOKEN", "CONFIG"]).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Session token resolution ────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/session-token"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve the session token from the credential chain.
///
/// Order: the profile's `session_token_env` variable, `PARKWATCH_TOKEN`,
/// the system keyring, then plaintext `session_token`. `None` means the
/// requests go out anonymously.
pub fn resolve_session_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's session_token_env → env var lookup
    if let Some(ref env_name) = profile.session_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    profile
        .session_token
        .as_ref()
        .map(|token| SecretString::from(token.clone()))
}

/// Store a session token in the system keyring.
pub fn store_session_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(token)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `MonitorConfig` from a profile and the global defaults.
pub fn profile_to_monitor_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let url: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let intervals = PollIntervals {
        dashboard: interval(defaults.dashboard_interval_secs, "dashboard_interval_secs")?,
        map: interval(defaults.map_interval_secs, "map_interval_secs")?,
        spot: interval(defaults.spot_interval_secs, "spot_interval_secs")?,
    };

    Ok(MonitorConfig {
        url,
        user: profile.user.clone(),
        role: profile.role,
        session_token: resolve_session_token(profile, profile_name),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        intervals,
    })
}

fn interval(secs: u64, field: &str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lot-a"

[defaults]
timeout = 10
map_interval_secs = 20

[profiles.lot-a]
server = "https://parking.example.com"
user = "jane"
role = "admin"
session_token = "plain-token"
"#;

    #[test]
    fn loads_profiles_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.profile_name(None), "lot-a");
        assert_eq!(cfg.profile_name(Some("other")), "other");
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.dashboard_interval_secs, 5);
        assert_eq!(cfg.defaults.map_interval_secs, 20);

        let profile = cfg.profile("lot-a").unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.user.as_deref(), Some("jane"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert!(matches!(
            cfg.profile("default"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("http://localhost:3000");
        profile.user = Some("ops".into());
        profile.role = Role::Admin;
        cfg.profiles.insert("default".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.server, "http://localhost:3000");
        assert_eq!(profile.role, Role::Admin);
    }

    #[test]
    fn monitor_config_from_profile() {
        let mut profile = Profile::new("https://parking.example.com");
        profile.insecure = Some(true);
        profile.timeout = Some(5);
        let defaults = Defaults::default();

        let cfg = profile_to_monitor_config(&profile, "test-profile", &defaults).unwrap();

        assert_eq!(cfg.url.as_str(), "https://parking.example.com/");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.intervals.dashboard, Duration::from_secs(5));
        assert_eq!(cfg.intervals.map, Duration::from_secs(15));
        assert_eq!(cfg.role, Role::User);
    }

    #[test]
    fn rejects_bad_server_url() {
        let profile = Profile::new("not a url");
        let err = profile_to_monitor_config(&profile, "p", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }

    #[test]
    fn rejects_zero_interval() {
        let profile = Profile::new("https://parking.example.com");
        let defaults = Defaults {
            spot_interval_secs: 0,
            ..Defaults::default()
        };
        let err = profile_to_monitor_config(&profile, "p", &defaults).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. } if field == "spot_interval_secs"
        ));
    }
}
