// ── Runtime monitor configuration ──
//
// These types describe how to reach the parking server and who is looking.
// They never touch disk: the CLI/TUI builds a `MonitorConfig` from its
// profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::auth::Role;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Poll cadence per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Dashboard counts and latest visits (desktop and mobile).
    pub dashboard: Duration,
    /// Map page.
    pub map: Duration,
    /// Spot detail page.
    pub spot: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            dashboard: Duration::from_secs(5),
            map: Duration::from_secs(15),
            spot: Duration::from_secs(15),
        }
    }
}

/// Configuration for monitoring a single parking server.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Server root (e.g. `https://parking.example.com`).
    pub url: Url,
    /// Signed-in user name, if known.
    pub user: Option<String>,
    /// Role of the signed-in user.
    pub role: Role,
    /// Bearer token sent with every request.
    pub session_token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    pub intervals: PollIntervals,
}

impl MonitorConfig {
    /// Anonymous regular-user config with default timing.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            user: None,
            role: Role::User,
            session_token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            intervals: PollIntervals::default(),
        }
    }
}
