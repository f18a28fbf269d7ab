//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct process exit code.

use miette::Diagnostic;
use thiserror::Error;

use parkwatch_config::ConfigError;
use parkwatch_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the parking server at {url}")]
    #[diagnostic(
        code(parkwatch::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(parkwatch::timeout),
        help("Increase the timeout with --timeout or check the server's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication / authorization ───────────────────────────────
    #[error("The server rejected the session")]
    #[diagnostic(
        code(parkwatch::auth_failed),
        help(
            "Store a fresh token with: parkwatch config set-token <TOKEN>\n\
             Or set the PARKWATCH_TOKEN environment variable."
        )
    )]
    AuthFailed { message: String },

    #[error("Not permitted: {action}")]
    #[diagnostic(
        code(parkwatch::permission),
        help("This command needs a different role. Pass --role or update the profile.")
    )]
    Permission { action: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource} not found")]
    #[diagnostic(
        code(parkwatch::not_found),
        help("Run: parkwatch spots list to see available spots")
    )]
    NotFound { resource: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Server error: {message}")]
    #[diagnostic(code(parkwatch::api_error))]
    Api { message: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(parkwatch::validation))]
    Validation { field: String, reason: String },

    #[error("No server configured")]
    #[diagnostic(
        code(parkwatch::no_config),
        help(
            "Create a profile with: parkwatch config init --url <URL>\n\
             Or pass --server. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(parkwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: parkwatch config init --name {name} --url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(parkwatch::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(parkwatch::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoConfig { .. } => exit_code::AUTH,
            Self::Permission { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Api { .. } | Self::Config(_) | Self::Io(_) | Self::Serialize(_) => {
                exit_code::GENERAL
            }
        }
    }

    /// Attach the request timeout to a bare core timeout.
    pub fn from_core(err: CoreError, timeout_secs: u64) -> Self {
        match err {
            CoreError::Timeout => Self::Timeout {
                seconds: timeout_secs,
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout { seconds: 0 },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Unauthorized { action } => Self::Permission { action },
            CoreError::NotFound { path } => Self::NotFound { resource: path },
            CoreError::Api { message, .. } | CoreError::Internal(message) => {
                Self::Api { message }
            }
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_distinct_exit_codes() {
        let cases = [
            (
                CoreError::ConnectionFailed {
                    url: "http://x".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout, exit_code::TIMEOUT),
            (
                CoreError::AuthenticationFailed {
                    message: "expired".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Unauthorized {
                    action: "view spot details".into(),
                },
                exit_code::PERMISSION,
            ),
            (
                CoreError::NotFound {
                    path: "/api/parking-spot/9".into(),
                },
                exit_code::NOT_FOUND,
            ),
        ];

        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn timeout_carries_the_configured_seconds() {
        let err = CliError::from_core(CoreError::Timeout, 12);
        assert!(err.to_string().contains("12s"));
    }
}
