// ── Core error types ──
//
// User-facing errors from parkwatch-core. Views never see HTTP status
// codes or JSON parse failures directly; the `From<parkwatch_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach parking server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Session rejected by server: {message}")]
    AuthenticationFailed { message: String },

    // ── Authorization ────────────────────────────────────────────────
    #[error("Not authorized to {action}")]
    Unauthorized { action: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {path}")]
    NotFound { path: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status code behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<parkwatch_api::Error> for CoreError {
    fn from(err: parkwatch_api::Error) -> Self {
        match err {
            parkwatch_api::Error::Unauthorized => CoreError::AuthenticationFailed {
                message: "session missing or expired".into(),
            },
            parkwatch_api::Error::Forbidden { path } => CoreError::Unauthorized {
                action: format!("access {path}"),
            },
            parkwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            parkwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            parkwatch_api::Error::InvalidToken(msg) => CoreError::Config {
                message: format!("Invalid session token: {msg}"),
            },
            parkwatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            parkwatch_api::Error::Http { status: 404, path } => CoreError::NotFound { path },
            parkwatch_api::Error::Http { status, path } => CoreError::Api {
                message: format!("HTTP {status} from {path}"),
                status: Some(status),
            },
            parkwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_404_becomes_not_found() {
        let err = CoreError::from(parkwatch_api::Error::Http {
            status: 404,
            path: "/api/parking-spot/3".into(),
        });
        assert!(matches!(err, CoreError::NotFound { ref path } if path == "/api/parking-spot/3"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn invalid_token_is_a_config_problem() {
        let err = CoreError::from(parkwatch_api::Error::InvalidToken("bad byte".into()));
        assert!(matches!(
            err,
            CoreError::Config { ref message } if message.contains("session token")
        ));
    }

    #[test]
    fn forbidden_becomes_unauthorized() {
        let err = CoreError::from(parkwatch_api::Error::Forbidden {
            path: "/api/qr/generate".into(),
        });
        assert_eq!(err.to_string(), "Not authorized to access /api/qr/generate");
    }
}
