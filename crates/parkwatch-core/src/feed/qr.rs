use tracing::warn;

use parkwatch_api::ParkingClient;

use crate::error::CoreError;
use crate::model::QrCode;
use crate::poll::Poller;
use crate::store::FeedStream;

/// The viewer's access QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrState {
    /// `data:` URL of the QR image.
    pub data_url: Option<String>,
    /// Raw expiry timestamp.
    pub expires_at: Option<String>,
    /// A generate request is outstanding.
    pub pending: bool,
}

impl Default for QrState {
    fn default() -> Self {
        Self {
            data_url: None,
            expires_at: None,
            pending: true,
        }
    }
}

impl QrState {
    /// Fields missing from a response keep their previous value; a failed
    /// request clears both.
    pub fn apply(&mut self, result: Result<QrCode, CoreError>) {
        self.pending = false;
        match result {
            Ok(qr) => {
                if let Some(url) = qr.qr_code_data_url {
                    self.data_url = Some(url);
                }
                if let Some(expires_at) = qr.expires_at {
                    self.expires_at = Some(expires_at);
                }
            }
            Err(e) => {
                warn!(error = %e, "access code generation failed");
                self.data_url = None;
                self.expires_at = None;
            }
        }
    }
}

/// Fetches an access code once, then again on every [`regenerate()`](Self::regenerate).
///
/// Only created through [`Monitor::qr_feed`](crate::Monitor::qr_feed), which
/// skips admin sessions.
pub struct QrFeed {
    poller: Poller<QrState>,
}

impl QrFeed {
    pub(crate) fn spawn(client: ParkingClient) -> Self {
        let poller = Poller::spawn(
            "qr",
            None,
            QrState::default(),
            move || {
                let client = client.clone();
                async move { client.generate_qr().await.map_err(CoreError::from) }
            },
            QrState::apply,
        );
        Self { poller }
    }

    /// Request a fresh code.
    pub fn regenerate(&self) {
        self.poller.modify(|state| state.pending = true);
        self.poller.refresh();
    }

    pub fn current(&self) -> QrState {
        self.poller.current()
    }

    pub fn stream(&self) -> FeedStream<QrState> {
        self.poller.stream()
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_response_keeps_previous_fields() {
        let mut state = QrState::default();
        state.apply(Ok(QrCode {
            qr_code_data_url: Some("data:image/png;base64,AAA".into()),
            expires_at: Some("2024-03-05T09:00:00Z".into()),
        }));
        state.apply(Ok(QrCode {
            qr_code_data_url: Some("data:image/png;base64,BBB".into()),
            expires_at: None,
        }));

        assert_eq!(state.data_url.as_deref(), Some("data:image/png;base64,BBB"));
        assert_eq!(state.expires_at.as_deref(), Some("2024-03-05T09:00:00Z"));
        assert!(!state.pending);
    }

    #[test]
    fn failure_clears_both_fields() {
        let mut state = QrState {
            data_url: Some("data:image/png;base64,AAA".into()),
            expires_at: Some("2024-03-05T09:00:00Z".into()),
            pending: true,
        };
        state.apply(Err(CoreError::Timeout));
        assert_eq!(state.data_url, None);
        assert_eq!(state.expires_at, None);
    }
}
