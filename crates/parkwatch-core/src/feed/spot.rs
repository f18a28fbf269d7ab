use std::time::Duration;

use tracing::warn;

use parkwatch_api::ParkingClient;

use crate::error::CoreError;
use crate::model::{ParkingSpot, Visit};
use crate::poll::Poller;
use crate::store::FeedStream;

const SPOT_FETCH_FAILED: &str = "Failed to fetch spot data";
const HISTORY_FETCH_FAILED: &str = "Failed to fetch visit history";

/// State of the spot detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotDetailState {
    pub spot_id: i64,
    pub spot: Option<ParkingSpot>,
    pub visits: Vec<Visit>,
    /// Message from the last failed poll; cleared by the next success.
    pub error: Option<String>,
    /// No poll has completed yet.
    pub loading: bool,
}

impl SpotDetailState {
    pub fn new(spot_id: i64) -> Self {
        Self {
            spot_id,
            spot: None,
            visits: Vec::new(),
            error: None,
            loading: true,
        }
    }

    fn apply(&mut self, result: Result<(ParkingSpot, Vec<Visit>), String>) {
        self.loading = false;
        match result {
            Ok((spot, visits)) => {
                self.spot = Some(spot);
                self.visits = visits;
                self.error = None;
            }
            Err(message) => {
                warn!(spot_id = self.spot_id, error = %message, "spot detail poll failed");
                self.error = Some(message);
            }
        }
    }
}

/// Message shown for a failed detail fetch: a fixed text when the server
/// answered with an error status, the transport error otherwise.
fn failure_message(err: parkwatch_api::Error, on_status: &str) -> String {
    if err.status().is_some() {
        on_status.to_owned()
    } else {
        CoreError::from(err).to_string()
    }
}

/// Status first, then history. Both land together or not at all.
pub async fn fetch_spot_detail(
    client: &ParkingClient,
    spot_id: i64,
) -> Result<(ParkingSpot, Vec<Visit>), String> {
    let spot = client
        .get_spot(spot_id)
        .await
        .map_err(|e| failure_message(e, SPOT_FETCH_FAILED))?;
    let visits = client
        .spot_visits(spot_id)
        .await
        .map_err(|e| failure_message(e, HISTORY_FETCH_FAILED))?;
    Ok((spot, visits))
}

/// Polls one spot's status and visit history.
///
/// Only created through [`Monitor::spot_feed`](crate::Monitor::spot_feed),
/// which refuses non-admin sessions.
pub struct SpotFeed {
    poller: Poller<SpotDetailState>,
    spot_id: i64,
}

impl SpotFeed {
    pub(crate) fn spawn(client: ParkingClient, spot_id: i64, interval: Duration) -> Self {
        let poller = Poller::spawn(
            "spot",
            Some(interval),
            SpotDetailState::new(spot_id),
            move || {
                let client = client.clone();
                async move { fetch_spot_detail(&client, spot_id).await }
            },
            SpotDetailState::apply,
        );
        Self { poller, spot_id }
    }

    pub fn spot_id(&self) -> i64 {
        self.spot_id
    }

    pub fn current(&self) -> SpotDetailState {
        self.poller.current()
    }

    pub fn stream(&self) -> FeedStream<SpotDetailState> {
        self.poller.stream()
    }

    pub fn refresh(&self) {
        self.poller.refresh();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_kept_until_next_success() {
        let mut state = SpotDetailState::new(3);
        state.apply(Err(SPOT_FETCH_FAILED.into()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(SPOT_FETCH_FAILED));
        assert_eq!(state.spot, None);

        let spot = ParkingSpot {
            spot_id: 3,
            available: true,
            reserved: false,
            error: false,
            last_updated: Some("2024-03-05T08:02:00".into()),
        };
        state.apply(Ok((spot.clone(), Vec::new())));
        assert_eq!(state.error, None);
        assert_eq!(state.spot, Some(spot));
    }

    #[test]
    fn status_errors_use_fixed_messages() {
        let err = parkwatch_api::Error::Http {
            status: 500,
            path: "/api/latest-visits/spot/3".into(),
        };
        assert_eq!(failure_message(err, HISTORY_FETCH_FAILED), HISTORY_FETCH_FAILED);
    }
}
