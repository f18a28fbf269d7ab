use std::time::Duration;

use tracing::warn;

use parkwatch_api::ParkingClient;

use crate::model::{Counts, VisitUpdate};
use crate::poll::Poller;
use crate::store::FeedStream;

/// Counts and latest visits, replaced together on every poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardData {
    pub counts: Counts,
    pub visits: Vec<VisitUpdate>,
    /// At least one poll has completed.
    pub loaded: bool,
}

/// Fetch both dashboard resources concurrently.
///
/// Each failure falls back on its own: counts to zero, visits to empty.
/// The caller always gets one whole snapshot.
pub async fn fetch_dashboard(client: &ParkingClient) -> DashboardData {
    let (counts, visits) = tokio::join!(client.spot_counts(), client.latest_visits());

    let counts = counts.unwrap_or_else(|e| {
        warn!(error = %e, "counts fetch failed, showing zero");
        Counts::default()
    });
    let visits = visits.unwrap_or_else(|e| {
        warn!(error = %e, "latest visits fetch failed, showing none");
        Vec::new()
    });

    DashboardData {
        counts,
        visits,
        loaded: true,
    }
}

/// Polls counts and latest visits for the dashboards.
pub struct DashboardFeed {
    poller: Poller<DashboardData>,
}

impl DashboardFeed {
    pub fn spawn(client: ParkingClient, interval: Duration) -> Self {
        let poller = Poller::spawn(
            "dashboard",
            Some(interval),
            DashboardData::default(),
            move || {
                let client = client.clone();
                async move { fetch_dashboard(&client).await }
            },
            |state, next| *state = next,
        );
        Self { poller }
    }

    pub fn current(&self) -> DashboardData {
        self.poller.current()
    }

    pub fn stream(&self) -> FeedStream<DashboardData> {
        self.poller.stream()
    }

    pub fn refresh(&self) {
        self.poller.refresh();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}
