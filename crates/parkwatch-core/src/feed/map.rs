use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use parkwatch_api::{ParkingClient, SpotQuery};

use crate::error::CoreError;
use crate::model::{ParkingSpot, SpotsPage};
use crate::pagination::{SPOTS_PER_PAGE, total_pages};
use crate::poll::Poller;
use crate::store::FeedStream;

/// State of the paginated map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapState {
    /// Page the user selected.
    pub current_page: u32,
    /// Last known page count. Starts at 1 and only changes when the
    /// server reports a non-zero total.
    pub total_pages: u32,
    /// Spots of the last page that arrived, `None` before the first.
    pub spots: Option<Vec<ParkingSpot>>,
    /// Page the `spots` belong to.
    pub data_page: u32,
    pub last_error: Option<String>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            spots: None,
            data_page: 1,
            last_error: None,
        }
    }
}

impl MapState {
    /// First page and its total have arrived; the full-panel spinner is
    /// never shown again after this.
    pub fn has_loaded(&self) -> bool {
        self.spots.is_some() && self.total_pages >= 1
    }

    fn apply(&mut self, page: u32, result: Result<SpotsPage, CoreError>) {
        match result {
            Ok(data) => {
                if data.total > 0 {
                    self.total_pages = total_pages(data.total, SPOTS_PER_PAGE);
                }
                self.spots = Some(data.spots);
                self.data_page = page;
                self.last_error = None;
            }
            Err(e) => {
                warn!(page, error = %e, "map page fetch failed");
                self.last_error = Some(e.to_string());
            }
        }
    }
}

/// Polls one page of spots; changing page fetches immediately.
pub struct MapFeed {
    poller: Poller<MapState>,
    page: Arc<AtomicU32>,
}

impl MapFeed {
    pub fn spawn(client: ParkingClient, interval: Duration) -> Self {
        let page = Arc::new(AtomicU32::new(1));
        let selected = Arc::clone(&page);

        let poller = Poller::spawn(
            "map",
            Some(interval),
            MapState::default(),
            move || {
                let client = client.clone();
                let page = selected.load(Ordering::SeqCst);
                async move {
                    let result = client
                        .list_spots(&SpotQuery::page(page, SPOTS_PER_PAGE))
                        .await
                        .map_err(CoreError::from);
                    (page, result)
                }
            },
            |state: &mut MapState, (page, result)| state.apply(page, result),
        );

        Self { poller, page }
    }

    /// Select a page, clamped to the known page range, and fetch it.
    pub fn set_page(&self, page: u32) {
        let total = self.poller.current().total_pages.max(1);
        let page = page.clamp(1, total);
        if self.page.swap(page, Ordering::SeqCst) == page {
            return;
        }
        debug!(page, "map page selected");
        self.poller.modify(|state| state.current_page = page);
        self.poller.refresh();
    }

    pub fn page(&self) -> u32 {
        self.page.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> MapState {
        self.poller.current()
    }

    pub fn stream(&self) -> FeedStream<MapState> {
        self.poller.stream()
    }

    pub fn refresh(&self) {
        self.poller.refresh();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}
