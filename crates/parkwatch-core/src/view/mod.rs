// ── View models ──
//
// Render-ready data for each page. Builders take feed state plus the
// viewer's capabilities and resolve every role and loading branch, so the
// front ends only lay out what they are given.

mod dashboard;
mod map;
mod spot;

pub use dashboard::{
    DashboardView, LatestVisitsView, MobileDashboardView, QrCard, ADMIN_UPDATES_HEADING,
    SHOW_PARKING_LOT, USER_UPDATES_HEADING,
};
pub use map::{MapView, SpotTile};
pub use spot::{ReservationPanel, SpotDetailPage, SpotDetailView};

use crate::format::format_visit_update;
use crate::model::{Counts, VisitUpdate};

/// Shown by any list with no rows.
pub const EMPTY_TEXT: &str = "No data available.";

/// Available/occupied counters with their captions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountsCard {
    pub available: u64,
    pub occupied: u64,
    pub available_label: &'static str,
    pub occupied_label: &'static str,
}

/// A headed list of formatted visit updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatesList {
    pub heading: &'static str,
    pub rows: Vec<String>,
}

impl UpdatesList {
    /// The first `limit` updates in server order.
    pub(crate) fn build(heading: &'static str, visits: &[VisitUpdate], limit: usize) -> Self {
        Self {
            heading,
            rows: visits.iter().take(limit).map(format_visit_update).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl CountsCard {
    pub(crate) fn new(
        counts: Counts,
        available_label: &'static str,
        occupied_label: &'static str,
    ) -> Self {
        Self {
            available: counts.available,
            occupied: counts.occupied,
            available_label,
            occupied_label,
        }
    }
}
