// ── Domain model ──
//
// Read-only projections of server state. The wire types are reused as-is;
// this module adds the derived display state.

mod status;

pub use parkwatch_api::{Counts, ParkingSpot, QrCode, SpotRef, SpotsPage, Visit, VisitUpdate};
pub use status::{LEGEND, SpotStatus, StatusColor};

/// Direction of a visit update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Arrived,
    Departed,
}

impl Movement {
    /// `availability == 1` means the spot became free again.
    pub fn of(update: &VisitUpdate) -> Self {
        if update.availability == 1 {
            Self::Departed
        } else {
            Self::Arrived
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Arrived => "Arrived",
            Self::Departed => "Departed",
        }
    }
}
