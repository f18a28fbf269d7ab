use serde::Serialize;
use strum::{Display, IntoStaticStr};

use parkwatch_api::ParkingSpot;

/// Display state of a spot.
///
/// The flags on [`ParkingSpot`] overlap; they collapse to one state by
/// priority error > reserved > available > occupied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr,
)]
pub enum SpotStatus {
    Error,
    Reserved,
    Available,
    Occupied,
}

/// Indicator color for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusColor {
    Green,
    Red,
    Yellow,
}

impl SpotStatus {
    pub fn of(spot: &ParkingSpot) -> Self {
        if spot.error {
            Self::Error
        } else if spot.reserved {
            Self::Reserved
        } else if spot.available {
            Self::Available
        } else {
            Self::Occupied
        }
    }

    pub fn label(self) -> &'static str {
        self.into()
    }

    pub fn color(self) -> StatusColor {
        match self {
            Self::Error => StatusColor::Yellow,
            Self::Available => StatusColor::Green,
            Self::Reserved | Self::Occupied => StatusColor::Red,
        }
    }
}

/// Map legend entries in display order.
pub const LEGEND: [(StatusColor, &str); 3] = [
    (StatusColor::Green, "Available"),
    (StatusColor::Red, "Occupied / Reserved"),
    (StatusColor::Yellow, "Error"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(error: bool, reserved: bool, available: bool) -> ParkingSpot {
        ParkingSpot {
            spot_id: 1,
            available,
            reserved,
            error,
            last_updated: None,
        }
    }

    #[test]
    fn label_precedence() {
        assert_eq!(SpotStatus::of(&spot(true, true, true)).label(), "Error");
        assert_eq!(SpotStatus::of(&spot(false, true, true)).label(), "Reserved");
        assert_eq!(SpotStatus::of(&spot(false, false, true)).label(), "Available");
        assert_eq!(SpotStatus::of(&spot(false, false, false)).label(), "Occupied");
    }

    #[test]
    fn colors() {
        assert_eq!(SpotStatus::Error.color(), StatusColor::Yellow);
        assert_eq!(SpotStatus::Reserved.color(), StatusColor::Red);
        assert_eq!(SpotStatus::Available.color(), StatusColor::Green);
        assert_eq!(SpotStatus::Occupied.color(), StatusColor::Red);
    }
}
