//! Screen implementations. Each screen is a top-level Component.

pub mod dashboard;
pub mod map;
pub mod mobile_dashboard;
pub mod spot_detail;
pub mod unauthorized;
pub mod visits;

use crate::component::Component;
use crate::screen::ScreenKind;

/// One component per screen kind.
pub fn create_screens() -> Vec<(ScreenKind, Box<dyn Component>)> {
    vec![
        (
            ScreenKind::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (
            ScreenKind::MobileDashboard,
            Box::new(mobile_dashboard::MobileDashboardScreen::new()),
        ),
        (ScreenKind::Map, Box::new(map::MapScreen::new())),
        (
            ScreenKind::SpotDetail,
            Box::new(spot_detail::SpotDetailScreen::new()),
        ),
        (ScreenKind::LatestVisits, Box::new(visits::VisitsScreen::new())),
        (
            ScreenKind::Unauthorized,
            Box::new(unauthorized::UnauthorizedScreen),
        ),
    ]
}
