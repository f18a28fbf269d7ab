//! Screen identifiers and the tab bar order.

use std::fmt;

use parkwatch_core::{LayoutMode, Route};

/// Terminals narrower than this use the mobile layout.
pub const MOBILE_BREAKPOINT: u16 = 100;

/// Pick the layout for a terminal width unless one is forced.
pub fn layout_for(width: u16, forced: Option<LayoutMode>) -> LayoutMode {
    forced.unwrap_or(if width < MOBILE_BREAKPOINT {
        LayoutMode::Mobile
    } else {
        LayoutMode::Desktop
    })
}

/// The component that draws a route in a given layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Dashboard,
    MobileDashboard,
    Map,
    SpotDetail,
    LatestVisits,
    Unauthorized,
}

impl ScreenKind {
    pub fn for_route(route: Route, mode: LayoutMode) -> Self {
        match (route, mode) {
            (Route::Dashboard, LayoutMode::Desktop) => Self::Dashboard,
            (Route::Dashboard, LayoutMode::Mobile) => Self::MobileDashboard,
            (Route::Map, _) => Self::Map,
            (Route::SpotDetail(_), _) => Self::SpotDetail,
            (Route::LatestVisits, _) => Self::LatestVisits,
            (Route::Unauthorized, _) => Self::Unauthorized,
        }
    }
}

/// Tab-bar entries, navigable with number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Map,
    Visits,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Self::Dashboard, Self::Map, Self::Visits];

    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Map => 2,
            Self::Visits => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.number() == n)
    }

    pub fn route(self) -> Route {
        match self {
            Self::Dashboard => Route::Dashboard,
            Self::Map => Route::Map,
            Self::Visits => Route::LatestVisits,
        }
    }

    /// Tab that owns `route`. Spot details live under the map.
    pub fn of(route: Route) -> Option<Self> {
        match route {
            Route::Dashboard => Some(Self::Dashboard),
            Route::Map | Route::SpotDetail(_) => Some(Self::Map),
            Route::LatestVisits => Some(Self::Visits),
            Route::Unauthorized => None,
        }
    }

    /// Wraps around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Map => "Map",
            Self::Visits => "Visits",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
