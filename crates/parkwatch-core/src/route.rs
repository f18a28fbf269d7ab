// ── Client-side routes ──

use std::fmt;

/// Desktop or mobile flavour of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    #[default]
    Desktop,
    Mobile,
}

/// A navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Map,
    SpotDetail(i64),
    LatestVisits,
    Unauthorized,
}

impl Route {
    /// Path for this route under the given layout.
    ///
    /// Spot detail and the unauthorized page have no mobile variant.
    pub fn path(self, mode: LayoutMode) -> String {
        let mobile = mode == LayoutMode::Mobile;
        match self {
            Self::Dashboard if mobile => "/m/dashboard".into(),
            Self::Dashboard => "/".into(),
            Self::Map if mobile => "/m/map".into(),
            Self::Map => "/map".into(),
            Self::SpotDetail(id) => format!("/map/spot/{id}"),
            Self::LatestVisits if mobile => "/m/latest-visits".into(),
            Self::LatestVisits => "/latest-visits".into(),
            Self::Unauthorized => "/unauthorized".into(),
        }
    }

    /// Parse a path back into a route and layout.
    pub fn parse(path: &str) -> Option<(Self, LayoutMode)> {
        let trimmed = path.trim_end_matches('/');
        let (mode, rest) = match trimmed.strip_prefix("/m") {
            Some(rest) if rest.starts_with('/') => (LayoutMode::Mobile, rest),
            _ => (LayoutMode::Desktop, trimmed),
        };

        let route = match rest {
            "" | "/dashboard" => Self::Dashboard,
            "/map" => Self::Map,
            "/latest-visits" => Self::LatestVisits,
            "/unauthorized" if mode == LayoutMode::Desktop => Self::Unauthorized,
            other => {
                let id = other.strip_prefix("/map/spot/")?;
                if mode == LayoutMode::Mobile {
                    return None;
                }
                Self::SpotDetail(id.parse().ok()?)
            }
        };
        Some((route, mode))
    }

    /// Page the "back" action leads to.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Dashboard => None,
            Self::SpotDetail(_) => Some(Self::Map),
            Self::Map | Self::LatestVisits | Self::Unauthorized => Some(Self::Dashboard),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path(LayoutMode::Desktop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_both_layouts() {
        assert_eq!(Route::Map.path(LayoutMode::Desktop), "/map");
        assert_eq!(Route::Map.path(LayoutMode::Mobile), "/m/map");
        assert_eq!(Route::LatestVisits.path(LayoutMode::Mobile), "/m/latest-visits");
        assert_eq!(Route::SpotDetail(12).path(LayoutMode::Mobile), "/map/spot/12");
        assert_eq!(Route::Unauthorized.path(LayoutMode::Desktop), "/unauthorized");
    }

    #[test]
    fn paths_round_trip() {
        let routes = [
            Route::Dashboard,
            Route::Map,
            Route::SpotDetail(42),
            Route::LatestVisits,
            Route::Unauthorized,
        ];
        for mode in [LayoutMode::Desktop, LayoutMode::Mobile] {
            for route in routes {
                let path = route.path(mode);
                let (parsed, _) = Route::parse(&path).unwrap_or_else(|| panic!("{path} parses"));
                assert_eq!(parsed, route, "{path}");
            }
        }
    }

    #[test]
    fn rejects_unknown_paths() {
        assert_eq!(Route::parse("/map/spot/abc"), None);
        assert_eq!(Route::parse("/settings"), None);
        assert_eq!(Route::parse("/m/map/spot/3"), None);
    }

    #[test]
    fn back_from_detail_goes_to_map() {
        assert_eq!(Route::SpotDetail(1).parent(), Some(Route::Map));
        assert_eq!(Route::Dashboard.parent(), None);
    }
}
