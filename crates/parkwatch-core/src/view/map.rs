use crate::auth::Capabilities;
use crate::feed::MapState;
use crate::format::{format_spot_id, format_spot_number};
use crate::model::{LEGEND, ParkingSpot, SpotStatus, StatusColor};
use crate::pagination::PageControls;

/// One tile of the map grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotTile {
    pub spot_id: i64,
    /// `PS007`
    pub title: String,
    /// `007`, for layouts that style the prefix separately.
    pub number: String,
    pub status: SpotStatus,
    /// Selecting the tile opens its detail page.
    pub clickable: bool,
}

impl SpotTile {
    fn new(spot: &ParkingSpot, clickable: bool) -> Self {
        Self {
            spot_id: spot.spot_id,
            title: format_spot_id(spot.spot_id),
            number: format_spot_number(spot.spot_id),
            status: SpotStatus::of(spot),
            clickable,
        }
    }
}

/// The map page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapView {
    /// Nothing has loaded yet: show the full-panel spinner only.
    pub show_spinner: bool,
    pub tiles: Vec<SpotTile>,
    pub controls: PageControls,
    pub legend: [(StatusColor, &'static str); 3],
    pub error: Option<String>,
}

impl MapView {
    pub fn build(state: &MapState, caps: Capabilities) -> Self {
        let clickable = caps.can_open_spot_detail();
        let tiles = state
            .spots
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|spot| SpotTile::new(spot, clickable))
            .collect();

        Self {
            show_spinner: !state.has_loaded(),
            tiles,
            controls: PageControls::new(state.current_page, state.total_pages),
            legend: LEGEND,
            error: state.last_error.clone(),
        }
    }

    /// Route target for selecting tile `index`; `None` for non-admins.
    pub fn select(&self, index: usize) -> Option<i64> {
        self.tiles
            .get(index)
            .filter(|tile| tile.clickable)
            .map(|tile| tile.spot_id)
    }
}
