// Parking spot endpoints

use tracing::debug;

use crate::client::ParkingClient;
use crate::error::Error;
use crate::models::{ParkingSpot, SpotQuery, SpotsPage};

impl ParkingClient {
    /// List one page of spots.
    ///
    /// `GET /api/parking-spot?page={page}&limit={limit}&sort={sort}&order={order}`
    pub async fn list_spots(&self, query: &SpotQuery) -> Result<SpotsPage, Error> {
        let mut url = self.api_url("parking-spot")?;
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.limit.to_string())
            .append_pair("sort", &query.sort)
            .append_pair("order", query.order.as_str());
        debug!(page = query.page, limit = query.limit, "listing spots");
        self.get(url).await
    }

    /// Fetch a single spot with its `last_updated` timestamp.
    ///
    /// `GET /api/parking-spot/{id}`
    pub async fn get_spot(&self, spot_id: i64) -> Result<ParkingSpot, Error> {
        let url = self.api_url(&format!("parking-spot/{spot_id}"))?;
        debug!(spot_id, "fetching spot");
        self.get(url).await
    }
}
