// Visit history endpoints

use tracing::debug;

use crate::client::ParkingClient;
use crate::error::Error;
use crate::models::{Visit, VisitUpdate};

impl ParkingClient {
    /// Latest arrivals and departures across the lot, newest first.
    ///
    /// `GET /api/latest-visits`
    pub async fn latest_visits(&self) -> Result<Vec<VisitUpdate>, Error> {
        let url = self.api_url("latest-visits")?;
        self.get(url).await
    }

    /// Occupancy history for one spot.
    ///
    /// `GET /api/latest-visits/spot/{id}`
    pub async fn spot_visits(&self, spot_id: i64) -> Result<Vec<Visit>, Error> {
        let url = self.api_url(&format!("latest-visits/spot/{spot_id}"))?;
        debug!(spot_id, "fetching visit history");
        self.get(url).await
    }
}
