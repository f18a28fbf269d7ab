// Lot-wide info and access-code endpoints

use tracing::debug;

use crate::client::ParkingClient;
use crate::error::Error;
use crate::models::{Counts, QrCode};

impl ParkingClient {
    /// Available/occupied counters for the whole lot.
    ///
    /// `GET /api/spot-info?type=counts`
    ///
    /// A `null` body is treated as zero counts.
    pub async fn spot_counts(&self) -> Result<Counts, Error> {
        let mut url = self.api_url("spot-info")?;
        url.query_pairs_mut().append_pair("type", "counts");
        let counts: Option<Counts> = self.get(url).await?;
        Ok(counts.unwrap_or_default())
    }

    /// Issue a fresh access QR code for the current user.
    ///
    /// `GET /api/qr/generate`
    pub async fn generate_qr(&self) -> Result<QrCode, Error> {
        let url = self.api_url("qr/generate")?;
        debug!("generating access code");
        self.get(url).await
    }
}
