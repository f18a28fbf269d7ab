// Wire types for the parking backend
//
// Timestamps are kept as the raw strings the backend sends. They are only
// parsed when a view formats them, so one malformed value never fails a
// whole poll. Fields use `#[serde(default)]` where the backend omits them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Spots ────────────────────────────────────────────────────────────

/// One parking spot as returned by `/api/parking-spot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub spot_id: i64,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub reserved: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// A server-side page of spots plus the lot-wide total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotsPage {
    #[serde(default)]
    pub spots: Vec<ParkingSpot>,
    #[serde(default)]
    pub total: u64,
}

/// Sort direction for spot listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters for `GET /api/parking-spot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: String,
    pub order: SortOrder,
}

impl SpotQuery {
    /// Page `page` sorted by `spot_id` ascending.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            sort: "spot_id".into(),
            order: SortOrder::Asc,
        }
    }
}

// ── Visits ───────────────────────────────────────────────────────────

/// One occupancy interval of a spot. `end_date == None` means ongoing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

/// Spot reference in visit updates; the backend sends either form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpotRef {
    Number(i64),
    Text(String),
}

impl fmt::Display for SpotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One row of `/api/latest-visits`.
///
/// `availability == 1` records a departure, anything else an arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitUpdate {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub created_at: String,
    pub spot_id: SpotRef,
    #[serde(default)]
    pub availability: i64,
}

// ── Aggregates ───────────────────────────────────────────────────────

/// Lot-wide counters from `/api/spot-info?type=counts`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(default)]
    pub available: u64,
    #[serde(default)]
    pub occupied: u64,
}

/// Access code issued by `/api/qr/generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    #[serde(default)]
    pub qr_code_data_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_defaults_missing_flags() {
        let spot: ParkingSpot = serde_json::from_str(r#"{"spot_id": 4, "available": true}"#)
            .expect("spot decodes");
        assert!(spot.available);
        assert!(!spot.reserved);
        assert!(!spot.error);
        assert_eq!(spot.last_updated, None);
    }

    #[test]
    fn visit_update_accepts_string_and_number_spot_ids() {
        let rows: Vec<VisitUpdate> = serde_json::from_str(
            r#"[
                {"created_at": "2024-03-05T08:02:00", "spot_id": 7, "availability": 1},
                {"created_at": "2024-03-05T08:03:00", "spot_id": "12", "availability": 0}
            ]"#,
        )
        .expect("rows decode");
        assert_eq!(rows[0].spot_id, SpotRef::Number(7));
        assert_eq!(rows[1].spot_id.to_string(), "12");
    }

    #[test]
    fn qr_code_uses_camel_case() {
        let body = r#"{
            "qrCodeDataUrl": "data:image/png;base64,AA",
            "expiresAt": "2024-03-05T09:00:00Z"
        }"#;
        let qr: QrCode = serde_json::from_str(body).expect("qr decodes");
        assert_eq!(qr.qr_code_data_url.as_deref(), Some("data:image/png;base64,AA"));
        assert_eq!(qr.expires_at.as_deref(), Some("2024-03-05T09:00:00Z"));
    }
}
