use crate::auth::Session;
use crate::feed::{DashboardData, QrState};
use crate::format::{format_custom_date_time, format_visit_update};
use crate::model::{Counts, VisitUpdate};

use super::{CountsCard, UpdatesList};

pub const ADMIN_UPDATES_HEADING: &str = "Latest parking spot updates";
pub const USER_UPDATES_HEADING: &str = "Latest visits";
pub const SHOW_PARKING_LOT: &str = "Show parking lot";

const DESKTOP_ROWS: usize = 5;
const MOBILE_ROWS: usize = 4;
const NO_EXPIRY: &str = "—";

/// Desktop dashboard. Renders what it is handed; fetching is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub counts: CountsCard,
    pub updates: UpdatesList,
}

impl DashboardView {
    pub fn desktop(counts: Counts, visits: &[VisitUpdate]) -> Self {
        Self {
            counts: CountsCard::new(counts, "available parking spots", "occupied parking spots"),
            updates: UpdatesList::build(ADMIN_UPDATES_HEADING, visits, DESKTOP_ROWS),
        }
    }
}

/// The access-code card on the mobile dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCard {
    pub data_url: Option<String>,
    /// Formatted expiry, `—` when unknown.
    pub valid_until: String,
    pub pending: bool,
}

impl QrCard {
    pub fn from_state(state: &QrState) -> Self {
        Self {
            data_url: state.data_url.clone(),
            valid_until: state
                .expires_at
                .as_deref()
                .map_or_else(|| NO_EXPIRY.to_owned(), format_custom_date_time),
            pending: state.pending,
        }
    }

    pub fn caption(&self) -> String {
        format!("QR code is valid until {}", self.valid_until)
    }

    /// Size of the encoded image payload, if present.
    pub fn payload_len(&self) -> Option<usize> {
        self.data_url.as_deref().map(|url| {
            url.split_once(',')
                .map_or(url.len(), |(_, payload)| payload.len())
        })
    }
}

/// Mobile dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileDashboardView {
    /// Session not resolved yet; nothing else is meaningful.
    pub loading: bool,
    pub counts: CountsCard,
    /// Hidden for admins.
    pub qr: Option<QrCard>,
    pub updates: UpdatesList,
}

impl MobileDashboardView {
    pub fn build(session: &Session, data: &DashboardData, qr: Option<&QrState>) -> Self {
        let caps = session.capabilities();
        let heading = if caps.is_admin() {
            ADMIN_UPDATES_HEADING
        } else {
            USER_UPDATES_HEADING
        };
        let qr = if caps.shows_qr_code() {
            Some(qr.map_or_else(|| QrCard::from_state(&QrState::default()), QrCard::from_state))
        } else {
            None
        };

        Self {
            loading: !caps.is_ready(),
            counts: CountsCard::new(data.counts, "available spots", "occupied spots"),
            qr,
            updates: UpdatesList::build(heading, &data.visits, MOBILE_ROWS),
        }
    }
}

/// Full list behind "View all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestVisitsView {
    pub heading: &'static str,
    pub rows: Vec<String>,
}

impl LatestVisitsView {
    pub fn build(session: &Session, visits: &[VisitUpdate]) -> Self {
        let heading = if session.capabilities().is_admin() {
            ADMIN_UPDATES_HEADING
        } else {
            USER_UPDATES_HEADING
        };
        Self {
            heading,
            rows: visits.iter().map(format_visit_update).collect(),
        }
    }
}
