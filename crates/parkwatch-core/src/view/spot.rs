use crate::auth::Capabilities;
use crate::feed::SpotDetailState;
use crate::format::{format_custom_date_time, format_spot_id, format_visit};
use crate::model::SpotStatus;

/// Reservation state of the spot and what the viewer may do about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPanel {
    pub reserved: bool,
    pub can_manage: bool,
}

impl ReservationPanel {
    pub fn summary(self) -> &'static str {
        if self.reserved {
            "Reserved"
        } else {
            "Not reserved"
        }
    }
}

/// Spot detail content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotDetailView {
    /// `PS007`
    pub header: String,
    /// `None` until the spot has loaded.
    pub status: Option<SpotStatus>,
    pub last_updated: Option<String>,
    pub reservation: ReservationPanel,
    pub visits: Vec<String>,
    pub error: Option<String>,
}

/// What the spot detail route shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotDetailPage {
    Loading,
    Unauthorized,
    Detail(SpotDetailView),
}

impl SpotDetailPage {
    /// `state` is `None` when no feed was started (non-admin viewers).
    pub fn build(state: Option<&SpotDetailState>, caps: Capabilities, spot_id: i64) -> Self {
        if !caps.is_ready() || state.is_some_and(|s| s.loading) {
            return Self::Loading;
        }
        if !caps.can_view_admin_pages() {
            return Self::Unauthorized;
        }
        let Some(state) = state else {
            return Self::Loading;
        };

        let spot = state.spot.as_ref();
        Self::Detail(SpotDetailView {
            header: format_spot_id(spot_id),
            status: spot.map(SpotStatus::of),
            last_updated: spot
                .and_then(|s| s.last_updated.as_deref())
                .map(format_custom_date_time),
            reservation: ReservationPanel {
                reserved: spot.is_some_and(|s| s.reserved),
                can_manage: caps.can_manage_reservations(),
            },
            visits: state.visits.iter().map(format_visit).collect(),
            error: state.error.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::{Role, Session};
    use crate::model::{ParkingSpot, Visit};

    fn loaded_state() -> SpotDetailState {
        SpotDetailState {
            spot_id: 7,
            spot: Some(ParkingSpot {
                spot_id: 7,
                available: false,
                reserved: true,
                error: false,
                last_updated: Some("2024-03-05T08:02:00".into()),
            }),
            visits: vec![Visit {
                start_date: "2024-03-05T07:00:00".into(),
                end_date: None,
            }],
            error: None,
            loading: false,
        }
    }

    #[test]
    fn admin_sees_detail() {
        let caps = Session::established("ops", Role::Admin).capabilities();
        let page = SpotDetailPage::build(Some(&loaded_state()), caps, 7);

        let SpotDetailPage::Detail(view) = page else {
            panic!("expected detail, got {page:?}");
        };
        assert_eq!(view.header, "PS007");
        assert_eq!(view.status, Some(SpotStatus::Reserved));
        assert_eq!(view.last_updated.as_deref(), Some("05.03.2024 08:02"));
        assert_eq!(view.visits, vec!["05.03.2024 07:00 - now".to_owned()]);
        assert_eq!(view.reservation.summary(), "Reserved");
        assert!(view.reservation.can_manage);
    }

    #[test]
    fn non_admin_never_sees_spot_data() {
        let caps = Session::established("jane", Role::User).capabilities();
        let page = SpotDetailPage::build(Some(&loaded_state()), caps, 7);
        assert_eq!(page, SpotDetailPage::Unauthorized);
    }

    #[test]
    fn loading_while_session_or_first_poll_pending() {
        let admin = Session::established("ops", Role::Admin).capabilities();
        assert_eq!(
            SpotDetailPage::build(Some(&SpotDetailState::new(7)), admin, 7),
            SpotDetailPage::Loading
        );
        let pending = Session::loading().capabilities();
        assert_eq!(
            SpotDetailPage::build(None, pending, 7),
            SpotDetailPage::Loading
        );
    }
}
