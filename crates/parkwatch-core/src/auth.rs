// ── Session and capabilities ──
//
// The session is owned by whoever signs the user in; pages only read it.
// Role checks go through `Capabilities` so every screen asks the same
// questions the same way.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::route::Route;

/// Role of the signed-in user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<String>,
    pub is_admin: bool,
    pub is_loading: bool,
    pub admin_checked: bool,
}

impl Session {
    /// Session still being resolved.
    pub fn loading() -> Self {
        Self {
            user: None,
            is_admin: false,
            is_loading: true,
            admin_checked: false,
        }
    }

    /// Resolved session for `user` with `role`.
    pub fn established(user: impl Into<String>, role: Role) -> Self {
        Self {
            user: Some(user.into()),
            is_admin: role == Role::Admin,
            is_loading: false,
            admin_checked: true,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_session(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

/// What the current viewer may see and do.
///
/// Nothing is granted until the session is ready, so a half-resolved
/// session can never open an admin page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    ready: bool,
    admin: bool,
}

impl Capabilities {
    pub fn for_session(session: &Session) -> Self {
        Self {
            ready: !session.is_loading && session.user.is_some() && session.admin_checked,
            admin: session.is_admin,
        }
    }

    /// Session resolved: user known and role checked.
    pub fn is_ready(self) -> bool {
        self.ready
    }

    pub fn is_admin(self) -> bool {
        self.ready && self.admin
    }

    pub fn can_view_admin_pages(self) -> bool {
        self.is_admin()
    }

    pub fn can_manage_reservations(self) -> bool {
        self.is_admin()
    }

    /// Whether selecting a map tile opens its detail page.
    pub fn can_open_spot_detail(self) -> bool {
        self.can_view_admin_pages()
    }

    /// Regular users get a personal access QR code; admins don't.
    pub fn shows_qr_code(self) -> bool {
        self.ready && !self.admin
    }

    /// Resolve the route the viewer actually lands on.
    pub fn authorize(self, route: Route) -> Route {
        match route {
            Route::SpotDetail(_) if !self.can_view_admin_pages() => Route::Unauthorized,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_session_grants_nothing() {
        let caps = Session::loading().capabilities();
        assert!(!caps.is_ready());
        assert!(!caps.can_view_admin_pages());
        assert!(!caps.shows_qr_code());
    }

    #[test]
    fn admin_capabilities() {
        let caps = Session::established("ops", Role::Admin).capabilities();
        assert!(caps.is_ready());
        assert!(caps.can_view_admin_pages());
        assert!(caps.can_manage_reservations());
        assert!(caps.can_open_spot_detail());
        assert!(!caps.shows_qr_code());
    }

    #[test]
    fn regular_user_capabilities() {
        let caps = Session::established("jane", Role::User).capabilities();
        assert!(caps.is_ready());
        assert!(!caps.can_view_admin_pages());
        assert!(!caps.can_manage_reservations());
        assert!(caps.shows_qr_code());
    }

    #[test]
    fn admin_flag_without_check_is_not_ready() {
        let session = Session {
            user: Some("ops".into()),
            is_admin: true,
            is_loading: false,
            admin_checked: false,
        };
        assert!(!session.capabilities().can_view_admin_pages());
    }

    #[test]
    fn non_admin_spot_detail_is_unauthorized() {
        let caps = Session::established("jane", Role::User).capabilities();
        assert_eq!(caps.authorize(Route::SpotDetail(7)), Route::Unauthorized);
        assert_eq!(caps.authorize(Route::Map), Route::Map);

        let admin = Session::established("ops", Role::Admin).capabilities();
        assert_eq!(admin.authorize(Route::SpotDetail(7)), Route::SpotDetail(7));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<Role>().ok(), Some(Role::Admin));
        assert_eq!(Role::User.to_string(), "user");
    }
}
