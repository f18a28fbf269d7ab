//! Every state change in the TUI flows through an [`Action`].

use std::sync::Arc;

use parkwatch_core::{DashboardData, MapState, QrState, Route, Session, SpotDetailState};

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    /// Go to a route. Gated routes are authorized by the app first.
    Navigate(Route),
    /// Up to the parent route.
    GoBack,

    // ── Data (from the bridge) ──
    SessionUpdated(Session),
    DashboardUpdated(Arc<DashboardData>),
    MapUpdated(Arc<MapState>),
    SpotUpdated(Arc<SpotDetailState>),
    QrUpdated(Arc<QrState>),

    // ── Feed control (to the bridge) ──
    SetMapPage(u32),
    RegenerateQr,
    Refresh,

    // ── UI ──
    ToggleHelp,
    Notify(Notification),
    DismissNotification,
}

impl Action {
    /// Feed snapshots every screen receives.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Self::SessionUpdated(_)
                | Self::DashboardUpdated(_)
                | Self::MapUpdated(_)
                | Self::SpotUpdated(_)
                | Self::QrUpdated(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}
