//! Domain logic and polling layer between `parkwatch-api` and the front ends
//! (CLI / TUI).
//!
//! - **[`Monitor`]** — Facade over one parking server. Owns the session,
//!   vends one feed per mounted page and enforces role gates before any
//!   request goes out. [`Monitor::oneshot()`] serves single CLI invocations.
//!
//! - **Feeds** ([`feed`]) — [`DashboardFeed`], [`MapFeed`], [`SpotFeed`] and
//!   [`QrFeed`], each a [`Poller`] with its page's fallback and merge rules.
//!   Dropping a feed cancels its timer and aborts in-flight requests.
//!
//! - **[`SequencedSlot`]** — `watch`-backed snapshot slot that drops any
//!   result older than the last one applied.
//!
//! - **Views** ([`view`]) — Render-ready page models built from feed state
//!   and [`Capabilities`].
//!
//! - **Helpers** — [`format`] (dates, spot labels), [`pagination`] (page
//!   window), [`route`] (typed client-side routes).

pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod format;
pub mod model;
pub mod monitor;
pub mod pagination;
pub mod poll;
pub mod route;
pub mod store;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{Capabilities, Role, Session};
pub use config::{MonitorConfig, PollIntervals, TlsVerification};
pub use error::CoreError;
pub use feed::{
    DashboardData, DashboardFeed, MapFeed, MapState, QrFeed, QrState, SpotDetailState, SpotFeed,
};
pub use monitor::Monitor;
pub use poll::Poller;
pub use route::{LayoutMode, Route};
pub use store::{FeedStream, SequencedSlot, Ticket};

pub use model::{
    Counts, Movement, ParkingSpot, QrCode, SpotRef, SpotStatus, SpotsPage, StatusColor, Visit,
    VisitUpdate,
};
