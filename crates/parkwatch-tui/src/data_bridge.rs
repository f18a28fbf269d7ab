//! Data bridge: owns the feed for the mounted page and forwards its
//! snapshots to the TUI as [`Action`]s.
//!
//! Exactly one page feed is alive at a time. Mounting another route drops
//! the previous feed, which cancels its timer and aborts in-flight requests,
//! so a page that is no longer shown never receives late data.

use std::future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use parkwatch_core::{
    DashboardData, DashboardFeed, FeedStream, LayoutMode, MapFeed, MapState, Monitor, QrFeed,
    QrState, Route, SpotDetailState, SpotFeed,
};

use crate::action::{Action, Notification};

/// Requests from the app loop to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    /// Start the feed for a route, replacing the current one.
    Mount { route: Route, mode: LayoutMode },
    SetMapPage(u32),
    RegenerateQr,
    Refresh,
}

/// Identity of a mounted feed. Only the dashboard differs by layout.
fn feed_key(route: Route, mode: LayoutMode) -> (Route, LayoutMode) {
    match route {
        Route::Dashboard => (route, mode),
        _ => (route, LayoutMode::Desktop),
    }
}

/// The feed behind the mounted page, with a subscription to each stream.
enum ActiveFeed {
    Idle,
    Dashboard {
        feed: DashboardFeed,
        stream: FeedStream<DashboardData>,
        qr: Option<(QrFeed, FeedStream<QrState>)>,
    },
    Map {
        feed: MapFeed,
        stream: FeedStream<MapState>,
    },
    Spot {
        feed: SpotFeed,
        stream: FeedStream<SpotDetailState>,
    },
}

impl ActiveFeed {
    fn mount(monitor: &Monitor, route: Route, mode: LayoutMode) -> Result<Self, Notification> {
        Ok(match route {
            Route::Dashboard | Route::LatestVisits => {
                let feed = monitor.dashboard_feed();
                let stream = feed.stream();
                let qr = (route == Route::Dashboard && mode == LayoutMode::Mobile)
                    .then(|| monitor.qr_feed())
                    .flatten()
                    .map(|qr| {
                        let stream = qr.stream();
                        (qr, stream)
                    });
                Self::Dashboard { feed, stream, qr }
            }
            Route::Map => {
                let feed = monitor.map_feed();
                let stream = feed.stream();
                Self::Map { feed, stream }
            }
            Route::SpotDetail(id) => {
                let feed = monitor.spot_feed(id).map_err(|e| {
                    warn!(spot_id = id, error = %e, "spot feed refused");
                    Notification::error(e.to_string())
                })?;
                let stream = feed.stream();
                Self::Spot { feed, stream }
            }
            Route::Unauthorized => Self::Idle,
        })
    }

    /// Snapshots current at mount time, so the screen never shows stale
    /// data from a previous visit.
    fn initial_actions(&self) -> Vec<Action> {
        match self {
            Self::Idle => Vec::new(),
            Self::Dashboard { stream, qr, .. } => {
                let mut actions =
                    vec![Action::DashboardUpdated(Arc::new(stream.current().clone()))];
                if let Some((_, qr_stream)) = qr {
                    actions.push(Action::QrUpdated(Arc::new(qr_stream.current().clone())));
                }
                actions
            }
            Self::Map { stream, .. } => {
                vec![Action::MapUpdated(Arc::new(stream.current().clone()))]
            }
            Self::Spot { stream, .. } => {
                vec![Action::SpotUpdated(Arc::new(stream.current().clone()))]
            }
        }
    }

    /// Next snapshot from any of the active streams. `None` once the feed
    /// has ended; pending forever when idle.
    async fn next(&mut self) -> Option<Action> {
        match self {
            Self::Idle => future::pending().await,
            Self::Dashboard {
                stream,
                qr: Some((_, qr_stream)),
                ..
            } => {
                tokio::select! {
                    Some(data) = stream.changed() => Some(Action::DashboardUpdated(Arc::new(data))),
                    Some(qr) = qr_stream.changed() => Some(Action::QrUpdated(Arc::new(qr))),
                    else => None,
                }
            }
            Self::Dashboard { stream, qr: None, .. } => stream
                .changed()
                .await
                .map(|data| Action::DashboardUpdated(Arc::new(data))),
            Self::Map { stream, .. } => stream
                .changed()
                .await
                .map(|state| Action::MapUpdated(Arc::new(state))),
            Self::Spot { stream, .. } => stream
                .changed()
                .await
                .map(|state| Action::SpotUpdated(Arc::new(state))),
        }
    }

    fn set_map_page(&self, page: u32) {
        if let Self::Map { feed, .. } = self {
            feed.set_page(page);
        }
    }

    fn regenerate_qr(&self) {
        if let Self::Dashboard {
            qr: Some((qr, _)), ..
        } = self
        {
            qr.regenerate();
        }
    }

    fn stop(&self) {
        match self {
            Self::Idle => {}
            Self::Dashboard { feed, qr, .. } => {
                feed.stop();
                if let Some((qr, _)) = qr {
                    qr.stop();
                }
            }
            Self::Map { feed, .. } => feed.stop(),
            Self::Spot { feed, .. } => feed.stop(),
        }
    }

    fn refresh(&self) {
        match self {
            Self::Idle => {}
            Self::Dashboard { feed, .. } => feed.refresh(),
            Self::Map { feed, .. } => feed.refresh(),
            Self::Spot { feed, .. } => feed.refresh(),
        }
    }
}

/// Run the bridge until `cancel` fires.
///
/// Publishes the loading session, establishes it, then serves commands and
/// forwards feed snapshots.
pub async fn spawn_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    mut commands: mpsc::UnboundedReceiver<BridgeCommand>,
    cancel: CancellationToken,
) {
    let mut session = monitor.session();
    let _ = action_tx.send(Action::SessionUpdated(session.borrow_and_update().clone()));
    monitor.establish_session();

    let mut active = ActiveFeed::Idle;
    let mut mounted: Option<(Route, LayoutMode)> = None;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = session.changed() => {
                let snapshot = session.borrow_and_update().clone();
                let _ = action_tx.send(Action::SessionUpdated(snapshot));
                // Capabilities may have changed what the page is allowed to poll
                if let Some((route, mode)) = mounted {
                    active.stop();
                    active = remount(&monitor, route, mode, &action_tx);
                }
            }

            Some(command) = commands.recv() => match command {
                BridgeCommand::Mount { route, mode } => {
                    let key = feed_key(route, mode);
                    if mounted != Some(key) {
                        // The old feed stops before the new one starts
                        active.stop();
                        active = remount(&monitor, key.0, key.1, &action_tx);
                        mounted = Some(key);
                    }
                }
                BridgeCommand::SetMapPage(page) => {
                    debug!(page, "map page selected");
                    active.set_map_page(page);
                }
                BridgeCommand::RegenerateQr => active.regenerate_qr(),
                BridgeCommand::Refresh => {
                    active.refresh();
                    let _ = action_tx.send(Action::Notify(Notification::info("Refreshing…")));
                }
            },

            update = active.next() => match update {
                Some(action) => {
                    let _ = action_tx.send(action);
                }
                None => {
                    debug!("active feed ended");
                    active = ActiveFeed::Idle;
                }
            },
        }
    }

    info!("data bridge stopped");
}

fn remount(
    monitor: &Monitor,
    route: Route,
    mode: LayoutMode,
    action_tx: &mpsc::UnboundedSender<Action>,
) -> ActiveFeed {
    debug!(%route, ?mode, "mounting feed");
    match ActiveFeed::mount(monitor, route, mode) {
        Ok(feed) => {
            for action in feed.initial_actions() {
                let _ = action_tx.send(action);
            }
            feed
        }
        Err(notification) => {
            let _ = action_tx.send(Action::Notify(notification));
            ActiveFeed::Idle
        }
    }
}
