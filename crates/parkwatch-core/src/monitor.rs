// ── Monitor facade ──
//
// Entry point for the front ends: owns the HTTP client and the session,
// vends one feed per mounted page, and offers one-shot queries for the CLI.
// Role gates are enforced here, before any request is issued.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use parkwatch_api::transport::{TlsMode, TransportConfig};
use parkwatch_api::{ParkingClient, SpotQuery};

use crate::auth::{Capabilities, Session};
use crate::config::{MonitorConfig, TlsVerification};
use crate::error::CoreError;
use crate::feed::{DashboardFeed, MapFeed, QrFeed, SpotFeed};
use crate::model::{Counts, ParkingSpot, QrCode, SpotsPage, Visit, VisitUpdate};

const ANONYMOUS_USER: &str = "anonymous";

/// Cheaply cloneable handle to one parking server.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: ParkingClient,
    session: watch::Sender<Session>,
}

impl Monitor {
    /// Build the HTTP client from `config`. The session starts out loading;
    /// call [`establish_session()`](Self::establish_session) to resolve it.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let client = ParkingClient::new(config.url.clone(), &build_transport(&config))?;
        Ok(Self::with_client(config, client))
    }

    /// Use a pre-built client.
    pub fn with_client(config: MonitorConfig, client: ParkingClient) -> Self {
        let (session, _) = watch::channel(Session::loading());
        Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                session,
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ParkingClient {
        &self.inner.client
    }

    // ── Session ──────────────────────────────────────────────────

    /// Resolve the session from the configured user and role.
    pub fn establish_session(&self) -> Session {
        let config = &self.inner.config;
        let user = config.user.clone().unwrap_or_else(|| ANONYMOUS_USER.into());
        let session = Session::established(user, config.role);
        info!(user = ?session.user, role = %config.role, "session established");
        self.inner.session.send_replace(session.clone());
        session
    }

    /// Subscribe to session changes.
    pub fn session(&self) -> watch::Receiver<Session> {
        self.inner.session.subscribe()
    }

    pub fn session_snapshot(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.inner.session.borrow().capabilities()
    }

    // ── Feeds ────────────────────────────────────────────────────

    pub fn dashboard_feed(&self) -> DashboardFeed {
        DashboardFeed::spawn(self.client().clone(), self.config().intervals.dashboard)
    }

    pub fn map_feed(&self) -> MapFeed {
        MapFeed::spawn(self.client().clone(), self.config().intervals.map)
    }

    /// Start polling one spot. Refused for non-admins; no request is made.
    pub fn spot_feed(&self, spot_id: i64) -> Result<SpotFeed, CoreError> {
        self.require_admin("view spot details")?;
        Ok(SpotFeed::spawn(
            self.client().clone(),
            spot_id,
            self.config().intervals.spot,
        ))
    }

    /// Access-code feed, `None` for viewers that have no code (admins).
    pub fn qr_feed(&self) -> Option<QrFeed> {
        if self.capabilities().shows_qr_code() {
            Some(QrFeed::spawn(self.client().clone()))
        } else {
            debug!("no access code for this session");
            None
        }
    }

    // ── One-shot queries ─────────────────────────────────────────

    pub async fn counts(&self) -> Result<Counts, CoreError> {
        Ok(self.client().spot_counts().await?)
    }

    pub async fn latest_visits(&self) -> Result<Vec<VisitUpdate>, CoreError> {
        Ok(self.client().latest_visits().await?)
    }

    pub async fn spots_page(&self, page: u32, limit: u32) -> Result<SpotsPage, CoreError> {
        Ok(self.client().list_spots(&SpotQuery::page(page, limit)).await?)
    }

    pub async fn spot(&self, spot_id: i64) -> Result<ParkingSpot, CoreError> {
        self.require_admin("view spot details")?;
        Ok(self.client().get_spot(spot_id).await?)
    }

    pub async fn spot_history(&self, spot_id: i64) -> Result<Vec<Visit>, CoreError> {
        self.require_admin("view spot history")?;
        Ok(self.client().spot_visits(spot_id).await?)
    }

    pub async fn generate_qr(&self) -> Result<QrCode, CoreError> {
        if !self.capabilities().shows_qr_code() {
            return Err(CoreError::Unauthorized {
                action: "generate an access code (admin sessions have none)".into(),
            });
        }
        Ok(self.client().generate_qr().await?)
    }

    /// One-shot: build, establish the session, run `f`.
    pub async fn oneshot<F, Fut, T>(config: MonitorConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Monitor) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let monitor = Monitor::new(config)?;
        monitor.establish_session();
        f(monitor).await
    }

    fn require_admin(&self, action: &str) -> Result<(), CoreError> {
        if self.capabilities().can_view_admin_pages() {
            Ok(())
        } else {
            Err(CoreError::Unauthorized {
                action: action.into(),
            })
        }
    }
}

/// Build a [`TransportConfig`] from the monitor configuration.
fn build_transport(config: &MonitorConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        session_token: config.session_token.clone(),
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
