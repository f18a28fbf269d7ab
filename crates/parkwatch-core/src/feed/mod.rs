// ── Page feeds ──
//
// One feed per page, each a `Poller` with the page's fetch, fallback and
// merge rules. Dropping a feed stops its polling.

mod dashboard;
mod map;
mod qr;
mod spot;

pub use dashboard::{DashboardData, DashboardFeed, fetch_dashboard};
pub use map::{MapFeed, MapState};
pub use qr::{QrFeed, QrState};
pub use spot::{SpotDetailState, SpotFeed, fetch_spot_detail};
