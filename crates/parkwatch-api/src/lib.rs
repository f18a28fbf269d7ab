// parkwatch-api: Async Rust client for the parking-lot monitoring backend

pub mod client;
pub mod error;
pub mod info;
pub mod models;
pub mod spots;
pub mod transport;
pub mod visits;

pub use client::ParkingClient;
pub use error::Error;
pub use models::{
    Counts, ParkingSpot, QrCode, SortOrder, SpotQuery, SpotRef, SpotsPage, Visit, VisitUpdate,
};
pub use transport::{TlsMode, TransportConfig};
