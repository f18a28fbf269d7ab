//! Reusable widgets and formatting helpers shared across screens.

pub mod fmt;
pub mod pagination;
pub mod panel;
pub mod status_indicator;
