//! Human-readable ages and sizes.

use std::time::{Duration, Instant};

use bytesize::ByteSize;

/// "updated 12s ago" from the last snapshot time, "waiting for data" before
/// the first one.
pub fn updated_ago(last: Option<Instant>) -> String {
    last.map_or_else(
        || "waiting for data".to_owned(),
        |at| age_label(at.elapsed()),
    )
}

fn age_label(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(2) {
        return "updated just now".to_owned();
    }
    let whole = Duration::from_secs(elapsed.as_secs());
    format!("updated {} ago", humantime::format_duration(whole))
}

/// Payload size like "1.2 KiB".
pub fn payload_size(len: usize) -> String {
    ByteSize::b(u64::try_from(len).unwrap_or(u64::MAX)).to_string()
}
