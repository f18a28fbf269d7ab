// ── Display formatters ──
//
// Timestamps come from the server as loosely formatted strings. They are
// parsed here, shown in local time as `DD.MM.YYYY HH:MM`, and anything
// unparseable renders as "Invalid date" instead of a garbled value.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;
use tracing::warn;

use crate::model::{Movement, Visit, VisitUpdate};

/// Shown in place of an unparseable timestamp.
pub const INVALID_DATE: &str = "Invalid date";

/// Shown when a visit has no end yet.
pub const ONGOING: &str = "now";

const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Offset-bearing timestamps RFC 3339 rejects: no seconds, or a compact
/// `+0100` offset. `%#z` also takes `Z`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

/// `Z`-suffixed forms, read as UTC.
const ZULU_FORMATS: &[&str] = &["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%S%.fZ"];

/// Timestamps without an offset, read as local time.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unrecognized timestamp {0:?}")]
    Unrecognized(String),
    #[error("timestamp {0:?} does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

/// Parse a server timestamp into local time.
///
/// Accepts RFC 3339 (any offset), offset-less date-times (local time) and
/// bare dates (UTC midnight).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Local>, FormatError> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Local));
        }
    }
    for fmt in ZULU_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive).with_timezone(&Local));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| FormatError::NonexistentLocalTime(input.to_owned()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        return Ok(Utc.from_utc_datetime(&midnight).with_timezone(&Local));
    }

    Err(FormatError::Unrecognized(input.to_owned()))
}

/// `DD.MM.YYYY HH:MM` in local time, or [`INVALID_DATE`].
pub fn format_custom_date_time(input: &str) -> String {
    match parse_timestamp(input) {
        Ok(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        Err(e) => {
            warn!(input, error = %e, "invalid date");
            INVALID_DATE.to_owned()
        }
    }
}

/// Zero-padded spot number without prefix: `7` → `007`.
pub fn format_spot_number(id: impl Display) -> String {
    format!("{:0>3}", id.to_string())
}

/// Spot label: `7` → `PS007`, `1000` → `PS1000`.
pub fn format_spot_id(id: impl Display) -> String {
    format!("PS{}", format_spot_number(id))
}

/// `{start} - {end}` where a missing end renders as `now`.
pub fn format_visit(visit: &Visit) -> String {
    let start = format_custom_date_time(&visit.start_date);
    let end = visit
        .end_date
        .as_deref()
        .map_or_else(|| ONGOING.to_owned(), format_custom_date_time);
    format!("{start} - {end}")
}

/// `{date} - {PSNNN} - Departed|Arrived`
pub fn format_visit_update(update: &VisitUpdate) -> String {
    format!(
        "{} - {} - {}",
        format_custom_date_time(&update.created_at),
        format_spot_id(&update.spot_id),
        Movement::of(update).label()
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::SpotRef;

    #[test]
    fn spot_ids_are_padded_not_truncated() {
        assert_eq!(format_spot_id(7), "PS007");
        assert_eq!(format_spot_id(123), "PS123");
        assert_eq!(format_spot_id(1000), "PS1000");
        assert_eq!(format_spot_number(7), "007");
        assert_eq!(format_spot_id("42"), "PS042");
    }

    #[test]
    fn naive_timestamp_is_local_and_zero_padded() {
        assert_eq!(format_custom_date_time("2024-03-05T08:02:00"), "05.03.2024 08:02");
        assert_eq!(format_custom_date_time("2024-03-05 08:02:59.123"), "05.03.2024 08:02");
        assert_eq!(format_custom_date_time("2024-11-25T17:45"), "25.11.2024 17:45");
    }

    #[test]
    fn offset_timestamp_converts_to_local() {
        let input = "2024-03-05T08:02:00Z";
        let expected = DateTime::parse_from_rfc3339(input)
            .map(|dt| dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string())
            .ok();
        assert_eq!(Some(format_custom_date_time(input)), expected);
    }

    #[test]
    fn offset_forms_without_seconds_or_colon_convert_to_local() {
        let at = |h, m| {
            Utc.with_ymd_and_hms(2024, 3, 5, h, m, 0)
                .single()
                .map(|dt| dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string())
        };
        let cases = [
            ("2024-03-05T08:02Z", at(8, 2)),
            ("2024-03-05T08:02+01:00", at(7, 2)),
            ("2024-03-05T08:02+0100", at(7, 2)),
            ("2024-03-05T08:02:00.000+0100", at(7, 2)),
            ("2024-03-05T08:02:30.5-0230", at(10, 32)),
            ("2024-03-05 08:02+01:00", at(7, 2)),
            ("2024-03-05T08:02:00.000Z", at(8, 2)),
        ];
        for (input, expected) in cases {
            assert_eq!(Some(format_custom_date_time(input)), expected, "{input}");
        }
    }

    #[test]
    fn malformed_input_is_invalid_date() {
        assert_eq!(format_custom_date_time("yesterday"), INVALID_DATE);
        assert_eq!(format_custom_date_time(""), INVALID_DATE);
        assert_eq!(format_custom_date_time("2024-13-45T99:00:00"), INVALID_DATE);
        assert!(matches!(
            parse_timestamp("nope"),
            Err(FormatError::Unrecognized(_))
        ));
    }

    #[test]
    fn ongoing_visit_ends_now() {
        let visit = Visit {
            start_date: "2024-03-05T08:02:00".into(),
            end_date: None,
        };
        assert_eq!(format_visit(&visit), "05.03.2024 08:02 - now");

        let closed = Visit {
            start_date: "2024-03-05T08:02:00".into(),
            end_date: Some("2024-03-05T09:10:00".into()),
        };
        assert_eq!(format_visit(&closed), "05.03.2024 08:02 - 05.03.2024 09:10");
    }

    #[test]
    fn visit_update_direction() {
        let mut update = VisitUpdate {
            id: None,
            created_at: "2024-03-05T08:02:00".into(),
            spot_id: SpotRef::Number(7),
            availability: 1,
        };
        assert_eq!(format_visit_update(&update), "05.03.2024 08:02 - PS007 - Departed");

        update.availability = 0;
        assert_eq!(format_visit_update(&update), "05.03.2024 08:02 - PS007 - Arrived");
    }
}
