//! Spot listing, detail and history.

use std::fmt::Write as _;

use tabled::Tabled;

use parkwatch_core::format::{format_custom_date_time, format_spot_id, format_visit};
use parkwatch_core::pagination::total_pages;
use parkwatch_core::{Monitor, ParkingSpot, SpotStatus, Visit};

use crate::cli::{GlobalOpts, OutputFormat, SpotsArgs, SpotsCommand};
use crate::error::CliError;
use crate::output;

const NEVER: &str = "—";

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SpotRow {
    #[tabled(rename = "Spot")]
    spot: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Last updated")]
    last_updated: String,
}

impl From<&ParkingSpot> for SpotRow {
    fn from(s: &ParkingSpot) -> Self {
        Self {
            spot: format_spot_id(s.spot_id),
            status: SpotStatus::of(s).label(),
            last_updated: last_updated(s),
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
}

impl From<&Visit> for HistoryRow {
    fn from(v: &Visit) -> Self {
        Self {
            from: format_custom_date_time(&v.start_date),
            to: v
                .end_date
                .as_deref()
                .map_or_else(|| "now".to_owned(), format_custom_date_time),
        }
    }
}

fn last_updated(spot: &ParkingSpot) -> String {
    spot.last_updated
        .as_deref()
        .map_or_else(|| NEVER.to_owned(), format_custom_date_time)
}

fn spot_detail(spot: &ParkingSpot, color: bool) -> String {
    let status = SpotStatus::of(spot);
    let mut out = String::new();
    let _ = writeln!(out, "Spot:          {}", format_spot_id(spot.spot_id));
    let _ = writeln!(
        out,
        "Status:        {}",
        output::paint_status(status.label(), status.color(), color)
    );
    let _ = writeln!(out, "Reserved:      {}", if spot.reserved { "yes" } else { "no" });
    let _ = write!(out, "Last updated:  {}", last_updated(spot));
    out
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    args: SpotsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let timeout = global.timeout;
    match args.command {
        SpotsCommand::List { page, limit } => {
            for (field, value) in [("page", page), ("limit", limit)] {
                if value == 0 {
                    return Err(CliError::Validation {
                        field: field.into(),
                        reason: "must be at least 1".into(),
                    });
                }
            }
            let result = monitor
                .spots_page(page, limit)
                .await
                .map_err(|e| CliError::from_core(e, timeout))?;

            let out = output::render_list(
                &global.output,
                &result.spots,
                |s| SpotRow::from(s),
                |s| s.spot_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if !global.quiet && matches!(global.output, OutputFormat::Table) {
                eprintln!("page {page} of {}", total_pages(result.total, limit));
            }
            Ok(())
        }

        SpotsCommand::Get { id } => {
            let spot = monitor
                .spot(id)
                .await
                .map_err(|e| CliError::from_core(e, timeout))?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &spot,
                |s| spot_detail(s, color),
                |s| SpotStatus::of(s).label().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SpotsCommand::History { id } => {
            let visits = monitor
                .spot_history(id)
                .await
                .map_err(|e| CliError::from_core(e, timeout))?;
            let out = output::render_list(
                &global.output,
                &visits,
                |v| HistoryRow::from(v),
                format_visit,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(reserved: bool) -> ParkingSpot {
        ParkingSpot {
            spot_id: 7,
            available: true,
            reserved,
            error: false,
            last_updated: None,
        }
    }

    #[test]
    fn row_shows_label_and_placeholder_time() {
        let row = SpotRow::from(&spot(true));
        assert_eq!(row.spot, "PS007");
        assert_eq!(row.status, "Reserved");
        assert_eq!(row.last_updated, NEVER);
    }

    #[test]
    fn ongoing_visit_ends_now() {
        let row = HistoryRow::from(&Visit {
            start_date: "2024-03-05T08:02:00".into(),
            end_date: None,
        });
        assert_eq!(row.from, "05.03.2024 08:02");
        assert_eq!(row.to, "now");
    }

    #[test]
    fn detail_lists_reservation() {
        let text = spot_detail(&spot(false), false);
        assert!(text.contains("Status:        Available"));
        assert!(text.contains("Reserved:      no"));
    }
}
