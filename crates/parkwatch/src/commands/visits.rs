//! Latest arrivals and departures across the lot.

use tabled::Tabled;

use parkwatch_core::format::{format_custom_date_time, format_spot_id, format_visit_update};
use parkwatch_core::{Monitor, Movement, VisitUpdate};

use crate::cli::{GlobalOpts, VisitsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct VisitRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Spot")]
    spot: String,
    #[tabled(rename = "Event")]
    event: &'static str,
}

impl From<&VisitUpdate> for VisitRow {
    fn from(v: &VisitUpdate) -> Self {
        Self {
            time: format_custom_date_time(&v.created_at),
            spot: format_spot_id(&v.spot_id),
            event: Movement::of(v).label(),
        }
    }
}

pub async fn handle(
    monitor: &Monitor,
    args: &VisitsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut visits = monitor
        .latest_visits()
        .await
        .map_err(|e| CliError::from_core(e, global.timeout))?;
    if let Some(limit) = args.limit {
        visits.truncate(limit);
    }

    let out = output::render_list(
        &global.output,
        &visits,
        |v| VisitRow::from(v),
        format_visit_update,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
