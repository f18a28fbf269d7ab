//! Lot-wide counters, once or as a live watch.

use futures::StreamExt;
use tabled::Tabled;
use tracing::debug;

use parkwatch_core::{Counts, Monitor};

use crate::cli::{CountsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CountsRow {
    #[tabled(rename = "Available")]
    available: u64,
    #[tabled(rename = "Occupied")]
    occupied: u64,
    #[tabled(rename = "Total")]
    total: u64,
}

impl From<&Counts> for CountsRow {
    fn from(c: &Counts) -> Self {
        Self {
            available: c.available,
            occupied: c.occupied,
            total: c.available.saturating_add(c.occupied),
        }
    }
}

fn render(counts: &Counts, global: &GlobalOpts) -> Result<String, CliError> {
    output::render_single(
        &global.output,
        counts,
        |c| output::render_table(&[CountsRow::from(c)]),
        |c| format!("{}\t{}", c.available, c.occupied),
    )
}

pub async fn handle(
    monitor: &Monitor,
    args: &CountsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.watch {
        return watch(monitor, global).await;
    }

    let counts = monitor
        .counts()
        .await
        .map_err(|e| CliError::from_core(e, global.timeout))?;
    output::print_output(&render(&counts, global)?, global.quiet);
    Ok(())
}

/// Print the counters on every change until Ctrl+C.
async fn watch(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let feed = monitor.dashboard_feed();
    let mut snapshots = feed.stream().into_stream();
    let mut last: Option<Counts> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = snapshots.next() => {
                let Some(data) = next else { break };
                if !data.loaded || last == Some(data.counts) {
                    continue;
                }
                debug!(
                    available = data.counts.available,
                    occupied = data.counts.occupied,
                    "counts changed"
                );
                output::print_output(&render(&data.counts, global)?, global.quiet);
                last = Some(data.counts);
            }
        }
    }

    feed.stop();
    Ok(())
}
