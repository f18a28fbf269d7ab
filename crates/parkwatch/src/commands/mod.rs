//! Command handlers. Each module owns one top-level subcommand.

pub mod config_cmd;
pub mod counts;
pub mod qr;
pub mod spots;
pub mod visits;

use parkwatch_core::Monitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a server-backed command to its handler.
pub async fn dispatch(
    cmd: Command,
    monitor: &Monitor,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Counts(args) => counts::handle(monitor, &args, global).await,
        Command::Visits(args) => visits::handle(monitor, &args, global).await,
        Command::Spots(args) => spots::handle(monitor, args, global).await,
        Command::Qr(args) => qr::handle(monitor, args, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled before connecting".into(),
        }),
    }
}
