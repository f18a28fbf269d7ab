//! `parkwatch-tui` — Live terminal view of a parking lot.
//!
//! Built on [ratatui](https://ratatui.rs) over `parkwatch-core` feeds. The
//! desktop layout has three tabs (Dashboard, Map, Visits); terminals narrower
//! than 100 columns, or `--mobile`, switch to the compact mobile dashboard
//! with the personal access code card.
//!
//! Logs go to a file (default `/tmp/parkwatch-tui.log`) so they never
//! corrupt the terminal. A background data bridge owns the feed for the
//! mounted page and streams its snapshots into the action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use parkwatch_config::Profile;
use parkwatch_core::{LayoutMode, Monitor, MonitorConfig, Role};

use crate::app::App;

/// Terminal dashboard for parking-lot occupancy.
#[derive(Parser, Debug)]
#[command(name = "parkwatch-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "PARKWATCH_PROFILE")]
    profile: Option<String>,

    /// Parking server URL, overrides the profile
    #[arg(short = 's', long, env = "PARKWATCH_SERVER")]
    server: Option<String>,

    /// Signed-in user name
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Role of the signed-in user (admin | user)
    #[arg(long)]
    role: Option<Role>,

    /// Session token, overrides the profile's token chain
    #[arg(long)]
    token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Always use the mobile layout
    #[arg(short = 'm', long)]
    mobile: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/parkwatch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may reach stdout/stderr while the terminal
/// is in raw mode. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parkwatch_tui={log_level},parkwatch_core={log_level},parkwatch_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("parkwatch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the monitor configuration. Priority: CLI flags > profile > defaults.
fn build_monitor_config(cli: &Cli) -> Result<MonitorConfig> {
    let cfg = parkwatch_config::load_config_or_default();
    let profile_name = cfg.profile_name(cli.profile.as_deref());

    let mut profile = if let Ok(found) = cfg.profile(&profile_name) {
        found.clone()
    } else {
        let server = cli.server.clone().ok_or_else(|| {
            eyre!(
                "no server configured for profile '{profile_name}': \
                 pass --server or run `parkwatch config init`"
            )
        })?;
        Profile::new(server)
    };

    if let Some(server) = &cli.server {
        profile.server.clone_from(server);
    }
    if let Some(user) = &cli.user {
        profile.user = Some(user.clone());
    }
    if let Some(role) = cli.role {
        profile.role = role;
    }
    if cli.insecure {
        profile.insecure = Some(true);
    }

    let mut config =
        parkwatch_config::profile_to_monitor_config(&profile, &profile_name, &cfg.defaults)?;
    if let Some(token) = &cli.token {
        config.session_token = Some(SecretString::from(token.clone()));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_monitor_config(&cli)?;
    info!(
        server = %config.url,
        role = %config.role,
        mobile = cli.mobile,
        "starting parkwatch-tui"
    );

    let monitor = Monitor::new(config)?;
    let forced_layout = cli.mobile.then_some(LayoutMode::Mobile);

    let mut app = App::new(monitor, forced_layout);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn token_flag_is_not_bound_to_an_env_var() {
        let cmd = Cli::command();
        let token = cmd.get_arguments().find(|a| a.get_id() == "token").unwrap();
        assert!(token.get_env().is_none());

        let cli = Cli::try_parse_from(["parkwatch-tui", "--token", "abc"]).unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
    }
}
