//! Clap derive structures for the `parkwatch` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkwatch -- parking-lot occupancy from the command line
#[derive(Debug, Parser)]
#[command(
    name = "parkwatch",
    version,
    about = "Query parking-lot occupancy from the command line",
    long_about = "Reads live occupancy, visit history and access codes from a\n\
        parking-lot server. Run `parkwatch-tui` for the live dashboard.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "PARKWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "PARKWATCH_SERVER", global = true)]
    pub server: Option<String>,

    /// Role of the signed-in user (overrides profile)
    #[arg(long, global = true)]
    pub role: Option<RoleArg>,

    /// Signed-in user name (overrides profile)
    #[arg(long, short = 'u', env = "PARKWATCH_USER", global = true)]
    pub user: Option<String>,

    /// Session token sent as a bearer credential
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARKWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PARKWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PARKWATCH_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show available and occupied spot counts
    #[command(alias = "c")]
    Counts(CountsArgs),

    /// List the latest arrivals and departures
    #[command(alias = "v")]
    Visits(VisitsArgs),

    /// Browse parking spots
    #[command(alias = "s")]
    Spots(SpotsArgs),

    /// Generate a personal access code (regular users)
    Qr(QrArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Counts / Visits ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CountsArgs {
    /// Keep polling and print every change
    #[arg(long, short = 'w')]
    pub watch: bool,
}

#[derive(Debug, Args)]
pub struct VisitsArgs {
    /// Show at most this many updates
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

// ── Spots ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SpotsArgs {
    #[command(subcommand)]
    pub command: SpotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SpotsCommand {
    /// List one page of spots
    #[command(alias = "ls")]
    List {
        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Spots per page
        #[arg(long, short = 'l', default_value = "12")]
        limit: u32,
    },

    /// Show one spot (admins)
    Get {
        /// Spot id
        id: i64,
    },

    /// Show the visit history of one spot (admins)
    History {
        /// Spot id
        id: i64,
    },
}

// ── QR ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QrArgs {
    /// Write the code's data URL to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// Create or update a profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Server URL
        #[arg(long = "url")]
        url: String,

        /// User name shown in the dashboard
        #[arg(long = "as-user")]
        as_user: Option<String>,

        /// Role of that user
        #[arg(long = "as-role", default_value = "user")]
        as_role: RoleArg,

        /// Accept self-signed certificates for this profile
        #[arg(long = "accept-invalid-certs")]
        accept_invalid_certs: bool,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a session token in the system keyring
    SetToken {
        /// Profile the token belongs to (defaults to the active profile)
        #[arg(long)]
        for_profile: Option<String>,

        /// The token value
        token: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
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

        let cli = Cli::try_parse_from(["parkwatch", "--token", "abc", "counts"]).unwrap();
        assert_eq!(cli.global.token.as_deref(), Some("abc"));
    }
}
