//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use staffing_model::{Shift, StaffId, TransferId};

#[derive(Parser)]
#[command(
    name = "staffing",
    version,
    about = "Ward staffing coverage and staff transfers",
    long_about = "Inspect ward staffing coverage and manage staff transfers.\n\n\
                  Tables are read from and written to the store configured in\n\
                  staffing.toml (an SFTP server or a local directory)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file.
    #[arg(
        long = "config",
        value_name = "PATH",
        default_value = "staffing.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show required vs present staff per service and shift.
    Coverage(CoverageArgs),

    /// Show beds vs patients per service.
    Occupancy(OccupancyArgs),

    /// List the staff roster.
    Staff(StaffArgs),

    /// List, offer and accept staff transfers.
    #[command(subcommand)]
    Transfers(TransferCommand),

    /// Hash a service password read from stdin and print the users-table row.
    HashPassword(HashPasswordArgs),
}

#[derive(Args)]
pub struct CoverageArgs {
    /// Only this shift (M, T, N or any known synonym).
    #[arg(long = "shift", value_name = "SHIFT", value_parser = parse_shift)]
    pub shift: Option<Shift>,

    /// Only each service's current shift.
    #[arg(long = "current", conflicts_with = "shift")]
    pub current: bool,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct OccupancyArgs {
    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct StaffArgs {
    /// Only staff assigned to this service.
    #[arg(long = "service", value_name = "NAME")]
    pub service: Option<String>,
}

#[derive(Subcommand)]
pub enum TransferCommand {
    /// Show the transfer log, newest first.
    List(ListTransfersArgs),

    /// Offer a staff member to another service.
    Offer(OfferArgs),

    /// Accept a pending transfer.
    Accept(AcceptArgs),
}

#[derive(Args)]
pub struct ListTransfersArgs {
    /// Only pending transfers.
    #[arg(long = "pending")]
    pub pending: bool,
}

#[derive(Args)]
pub struct CredentialArgs {
    /// Service password.
    #[arg(
        long = "credential",
        value_name = "PASSWORD",
        env = "STAFFING_CREDENTIAL",
        hide_env_values = true
    )]
    pub credential: String,
}

#[derive(Args)]
pub struct OfferArgs {
    /// Staff member to transfer.
    #[arg(long = "staff-id", value_name = "ID")]
    pub staff_id: StaffId,

    /// Service the staff member works in now.
    #[arg(long = "from", value_name = "SERVICE")]
    pub from: String,

    /// Service to move to.
    #[arg(long = "to", value_name = "SERVICE")]
    pub to: String,

    /// Shift at the destination (keeps the current shift when omitted).
    #[arg(long = "to-shift", value_name = "SHIFT")]
    pub to_shift: Option<String>,

    #[command(flatten)]
    pub credential: CredentialArgs,
}

#[derive(Args)]
pub struct AcceptArgs {
    /// Transfer to accept.
    #[arg(value_name = "ID")]
    pub transfer_id: TransferId,

    #[command(flatten)]
    pub credential: CredentialArgs,
}

#[derive(Args)]
pub struct HashPasswordArgs {
    /// Service the password belongs to.
    #[arg(value_name = "SERVICE")]
    pub service: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_shift(value: &str) -> Result<Shift, String> {
    match Shift::normalize(value) {
        Shift::Unknown => Err(format!("unknown shift '{value}' (expected M, T or N)")),
        shift => Ok(shift),
    }
}
