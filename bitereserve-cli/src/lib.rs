//! Command-line interface for BiteReserve booking-code maintenance.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod assign;
mod audit;
mod error;
mod output;
mod store;

pub use error::CliError;

use assign::{AssignArgs, run_assign};
use audit::{AuditArgs, run_audit_command};

const ARG_BACKEND: &str = "backend";
const ARG_DATABASE: &str = "database";
const ARG_REST_URL: &str = "rest-url";
const ARG_API_KEY: &str = "api-key";
const ARG_TABLE: &str = "table";
const ARG_CODE_WIDTH: &str = "code-width";
const ARG_MAX_ATTEMPTS: &str = "max-attempts";
const ARG_PAGE_SIZE: &str = "page-size";
const ARG_PAUSE_EVERY: &str = "pause-every";
const ARG_PAUSE_MS: &str = "pause-ms";
const ARG_PROGRESS_EVERY: &str = "progress-every";
const ARG_REGION_ALIASES: &str = "region-aliases";
const ARG_FORMAT: &str = "format";
const ARG_DRY_RUN: &str = "dry-run";

/// Run the BiteReserve CLI with the current process arguments and environment.
///
/// Without a subcommand the `assign` pass runs with layered configuration
/// alone.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command.unwrap_or_default() {
        Command::Assign(args) => run_assign(args).await,
        Command::Audit(args) => run_audit_command(args).await,
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` overrides the default `info` level. Records emitted through the
/// `log` facade by the library crates are forwarded to the subscriber.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Parser)]
#[command(
    name = "bitereserve",
    about = "Assign and audit BiteReserve restaurant booking codes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Give uncoded restaurants a unique code within their country.
    Assign(AssignArgs),
    /// Check stored codes for duplicates and malformed values.
    Audit(AuditArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Assign(AssignArgs::default())
    }
}

#[cfg(test)]
mod tests;
