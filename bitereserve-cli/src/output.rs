//! Report rendering for stdout.

use std::fmt::Display;
use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// How the final report is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Aligned human-readable summary.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

pub(crate) fn write_report<T>(
    writer: &mut dyn Write,
    format: OutputFormat,
    report: &T,
) -> Result<(), CliError>
where
    T: Serialize + Display,
{
    let payload = match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
            json.push('\n');
            json
        }
    };
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)
}
