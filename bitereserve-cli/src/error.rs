//! Error types emitted by the BiteReserve CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use bitereserve_core::CodeSpaceError;
use bitereserve_data::{AssignError, AuditError};
use bitereserve_regions::RegionTableError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the BiteReserve CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The requested backend was compiled out.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// The configured code width is unusable.
    #[error("invalid code width: {0}")]
    InvalidCodeWidth(#[source] CodeSpaceError),
    /// Loading the region alias overlay failed.
    #[error("failed to load region aliases from {path:?}: {source}")]
    LoadAliases {
        path: Utf8PathBuf,
        #[source]
        source: RegionTableError,
    },
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    OpenSqliteStore(#[from] bitereserve_data::SqliteStoreError),
    /// Building the REST client failed.
    #[cfg(feature = "store-rest")]
    #[error("failed to connect to {base_url:?}: {source}")]
    BuildRestStore {
        base_url: String,
        #[source]
        source: bitereserve_data::RestStoreError,
    },
    /// The assignment pass could not start.
    #[error(transparent)]
    Assign(#[from] AssignError),
    /// The audit pass could not start.
    #[error(transparent)]
    Audit(#[from] AuditError),
    /// The audit found codes shared within a partition.
    #[error("audit found {count} duplicate code(s)")]
    DuplicateCodes { count: usize },
    /// Serialising the report failed.
    #[error("failed to serialise report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    WriteReport(#[source] std::io::Error),
}
