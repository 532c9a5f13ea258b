//! Audit command implementation for the BiteReserve CLI.

use std::io::Write;

use bitereserve_core::CodeSpace;
use bitereserve_data::{AuditOptions, run_audit};
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::{OutputFormat, write_report};
use crate::store::{BackendKind, StoreBuilder, StoreEnv, StoreFields, StoreSettings};
use crate::{
    ARG_API_KEY, ARG_BACKEND, ARG_CODE_WIDTH, ARG_DATABASE, ARG_FORMAT, ARG_PAGE_SIZE,
    ARG_REST_URL, ARG_TABLE, CliError,
};

pub(crate) const ENV_AUDIT_DATABASE: &str = "BITERESERVE_CMDS_AUDIT_DATABASE";
pub(crate) const ENV_AUDIT_REST_URL: &str = "BITERESERVE_CMDS_AUDIT_REST_URL";
pub(crate) const ENV_AUDIT_API_KEY: &str = "BITERESERVE_CMDS_AUDIT_API_KEY";

const AUDIT_ENV: StoreEnv = StoreEnv {
    database: ENV_AUDIT_DATABASE,
    rest_url: ENV_AUDIT_REST_URL,
    api_key: ENV_AUDIT_API_KEY,
};

/// CLI arguments for the `audit` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Scan every restaurant without writing and report duplicate \
                 codes within a country, malformed codes or countries, and \
                 restaurants with only one of the two fields set. Exits with \
                 a failure status when duplicates are found.",
    about = "Check stored booking codes for consistency"
)]
#[ortho_config(prefix = "BITERESERVE")]
pub(crate) struct AuditArgs {
    /// Storage backend; inferred from the other options when omitted.
    #[arg(long = ARG_BACKEND, value_enum, value_name = "kind")]
    #[serde(default)]
    pub(crate) backend: Option<BackendKind>,
    /// SQLite database file.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL of the PostgREST endpoint.
    #[arg(long = ARG_REST_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) rest_url: Option<String>,
    /// API key sent to the PostgREST endpoint.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Restaurant table name.
    #[arg(long = ARG_TABLE, value_name = "name")]
    #[serde(default)]
    pub(crate) table: Option<String>,
    /// Expected number of digits in each code.
    #[arg(long = ARG_CODE_WIDTH, value_name = "digits")]
    #[serde(default)]
    pub(crate) code_width: Option<u32>,
    /// Rows requested per page.
    #[arg(long = ARG_PAGE_SIZE, value_name = "rows")]
    #[serde(default)]
    pub(crate) page_size: Option<usize>,
    /// Report format written to stdout.
    #[arg(long = ARG_FORMAT, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl AuditArgs {
    pub(crate) fn into_config(self) -> Result<AuditConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AuditConfig::try_from(merged)
    }
}

/// Resolved `audit` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuditConfig {
    pub(crate) store: StoreSettings,
    pub(crate) options: AuditOptions,
    pub(crate) format: OutputFormat,
}

impl TryFrom<AuditArgs> for AuditConfig {
    type Error = CliError;

    fn try_from(args: AuditArgs) -> Result<Self, Self::Error> {
        let store = StoreSettings::resolve(
            StoreFields {
                backend: args.backend,
                database: args.database,
                rest_url: args.rest_url,
                api_key: args.api_key,
                table: args.table,
            },
            AUDIT_ENV,
        )?;
        let defaults = AuditOptions::default();
        let code_space = match args.code_width {
            Some(width) => CodeSpace::new(width).map_err(CliError::InvalidCodeWidth)?,
            None => defaults.code_space,
        };
        Ok(Self {
            store,
            options: AuditOptions {
                code_space,
                page_size: args.page_size.unwrap_or(defaults.page_size),
            },
            format: args.format.unwrap_or_default(),
        })
    }
}

pub(super) async fn run_audit_command(args: AuditArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = crate::store::DefaultStoreBuilder;
    run_audit_with(args, &builder, &mut stdout).await
}

/// Run the audit and write its report.
///
/// The report is written before duplicates are turned into an error, so the
/// caller still sees which records collide.
pub(super) async fn run_audit_with(
    args: AuditArgs,
    builder: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let store = builder.build(&config.store)?;
    let report = run_audit(store.as_ref(), &config.options).await?;
    write_report(writer, config.format, &report)?;
    if report.has_duplicates() {
        return Err(CliError::DuplicateCodes {
            count: report.duplicates.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AuditConfig, CliError> {
    let merged = AuditArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AuditConfig::try_from(merged)
}
