//! Assign command implementation for the BiteReserve CLI.

use std::io::Write;
use std::time::Duration;

use bitereserve_core::CodeSpace;
use bitereserve_data::{AssignOptions, run_assignment};
use bitereserve_regions::{CountryResolver, RegionTables};
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::output::{OutputFormat, write_report};
use crate::store::{BackendKind, StoreBuilder, StoreEnv, StoreFields, StoreSettings};
use crate::{
    ARG_API_KEY, ARG_BACKEND, ARG_CODE_WIDTH, ARG_DATABASE, ARG_DRY_RUN, ARG_FORMAT,
    ARG_MAX_ATTEMPTS, ARG_PAGE_SIZE, ARG_PAUSE_EVERY, ARG_PAUSE_MS, ARG_PROGRESS_EVERY,
    ARG_REGION_ALIASES, ARG_REST_URL, ARG_TABLE, CliError,
};

pub(crate) const ENV_ASSIGN_DATABASE: &str = "BITERESERVE_CMDS_ASSIGN_DATABASE";
pub(crate) const ENV_ASSIGN_REST_URL: &str = "BITERESERVE_CMDS_ASSIGN_REST_URL";
pub(crate) const ENV_ASSIGN_API_KEY: &str = "BITERESERVE_CMDS_ASSIGN_API_KEY";

const ASSIGN_ENV: StoreEnv = StoreEnv {
    database: ENV_ASSIGN_DATABASE,
    rest_url: ENV_ASSIGN_REST_URL,
    api_key: ENV_ASSIGN_API_KEY,
};

/// CLI arguments for the `assign` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Give every restaurant without a booking code a random code \
                 that is unique within its country. Restaurants that already \
                 carry a code are never touched, so the command can be rerun \
                 safely after an interruption.",
    about = "Assign booking codes to uncoded restaurants"
)]
#[ortho_config(prefix = "BITERESERVE")]
pub(crate) struct AssignArgs {
    /// Storage backend; inferred from the other options when omitted.
    #[arg(long = ARG_BACKEND, value_enum, value_name = "kind")]
    #[serde(default)]
    pub(crate) backend: Option<BackendKind>,
    /// SQLite database file.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL of the PostgREST endpoint (e.g. "https://x.supabase.co/rest/v1").
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
    /// Number of digits in each code.
    #[arg(long = ARG_CODE_WIDTH, value_name = "digits")]
    #[serde(default)]
    pub(crate) code_width: Option<u32>,
    /// Random draws per restaurant before giving up.
    #[arg(long = ARG_MAX_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Rows requested per page.
    #[arg(long = ARG_PAGE_SIZE, value_name = "rows")]
    #[serde(default)]
    pub(crate) page_size: Option<usize>,
    /// Pause after this many restaurants; 0 disables pausing.
    #[arg(long = ARG_PAUSE_EVERY, value_name = "count")]
    #[serde(default)]
    pub(crate) pause_every: Option<usize>,
    /// Length of each pause in milliseconds.
    #[arg(long = ARG_PAUSE_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) pause_ms: Option<u64>,
    /// Log progress after this many restaurants.
    #[arg(long = ARG_PROGRESS_EVERY, value_name = "count")]
    #[serde(default)]
    pub(crate) progress_every: Option<usize>,
    /// JSON file with extra region aliases and location slugs.
    #[arg(long = ARG_REGION_ALIASES, value_name = "path")]
    #[serde(default)]
    pub(crate) region_aliases: Option<Utf8PathBuf>,
    /// Report format written to stdout.
    #[arg(long = ARG_FORMAT, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Resolve and allocate without writing.
    #[arg(long = ARG_DRY_RUN, num_args = 0..=1, default_missing_value = "true", value_name = "bool")]
    #[serde(default)]
    pub(crate) dry_run: Option<bool>,
}

impl AssignArgs {
    pub(crate) fn into_config(self) -> Result<AssignConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AssignConfig::try_from(merged)
    }
}

/// Resolved `assign` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssignConfig {
    pub(crate) store: StoreSettings,
    pub(crate) options: AssignOptions,
    pub(crate) region_aliases: Option<Utf8PathBuf>,
    pub(crate) format: OutputFormat,
}

impl TryFrom<AssignArgs> for AssignConfig {
    type Error = CliError;

    fn try_from(args: AssignArgs) -> Result<Self, Self::Error> {
        let store = StoreSettings::resolve(
            StoreFields {
                backend: args.backend,
                database: args.database,
                rest_url: args.rest_url,
                api_key: args.api_key,
                table: args.table,
            },
            ASSIGN_ENV,
        )?;

        let defaults = AssignOptions::default();
        let code_space = match args.code_width {
            Some(width) => CodeSpace::new(width).map_err(CliError::InvalidCodeWidth)?,
            None => defaults.code_space,
        };
        let options = AssignOptions {
            code_space,
            max_attempts: args.max_attempts.unwrap_or(defaults.max_attempts),
            page_size: args.page_size.unwrap_or(defaults.page_size),
            pause_every: args.pause_every.unwrap_or(defaults.pause_every),
            pause: args.pause_ms.map_or(defaults.pause, Duration::from_millis),
            progress_every: args.progress_every.unwrap_or(defaults.progress_every),
            dry_run: args.dry_run.unwrap_or(false),
        };

        Ok(Self {
            store,
            options,
            region_aliases: args.region_aliases,
            format: args.format.unwrap_or_default(),
        })
    }
}

/// Build the resolver, applying the alias overlay when configured.
pub(crate) fn build_resolver(
    region_aliases: Option<&Utf8PathBuf>,
) -> Result<CountryResolver, CliError> {
    let tables = match region_aliases {
        Some(path) => {
            let tables = RegionTables::with_overlay_file(path).map_err(|source| {
                CliError::LoadAliases {
                    path: path.clone(),
                    source,
                }
            })?;
            log::info!(
                "loaded region aliases from {path}: {} aliases, {} slugs",
                tables.alias_count(),
                tables.slug_count()
            );
            tables
        }
        None => RegionTables::builtin(),
    };
    Ok(CountryResolver::new(tables))
}

pub(super) async fn run_assign(args: AssignArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = crate::store::DefaultStoreBuilder;
    run_assign_with(args, &builder, &mut stdout).await
}

pub(super) async fn run_assign_with(
    args: AssignArgs,
    builder: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_assign(&config, builder, writer).await
}

pub(super) async fn execute_assign(
    config: &AssignConfig,
    builder: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let resolver = build_resolver(config.region_aliases.as_ref())?;
    let store = builder.build(&config.store)?;
    if config.options.dry_run {
        log::info!("dry run: no restaurant will be updated");
    }
    let report = run_assignment(
        store.as_ref(),
        &resolver,
        &config.options,
        StdRng::from_entropy(),
    )
    .await?;
    write_report(writer, config.format, &report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AssignConfig, CliError> {
    let merged = AssignArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AssignConfig::try_from(merged)
}
