//! Backend selection shared by the `assign` and `audit` commands.

use bitereserve_core::RestaurantStore;
use camino::Utf8PathBuf;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{ARG_API_KEY, ARG_DATABASE, ARG_REST_URL, CliError};

/// Storage backend holding the restaurant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BackendKind {
    /// Local SQLite database file.
    #[default]
    Sqlite,
    /// PostgREST endpoint such as Supabase.
    Rest,
}

/// Environment variable names reported when a store option is missing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StoreEnv {
    pub(crate) database: &'static str,
    pub(crate) rest_url: &'static str,
    pub(crate) api_key: &'static str,
}

/// Store options as merged from every configuration layer.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreFields {
    pub(crate) backend: Option<BackendKind>,
    pub(crate) database: Option<Utf8PathBuf>,
    pub(crate) rest_url: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) table: Option<String>,
}

/// Resolved connection settings for one backend.
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum StoreSettings {
    Sqlite {
        database: Utf8PathBuf,
        table: String,
    },
    Rest {
        base_url: String,
        api_key: String,
        table: String,
    },
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite { database, table } => f
                .debug_struct("Sqlite")
                .field("database", database)
                .field("table", table)
                .finish(),
            Self::Rest {
                base_url, table, ..
            } => f
                .debug_struct("Rest")
                .field("base_url", base_url)
                .field("api_key", &"<redacted>")
                .field("table", table)
                .finish(),
        }
    }
}

impl StoreSettings {
    /// Pick a backend and check its required options.
    ///
    /// Without an explicit backend a REST URL selects the REST store and
    /// anything else selects SQLite.
    pub(crate) fn resolve(fields: StoreFields, env: StoreEnv) -> Result<Self, CliError> {
        let backend = fields.backend.unwrap_or(if fields.rest_url.is_some() {
            BackendKind::Rest
        } else {
            BackendKind::Sqlite
        });
        let table = fields
            .table
            .unwrap_or_else(|| bitereserve_data::DEFAULT_TABLE.to_owned());
        match backend {
            BackendKind::Sqlite => {
                let database = fields.database.ok_or(CliError::MissingArgument {
                    field: ARG_DATABASE,
                    env: env.database,
                })?;
                Ok(Self::Sqlite { database, table })
            }
            BackendKind::Rest => {
                let base_url = fields.rest_url.ok_or(CliError::MissingArgument {
                    field: ARG_REST_URL,
                    env: env.rest_url,
                })?;
                let api_key = fields.api_key.ok_or(CliError::MissingArgument {
                    field: ARG_API_KEY,
                    env: env.api_key,
                })?;
                Ok(Self::Rest {
                    base_url,
                    api_key,
                    table,
                })
            }
        }
    }
}

/// Builds the store for the current invocation.
pub(crate) trait StoreBuilder {
    fn build(&self, settings: &StoreSettings) -> Result<Box<dyn RestaurantStore>, CliError>;
}

pub(crate) struct DefaultStoreBuilder;

impl StoreBuilder for DefaultStoreBuilder {
    fn build(&self, settings: &StoreSettings) -> Result<Box<dyn RestaurantStore>, CliError> {
        match settings {
            StoreSettings::Sqlite { database, table } => open_sqlite(database, table),
            StoreSettings::Rest {
                base_url,
                api_key,
                table,
            } => open_rest(base_url, api_key, table),
        }
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite(database: &Utf8PathBuf, table: &str) -> Result<Box<dyn RestaurantStore>, CliError> {
    let store = bitereserve_data::SqliteRestaurantStore::open(database, table)?;
    log::info!("using SQLite database {database}, table {table}");
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite(_database: &Utf8PathBuf, _table: &str) -> Result<Box<dyn RestaurantStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "opening a SQLite database",
    })
}

#[cfg(feature = "store-rest")]
fn open_rest(
    base_url: &str,
    api_key: &str,
    table: &str,
) -> Result<Box<dyn RestaurantStore>, CliError> {
    use bitereserve_data::{RestRestaurantStore, RestStoreConfig};

    let config = RestStoreConfig::new(base_url, api_key).with_table(table);
    let store = RestRestaurantStore::new(config).map_err(|source| CliError::BuildRestStore {
        base_url: base_url.to_owned(),
        source,
    })?;
    log::info!("using REST endpoint {base_url}, table {table}");
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-rest"))]
fn open_rest(
    _base_url: &str,
    _api_key: &str,
    _table: &str,
) -> Result<Box<dyn RestaurantStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-rest",
        action: "connecting to a REST endpoint",
    })
}
