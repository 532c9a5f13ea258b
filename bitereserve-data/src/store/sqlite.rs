//! SQLite-backed [`RestaurantStore`].

use async_trait::async_trait;
use bitereserve_core::{
    AssignOutcome, BookingCode, CountryCode, PageRequest, RestaurantId, RestaurantRecord,
    RestaurantStore, StoreError,
};
use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use thiserror::Error;

use super::{RECORD_COLUMNS, is_valid_table_name};

/// Errors raised while opening a SQLite store.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// The database file does not exist.
    #[error("SQLite database {path:?} does not exist")]
    MissingDatabase {
        /// Configured path.
        path: Utf8PathBuf,
    },
    /// The database path could not be inspected.
    #[error("failed to inspect SQLite database {path:?}: {source}")]
    Inspect {
        /// Configured path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// SQLite refused to open the database.
    #[error("failed to open SQLite database {path:?}: {source}")]
    Open {
        /// Configured path.
        path: Utf8PathBuf,
        /// SQLite error.
        #[source]
        source: rusqlite::Error,
    },
    /// The table name is not a plain identifier.
    #[error("invalid table name {table:?}")]
    InvalidTable {
        /// Rejected table name.
        table: String,
    },
    /// The table exists but has no `id` column.
    #[error("table {table} has no id column")]
    MissingIdColumn {
        /// Inspected table.
        table: String,
    },
    /// A schema step failed.
    #[error("failed to execute schema step '{step}': {source}")]
    Schema {
        /// Step description.
        step: &'static str,
        /// SQLite error.
        #[source]
        source: rusqlite::Error,
    },
}

/// Restaurant rows held in a SQLite table.
///
/// Opening the store ensures the table carries the location and assignment
/// columns, adding any that are missing, and indexes the country partition.
///
/// # Examples
///
/// ```
/// use bitereserve_core::RestaurantRecord;
/// use bitereserve_data::store::SqliteRestaurantStore;
///
/// let store = SqliteRestaurantStore::open_in_memory("restaurants").expect("open store");
/// store
///     .insert(&RestaurantRecord::new("1").with_region("Portugal"))
///     .expect("seed row");
/// ```
#[derive(Debug)]
pub struct SqliteRestaurantStore {
    connection: Connection,
    table: String,
}

impl SqliteRestaurantStore {
    /// Open an existing database file.
    ///
    /// A missing file is an error rather than a fresh empty database.
    pub fn open(path: &Utf8Path, table: &str) -> Result<Self, SqliteStoreError> {
        match bitereserve_fs::file_is_file(path) {
            Ok(true) => {}
            Ok(false) => {
                return Err(SqliteStoreError::MissingDatabase {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(SqliteStoreError::Inspect {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        let connection = Connection::open_with_flags(
            path.as_std_path(),
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SqliteStoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(connection, table)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(table: &str) -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::Open {
                path: Utf8PathBuf::from(":memory:"),
                source,
            })?;
        Self::from_connection(connection, table)
    }

    /// Wrap an open connection, preparing the schema.
    pub fn from_connection(mut connection: Connection, table: &str) -> Result<Self, SqliteStoreError> {
        if !is_valid_table_name(table) {
            return Err(SqliteStoreError::InvalidTable {
                table: table.to_owned(),
            });
        }
        prepare_schema(&mut connection, table)?;
        Ok(Self {
            connection,
            table: table.to_owned(),
        })
    }

    /// Insert a row as-is. Intended for seeding local copies.
    pub fn insert(&self, record: &RestaurantRecord) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            self.table,
            RECORD_COLUMNS.join(", ")
        );
        self.connection
            .execute(
                &sql,
                params![
                    record.id.as_str(),
                    record.name,
                    record.address_components,
                    record.location_slug,
                    record.region,
                    record.country_code,
                    record.bitereserve_code,
                ],
            )
            .map(|_| ())
            .map_err(|err| StoreError::backend("insert restaurant", err))
    }

    fn select_records(&self) -> String {
        let columns: Vec<String> = RECORD_COLUMNS
            .iter()
            .map(|column| {
                if *column == "id" {
                    "CAST(id AS TEXT)".to_owned()
                } else {
                    (*column).to_owned()
                }
            })
            .collect();
        format!("SELECT {} FROM {}", columns.join(", "), self.table)
    }

    fn row_exists(&self, id: &RestaurantId) -> Result<bool, StoreError> {
        self.connection
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1", self.table),
                [id.as_str()],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
            .map_err(|err| StoreError::backend("check restaurant", err))
    }
}

#[async_trait(?Send)]
impl RestaurantStore for SqliteRestaurantStore {
    async fn list_restaurants(
        &self,
        page: PageRequest,
    ) -> Result<Vec<RestaurantRecord>, StoreError> {
        let sql = format!("{} ORDER BY id LIMIT ?1 OFFSET ?2", self.select_records());
        let mut statement = self
            .connection
            .prepare_cached(&sql)
            .map_err(|err| StoreError::backend("list restaurants", err))?;
        let rows = statement
            .query_map([to_sql_int(page.limit), to_sql_int(page.offset)], read_record)
            .map_err(|err| StoreError::backend("list restaurants", err))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::backend("list restaurants", err))
    }

    async fn codes_in_country(
        &self,
        country: &CountryCode,
        page: PageRequest,
    ) -> Result<Vec<String>, StoreError> {
        let sql = format!(
            "SELECT bitereserve_code FROM {} \
             WHERE country_code = ?1 AND bitereserve_code IS NOT NULL \
             ORDER BY id LIMIT ?2 OFFSET ?3",
            self.table
        );
        let mut statement = self
            .connection
            .prepare_cached(&sql)
            .map_err(|err| StoreError::backend("read partition codes", err))?;
        let rows = statement
            .query_map(
                params![
                    country.as_str(),
                    to_sql_int(page.limit),
                    to_sql_int(page.offset)
                ],
                |row| text_column(row, 0),
            )
            .map_err(|err| StoreError::backend("read partition codes", err))?;
        let codes = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::backend("read partition codes", err))?;
        Ok(codes.into_iter().flatten().collect())
    }

    async fn fetch_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantRecord>, StoreError> {
        let sql = format!("{} WHERE id = ?1", self.select_records());
        self.connection
            .query_row(&sql, [id.as_str()], read_record)
            .optional()
            .map_err(|err| StoreError::backend("fetch restaurant", err))
    }

    async fn assign_code(
        &self,
        id: &RestaurantId,
        country: &CountryCode,
        code: &BookingCode,
    ) -> Result<AssignOutcome, StoreError> {
        let sql = format!(
            "UPDATE {} SET country_code = ?2, bitereserve_code = ?3 \
             WHERE id = ?1 AND (bitereserve_code IS NULL OR trim(bitereserve_code) = '')",
            self.table
        );
        let changed = self
            .connection
            .execute(&sql, params![id.as_str(), country.as_str(), code.as_str()])
            .map_err(|err| StoreError::backend("assign code", err))?;
        if changed > 0 {
            return Ok(AssignOutcome::Updated);
        }
        if self.row_exists(id)? {
            Ok(AssignOutcome::AlreadyAssigned)
        } else {
            Err(StoreError::MissingRow { id: id.clone() })
        }
    }
}

fn prepare_schema(connection: &mut Connection, table: &str) -> Result<(), SqliteStoreError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SqliteStoreError::Schema {
            step: "begin schema transaction",
            source,
        })?;

    run_schema_step(
        &transaction,
        "create restaurants table",
        &format!("CREATE TABLE IF NOT EXISTS {table} (id TEXT PRIMARY KEY NOT NULL)"),
    )?;

    let existing = table_columns(&transaction, table)?;
    if !existing.iter().any(|column| column == "id") {
        return Err(SqliteStoreError::MissingIdColumn {
            table: table.to_owned(),
        });
    }
    for column in RECORD_COLUMNS.iter().filter(|column| **column != "id") {
        if !existing.iter().any(|found| found == column) {
            log::info!("adding missing column {table}.{column}");
            run_schema_step(
                &transaction,
                "add missing column",
                &format!("ALTER TABLE {table} ADD COLUMN {column} TEXT"),
            )?;
        }
    }

    run_schema_step(
        &transaction,
        "index country partition",
        &format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_partition \
             ON {table}(country_code, bitereserve_code)"
        ),
    )?;

    transaction
        .commit()
        .map_err(|source| SqliteStoreError::Schema {
            step: "commit schema transaction",
            source,
        })
}

fn table_columns(
    transaction: &rusqlite::Transaction<'_>,
    table: &str,
) -> Result<Vec<String>, SqliteStoreError> {
    let schema_error = |source| SqliteStoreError::Schema {
        step: "inspect table columns",
        source,
    };
    let mut statement = transaction
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(schema_error)?;
    let names = statement
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(schema_error)?;
    names.collect::<Result<Vec<_>, _>>().map_err(schema_error)
}

fn run_schema_step(
    transaction: &rusqlite::Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SqliteStoreError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SqliteStoreError::Schema { step, source })
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<RestaurantRecord> {
    Ok(RestaurantRecord {
        id: RestaurantId::new(text_column(row, 0)?.unwrap_or_default()),
        name: text_column(row, 1)?,
        address_components: text_column(row, 2)?,
        location_slug: text_column(row, 3)?,
        region: text_column(row, 4)?,
        country_code: text_column(row, 5)?,
        bitereserve_code: text_column(row, 6)?,
    })
}

// Legacy tables may hold numbers or blobs where text is expected.
fn text_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get::<_, Value>(index)? {
        Value::Null => None,
        Value::Integer(value) => Some(value.to_string()),
        Value::Real(value) => Some(value.to_string()),
        Value::Text(text) => Some(text),
        Value::Blob(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
    })
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
