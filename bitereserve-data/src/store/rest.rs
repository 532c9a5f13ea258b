//! PostgREST-backed [`RestaurantStore`], as served by Supabase.
//!
//! Reads use `offset`/`limit` query parameters ordered by `id`. Updates are
//! `PATCH` requests filtered on both the identifier and a missing code, with
//! `Prefer: return=representation` so an unmatched guard is observable.

use std::time::Duration;

use async_trait::async_trait;
use bitereserve_core::{
    AssignOutcome, BookingCode, CountryCode, PageRequest, RestaurantId, RestaurantRecord,
    RestaurantStore, StoreError,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

use super::{RECORD_COLUMNS, is_valid_table_name};

/// Default user agent for REST requests.
pub const DEFAULT_USER_AGENT: &str = "bitereserve-codes/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Filter matching rows whose code is null or blank.
const UNCODED_FILTER: &str = "(bitereserve_code.is.null,bitereserve_code.eq.)";

/// Errors raised while building a REST store.
#[derive(Debug, Error)]
pub enum RestStoreError {
    /// The endpoint is not a valid URL.
    #[error("invalid REST endpoint {url:?}: {source}")]
    InvalidUrl {
        /// Configured endpoint.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The endpoint cannot carry a table path (for example `mailto:`).
    #[error("REST endpoint {url:?} cannot address tables")]
    UnsupportedUrl {
        /// Configured endpoint.
        url: String,
    },
    /// The table name is not a plain identifier.
    #[error("invalid table name {table:?}")]
    InvalidTable {
        /// Rejected table name.
        table: String,
    },
    /// The API key is empty.
    #[error("REST API key is empty")]
    MissingApiKey,
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Connection settings for [`RestRestaurantStore`].
#[derive(Clone)]
pub struct RestStoreConfig {
    /// PostgREST root, e.g. `https://project.supabase.co/rest/v1`.
    pub base_url: String,
    /// Service or anon key, sent as `apikey` and as a bearer token.
    pub api_key: String,
    /// Table holding restaurant rows.
    pub table: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for RestStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RestStoreConfig {
    /// Settings for `base_url` and `api_key` with default table and timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: super::DEFAULT_TABLE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Use a different table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Restaurant rows behind a PostgREST endpoint.
///
/// # Examples
///
/// ```no_run
/// use bitereserve_data::store::{RestRestaurantStore, RestStoreConfig};
///
/// let config = RestStoreConfig::new("https://project.supabase.co/rest/v1", "service-key");
/// let store = RestRestaurantStore::new(config)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct RestRestaurantStore {
    client: Client,
    table_url: Url,
    api_key: String,
}

impl std::fmt::Debug for RestRestaurantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestRestaurantStore")
            .field("table_url", &self.table_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct RestRow {
    id: Value,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    address_components: Option<Value>,
    #[serde(default)]
    location_slug: Option<Value>,
    #[serde(default)]
    region: Option<Value>,
    #[serde(default)]
    country_code: Option<Value>,
    #[serde(default)]
    bitereserve_code: Option<Value>,
}

impl RestRow {
    fn into_record(self) -> Result<RestaurantRecord, StoreError> {
        let id = text_value(Some(self.id)).ok_or_else(|| StoreError::Decode {
            what: "restaurant row",
            message: "row has no id".to_owned(),
        })?;
        Ok(RestaurantRecord {
            id: RestaurantId::new(id),
            name: text_value(self.name),
            address_components: text_value(self.address_components),
            location_slug: text_value(self.location_slug),
            region: text_value(self.region),
            country_code: text_value(self.country_code),
            bitereserve_code: text_value(self.bitereserve_code),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CodeRow {
    #[serde(default)]
    bitereserve_code: Option<Value>,
}

// jsonb columns arrive as structured JSON; keep their text form so the
// resolver sees the same shape as from SQLite.
fn text_value(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl RestRestaurantStore {
    /// Build a store from connection settings.
    pub fn new(config: RestStoreConfig) -> Result<Self, RestStoreError> {
        if !is_valid_table_name(&config.table) {
            return Err(RestStoreError::InvalidTable {
                table: config.table,
            });
        }
        if config.api_key.trim().is_empty() {
            return Err(RestStoreError::MissingApiKey);
        }
        let table_url = table_url(&config.base_url, &config.table)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(RestStoreError::HttpClient)?;
        Ok(Self {
            client,
            table_url,
            api_key: config.api_key,
        })
    }

    fn list_url(&self, page: PageRequest) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", &RECORD_COLUMNS.join(","))
            .append_pair("order", "id.asc")
            .append_pair("offset", &page.offset.to_string())
            .append_pair("limit", &page.limit.to_string());
        url
    }

    fn codes_url(&self, country: &CountryCode, page: PageRequest) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "bitereserve_code")
            .append_pair("country_code", &format!("eq.{country}"))
            .append_pair("bitereserve_code", "not.is.null")
            .append_pair("order", "id.asc")
            .append_pair("offset", &page.offset.to_string())
            .append_pair("limit", &page.limit.to_string());
        url
    }

    fn fetch_url(&self, id: &RestaurantId) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", &RECORD_COLUMNS.join(","))
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("limit", "1");
        url
    }

    fn assign_url(&self, id: &RestaurantId) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("or", UNCODED_FILTER);
        url
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, StoreError> {
        self.authorised(request)
            .send()
            .await
            .map_err(|err| StoreError::backend(operation, err))?
            .error_for_status()
            .map_err(|err| StoreError::backend(operation, err))
    }

    async fn decode<T: DeserializeOwned>(
        what: &'static str,
        response: Response,
    ) -> Result<T, StoreError> {
        let body = response.bytes().await.map_err(|err| StoreError::Decode {
            what,
            message: err.to_string(),
        })?;
        decode_body(what, &body)
    }

    async fn get_rows(
        &self,
        operation: &'static str,
        url: Url,
    ) -> Result<Vec<RestaurantRecord>, StoreError> {
        let response = self.send(operation, self.client.get(url)).await?;
        let rows: Vec<RestRow> = Self::decode("restaurant rows", response).await?;
        rows.into_iter().map(RestRow::into_record).collect()
    }
}

fn decode_body<T: DeserializeOwned>(what: &'static str, body: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(body).map_err(|err| StoreError::Decode {
        what,
        message: err.to_string(),
    })
}

/// Interpret a guarded `PATCH` from its returned representation and, when no
/// row matched, a fresh read of the target.
fn guarded_outcome(
    id: &RestaurantId,
    updated: &[Value],
    current: Option<&RestaurantRecord>,
) -> Result<AssignOutcome, StoreError> {
    if !updated.is_empty() {
        return Ok(AssignOutcome::Updated);
    }
    match current {
        Some(_) => Ok(AssignOutcome::AlreadyAssigned),
        None => Err(StoreError::MissingRow { id: id.clone() }),
    }
}

fn table_url(base: &str, table: &str) -> Result<Url, RestStoreError> {
    let mut url = Url::parse(base).map_err(|source| RestStoreError::InvalidUrl {
        url: base.to_owned(),
        source,
    })?;
    url.path_segments_mut()
        .map_err(|()| RestStoreError::UnsupportedUrl {
            url: base.to_owned(),
        })?
        .pop_if_empty()
        .push(table);
    url.set_query(None);
    Ok(url)
}

#[async_trait(?Send)]
impl RestaurantStore for RestRestaurantStore {
    async fn list_restaurants(
        &self,
        page: PageRequest,
    ) -> Result<Vec<RestaurantRecord>, StoreError> {
        self.get_rows("list restaurants", self.list_url(page))
            .await
    }

    async fn codes_in_country(
        &self,
        country: &CountryCode,
        page: PageRequest,
    ) -> Result<Vec<String>, StoreError> {
        let response = self
            .send(
                "read partition codes",
                self.client.get(self.codes_url(country, page)),
            )
            .await?;
        let rows: Vec<CodeRow> = Self::decode("partition codes", response).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| text_value(row.bitereserve_code))
            .collect())
    }

    async fn fetch_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantRecord>, StoreError> {
        let mut rows = self
            .get_rows("fetch restaurant", self.fetch_url(id))
            .await?;
        Ok(rows.pop())
    }

    async fn assign_code(
        &self,
        id: &RestaurantId,
        country: &CountryCode,
        code: &BookingCode,
    ) -> Result<AssignOutcome, StoreError> {
        let body = json!({
            "country_code": country.as_str(),
            "bitereserve_code": code.as_str(),
        });
        let request = self
            .client
            .patch(self.assign_url(id))
            .header("Prefer", "return=representation")
            .json(&body);
        let response = self.send("assign code", request).await?;
        let updated: Vec<Value> = Self::decode("updated rows", response).await?;
        let current = if updated.is_empty() {
            self.fetch_restaurant(id).await?
        } else {
            None
        };
        guarded_outcome(id, &updated, current.as_ref())
    }
}
