//! Storage adapters implementing [`RestaurantStore`] plus shared scans.
//!
//! The SQLite adapter serves local copies and tests; the REST adapter talks
//! to a PostgREST endpoint such as Supabase. Both expose the same four
//! operations and the same guarded-update semantics.

use bitereserve_core::{PageRequest, RestaurantRecord, RestaurantStore, StoreError};

#[cfg(feature = "store-rest")]
mod rest;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-rest")]
pub use rest::{RestRestaurantStore, RestStoreConfig, RestStoreError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteRestaurantStore, SqliteStoreError};

/// Table name used when none is configured.
pub const DEFAULT_TABLE: &str = "restaurants";

/// Columns every adapter reads, in row order.
pub(crate) const RECORD_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "address_components",
    "location_slug",
    "region",
    "country_code",
    "bitereserve_code",
];

/// Whether `table` is a plain SQL identifier safe to splice into queries.
#[must_use]
pub fn is_valid_table_name(table: &str) -> bool {
    let mut chars = table.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Read every restaurant, page by page, until an empty page is returned.
///
/// The whole listing is taken before any row is updated so offsets stay
/// stable while the run writes.
pub async fn list_all_restaurants<S>(
    store: &S,
    page_size: usize,
) -> Result<Vec<RestaurantRecord>, StoreError>
where
    S: RestaurantStore + ?Sized,
{
    let mut records = Vec::new();
    let mut page = PageRequest::first(page_size);
    loop {
        let rows = store.list_restaurants(page).await?;
        if rows.is_empty() {
            break;
        }
        log::debug!("listed {} restaurants at offset {}", rows.len(), page.offset);
        page = page.advance(rows.len());
        records.extend(rows);
    }
    Ok(records)
}
