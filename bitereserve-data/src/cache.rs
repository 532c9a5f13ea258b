//! Per-country caches of codes already in use.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use bitereserve_core::{CountryCode, PageRequest, RestaurantStore, StoreError, UsedCodes};

/// Read every code stored under `country`.
///
/// Pages are requested until one comes back empty; a short page only means
/// the backend capped the page size.
pub async fn load_used_codes<S>(
    store: &S,
    country: &CountryCode,
    page_size: usize,
) -> Result<UsedCodes, StoreError>
where
    S: RestaurantStore + ?Sized,
{
    let mut used = UsedCodes::new();
    let mut page = PageRequest::first(page_size);
    loop {
        let codes = store.codes_in_country(country, page).await?;
        if codes.is_empty() {
            break;
        }
        page = page.advance(codes.len());
        for code in &codes {
            used.insert_raw(code);
        }
    }
    Ok(used)
}

/// Used-code sets keyed by country, each loaded at most once per run.
///
/// A failed load leaves no entry behind, so the next record of that country
/// retries it.
#[derive(Debug, Default)]
pub struct CodeCache {
    partitions: HashMap<CountryCode, UsedCodes>,
    page_size: usize,
}

impl CodeCache {
    /// Create an empty cache that reads `page_size` codes per request.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            partitions: HashMap::new(),
            page_size,
        }
    }

    /// The used set for `country`, loading it from `store` on first use.
    pub async fn partition<S>(
        &mut self,
        store: &S,
        country: &CountryCode,
    ) -> Result<&mut UsedCodes, StoreError>
    where
        S: RestaurantStore + ?Sized,
    {
        match self.partitions.entry(country.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let used = load_used_codes(store, country, self.page_size).await?;
                log::info!("loaded {} existing codes for {country}", used.len());
                Ok(entry.insert(used))
            }
        }
    }

    /// Number of partitions loaded so far.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.partitions.len()
    }
}
