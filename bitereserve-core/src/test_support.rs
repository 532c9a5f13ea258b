//! Test-only, in-memory `RestaurantStore` used by unit and behaviour tests.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    io,
};

use async_trait::async_trait;

use crate::{
    AssignOutcome, BookingCode, CountryCode, PageRequest, RestaurantId, RestaurantRecord,
    RestaurantStore, StoreError,
};

/// In-memory [`RestaurantStore`] with failure injection.
///
/// Rows are kept in insertion order, which doubles as the listing order. The
/// store performs linear scans and is intended only for small datasets.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<RestaurantRecord>>,
    failing_updates: HashSet<RestaurantId>,
    failing_listing: bool,
    max_page_size: Option<usize>,
    pending_writes: RefCell<HashMap<RestaurantId, (String, String)>>,
    code_reads: RefCell<HashMap<String, usize>>,
    assign_calls: Cell<usize>,
}

impl MemoryStore {
    /// Create a store from a collection of records.
    #[must_use]
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RestaurantRecord>,
    {
        Self {
            records: RefCell::new(records.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make updates for the given identifiers fail with a backend error.
    #[must_use]
    pub fn failing_updates_for<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_updates = ids
            .into_iter()
            .map(|id| RestaurantId::new(id.into()))
            .collect();
        self
    }

    /// Make every listing call fail, as an unreachable backend would.
    #[must_use]
    pub const fn failing_listing(mut self) -> Self {
        self.failing_listing = true;
        self
    }

    /// Cap every page at `limit` rows regardless of the requested size.
    #[must_use]
    pub const fn with_max_page_size(mut self, limit: usize) -> Self {
        self.max_page_size = Some(limit);
        self
    }

    /// Simulate another writer coding `id` between listing and the write.
    ///
    /// The assignment lands when the row is next fetched by identifier.
    #[must_use]
    pub fn with_concurrent_assignment(
        self,
        id: &str,
        country: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        self.pending_writes
            .borrow_mut()
            .insert(RestaurantId::new(id), (country.into(), code.into()));
        self
    }

    /// Snapshot of the stored rows.
    #[must_use]
    pub fn records(&self) -> Vec<RestaurantRecord> {
        self.records.borrow().clone()
    }

    /// Look up one stored row.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<RestaurantRecord> {
        self.records
            .borrow()
            .iter()
            .find(|record| record.id.as_str() == id)
            .cloned()
    }

    /// Number of partition reads issued for `country`.
    #[must_use]
    pub fn code_reads(&self, country: &str) -> usize {
        self.code_reads.borrow().get(country).copied().unwrap_or(0)
    }

    /// Number of update calls received, successful or not.
    #[must_use]
    pub const fn assign_calls(&self) -> usize {
        self.assign_calls.get()
    }

    fn window<T: Clone>(&self, rows: &[T], page: PageRequest) -> Vec<T> {
        let limit = self
            .max_page_size
            .map_or(page.limit, |cap| cap.min(page.limit));
        rows.iter().skip(page.offset).take(limit).cloned().collect()
    }
}

#[async_trait(?Send)]
impl RestaurantStore for MemoryStore {
    async fn list_restaurants(
        &self,
        page: PageRequest,
    ) -> Result<Vec<RestaurantRecord>, StoreError> {
        if self.failing_listing {
            return Err(StoreError::backend(
                "list restaurants",
                io::Error::new(io::ErrorKind::ConnectionRefused, "backend unreachable"),
            ));
        }
        Ok(self.window(&self.records.borrow(), page))
    }

    async fn codes_in_country(
        &self,
        country: &CountryCode,
        page: PageRequest,
    ) -> Result<Vec<String>, StoreError> {
        *self
            .code_reads
            .borrow_mut()
            .entry(country.as_str().to_owned())
            .or_insert(0) += 1;
        let codes: Vec<String> = self
            .records
            .borrow()
            .iter()
            .filter(|record| record.country_code.as_deref() == Some(country.as_str()))
            .filter_map(|record| record.bitereserve_code.clone())
            .collect();
        Ok(self.window(&codes, page))
    }

    async fn fetch_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantRecord>, StoreError> {
        if let Some((country, code)) = self.pending_writes.borrow_mut().remove(id) {
            for record in self.records.borrow_mut().iter_mut() {
                if &record.id == id {
                    record.country_code = Some(country.clone());
                    record.bitereserve_code = Some(code.clone());
                }
            }
        }
        Ok(self.record(id.as_str()))
    }

    async fn assign_code(
        &self,
        id: &RestaurantId,
        country: &CountryCode,
        code: &BookingCode,
    ) -> Result<AssignOutcome, StoreError> {
        self.assign_calls.set(self.assign_calls.get() + 1);
        if self.failing_updates.contains(id) {
            return Err(StoreError::backend(
                "assign code",
                io::Error::other(format!("simulated failure for {id}")),
            ));
        }
        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StoreError::MissingRow { id: id.clone() })?;
        if record
            .bitereserve_code
            .as_deref()
            .is_some_and(|raw| !raw.trim().is_empty())
        {
            return Ok(AssignOutcome::AlreadyAssigned);
        }
        record.country_code = Some(country.as_str().to_owned());
        record.bitereserve_code = Some(code.as_str().to_owned());
        Ok(AssignOutcome::Updated)
    }
}
