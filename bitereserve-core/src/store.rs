//! Data access trait for restaurant rows and their booking codes.
//!
//! The [`RestaurantStore`] trait is the only seam between the assignment
//! pipeline and persistence. Backends need filtered, paginated range reads
//! and guarded point updates; no transactions or joins are required.

use std::error::Error as StdError;

use async_trait::async_trait;
use thiserror::Error;

use crate::{BookingCode, CountryCode, RestaurantId, RestaurantRecord};

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// An offset/limit window over an ordered result set.
///
/// # Examples
///
/// ```
/// use bitereserve_core::PageRequest;
///
/// let first = PageRequest::first(500);
/// let second = first.next();
/// assert_eq!(second.offset, 500);
/// assert_eq!(second.limit, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of rows to skip.
    pub offset: usize,
    /// Maximum number of rows to return.
    pub limit: usize,
}

impl PageRequest {
    /// The first page of `limit` rows. A zero limit is raised to one.
    #[must_use]
    pub fn first(limit: usize) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
        }
    }

    /// The page immediately following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        self.advance(self.limit)
    }

    /// The page starting after `returned` rows of this one.
    ///
    /// Hosted backends may cap page sizes below the requested limit, so
    /// scans advance by the rows actually received.
    #[must_use]
    pub const fn advance(self, returned: usize) -> Self {
        Self {
            offset: self.offset.saturating_add(returned),
            limit: self.limit,
        }
    }
}

/// Result of a guarded code assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The row was updated with both fields.
    Updated,
    /// The row already carried a code when the update ran; nothing changed.
    AlreadyAssigned,
}

/// Errors surfaced by [`RestaurantStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the request.
    #[error("storage backend failed to {operation}: {source}")]
    Backend {
        /// Description of the failed operation.
        operation: &'static str,
        /// Error reported by the backend client.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// The backend returned rows the store could not decode.
    #[error("failed to decode {what} returned by the storage backend: {message}")]
    Decode {
        /// Description of the value being decoded.
        what: &'static str,
        /// Decoder message.
        message: String,
    },
    /// The row targeted by a point operation does not exist.
    #[error("restaurant {id} does not exist")]
    MissingRow {
        /// Identifier of the missing row.
        id: RestaurantId,
    },
}

impl StoreError {
    /// Wrap a backend client error with the operation that failed.
    #[must_use]
    pub fn backend<E>(operation: &'static str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            source: Box::new(source),
        }
    }
}

/// Paginated access to restaurant rows plus guarded code updates.
///
/// Every call is a suspension point; the pipeline awaits each one before
/// issuing the next, so implementations need not be `Send`.
///
/// # Examples
///
/// ```
/// use bitereserve_core::test_support::MemoryStore;
/// use bitereserve_core::{PageRequest, RestaurantRecord, RestaurantStore};
///
/// let store = MemoryStore::with_records([RestaurantRecord::new("1")]);
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .build()
///     .expect("build runtime");
/// let rows = runtime
///     .block_on(store.list_restaurants(PageRequest::first(10)))
///     .expect("list rows");
/// assert_eq!(rows.len(), 1);
/// ```
#[async_trait(?Send)]
pub trait RestaurantStore {
    /// Return one page of all restaurants ordered by identifier.
    ///
    /// An empty page signals that the listing is exhausted.
    async fn list_restaurants(
        &self,
        page: PageRequest,
    ) -> Result<Vec<RestaurantRecord>, StoreError>;

    /// Return one page of codes stored under `country`.
    ///
    /// Only rows with a non-null code are considered. An empty page signals
    /// that the partition is exhausted; a short page does not.
    async fn codes_in_country(
        &self,
        country: &CountryCode,
        page: PageRequest,
    ) -> Result<Vec<String>, StoreError>;

    /// Read a single restaurant by identifier.
    async fn fetch_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantRecord>, StoreError>;

    /// Persist `country` and `code` on `id` in one update.
    ///
    /// The update must only apply while the row still lacks a code, and must
    /// report [`AssignOutcome::AlreadyAssigned`] otherwise.
    async fn assign_code(
        &self,
        id: &RestaurantId,
        country: &CountryCode,
        code: &BookingCode,
    ) -> Result<AssignOutcome, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn zero_limit_is_raised() {
        assert_eq!(PageRequest::first(0).limit, 1);
    }

    #[rstest]
    fn pages_advance_by_limit() {
        let page = PageRequest::first(3).next().next();
        assert_eq!(page, PageRequest { offset: 6, limit: 3 });
    }

    #[rstest]
    fn short_pages_advance_by_rows_received() {
        let page = PageRequest::first(1000).advance(250);
        assert_eq!(page, PageRequest { offset: 250, limit: 1000 });
    }

    #[rstest]
    fn backend_errors_name_the_operation() {
        let err = StoreError::backend(
            "list restaurants",
            std::io::Error::other("connection refused"),
        );
        assert_eq!(
            err.to_string(),
            "storage backend failed to list restaurants: connection refused"
        );
    }
}
