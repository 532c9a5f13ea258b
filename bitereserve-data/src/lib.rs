//! Storage adapters and batch passes for BiteReserve code assignment.
//!
//! Responsibilities:
//! - Implement [`bitereserve_core::RestaurantStore`] for SQLite and
//!   PostgREST backends.
//! - Cache used codes per country for the length of a run.
//! - Drive the assignment pass and the read-only audit pass.
//!
//! Boundaries:
//! - Do not encode code-format or allocation rules (live in
//!   `bitereserve-core`).
//! - Do not resolve countries (lives in `bitereserve-regions`).
//!
//! Invariants:
//! - Run state is owned by an explicit run context; no global mutable state.
//! - Writes only ever fill records that still lack a code.

#![forbid(unsafe_code)]

pub mod assign;
pub mod audit;
pub mod cache;
pub mod report;
pub mod store;

pub use assign::{
    AssignError, AssignOptions, DEFAULT_PAUSE, DEFAULT_PAUSE_EVERY, DEFAULT_PROGRESS_EVERY,
    RecordError, RecordOutcome, RunContext, commit_record, run_assignment,
};
pub use audit::{AuditError, AuditOptions, AuditReport, audit_records, run_audit};
pub use cache::{CodeCache, load_used_codes};
pub use report::{AssignmentReport, CountryCount, FailedRecord, UnresolvedRecord};
pub use store::{DEFAULT_TABLE, is_valid_table_name, list_all_restaurants};
#[cfg(feature = "store-rest")]
pub use store::{RestRestaurantStore, RestStoreConfig, RestStoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteRestaurantStore, SqliteStoreError};

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::future::Future;

    /// Drive `future` to completion on a single-threaded runtime.
    pub fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build test runtime")
            .block_on(future)
    }
}
