//! Facade crate for BiteReserve booking-code assignment.
//!
//! This crate re-exports the core domain types and the country resolver, and
//! exposes the storage adapters and batch passes behind feature flags.

#![forbid(unsafe_code)]

pub use bitereserve_core::{
    Allocation, AssignOutcome, BookingCode, BookingCodeError, CodeSpace, CodeSpaceError,
    CountryCode, CountryCodeError, PageRequest, RestaurantId, RestaurantRecord, RestaurantStore,
    StoreError, UsedCodes, allocate_code,
};
pub use bitereserve_regions::{
    CountryResolver, RegionTableError, RegionTables, Resolution, ResolutionSource,
};

#[cfg(any(feature = "store-sqlite", feature = "store-rest"))]
pub use bitereserve_data::{
    AssignError, AssignOptions, AssignmentReport, AuditOptions, AuditReport, run_assignment,
    run_audit,
};

#[cfg(feature = "store-sqlite")]
pub use bitereserve_data::{SqliteRestaurantStore, SqliteStoreError};

#[cfg(feature = "store-rest")]
pub use bitereserve_data::{RestRestaurantStore, RestStoreConfig, RestStoreError};

#[cfg(feature = "test-support")]
pub use bitereserve_core::test_support::MemoryStore;
