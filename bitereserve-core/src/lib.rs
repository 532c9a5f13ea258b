//! Core domain types for BiteReserve booking-code assignment.
//!
//! Every restaurant receives a random, fixed-width numeric code that is unique
//! within its ISO country partition. This crate holds the validated value
//! types, the [`RestaurantStore`] seam and the bounded allocator. Constructors
//! return `Result` to surface invalid input early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod allocate;
pub mod code;
pub mod country;
pub mod record;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use allocate::{Allocation, DEFAULT_MAX_ATTEMPTS, UsedCodes, allocate_code};
pub use code::{
    BookingCode, BookingCodeError, CodeSpace, CodeSpaceError, DEFAULT_CODE_WIDTH, MAX_CODE_WIDTH,
};
pub use country::{CountryCode, CountryCodeError};
pub use record::{RestaurantId, RestaurantRecord};
pub use store::{AssignOutcome, DEFAULT_PAGE_SIZE, PageRequest, RestaurantStore, StoreError};
