//! Shared test harness modules for the BiteReserve CLI.

use super::*;

#[cfg(feature = "store-sqlite")]
mod helpers;
#[cfg(feature = "store-sqlite")]
mod steps;
