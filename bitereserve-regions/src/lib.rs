//! Country resolution for BiteReserve restaurant records.
//!
//! [`CountryResolver`] runs an ordered list of pure strategies over a record:
//! geocoder address components, then the location slug, then the free-text
//! region name. Name lookups go through [`RegionTables`], built-in alias
//! tables that operators can extend with JSON overlays.

#![forbid(unsafe_code)]

mod builtin;
mod error;
pub mod resolver;
pub mod tables;

pub use error::RegionTableError;
pub use resolver::{
    CountryResolver, Resolution, ResolutionSource, Strategy, default_strategies,
    from_address_components, from_location_slug, from_region_name,
};
pub use tables::RegionTables;
