//! Errors raised while loading region tables.

use std::io;

use bitereserve_core::CountryCodeError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Failure to load or merge an alias overlay.
#[derive(Debug, Error)]
pub enum RegionTableError {
    /// The overlay file could not be read.
    #[error("failed to read alias overlay {path}: {source}")]
    Read {
        /// Overlay path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The overlay is not valid JSON of the expected shape.
    #[error("failed to parse alias overlay: {source}")]
    Parse {
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// An alias maps to something that is not an ISO alpha-2 code.
    #[error("alias {alias:?} maps to an invalid country code: {source}")]
    InvalidCode {
        /// Alias whose target was rejected.
        alias: String,
        /// Validation failure.
        #[source]
        source: CountryCodeError,
    },
    /// An alias or slug key is blank.
    #[error("alias overlay contains a blank {kind} key")]
    BlankKey {
        /// Either `"alias"` or `"slug"`.
        kind: &'static str,
    },
}
