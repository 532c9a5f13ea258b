//! Strategy-based country resolution for restaurant records.

use std::fmt;

use bitereserve_core::{CountryCode, RestaurantRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RegionTables;

/// Where a resolved country code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// A valid code already stored on the record.
    StoredCode,
    /// The `country` entry of the geocoder address components.
    AddressComponents,
    /// The location slug via the slug table.
    LocationSlug,
    /// The free-text region name via the alias table.
    RegionName,
}

impl ResolutionSource {
    /// Stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StoredCode => "stored_code",
            Self::AddressComponents => "address_components",
            Self::LocationSlug => "location_slug",
            Self::RegionName => "region_name",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved country and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved code.
    pub code: CountryCode,
    /// Producing strategy.
    pub source: ResolutionSource,
}

/// A pure resolution step over a record and the region tables.
pub type Strategy = fn(&RestaurantRecord, &RegionTables) -> Option<CountryCode>;

/// Resolves a record's country by trying strategies in order.
///
/// A record that already stores a valid code is never re-resolved.
///
/// # Examples
///
/// ```
/// use bitereserve_core::RestaurantRecord;
/// use bitereserve_regions::{CountryResolver, RegionTables, ResolutionSource};
///
/// let resolver = CountryResolver::new(RegionTables::builtin());
/// let record = RestaurantRecord::new("1").with_region("Porto, Portugal");
/// let resolution = resolver.resolve(&record).expect("resolves");
/// assert_eq!(resolution.code.as_str(), "PT");
/// assert_eq!(resolution.source, ResolutionSource::RegionName);
/// ```
#[derive(Debug, Clone)]
pub struct CountryResolver {
    tables: RegionTables,
    strategies: Vec<(ResolutionSource, Strategy)>,
}

impl CountryResolver {
    /// Resolver using [`default_strategies`].
    #[must_use]
    pub fn new(tables: RegionTables) -> Self {
        Self::with_strategies(tables, default_strategies())
    }

    /// Resolver using a caller-supplied strategy order.
    #[must_use]
    pub const fn with_strategies(
        tables: RegionTables,
        strategies: Vec<(ResolutionSource, Strategy)>,
    ) -> Self {
        Self { tables, strategies }
    }

    /// Tables consulted by name-based strategies.
    #[must_use]
    pub const fn tables(&self) -> &RegionTables {
        &self.tables
    }

    /// Strategy order in effect.
    pub fn sources(&self) -> impl Iterator<Item = ResolutionSource> + '_ {
        self.strategies.iter().map(|(source, _)| *source)
    }

    /// Resolve `record`, or `None` when every strategy fails.
    #[must_use]
    pub fn resolve(&self, record: &RestaurantRecord) -> Option<Resolution> {
        if let Some(code) = record.stored_country() {
            return Some(Resolution {
                code,
                source: ResolutionSource::StoredCode,
            });
        }
        self.strategies.iter().find_map(|(source, strategy)| {
            strategy(record, &self.tables).map(|code| Resolution {
                code,
                source: *source,
            })
        })
    }
}

/// Structured data first, then slug, then free text.
#[must_use]
pub fn default_strategies() -> Vec<(ResolutionSource, Strategy)> {
    vec![
        (ResolutionSource::AddressComponents, from_address_components as Strategy),
        (ResolutionSource::LocationSlug, from_location_slug as Strategy),
        (ResolutionSource::RegionName, from_region_name as Strategy),
    ]
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

/// Read the `short_name` of the component typed `country`.
///
/// The raw value may be a JSON array or a JSON string holding one. Anything
/// unparseable counts as absent.
#[must_use]
pub fn from_address_components(
    record: &RestaurantRecord,
    _tables: &RegionTables,
) -> Option<CountryCode> {
    let raw = record.address_components.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    let decoded = match serde_json::from_str::<Value>(raw).ok()? {
        Value::String(inner) => serde_json::from_str::<Value>(&inner).ok()?,
        other => other,
    };
    let Value::Array(components) = decoded else {
        return None;
    };
    components
        .into_iter()
        .filter_map(|component| serde_json::from_value::<AddressComponent>(component).ok())
        .find(|component| component.types.iter().any(|kind| kind == "country"))
        .and_then(|component| component.short_name)
        .and_then(|short| CountryCode::normalise(&short).ok())
}

/// Map the location slug to a country name, then to a code.
#[must_use]
pub fn from_location_slug(record: &RestaurantRecord, tables: &RegionTables) -> Option<CountryCode> {
    let slug = record.location_slug.as_deref()?;
    tables.country_for_slug(slug)
}

/// Look the free-text region up in the alias table.
#[must_use]
pub fn from_region_name(record: &RestaurantRecord, tables: &RegionTables) -> Option<CountryCode> {
    let region = record.region.as_deref()?;
    tables.lookup_name(region)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const PORTUGAL_COMPONENTS: &str = r#"[
        {"long_name": "Lisboa", "short_name": "Lisboa", "types": ["locality", "political"]},
        {"long_name": "Portugal", "short_name": "pt", "types": ["country", "political"]}
    ]"#;

    #[fixture]
    fn resolver() -> CountryResolver {
        CountryResolver::new(RegionTables::builtin())
    }

    fn code(resolution: Option<Resolution>) -> Option<String> {
        resolution.map(|found| found.code.as_str().to_owned())
    }

    #[rstest]
    fn structured_data_beats_free_text(resolver: CountryResolver) {
        let record = RestaurantRecord::new("1")
            .with_address_components(PORTUGAL_COMPONENTS)
            .with_region("Spain");
        let resolution = resolver.resolve(&record).expect("resolves");
        assert_eq!(resolution.code.as_str(), "PT");
        assert_eq!(resolution.source, ResolutionSource::AddressComponents);
    }

    #[rstest]
    fn double_encoded_components_are_unwrapped(resolver: CountryResolver) {
        let encoded = serde_json::to_string(PORTUGAL_COMPONENTS).expect("encode");
        let record = RestaurantRecord::new("1").with_address_components(encoded);
        assert_eq!(code(resolver.resolve(&record)), Some("PT".to_owned()));
    }

    #[rstest]
    #[case("")]
    #[case("not json")]
    #[case("{\"country\": \"PT\"}")]
    #[case("[{\"short_name\": \"PT\", \"types\": [\"locality\"]}]")]
    #[case("[{\"short_name\": \"Portugal\", \"types\": [\"country\"]}]")]
    #[case("[42, {\"types\": \"country\"}]")]
    fn malformed_components_fall_through(resolver: CountryResolver, #[case] raw: &str) {
        let record = RestaurantRecord::new("1")
            .with_address_components(raw)
            .with_region("Japan");
        let resolution = resolver.resolve(&record).expect("region fallback");
        assert_eq!(resolution.source, ResolutionSource::RegionName);
        assert_eq!(resolution.code.as_str(), "JP");
    }

    #[rstest]
    fn slug_precedes_region(resolver: CountryResolver) {
        let record = RestaurantRecord::new("1")
            .with_location_slug("lisbon")
            .with_region("Spain");
        let resolution = resolver.resolve(&record).expect("resolves");
        assert_eq!(resolution.source, ResolutionSource::LocationSlug);
        assert_eq!(resolution.code.as_str(), "PT");
    }

    #[rstest]
    fn valid_stored_codes_are_kept(resolver: CountryResolver) {
        let record = RestaurantRecord::new("1")
            .with_country_code("FR")
            .with_region("Spain");
        let resolution = resolver.resolve(&record).expect("stored");
        assert_eq!(resolution.source, ResolutionSource::StoredCode);
        assert_eq!(resolution.code.as_str(), "FR");
    }

    #[rstest]
    fn invalid_stored_codes_are_resolved_again(resolver: CountryResolver) {
        let record = RestaurantRecord::new("1")
            .with_country_code("France")
            .with_region("France");
        let resolution = resolver.resolve(&record).expect("resolves");
        assert_eq!(resolution.source, ResolutionSource::RegionName);
    }

    #[rstest]
    fn records_without_hints_stay_unresolved(resolver: CountryResolver) {
        assert_eq!(resolver.resolve(&RestaurantRecord::new("1")), None);
        let record = RestaurantRecord::new("2")
            .with_location_slug("atlantis")
            .with_region("Lost City");
        assert_eq!(resolver.resolve(&record), None);
    }

    #[rstest]
    fn strategy_order_is_configurable() {
        let resolver = CountryResolver::with_strategies(
            RegionTables::builtin(),
            vec![
                (ResolutionSource::RegionName, from_region_name as Strategy),
                (ResolutionSource::AddressComponents, from_address_components as Strategy),
            ],
        );
        let record = RestaurantRecord::new("1")
            .with_address_components(PORTUGAL_COMPONENTS)
            .with_location_slug("lisbon")
            .with_region("Spain");
        assert_eq!(code(resolver.resolve(&record)), Some("ES".to_owned()));
        assert_eq!(
            resolver.sources().collect::<Vec<_>>(),
            vec![
                ResolutionSource::RegionName,
                ResolutionSource::AddressComponents
            ]
        );
    }
}
