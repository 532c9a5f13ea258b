//! Restaurant rows as read from the backing store.

use std::fmt;

use crate::CountryCode;

/// Stable identifier of a restaurant row.
///
/// Stores use text identifiers (UUIDs on hosted backends, integers rendered as
/// text in SQLite), so the wrapper keeps the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A restaurant row with its location hints and assigned fields.
///
/// Location hints are kept raw: `address_components` holds whatever JSON the
/// geocoder produced and may be empty or malformed. The assigned fields are
/// kept raw as well so legacy values are never silently rewritten.
///
/// # Examples
///
/// ```
/// use bitereserve_core::RestaurantRecord;
///
/// let record = RestaurantRecord::new("r-1")
///     .with_region("Lisbon, Portugal")
///     .with_assignment("PT", "00042");
/// assert!(record.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestaurantRecord {
    /// Row identifier.
    pub id: RestaurantId,
    /// Display name, used only for diagnostics.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Raw geocoder address components (JSON array or JSON-encoded string).
    #[cfg_attr(feature = "serde", serde(default))]
    pub address_components: Option<String>,
    /// Slug of a known location page the restaurant belongs to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location_slug: Option<String>,
    /// Free-text country or region name, possibly a "City, Country" composite.
    #[cfg_attr(feature = "serde", serde(default))]
    pub region: Option<String>,
    /// Stored ISO country code, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub country_code: Option<String>,
    /// Stored booking code, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bitereserve_code: Option<String>,
}

impl RestaurantRecord {
    /// Create a record with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: RestaurantId::new(id),
            ..Self::default()
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach raw address components.
    #[must_use]
    pub fn with_address_components(mut self, components: impl Into<String>) -> Self {
        self.address_components = Some(components.into());
        self
    }

    /// Attach a location slug.
    #[must_use]
    pub fn with_location_slug(mut self, slug: impl Into<String>) -> Self {
        self.location_slug = Some(slug.into());
        self
    }

    /// Attach a free-text region name.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Attach already assigned values.
    #[must_use]
    pub fn with_assignment(mut self, country: impl Into<String>, code: impl Into<String>) -> Self {
        self.country_code = Some(country.into());
        self.bitereserve_code = Some(code.into());
        self
    }

    /// Attach only a stored country code.
    #[must_use]
    pub fn with_country_code(mut self, country: impl Into<String>) -> Self {
        self.country_code = Some(country.into());
        self
    }

    /// Whether both assigned fields are present.
    ///
    /// Presence, not validity, decides completeness: a complete record is
    /// never reprocessed even if its stored values are malformed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        has_text(self.country_code.as_deref()) && has_text(self.bitereserve_code.as_deref())
    }

    /// Whether exactly one of the assigned fields is present.
    #[must_use]
    pub fn is_half_coded(&self) -> bool {
        has_text(self.country_code.as_deref()) != has_text(self.bitereserve_code.as_deref())
    }

    /// Whether a booking code is stored, valid or not.
    #[must_use]
    pub fn has_code(&self) -> bool {
        has_text(self.bitereserve_code.as_deref())
    }

    /// The stored country code when it is a valid ISO alpha-2 code.
    #[must_use]
    pub fn stored_country(&self) -> Option<CountryCode> {
        self.country_code
            .as_deref()
            .and_then(|raw| CountryCode::new(raw).ok())
    }

    /// Short human-readable description of the location hints, for reports.
    #[must_use]
    pub fn location_hint(&self) -> Option<String> {
        let parts: Vec<&str> = [self.location_slug.as_deref(), self.region.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" / "))
        }
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|raw| !raw.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn complete_requires_both_fields() {
        let coded = RestaurantRecord::new("1").with_assignment("ES", "01234");
        assert!(coded.is_complete());
        assert!(!coded.is_half_coded());

        let country_only = RestaurantRecord::new("2").with_country_code("ES");
        assert!(!country_only.is_complete());
        assert!(country_only.is_half_coded());
    }

    #[rstest]
    fn blank_values_do_not_count_as_present() {
        let record = RestaurantRecord::new("3").with_assignment("  ", "01234");
        assert!(!record.is_complete());
    }

    #[rstest]
    fn malformed_values_still_mark_completion() {
        let record = RestaurantRecord::new("4").with_assignment("usa", "12");
        assert!(record.is_complete());
        assert_eq!(record.stored_country(), None);
    }

    #[rstest]
    #[case(RestaurantRecord::new("5"), None)]
    #[case(RestaurantRecord::new("6").with_location_slug("porto"), Some("porto"))]
    #[case(
        RestaurantRecord::new("7").with_location_slug("porto").with_region("Portugal"),
        Some("porto / Portugal")
    )]
    fn location_hint_joins_available_parts(
        #[case] record: RestaurantRecord,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(record.location_hint().as_deref(), expected);
    }
}
