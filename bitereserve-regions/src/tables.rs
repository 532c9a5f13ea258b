//! Alias and slug tables used by name-based resolution.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use bitereserve_core::CountryCode;
use camino::Utf8Path;
use serde::Deserialize;

use crate::RegionTableError;
use crate::builtin::{COUNTRY_ALIASES, LOCATION_SLUGS};

/// Country name aliases and location slugs, read-only during a run.
///
/// Names are matched exactly first and then case-insensitively. Slugs are
/// matched case-insensitively and resolve through the alias table.
///
/// # Examples
///
/// ```
/// use bitereserve_regions::RegionTables;
///
/// let tables = RegionTables::builtin();
/// let code = tables.lookup_name("Lisbon, Portugal").expect("resolves");
/// assert_eq!(code.as_str(), "PT");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegionTables {
    exact: HashMap<String, CountryCode>,
    folded: HashMap<String, CountryCode>,
    slugs: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AliasOverlay {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
    #[serde(default)]
    slugs: BTreeMap<String, String>,
}

impl RegionTables {
    /// Tables holding only the built-in entries.
    #[must_use]
    pub fn builtin() -> Self {
        let mut tables = Self::default();
        for (alias, code) in COUNTRY_ALIASES {
            match CountryCode::new(*code) {
                Ok(code) => tables.insert_alias(alias, code),
                Err(err) => log::warn!("skipping built-in alias {alias:?}: {err}"),
            }
        }
        for (slug, name) in LOCATION_SLUGS {
            tables.insert_slug(slug, name);
        }
        tables
    }

    /// Built-in tables with the overlay at `path` applied on top.
    pub fn with_overlay_file(path: &Utf8Path) -> Result<Self, RegionTableError> {
        let mut tables = Self::builtin();
        tables.extend_from_path(path)?;
        Ok(tables)
    }

    /// Apply a JSON overlay read from `path`.
    pub fn extend_from_path(&mut self, path: &Utf8Path) -> Result<(), RegionTableError> {
        let contents =
            bitereserve_fs::read_utf8_file(path).map_err(|source| RegionTableError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        self.extend_from_reader(contents.as_bytes())
    }

    /// Apply a JSON overlay of the form `{"aliases": {..}, "slugs": {..}}`.
    ///
    /// Overlay entries replace built-ins with the same key. The overlay is
    /// validated in full before any entry is applied.
    pub fn extend_from_reader<R: Read>(&mut self, reader: R) -> Result<(), RegionTableError> {
        let overlay: AliasOverlay = serde_json::from_reader(reader)
            .map_err(|source| RegionTableError::Parse { source })?;

        let mut aliases = Vec::with_capacity(overlay.aliases.len());
        for (alias, raw) in overlay.aliases {
            if alias.trim().is_empty() {
                return Err(RegionTableError::BlankKey { kind: "alias" });
            }
            let code = CountryCode::normalise(&raw)
                .map_err(|source| RegionTableError::InvalidCode {
                    alias: alias.clone(),
                    source,
                })?;
            aliases.push((alias, code));
        }
        if overlay.slugs.keys().any(|slug| slug.trim().is_empty()) {
            return Err(RegionTableError::BlankKey { kind: "slug" });
        }

        for (alias, code) in aliases {
            self.insert_alias(&alias, code);
        }
        for (slug, name) in overlay.slugs {
            self.insert_slug(&slug, &name);
            if self.lookup_name(&name).is_none() {
                log::warn!("slug {slug:?} points at {name:?}, which no alias resolves");
            }
        }
        Ok(())
    }

    /// Add or replace one alias.
    ///
    /// Any existing alias spelled the same apart from case is replaced too.
    pub fn insert_alias(&mut self, alias: &str, code: CountryCode) {
        let trimmed_alias = alias.trim();
        let folded_alias = trimmed_alias.to_lowercase();
        self.exact
            .retain(|existing, _| existing.to_lowercase() != folded_alias);
        self.folded.insert(folded_alias, code.clone());
        self.exact.insert(trimmed_alias.to_owned(), code);
    }

    /// Add or replace one slug mapping.
    pub fn insert_slug(&mut self, slug: &str, country_name: &str) {
        self.slugs
            .insert(slug.trim().to_lowercase(), country_name.trim().to_owned());
    }

    /// Resolve a free-text country or region name.
    ///
    /// Tries the whole string exactly, then case-insensitively, then the
    /// trimmed text after the last comma in the same two ways.
    #[must_use]
    pub fn lookup_name(&self, name: &str) -> Option<CountryCode> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.lookup_whole(trimmed).or_else(|| {
            let (_, tail) = trimmed.rsplit_once(',')?;
            let country_tail = tail.trim();
            if country_tail.is_empty() {
                return None;
            }
            self.lookup_whole(country_tail)
        })
    }

    /// Country name registered for a location slug.
    #[must_use]
    pub fn country_name_for_slug(&self, slug: &str) -> Option<&str> {
        self.slugs
            .get(&slug.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Resolve a location slug through the alias table.
    #[must_use]
    pub fn country_for_slug(&self, slug: &str) -> Option<CountryCode> {
        self.country_name_for_slug(slug)
            .and_then(|name| self.lookup_name(name))
    }

    /// Number of distinct aliases.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.exact.len()
    }

    /// Number of distinct slugs.
    #[must_use]
    pub fn slug_count(&self) -> usize {
        self.slugs.len()
    }

    fn lookup_whole(&self, name: &str) -> Option<CountryCode> {
        self.exact
            .get(name)
            .or_else(|| self.folded.get(&name.to_lowercase()))
            .cloned()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tables() -> RegionTables {
        RegionTables::builtin()
    }

    #[rstest]
    #[case("Portugal", "PT")]
    #[case("México", "MX")]
    #[case("Mexico", "MX")]
    #[case("Türkiye", "TR")]
    #[case("Turkey", "TR")]
    #[case("Czech Republic", "CZ")]
    #[case("Spain, Canary Islands", "ES")]
    #[case("  Japan  ", "JP")]
    fn resolves_exact_names(tables: RegionTables, #[case] name: &str, #[case] expected: &str) {
        let code = tables.lookup_name(name).expect("known alias");
        assert_eq!(code.as_str(), expected);
    }

    #[rstest]
    #[case("portugal", "PT")]
    #[case("MÉXICO", "MX")]
    #[case("united kingdom", "GB")]
    fn resolves_names_case_insensitively(
        tables: RegionTables,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(tables.lookup_name(name).expect("folded").as_str(), expected);
    }

    #[rstest]
    #[case("Lisbon, Portugal", "PT")]
    #[case("Shibuya, Tokyo, japan", "JP")]
    #[case("Nice, france", "FR")]
    fn falls_back_to_text_after_last_comma(
        tables: RegionTables,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(tables.lookup_name(name).expect("comma split").as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("Atlantis")]
    #[case("Portugal, ")]
    #[case("Lisbon, Atlantis")]
    fn unknown_names_do_not_resolve(tables: RegionTables, #[case] name: &str) {
        assert_eq!(tables.lookup_name(name), None);
    }

    #[rstest]
    fn slugs_resolve_through_aliases(tables: RegionTables) {
        assert_eq!(tables.country_name_for_slug("Lisbon"), Some("Portugal"));
        assert_eq!(
            tables.country_for_slug("istanbul").map(|code| code.as_str().to_owned()),
            Some("TR".to_owned())
        );
        assert_eq!(tables.country_for_slug("atlantis"), None);
    }

    #[rstest]
    fn overlays_add_and_override_entries(mut tables: RegionTables) {
        let overlay = br#"{
            "aliases": {"Kingdom of Atlantis": "at", "Holland": "BE"},
            "slugs": {"poseidonia": "Kingdom of Atlantis"}
        }"#;
        tables
            .extend_from_reader(&overlay[..])
            .expect("valid overlay");
        assert_eq!(tables.lookup_name("Holland").expect("override").as_str(), "BE");
        assert_eq!(
            tables.country_for_slug("Poseidonia").expect("slug").as_str(),
            "AT"
        );
    }

    #[rstest]
    #[case("holland")]
    #[case("HOLLAND")]
    fn overlays_override_regardless_of_case(mut tables: RegionTables, #[case] key: &str) {
        let overlay = format!(r#"{{"aliases": {{"{key}": "BE"}}}}"#);
        tables
            .extend_from_reader(overlay.as_bytes())
            .expect("valid overlay");
        for spelling in ["Holland", "holland", "HOLLAND"] {
            assert_eq!(
                tables.lookup_name(spelling).expect("override").as_str(),
                "BE",
                "{spelling}"
            );
        }
    }

    #[rstest]
    fn invalid_overlay_codes_name_the_alias(mut tables: RegionTables) {
        let before = tables.alias_count();
        let overlay = br#"{"aliases": {"Freedonia": "FRE", "Sylvania": "SY"}}"#;
        let err = tables
            .extend_from_reader(&overlay[..])
            .expect_err("three-letter code");
        match err {
            RegionTableError::InvalidCode { alias, .. } => assert_eq!(alias, "Freedonia"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(tables.alias_count(), before);
        assert_eq!(tables.lookup_name("Sylvania"), None);
    }

    #[rstest]
    #[case(br#"{"aliases": {" ": "PT"}}"#.as_slice())]
    #[case(br#"{"slugs": {"": "Portugal"}}"#.as_slice())]
    fn blank_overlay_keys_are_rejected(mut tables: RegionTables, #[case] overlay: &[u8]) {
        assert!(matches!(
            tables.extend_from_reader(overlay),
            Err(RegionTableError::BlankKey { .. })
        ));
    }

    #[rstest]
    fn malformed_overlays_fail_to_parse(mut tables: RegionTables) {
        assert!(matches!(
            tables.extend_from_reader(&b"{\"countries\": {}}"[..]),
            Err(RegionTableError::Parse { .. })
        ));
    }
}
