//! Behavioural coverage for country resolution.

use std::cell::RefCell;

use bitereserve_core::RestaurantRecord;
use bitereserve_regions::{CountryResolver, RegionTables, Resolution};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const PORTUGAL_COMPONENTS: &str =
    r#"[{"long_name": "Portugal", "short_name": "PT", "types": ["country", "political"]}]"#;

#[fixture]
fn record() -> RefCell<RestaurantRecord> {
    RefCell::new(RestaurantRecord::new("r-1"))
}

#[fixture]
fn tables() -> RefCell<RegionTables> {
    RefCell::new(RegionTables::builtin())
}

#[fixture]
fn resolution() -> RefCell<Option<Resolution>> {
    RefCell::new(None)
}

#[given("a restaurant whose address components name Portugal")]
fn portuguese_components(#[from(record)] record: &RefCell<RestaurantRecord>) {
    record.borrow_mut().address_components = Some(PORTUGAL_COMPONENTS.to_owned());
}

#[given("its region reads {region}")]
fn region_reads(#[from(record)] record: &RefCell<RestaurantRecord>, region: String) {
    record.borrow_mut().region = Some(region.trim_matches('"').to_owned());
}

#[given("a restaurant in region {region}")]
fn restaurant_in_region(#[from(record)] record: &RefCell<RestaurantRecord>, region: String) {
    record.borrow_mut().region = Some(region.trim_matches('"').to_owned());
}

#[given("an overlay mapping {alias} to {code}")]
fn overlay_mapping(
    #[from(tables)] tables: &RefCell<RegionTables>,
    alias: String,
    code: String,
) {
    let overlay = format!(
        r#"{{"aliases": {{"{}": "{}"}}}}"#,
        alias.trim_matches('"'),
        code.trim_matches('"')
    );
    tables
        .borrow_mut()
        .extend_from_reader(overlay.as_bytes())
        .unwrap_or_else(|err| panic!("overlay should load: {err}"));
}

#[when("the country is resolved")]
fn resolve(
    #[from(record)] record: &RefCell<RestaurantRecord>,
    #[from(tables)] tables: &RefCell<RegionTables>,
    #[from(resolution)] resolution: &RefCell<Option<Resolution>>,
) {
    let resolver = CountryResolver::new(tables.borrow().clone());
    *resolution.borrow_mut() = resolver.resolve(&record.borrow());
}

#[then("the country is {code} from {source}")]
fn resolved_to(
    #[from(resolution)] resolution: &RefCell<Option<Resolution>>,
    code: String,
    source: String,
) {
    let borrowed = resolution.borrow();
    let Some(found) = borrowed.as_ref() else {
        panic!("expected a resolution");
    };
    assert_eq!(found.code.as_str(), code.trim_matches('"'));
    assert_eq!(found.source.as_str(), source.trim_matches('"'));
}

#[then("the country is unresolved")]
fn unresolved(#[from(resolution)] resolution: &RefCell<Option<Resolution>>) {
    assert_eq!(*resolution.borrow(), None);
}

#[scenario(path = "tests/features/country_resolution.feature", index = 0)]
fn structured_data_wins(
    record: RefCell<RestaurantRecord>,
    tables: RefCell<RegionTables>,
    resolution: RefCell<Option<Resolution>>,
) {
    let _ = (record, tables, resolution);
}

#[scenario(path = "tests/features/country_resolution.feature", index = 1)]
fn composite_region_falls_back(
    record: RefCell<RestaurantRecord>,
    tables: RefCell<RegionTables>,
    resolution: RefCell<Option<Resolution>>,
) {
    let _ = (record, tables, resolution);
}

#[scenario(path = "tests/features/country_resolution.feature", index = 2)]
fn overlay_extends_aliases(
    record: RefCell<RestaurantRecord>,
    tables: RefCell<RegionTables>,
    resolution: RefCell<Option<Resolution>>,
) {
    let _ = (record, tables, resolution);
}

#[scenario(path = "tests/features/country_resolution.feature", index = 3)]
fn unresolved_without_hints(
    record: RefCell<RestaurantRecord>,
    tables: RefCell<RegionTables>,
    resolution: RefCell<Option<Resolution>>,
) {
    let _ = (record, tables, resolution);
}
