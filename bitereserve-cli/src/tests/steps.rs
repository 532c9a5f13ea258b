//! Behaviour-driven step definitions driving the command scenarios.

use super::helpers::{SeededDatabase, block_on};
use super::*;
use crate::assign::run_assign_with;
use crate::audit::run_audit_with;
use crate::store::DefaultStoreBuilder;
use bitereserve_core::RestaurantRecord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

struct CommandWorld {
    database: SeededDatabase,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        Self {
            database: SeededDatabase::new(),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn invoke(&self, argv: Vec<String>) {
        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| {
            let mut buffer = self.stdout.borrow_mut();
            match cli.command.unwrap_or_default() {
                Command::Assign(args) => {
                    block_on(run_assign_with(args, &DefaultStoreBuilder, &mut *buffer))
                }
                Command::Audit(args) => {
                    block_on(run_audit_with(args, &DefaultStoreBuilder, &mut *buffer))
                }
            }
        });
        self.result.replace(Some(outcome));
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn stdout_json(&self) -> Value {
        serde_json::from_str(&self.stdout_text()).expect("stdout should be JSON")
    }

    fn error(&self) -> CliError {
        self.result
            .take()
            .expect("result recorded")
            .expect_err("expected failure")
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

#[given("a database with {count} uncoded restaurants in {region}")]
fn uncoded_restaurants(#[from(world)] world: &CommandWorld, count: usize, region: String) {
    let region = region.trim_matches('"');
    for n in 1..=count {
        world
            .database
            .insert(&RestaurantRecord::new(format!("u{n}")).with_region(region));
    }
}

#[given("a database with {count} coded restaurants in {country}")]
fn coded_restaurants(#[from(world)] world: &CommandWorld, count: usize, country: String) {
    let country = country.trim_matches('"');
    for n in 1..=count {
        world.database.insert(
            &RestaurantRecord::new(format!("c{n}")).with_assignment(country, format!("{n:05}")),
        );
    }
}

#[given("restaurant {id} reuses the first code in {country}")]
fn duplicate_code(#[from(world)] world: &CommandWorld, id: String, country: String) {
    world.database.insert(
        &RestaurantRecord::new(id.trim_matches('"'))
            .with_assignment(country.trim_matches('"'), "00001"),
    );
}

#[when("I invoke {command}")]
fn invoke_command(#[from(world)] world: &CommandWorld, command: String) {
    let mut argv = vec!["bitereserve".to_owned()];
    argv.extend(command.trim_matches('"').split_whitespace().map(str::to_owned));
    let is_assign = argv.get(1).is_some_and(|name| name == "assign");
    argv.extend([
        format!("--{ARG_DATABASE}"),
        world.database.path.as_str().to_owned(),
    ]);
    if is_assign {
        argv.extend([format!("--{ARG_PAUSE_MS}"), "0".to_owned()]);
    }
    world.invoke(argv);
}

#[when("the assign command runs without a database")]
fn invoke_without_database(#[from(world)] world: &CommandWorld) {
    world.invoke(vec!["bitereserve".to_owned(), "assign".to_owned()]);
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &CommandWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the JSON report shows {count} updated")]
fn json_shows_updated(#[from(world)] world: &CommandWorld, count: u64) {
    assert_eq!(world.stdout_json()["updated"], count);
}

#[then("the text report mentions {text}")]
fn text_mentions(#[from(world)] world: &CommandWorld, text: String) {
    let stdout = world.stdout_text();
    assert!(
        stdout.contains(text.trim_matches('"')),
        "unexpected output: {stdout}"
    );
}

#[then("every restaurant in the database has a code")]
fn every_restaurant_coded(#[from(world)] world: &CommandWorld) {
    let records = world.database.records();
    assert!(!records.is_empty());
    assert!(records.iter().all(RestaurantRecord::is_complete));
}

#[then("no restaurant in the database has a code")]
fn nothing_coded(#[from(world)] world: &CommandWorld) {
    assert!(
        world
            .database
            .records()
            .iter()
            .all(|record| !record.has_code())
    );
}

#[then("the command fails because the {field} option is missing")]
fn fails_missing_option(#[from(world)] world: &CommandWorld, field: String) {
    match world.error() {
        CliError::MissingArgument { field: missing, .. } => {
            assert_eq!(missing, field.trim_matches('"'));
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because duplicates were found")]
fn fails_with_duplicates(#[from(world)] world: &CommandWorld) {
    match world.error() {
        CliError::DuplicateCodes { count } => assert_eq!(count, 1),
        other => panic!("expected DuplicateCodes, found {other:?}"),
    }
}

#[then("the JSON report lists {count} duplicate")]
fn json_lists_duplicates(#[from(world)] world: &CommandWorld, count: usize) {
    let report = world.stdout_json();
    let duplicates = report["duplicates"].as_array().expect("duplicates array");
    assert_eq!(duplicates.len(), count);
}

macro_rules! register_command_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_command_scenario!(assign_sqlite, "assigning codes in a SQLite database");
register_command_scenario!(assign_dry_run, "a dry run leaves the database untouched");
register_command_scenario!(assign_missing_database, "assigning without a database path");
register_command_scenario!(audit_clean, "auditing a clean database");
register_command_scenario!(audit_duplicates, "auditing a database with duplicate codes");
