//! Behavioural coverage for bounded code allocation.

use bitereserve_core::{Allocation, CodeSpace, UsedCodes, allocate_code};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

const GENEROUS_BOUND: u32 = 100_000;

#[fixture]
fn space() -> RefCell<CodeSpace> {
    RefCell::new(CodeSpace::default())
}

#[fixture]
fn used() -> RefCell<UsedCodes> {
    RefCell::new(UsedCodes::new())
}

#[fixture]
fn outcome() -> RefCell<Option<Allocation>> {
    RefCell::new(None)
}

fn two_digit_space() -> CodeSpace {
    CodeSpace::new(2).unwrap_or_else(|err| panic!("width 2 should be valid: {err}"))
}

#[given("an empty partition with five digit codes")]
fn empty_partition(#[from(space)] space: &RefCell<CodeSpace>) {
    *space.borrow_mut() = CodeSpace::default();
}

#[given("a two digit partition with only code 42 free")]
fn nearly_full_partition(
    #[from(space)] space: &RefCell<CodeSpace>,
    #[from(used)] used: &RefCell<UsedCodes>,
) {
    let two_digits = two_digit_space();
    *space.borrow_mut() = two_digits;
    *used.borrow_mut() = (1..=99_u32)
        .filter(|value| *value != 42)
        .map(|value| format!("{value:02}"))
        .collect();
}

#[given("a one digit partition with every code taken")]
fn saturated_partition(
    #[from(space)] space: &RefCell<CodeSpace>,
    #[from(used)] used: &RefCell<UsedCodes>,
) {
    *space.borrow_mut() =
        CodeSpace::new(1).unwrap_or_else(|err| panic!("width 1 should be valid: {err}"));
    *used.borrow_mut() = (1..=9_u32).map(|value| value.to_string()).collect();
}

#[when("I allocate a code")]
fn allocate(
    #[from(space)] space: &RefCell<CodeSpace>,
    #[from(used)] used: &RefCell<UsedCodes>,
    #[from(outcome)] outcome: &RefCell<Option<Allocation>>,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let allocation = allocate_code(
        &mut rng,
        &space.borrow(),
        &mut used.borrow_mut(),
        GENEROUS_BOUND,
    );
    *outcome.borrow_mut() = Some(allocation);
}

#[when("I allocate a code for another country")]
fn allocate_elsewhere(
    #[from(space)] space: &RefCell<CodeSpace>,
    #[from(outcome)] outcome: &RefCell<Option<Allocation>>,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut other_country = UsedCodes::new();
    let allocation = allocate_code(&mut rng, &space.borrow(), &mut other_country, GENEROUS_BOUND);
    *outcome.borrow_mut() = Some(allocation);
}

#[then("a five digit code is assigned and reserved")]
fn five_digit_code(
    #[from(used)] used: &RefCell<UsedCodes>,
    #[from(outcome)] outcome: &RefCell<Option<Allocation>>,
) {
    match outcome.borrow().as_ref() {
        Some(Allocation::Assigned(code)) => {
            assert_eq!(code.as_str().len(), 5);
            assert!(code.as_str().bytes().all(|byte| byte.is_ascii_digit()));
            assert_ne!(code.as_str(), "00000");
            assert!(used.borrow().contains(code));
        }
        other => panic!("expected an assigned code, found {other:?}"),
    }
}

#[then("code 42 is assigned")]
fn last_code_assigned(#[from(outcome)] outcome: &RefCell<Option<Allocation>>) {
    match outcome.borrow().as_ref() {
        Some(Allocation::Assigned(code)) => assert_eq!(code.as_str(), "42"),
        other => panic!("expected code 42, found {other:?}"),
    }
}

#[then("allocation reports exhaustion without drawing")]
fn exhausted(#[from(outcome)] outcome: &RefCell<Option<Allocation>>) {
    assert_eq!(
        outcome.borrow().as_ref(),
        Some(&Allocation::Exhausted { attempts: 0 })
    );
}

#[scenario(path = "tests/features/code_allocation.feature", index = 0)]
fn allocating_in_an_empty_partition(
    space: RefCell<CodeSpace>,
    used: RefCell<UsedCodes>,
    outcome: RefCell<Option<Allocation>>,
) {
    let _ = (space, used, outcome);
}

#[scenario(path = "tests/features/code_allocation.feature", index = 1)]
fn allocating_the_last_free_code(
    space: RefCell<CodeSpace>,
    used: RefCell<UsedCodes>,
    outcome: RefCell<Option<Allocation>>,
) {
    let _ = (space, used, outcome);
}

#[scenario(path = "tests/features/code_allocation.feature", index = 2)]
fn allocating_in_a_saturated_partition(
    space: RefCell<CodeSpace>,
    used: RefCell<UsedCodes>,
    outcome: RefCell<Option<Allocation>>,
) {
    let _ = (space, used, outcome);
}

#[then("a one digit code is assigned while the full partition is unchanged")]
fn assigned_in_other_partition(
    #[from(used)] used: &RefCell<UsedCodes>,
    #[from(outcome)] outcome: &RefCell<Option<Allocation>>,
) {
    match outcome.borrow().as_ref() {
        Some(Allocation::Assigned(code)) => {
            assert_eq!(code.as_str().len(), 1);
            assert!(used.borrow().contains(code));
        }
        other => panic!("expected an assigned code, found {other:?}"),
    }
    assert_eq!(used.borrow().len(), 9);
}

#[scenario(path = "tests/features/code_allocation.feature", index = 3)]
fn saturated_partition_leaves_another_country_free(
    space: RefCell<CodeSpace>,
    used: RefCell<UsedCodes>,
    outcome: RefCell<Option<Allocation>>,
) {
    let _ = (space, used, outcome);
}
