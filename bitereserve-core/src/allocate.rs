//! Collision-free random code allocation within one country partition.

use std::collections::HashSet;

use rand::Rng;

use crate::{BookingCode, CodeSpace};

/// Attempt bound used unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Codes already taken in one country partition.
///
/// Stored values are kept verbatim, so a malformed legacy code still blocks
/// the identical string from being handed out again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedCodes {
    codes: HashSet<String>,
}

impl UsedCodes {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stored code. Surrounding whitespace is ignored.
    pub fn insert_raw(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.codes.insert(trimmed.to_owned())
    }

    /// Whether `code` is already taken.
    #[must_use]
    pub fn contains(&self, code: &BookingCode) -> bool {
        self.codes.contains(code.as_str())
    }

    /// Reserve `code`, returning `false` when it was already taken.
    pub fn reserve(&mut self, code: &BookingCode) -> bool {
        self.codes.insert(code.as_str().to_owned())
    }

    /// Number of taken codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no codes are taken.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Whether every value in `space` is taken.
    #[must_use]
    pub fn saturates(&self, space: &CodeSpace) -> bool {
        self.len() >= space.capacity()
            && (1..=space.max_value()).all(|value| {
                space
                    .format(value)
                    .is_ok_and(|code| self.codes.contains(code.as_str()))
            })
    }
}

impl<S: AsRef<str>> FromIterator<S> for UsedCodes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut used = Self::new();
        for raw in iter {
            used.insert_raw(raw.as_ref());
        }
        used
    }
}

/// Outcome of a bounded allocation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Allocation {
    /// A fresh code, already reserved in the used set.
    Assigned(BookingCode),
    /// No free code was found. `attempts` is zero when the partition was
    /// saturated and no draw was made.
    Exhausted {
        /// Number of draws made before giving up.
        attempts: u32,
    },
}

/// Draw a code from `space` that is not in `used` and reserve it.
///
/// Draws are uniform over `[1, 10^W - 1]`; a collision triggers a redraw, up
/// to `max_attempts` draws. Allocation is deliberately random rather than
/// sequential so published codes cannot be enumerated.
///
/// # Examples
///
/// ```
/// use bitereserve_core::{Allocation, CodeSpace, UsedCodes, allocate_code};
///
/// let mut rng = rand::thread_rng();
/// let mut used = UsedCodes::new();
/// let space = CodeSpace::default();
/// match allocate_code(&mut rng, &space, &mut used, 1000) {
///     Allocation::Assigned(code) => assert!(used.contains(&code)),
///     Allocation::Exhausted { .. } => unreachable!("empty partition"),
/// }
/// ```
pub fn allocate_code<R>(
    rng: &mut R,
    space: &CodeSpace,
    used: &mut UsedCodes,
    max_attempts: u32,
) -> Allocation
where
    R: Rng + ?Sized,
{
    if used.len() >= space.capacity() && used.saturates(space) {
        return Allocation::Exhausted { attempts: 0 };
    }

    for attempt in 1..=max_attempts {
        let value = rng.gen_range(1..=space.max_value());
        let Ok(code) = space.format(value) else {
            continue;
        };
        if used.reserve(&code) {
            log::trace!("allocated code {code} after {attempt} draw(s)");
            return Allocation::Assigned(code);
        }
    }

    Allocation::Exhausted {
        attempts: max_attempts,
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn fill_except(space: &CodeSpace, free: u32) -> UsedCodes {
        (1..=space.max_value())
            .filter(|value| *value != free)
            .map(|value| space.format(value).expect("in range").into_inner())
            .collect()
    }

    #[rstest]
    fn assigned_codes_are_reserved(mut rng: ChaCha8Rng) {
        let space = CodeSpace::default();
        let mut used = UsedCodes::new();
        let Allocation::Assigned(code) = allocate_code(&mut rng, &space, &mut used, 10) else {
            panic!("expected an assignment");
        };
        assert!(used.contains(&code));
        assert_eq!(used.len(), 1);
        assert_eq!(code.as_str().len(), 5);
        assert!(space.parse(code.as_str()).is_ok());
    }

    #[rstest]
    fn repeated_allocations_never_collide(mut rng: ChaCha8Rng) {
        let space = CodeSpace::new(3).expect("width 3");
        let mut used = UsedCodes::new();
        let mut seen = HashSet::new();
        for _ in 0..500 {
            match allocate_code(&mut rng, &space, &mut used, DEFAULT_MAX_ATTEMPTS) {
                Allocation::Assigned(code) => assert!(seen.insert(code)),
                Allocation::Exhausted { attempts } => panic!("exhausted after {attempts}"),
            }
        }
        assert_eq!(used.len(), 500);
    }

    #[rstest]
    fn finds_the_last_free_code(mut rng: ChaCha8Rng) {
        let space = CodeSpace::new(2).expect("width 2");
        let mut used = fill_except(&space, 7);
        let allocation = allocate_code(&mut rng, &space, &mut used, 100_000);
        assert_eq!(allocation, Allocation::Assigned(space.format(7).expect("07")));
        assert!(used.saturates(&space));
    }

    #[rstest]
    fn saturated_partition_reports_exhaustion(mut rng: ChaCha8Rng) {
        let space = CodeSpace::new(1).expect("width 1");
        let mut used: UsedCodes = (1..=9).map(|value| value.to_string()).collect();
        let allocation = allocate_code(&mut rng, &space, &mut used, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(allocation, Allocation::Exhausted { attempts: 0 });
        assert_eq!(used.len(), 9);
    }

    #[rstest]
    fn attempt_bound_is_respected(mut rng: ChaCha8Rng) {
        let space = CodeSpace::new(2).expect("width 2");
        let mut used = fill_except(&space, 50);
        let allocation = allocate_code(&mut rng, &space, &mut used, 0);
        assert_eq!(allocation, Allocation::Exhausted { attempts: 0 });
        assert!(!used.contains(&space.format(50).expect("50")));
    }

    #[rstest]
    fn malformed_legacy_codes_do_not_count_towards_saturation() {
        let space = CodeSpace::new(1).expect("width 1");
        let used: UsedCodes = ["1", "2", "3", "4", "5", "6", "7", "8", "08"]
            .into_iter()
            .collect();
        assert_eq!(used.len(), 9);
        assert!(!used.saturates(&space));
    }
}
