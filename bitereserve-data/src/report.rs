//! Run summaries rendered as text or JSON.

use std::collections::BTreeMap;
use std::fmt;

use bitereserve_core::{CountryCode, RestaurantId};
use serde::Serialize;

/// Newly assigned codes for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    /// Partition key.
    pub country: CountryCode,
    /// Codes assigned during the run.
    pub assigned: usize,
}

/// A record no strategy could place in a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedRecord {
    /// Record identifier.
    pub id: RestaurantId,
    /// Display name, when known.
    pub name: Option<String>,
    /// Location hint that failed to resolve.
    pub hint: Option<String>,
}

/// A record that failed during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecord {
    /// Record identifier.
    pub id: RestaurantId,
    /// Rendered error.
    pub error: String,
}

/// Final summary of an assignment run.
///
/// `updated` counts would-be updates when `dry_run` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentReport {
    /// Whether writes were suppressed.
    pub dry_run: bool,
    /// Records listed.
    pub total_seen: usize,
    /// Records without a code.
    pub needing_codes: usize,
    /// Records that received a code.
    pub updated: usize,
    /// Records left alone because they were already coded.
    pub skipped: usize,
    /// Records that failed with an error.
    pub errors: usize,
    /// Records whose country could not be resolved.
    pub unresolved: Vec<UnresolvedRecord>,
    /// Details of each failed record.
    pub failures: Vec<FailedRecord>,
    /// Assignments per country, largest first.
    pub by_country: Vec<CountryCount>,
    /// Resolutions per strategy.
    pub resolved_by: BTreeMap<&'static str, usize>,
}

impl AssignmentReport {
    /// Replace `by_country` with `counts`, sorted by count descending then
    /// by country code.
    pub fn set_country_counts<I>(&mut self, counts: I)
    where
        I: IntoIterator<Item = (CountryCode, usize)>,
    {
        let mut rows: Vec<CountryCount> = counts
            .into_iter()
            .map(|(country, assigned)| CountryCount { country, assigned })
            .collect();
        rows.sort_by(|left, right| {
            right
                .assigned
                .cmp(&left.assigned)
                .then_with(|| left.country.cmp(&right.country))
        });
        self.by_country = rows;
    }

    /// Assignments recorded for `country`.
    #[must_use]
    pub fn assigned_in(&self, country: &str) -> usize {
        self.by_country
            .iter()
            .find(|row| row.country.as_str() == country)
            .map_or(0, |row| row.assigned)
    }
}

impl fmt::Display for AssignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        writeln!(f, "BiteReserve code assignment{mode}")?;
        writeln!(f, "  records seen:   {}", self.total_seen)?;
        writeln!(f, "  needing codes:  {}", self.needing_codes)?;
        writeln!(f, "  updated:        {}", self.updated)?;
        writeln!(f, "  skipped:        {}", self.skipped)?;
        writeln!(f, "  unresolved:     {}", self.unresolved.len())?;
        writeln!(f, "  errors:         {}", self.errors)?;
        if !self.by_country.is_empty() {
            writeln!(f, "Assigned per country:")?;
            for row in &self.by_country {
                writeln!(f, "  {}  {}", row.country, row.assigned)?;
            }
        }
        if !self.unresolved.is_empty() {
            writeln!(f, "Unresolved records:")?;
            for record in &self.unresolved {
                write!(f, "  {}", record.id)?;
                if let Some(name) = &record.name {
                    write!(f, "  {name}")?;
                }
                match &record.hint {
                    Some(hint) => writeln!(f, "  [{hint}]")?,
                    None => writeln!(f, "  [no location hint]")?,
                }
            }
        }
        if !self.failures.is_empty() {
            writeln!(f, "Failed records:")?;
            for failure in &self.failures {
                writeln!(f, "  {}  {}", failure.id, failure.error)?;
            }
        }
        Ok(())
    }
}
