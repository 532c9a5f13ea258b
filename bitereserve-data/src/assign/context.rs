//! Mutable state threaded through one assignment pass.

use std::collections::HashMap;
use std::time::Duration;

use bitereserve_core::{CountryCode, RestaurantRecord};
use bitereserve_regions::Resolution;
use rand::Rng;

use super::{AssignOptions, RecordError, RecordOutcome};
use crate::cache::CodeCache;
use crate::report::{AssignmentReport, FailedRecord, UnresolvedRecord};

/// Random source, code cache and counters for a single run.
#[derive(Debug)]
pub struct RunContext<R> {
    pub(crate) rng: R,
    pub(crate) cache: CodeCache,
    pub(crate) report: AssignmentReport,
    assigned: HashMap<CountryCode, usize>,
    processed: usize,
    progress_every: usize,
    pause_every: usize,
    pause: Duration,
}

impl<R: Rng> RunContext<R> {
    /// Start a run with an empty cache.
    pub fn new(rng: R, options: &AssignOptions) -> Self {
        Self {
            rng,
            cache: CodeCache::new(options.page_size),
            report: AssignmentReport {
                dry_run: options.dry_run,
                ..AssignmentReport::default()
            },
            assigned: HashMap::new(),
            processed: 0,
            progress_every: options.progress_every,
            pause_every: options.pause_every,
            pause: options.pause,
        }
    }

    /// Count the outcome of a record whose country was resolved.
    pub fn record_outcome(
        &mut self,
        record: &RestaurantRecord,
        resolution: Resolution,
        outcome: Result<RecordOutcome, RecordError>,
    ) {
        *self
            .report
            .resolved_by
            .entry(resolution.source.as_str())
            .or_default() += 1;
        match outcome {
            Ok(RecordOutcome::Assigned { country, code }) => {
                let verb = if self.report.dry_run {
                    "would assign"
                } else {
                    "assigned"
                };
                log::info!(
                    "{verb} {country}/{code} to restaurant {} (via {})",
                    record.id,
                    resolution.source
                );
                self.report.updated += 1;
                *self.assigned.entry(country).or_default() += 1;
            }
            Ok(RecordOutcome::Skipped) => self.report.skipped += 1,
            Err(err) => {
                log::error!("restaurant {}: {err}", record.id);
                self.report.errors += 1;
                self.report.failures.push(FailedRecord {
                    id: record.id.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    /// Count a record no strategy could place.
    pub fn record_unresolved(&mut self, record: &RestaurantRecord) {
        self.report.unresolved.push(UnresolvedRecord {
            id: record.id.clone(),
            name: record.name.clone(),
            hint: record.location_hint(),
        });
    }

    /// Log progress and pause at the configured intervals.
    pub async fn after_record(&mut self) {
        self.processed += 1;
        if self.progress_every > 0 && self.processed.is_multiple_of(self.progress_every) {
            self.log_progress();
        }
        if self.pause_every > 0
            && !self.pause.is_zero()
            && self.processed.is_multiple_of(self.pause_every)
        {
            tokio::time::sleep(self.pause).await;
        }
    }

    /// Emit a progress line with the running totals.
    pub fn log_progress(&self) {
        log::info!(
            "processed {}/{} uncoded restaurants: {} updated, {} unresolved, {} errors",
            self.processed,
            self.report.needing_codes,
            self.report.updated,
            self.report.unresolved.len(),
            self.report.errors
        );
    }

    /// Number of records that needed a code and were visited.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.processed
    }

    /// Close the run and produce its report.
    #[must_use]
    pub fn finish(self) -> AssignmentReport {
        let mut report = self.report;
        report.set_country_counts(self.assigned);
        report
    }
}
