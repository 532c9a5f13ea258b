//! The batch assignment pass.
//!
//! Responsibilities:
//! - List every restaurant, then visit each one lacking a code.
//! - Resolve its country, allocate a partition-unique code and persist both
//!   fields in one guarded update.
//! - Convert per-record failures into report entries; only a failed listing
//!   aborts the run.
//!
//! Invariants:
//! - A record with both fields present is never written.
//! - Codes are reserved in the run's cache before they are persisted.
//!
//! Running two passes against one store at the same time is unsafe: both may
//! reserve the same code for the same country before either writes.

use std::time::Duration;

use bitereserve_core::{
    Allocation, AssignOutcome, BookingCode, CodeSpace, CountryCode, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_PAGE_SIZE, RestaurantId, RestaurantRecord, RestaurantStore, StoreError,
    allocate_code,
};
use bitereserve_regions::{CountryResolver, Resolution};
use rand::Rng;
use thiserror::Error;

use crate::report::AssignmentReport;
use crate::store::list_all_restaurants;

mod context;

pub use context::RunContext;

/// Records processed between politeness pauses by default.
pub const DEFAULT_PAUSE_EVERY: usize = 50;
/// Default politeness pause.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);
/// Records processed between progress lines by default.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// Tuning for one assignment pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOptions {
    /// Width and range of generated codes.
    pub code_space: CodeSpace,
    /// Draws allowed per record before reporting exhaustion.
    pub max_attempts: u32,
    /// Rows requested per page when listing and loading partitions.
    pub page_size: usize,
    /// Pause after this many processed records; zero disables pacing.
    pub pause_every: usize,
    /// Length of each pause.
    pub pause: Duration,
    /// Log progress after this many processed records; zero logs only the
    /// final line.
    pub progress_every: usize,
    /// Resolve and allocate without writing.
    pub dry_run: bool,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            code_space: CodeSpace::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            page_size: DEFAULT_PAGE_SIZE,
            pause_every: DEFAULT_PAUSE_EVERY,
            pause: DEFAULT_PAUSE,
            progress_every: DEFAULT_PROGRESS_EVERY,
            dry_run: false,
        }
    }
}

/// Errors that stop a pass before any record is processed.
#[derive(Debug, Error)]
pub enum AssignError {
    /// The restaurant listing could not be read.
    #[error("failed to list restaurants: {source}")]
    ListRestaurants {
        /// Store failure.
        #[source]
        source: StoreError,
    },
}

/// Failure confined to a single record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The pre-write re-read failed.
    #[error("failed to re-read restaurant {id}: {source}")]
    Verify {
        /// Record identifier.
        id: RestaurantId,
        /// Store failure.
        #[source]
        source: StoreError,
    },
    /// The country's used codes could not be loaded.
    #[error("failed to load codes used in {country}: {source}")]
    LoadPartition {
        /// Partition key.
        country: CountryCode,
        /// Store failure.
        #[source]
        source: StoreError,
    },
    /// No free code was found within the attempt bound.
    #[error("no free code in {country} after {attempts} draw(s)")]
    Exhausted {
        /// Partition key.
        country: CountryCode,
        /// Draws made.
        attempts: u32,
    },
    /// The guarded update failed.
    #[error("failed to persist {country}/{code}: {source}")]
    Persist {
        /// Partition key.
        country: CountryCode,
        /// Code that was reserved.
        code: BookingCode,
        /// Store failure.
        #[source]
        source: StoreError,
    },
}

/// Result of visiting one record that needed a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Both fields were written (or would be, in a dry run).
    Assigned {
        /// Resolved country.
        country: CountryCode,
        /// Allocated code.
        code: BookingCode,
    },
    /// The record turned out to be coded already or no longer exists.
    Skipped,
}

/// Assign codes to every uncoded restaurant in `store`.
///
/// Only a failure to list restaurants is returned as an error; everything
/// else is counted in the report.
pub async fn run_assignment<S, R>(
    store: &S,
    resolver: &CountryResolver,
    options: &AssignOptions,
    rng: R,
) -> Result<AssignmentReport, AssignError>
where
    S: RestaurantStore + ?Sized,
    R: Rng,
{
    let records = list_all_restaurants(store, options.page_size)
        .await
        .map_err(|source| AssignError::ListRestaurants { source })?;
    log::info!("listed {} restaurants", records.len());

    let mut run = RunContext::new(rng, options);
    for record in records {
        run.report.total_seen += 1;
        if record.is_complete() {
            run.report.skipped += 1;
            continue;
        }
        if record.has_code() {
            log::warn!(
                "restaurant {} has code {:?} but no country; leaving it for audit",
                record.id,
                record.bitereserve_code.as_deref().unwrap_or_default()
            );
            run.report.skipped += 1;
            continue;
        }

        run.report.needing_codes += 1;
        match resolver.resolve(&record) {
            Some(resolution) => {
                let outcome = commit_record(store, &mut run, &record, &resolution, options).await;
                run.record_outcome(&record, resolution, outcome);
            }
            None => {
                log::warn!(
                    "could not resolve a country for restaurant {} ({})",
                    record.id,
                    record.location_hint().as_deref().unwrap_or("no location hint")
                );
                run.record_unresolved(&record);
            }
        }
        run.after_record().await;
    }

    run.log_progress();
    Ok(run.finish())
}

/// Re-verify, allocate and persist one record.
pub async fn commit_record<S, R>(
    store: &S,
    run: &mut RunContext<R>,
    record: &RestaurantRecord,
    resolution: &Resolution,
    options: &AssignOptions,
) -> Result<RecordOutcome, RecordError>
where
    S: RestaurantStore + ?Sized,
    R: Rng,
{
    let fresh = store
        .fetch_restaurant(&record.id)
        .await
        .map_err(|source| RecordError::Verify {
            id: record.id.clone(),
            source,
        })?;
    match fresh {
        Some(current) if !current.has_code() => {}
        Some(_) => {
            log::debug!("restaurant {} was coded since listing", record.id);
            return Ok(RecordOutcome::Skipped);
        }
        None => {
            log::debug!("restaurant {} disappeared since listing", record.id);
            return Ok(RecordOutcome::Skipped);
        }
    }

    let country = resolution.code.clone();
    let used = run
        .cache
        .partition(store, &country)
        .await
        .map_err(|source| RecordError::LoadPartition {
            country: country.clone(),
            source,
        })?;
    let code = match allocate_code(&mut run.rng, &options.code_space, used, options.max_attempts) {
        Allocation::Assigned(code) => code,
        Allocation::Exhausted { attempts } => {
            return Err(RecordError::Exhausted { country, attempts });
        }
    };

    if options.dry_run {
        return Ok(RecordOutcome::Assigned { country, code });
    }

    match store.assign_code(&record.id, &country, &code).await {
        Ok(AssignOutcome::Updated) => Ok(RecordOutcome::Assigned { country, code }),
        Ok(AssignOutcome::AlreadyAssigned) | Err(StoreError::MissingRow { .. }) => {
            log::debug!("guarded update for restaurant {} matched no row", record.id);
            Ok(RecordOutcome::Skipped)
        }
        Err(source) => Err(RecordError::Persist {
            country,
            code,
            source,
        }),
    }
}
