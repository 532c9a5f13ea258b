//! Read-only consistency scan over stored assignments.
//!
//! The audit never writes. It checks that codes are unique within each
//! country partition and flags stored values the assignment pass would not
//! have produced.

use std::collections::BTreeMap;
use std::fmt;

use bitereserve_core::{
    CodeSpace, CountryCode, DEFAULT_PAGE_SIZE, RestaurantId, RestaurantRecord, RestaurantStore,
    StoreError,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::list_all_restaurants;

/// Inputs to an audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOptions {
    /// Expected shape of stored codes.
    pub code_space: CodeSpace,
    /// Rows requested per listing page.
    pub page_size: usize,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            code_space: CodeSpace::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Errors that prevent an audit from completing.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The restaurant listing could not be read.
    #[error("failed to list restaurants for audit: {source}")]
    ListRestaurants {
        /// Store failure.
        #[source]
        source: StoreError,
    },
}

/// Coded records in one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionCount {
    /// Stored country value.
    pub country: String,
    /// Records carrying a code under it.
    pub coded: usize,
}

/// A code shared by several records of one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateCode {
    /// Stored country value.
    pub country: String,
    /// Shared code.
    pub code: String,
    /// Records holding it, in listing order.
    pub ids: Vec<RestaurantId>,
}

/// A stored value that fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidValue {
    /// Record identifier.
    pub id: RestaurantId,
    /// Offending stored value.
    pub value: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Findings of an audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Records listed.
    pub total_seen: usize,
    /// Records with both fields set.
    pub complete: usize,
    /// Records with neither field set.
    pub uncoded: usize,
    /// Coded records per stored country, by country.
    pub by_country: Vec<PartitionCount>,
    /// Codes used more than once within a partition.
    pub duplicates: Vec<DuplicateCode>,
    /// Codes that do not fit the configured code space.
    pub malformed_codes: Vec<InvalidValue>,
    /// Country values that are not ISO alpha-2 shaped.
    pub invalid_countries: Vec<InvalidValue>,
    /// Records with exactly one of the two fields set.
    pub half_coded: Vec<RestaurantId>,
}

impl AuditReport {
    /// Whether the uniqueness invariant is violated anywhere.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// Audit `records` against `space`.
#[must_use]
pub fn audit_records(records: &[RestaurantRecord], space: &CodeSpace) -> AuditReport {
    let mut report = AuditReport {
        total_seen: records.len(),
        ..AuditReport::default()
    };
    let mut partitions: BTreeMap<String, BTreeMap<String, Vec<RestaurantId>>> = BTreeMap::new();

    for record in records {
        if record.is_half_coded() {
            report.half_coded.push(record.id.clone());
        }
        if let Some(country) = present(record.country_code.as_deref()) {
            if let Err(err) = CountryCode::new(country) {
                report.invalid_countries.push(InvalidValue {
                    id: record.id.clone(),
                    value: country.to_owned(),
                    reason: err.to_string(),
                });
            }
        }
        if let Some(code) = present(record.bitereserve_code.as_deref()) {
            if let Err(err) = space.parse(code) {
                report.malformed_codes.push(InvalidValue {
                    id: record.id.clone(),
                    value: code.to_owned(),
                    reason: err.to_string(),
                });
            }
        }

        if !record.is_complete() {
            if !record.has_code() && present(record.country_code.as_deref()).is_none() {
                report.uncoded += 1;
            }
            continue;
        }
        report.complete += 1;
        if let (Some(country), Some(code)) = (
            present(record.country_code.as_deref()),
            present(record.bitereserve_code.as_deref()),
        ) {
            partitions
                .entry(country.to_owned())
                .or_default()
                .entry(code.to_owned())
                .or_default()
                .push(record.id.clone());
        }
    }

    for (country, codes) in partitions {
        report.by_country.push(PartitionCount {
            country: country.clone(),
            coded: codes.values().map(Vec::len).sum(),
        });
        for (code, ids) in codes {
            if ids.len() > 1 {
                log::warn!("code {country}/{code} is shared by {} restaurants", ids.len());
                report.duplicates.push(DuplicateCode {
                    country: country.clone(),
                    code,
                    ids,
                });
            }
        }
    }
    report
}

/// List every restaurant in `store` and audit it.
pub async fn run_audit<S>(store: &S, options: &AuditOptions) -> Result<AuditReport, AuditError>
where
    S: RestaurantStore + ?Sized,
{
    let records = list_all_restaurants(store, options.page_size)
        .await
        .map_err(|source| AuditError::ListRestaurants { source })?;
    log::info!("auditing {} restaurants", records.len());
    Ok(audit_records(&records, &options.code_space))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BiteReserve code audit")?;
        writeln!(f, "  records seen:       {}", self.total_seen)?;
        writeln!(f, "  complete:           {}", self.complete)?;
        writeln!(f, "  uncoded:            {}", self.uncoded)?;
        writeln!(f, "  half coded:         {}", self.half_coded.len())?;
        writeln!(f, "  duplicate codes:    {}", self.duplicates.len())?;
        writeln!(f, "  malformed codes:    {}", self.malformed_codes.len())?;
        writeln!(f, "  invalid countries:  {}", self.invalid_countries.len())?;
        if !self.by_country.is_empty() {
            writeln!(f, "Coded per country:")?;
            for row in &self.by_country {
                writeln!(f, "  {}  {}", row.country, row.coded)?;
            }
        }
        if !self.duplicates.is_empty() {
            writeln!(f, "Duplicate codes:")?;
            for duplicate in &self.duplicates {
                let ids: Vec<&str> = duplicate.ids.iter().map(RestaurantId::as_str).collect();
                writeln!(
                    f,
                    "  {}/{}  {}",
                    duplicate.country,
                    duplicate.code,
                    ids.join(", ")
                )?;
            }
        }
        for (title, values) in [
            ("Malformed codes:", &self.malformed_codes),
            ("Invalid countries:", &self.invalid_countries),
        ] {
            if values.is_empty() {
                continue;
            }
            writeln!(f, "{title}")?;
            for value in values {
                writeln!(f, "  {}  {:?}  {}", value.id, value.value, value.reason)?;
            }
        }
        if !self.half_coded.is_empty() {
            let ids: Vec<&str> = self.half_coded.iter().map(RestaurantId::as_str).collect();
            writeln!(f, "Half-coded records: {}", ids.join(", "))?;
        }
        Ok(())
    }
}
