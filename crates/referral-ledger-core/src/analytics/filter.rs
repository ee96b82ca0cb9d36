//! Date-range filtering of record snapshots.

use serde::{Deserialize, Serialize};

use crate::models::PatientRecord;

use super::DateRange;

/// Records that passed the filter, plus how many were dropped for an
/// unparseable date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub records: Vec<PatientRecord>,
    pub dropped_malformed: usize,
}

/// Keep records whose date parses and falls inside `range`.
///
/// Input order is preserved, but callers should not rely on it.
pub fn filter_records(records: &[PatientRecord], range: &DateRange) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for record in records {
        match record.parsed_date() {
            Some(day) if range.contains(day) => outcome.records.push(record.clone()),
            Some(_) => {}
            None => outcome.dropped_malformed += 1,
        }
    }

    if outcome.dropped_malformed > 0 {
        tracing::debug!(
            dropped = outcome.dropped_malformed,
            "Excluded records with unparseable dates"
        );
    }

    outcome
}
