//! Record aggregation for the analytics dashboard and doctor detail views.
//!
//! Pipeline: Filter (date range) → Sort (date desc) → Bucket (YYYY-MM) → Totals
//!
//! Every function here is a pure function of its arguments. Callers pass a
//! fresh snapshot of fetched records on each change and get fresh view data
//! back; nothing is cached between calls.

mod filter;
mod monthly;
mod range;
mod sort;
mod totals;

pub use filter::*;
pub use monthly::*;
pub use range::*;
pub use sort::*;
pub use totals::*;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{Doctor, PatientRecord};

/// Per-doctor aggregate over a filtered record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorStats {
    pub doctor_id: String,
    pub doctor_name: String,
    /// `YYYY-MM` → visit count
    pub monthly_counts: BTreeMap<String, u32>,
    pub total_patients: usize,
    pub total_business: f64,
    pub total_doctor_share: f64,
}

impl DoctorStats {
    /// Aggregate records that already passed the date filter.
    pub fn compute(doctor: &Doctor, filtered: &[PatientRecord]) -> Self {
        let sums = totals(filtered);
        Self {
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            monthly_counts: bucket_by_month(filtered),
            total_patients: filtered.len(),
            total_business: sums.total,
            total_doctor_share: sums.doctor_share,
        }
    }
}

/// Inputs that select and order the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub range: DateRange,
    /// Restrict chart and record list to one doctor
    pub selected_doctor_id: Option<String>,
    pub sort: SortState,
}

/// Totals across every doctor in the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_patients: usize,
    pub totals: Totals,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsView {
    /// Comparison rows, ordered by the query's sort state
    pub comparison: Vec<DoctorStats>,
    /// The selected doctor's row, if one is selected and known
    pub selected: Option<DoctorStats>,
    /// Sorted union of month keys across all doctors
    pub months: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// Filtered records in scope, most recent first
    pub records: Vec<PatientRecord>,
    pub summary: ComparisonSummary,
    /// Records excluded for an unparseable date
    pub dropped_malformed: usize,
}

/// Build the dashboard view for `doctors`.
///
/// A doctor missing from `records_by_doctor` is treated as having no
/// records. Input order of `doctors` is the tie-break order for the
/// comparison table and the fetch order for the record list.
pub fn aggregate(
    doctors: &[Doctor],
    records_by_doctor: &HashMap<String, Vec<PatientRecord>>,
    query: &AnalyticsQuery,
) -> AnalyticsView {
    let selected_id = query.selected_doctor_id.as_deref();
    let mut comparison = Vec::with_capacity(doctors.len());
    let mut records = Vec::new();
    let mut in_scope_all = Vec::new();
    let mut dropped_malformed = 0;

    for doctor in doctors {
        let fetched = records_by_doctor
            .get(&doctor.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let outcome = filter_records(fetched, &query.range);
        dropped_malformed += outcome.dropped_malformed;

        comparison.push(DoctorStats::compute(doctor, &outcome.records));
        in_scope_all.extend(outcome.records.iter().cloned());
        if selected_id.map_or(true, |id| id == doctor.id) {
            records.extend(outcome.records);
        }
    }

    let months = month_axis(&comparison);
    let series = chart_series(&comparison, &months, selected_id);
    let selected = selected_id
        .and_then(|id| comparison.iter().find(|s| s.doctor_id == id))
        .cloned();

    sort_stats(&mut comparison, &query.sort);
    sort_by_date_desc(&mut records);

    let summary = ComparisonSummary {
        total_patients: in_scope_all.len(),
        totals: totals(&in_scope_all),
    };

    AnalyticsView {
        comparison,
        selected,
        months,
        series,
        records,
        summary,
        dropped_malformed,
    }
}

/// A single doctor's record view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorDetail {
    /// Filtered records, most recent first
    pub records: Vec<PatientRecord>,
    pub totals: Totals,
    pub monthly_counts: BTreeMap<String, u32>,
    pub dropped_malformed: usize,
}

/// Filter, sort and total one doctor's records.
pub fn doctor_detail(records: &[PatientRecord], range: &DateRange) -> DoctorDetail {
    let FilterOutcome {
        records: mut filtered,
        dropped_malformed,
    } = filter_records(records, range);
    sort_by_date_desc(&mut filtered);

    DoctorDetail {
        totals: totals(&filtered),
        monthly_counts: bucket_by_month(&filtered),
        records: filtered,
        dropped_malformed,
    }
}
