//! Monthly visit buckets and chart series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::PatientRecord;

use super::DoctorStats;

/// `YYYY-MM` key for a day.
pub fn month_key(day: NaiveDate) -> String {
    format!("{:04}-{:02}", day.year(), day.month())
}

/// Count records per month of their own date.
///
/// Expects records that already passed [`super::filter_records`]; an
/// unparseable date is skipped rather than counted.
pub fn bucket_by_month(records: &[PatientRecord]) -> BTreeMap<String, u32> {
    let mut buckets = BTreeMap::new();
    for day in records.iter().filter_map(PatientRecord::parsed_date) {
        *buckets.entry(month_key(day)).or_insert(0) += 1;
    }
    buckets
}

/// Union of month keys across `stats`, ascending.
pub fn month_axis(stats: &[DoctorStats]) -> Vec<String> {
    stats
        .iter()
        .flat_map(|s| s.monthly_counts.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One bar series for the monthly referrals chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub doctor_id: String,
    pub label: String,
    /// Counts aligned with the month axis, zero-filled
    pub counts: Vec<u32>,
}

/// Build chart series over `axis`. With a selected doctor only that doctor's
/// series is produced.
pub fn chart_series(stats: &[DoctorStats], axis: &[String], selected: Option<&str>) -> Vec<ChartSeries> {
    stats
        .iter()
        .filter(|s| selected.map_or(true, |id| s.doctor_id == id))
        .map(|s| ChartSeries {
            doctor_id: s.doctor_id.clone(),
            label: s.doctor_name.clone(),
            counts: axis
                .iter()
                .map(|month| s.monthly_counts.get(month).copied().unwrap_or(0))
                .collect(),
        })
        .collect()
}
