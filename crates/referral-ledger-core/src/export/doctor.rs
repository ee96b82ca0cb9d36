//! Per-doctor reports: the overall patient report and the doctor-share
//! statement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{display_date, sort_by_date_desc, totals, DateRange, Totals};
use crate::models::{Doctor, PatientRecord};

use super::{csv_line, format_amount, report_file_stem, rows_digest, ReportMetadata};

/// One line of the overall patient report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub name: String,
    pub age: String,
    pub test: String,
    pub total: String,
    pub received: String,
    pub discount: String,
    pub doctor_share: String,
    /// `M/D/YYYY`, empty when the stored date is unparseable
    pub date: String,
}

/// One line of the doctor-share statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRow {
    pub name: String,
    pub test: String,
    pub doctor_share: String,
}

/// Project records into overall-report rows, preserving order.
pub fn report_rows(records: &[PatientRecord]) -> Vec<ReportRow> {
    records
        .iter()
        .map(|r| ReportRow {
            name: r.name.clone(),
            age: r.age.clone(),
            test: r.test.clone(),
            total: format_amount(r.total),
            received: format_amount(r.received),
            discount: format_amount(r.discount),
            doctor_share: format_amount(r.doctor_share),
            date: r.parsed_date().map(display_date).unwrap_or_default(),
        })
        .collect()
}

/// Project records into doctor-share rows, preserving order.
pub fn share_rows(records: &[PatientRecord]) -> Vec<ShareRow> {
    records
        .iter()
        .map(|r| ShareRow {
            name: r.name.clone(),
            test: r.test.clone(),
            doctor_share: format_amount(r.doctor_share),
        })
        .collect()
}

/// Copy and order records most recent first.
fn date_sorted(records: &[PatientRecord]) -> Vec<PatientRecord> {
    let mut sorted = records.to_vec();
    sort_by_date_desc(&mut sorted);
    sorted
}

/// Every column of every filtered record, plus a totals summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallReport {
    pub metadata: ReportMetadata,
    pub doctor_id: String,
    pub doctor_name: String,
    pub rows: Vec<ReportRow>,
    pub summary: Totals,
}

impl OverallReport {
    /// Build from records that already passed the date filter.
    pub fn build(
        doctor: &Doctor,
        filtered: &[PatientRecord],
        range: &DateRange,
        today: NaiveDate,
        currency: &str,
    ) -> Result<Self, serde_json::Error> {
        let sorted = date_sorted(filtered);
        let rows = report_rows(&sorted);

        Ok(Self {
            metadata: ReportMetadata {
                title: format!("Patient Records for {}", doctor.name),
                file_stem: report_file_stem(&doctor.name, "Overall_Patient_Report"),
                date_range: range.caption("All Records"),
                generated_on: display_date(today),
                currency: currency.to_string(),
                row_count: rows.len(),
                rows_digest: rows_digest(&rows)?,
                exported_at: chrono::Utc::now().to_rfc3339(),
            },
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            summary: totals(&sorted),
            rows,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, with a trailing totals line.
    pub fn to_csv(&self) -> String {
        let cur = &self.metadata.currency;
        let mut csv = csv_line(&[
            "Patient Name",
            "Age",
            "Test",
            &format!("Total ({})", cur),
            &format!("Received ({})", cur),
            &format!("Discount ({})", cur),
            &format!("Doctor Share ({})", cur),
            "Date",
        ]);

        for row in &self.rows {
            csv.push_str(&csv_line(&[
                &row.name,
                &row.age,
                &row.test,
                &row.total,
                &row.received,
                &row.discount,
                &row.doctor_share,
                &row.date,
            ]));
        }

        csv.push_str(&csv_line(&[
            "Summary",
            "",
            "",
            &format_amount(self.summary.total),
            &format_amount(self.summary.received),
            &format_amount(self.summary.discount),
            &format_amount(self.summary.doctor_share),
            "",
        ]));

        csv
    }
}

/// What the doctor is owed for the filtered period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareReport {
    pub metadata: ReportMetadata,
    pub doctor_id: String,
    pub doctor_name: String,
    pub rows: Vec<ShareRow>,
    pub total_doctor_share: f64,
}

impl ShareReport {
    /// Build from records that already passed the date filter.
    pub fn build(
        doctor: &Doctor,
        filtered: &[PatientRecord],
        range: &DateRange,
        today: NaiveDate,
        currency: &str,
    ) -> Result<Self, serde_json::Error> {
        let sorted = date_sorted(filtered);
        let rows = share_rows(&sorted);

        Ok(Self {
            metadata: ReportMetadata {
                title: format!("Share to Doctor: {}", doctor.name),
                file_stem: report_file_stem(&doctor.name, "Doctor_Share_Report"),
                date_range: range.caption("All Records"),
                generated_on: display_date(today),
                currency: currency.to_string(),
                row_count: rows.len(),
                rows_digest: rows_digest(&rows)?,
                exported_at: chrono::Utc::now().to_rfc3339(),
            },
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            total_doctor_share: totals(&sorted).doctor_share,
            rows,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, with a trailing total line.
    pub fn to_csv(&self) -> String {
        let mut csv = csv_line(&[
            "Patient Name",
            "Test",
            &format!("Doctor Share ({})", self.metadata.currency),
        ]);

        for row in &self.rows {
            csv.push_str(&csv_line(&[&row.name, &row.test, &row.doctor_share]));
        }

        csv.push_str(&csv_line(&[
            "Total Doctor Share",
            "",
            &format_amount(self.total_doctor_share),
        ]));

        csv
    }
}
