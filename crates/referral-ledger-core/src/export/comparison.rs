//! Multi-doctor comparison report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{display_date, AnalyticsView, ComparisonSummary, DateRange, DoctorStats};

use super::{csv_line, format_amount, rows_digest, ReportMetadata};

/// One doctor's line in the comparison report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReportRow {
    pub doctor_name: String,
    pub total_patients: usize,
    pub total_business: String,
    pub total_doctor_share: String,
}

/// Project comparison stats into report rows, preserving table order.
pub fn comparison_report_rows(stats: &[DoctorStats]) -> Vec<ComparisonReportRow> {
    stats
        .iter()
        .map(|s| ComparisonReportRow {
            doctor_name: s.doctor_name.clone(),
            total_patients: s.total_patients,
            total_business: format_amount(s.total_business),
            total_doctor_share: format_amount(s.total_doctor_share),
        })
        .collect()
}

/// The analytics dashboard as a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub metadata: ReportMetadata,
    /// Highlighted doctor, printed above the full table
    pub selected: Option<ComparisonReportRow>,
    pub rows: Vec<ComparisonReportRow>,
    pub summary: ComparisonSummary,
}

impl ComparisonReport {
    /// Build from a computed dashboard view; rows follow its sort order.
    pub fn build(
        view: &AnalyticsView,
        range: &DateRange,
        today: NaiveDate,
        currency: &str,
    ) -> Result<Self, serde_json::Error> {
        let rows = comparison_report_rows(&view.comparison);
        let selected = view
            .selected
            .as_ref()
            .and_then(|s| comparison_report_rows(std::slice::from_ref(s)).pop());

        Ok(Self {
            metadata: ReportMetadata {
                title: "Doctor Analytics Report".to_string(),
                file_stem: "doctor_analytics".to_string(),
                date_range: range.caption("All Time"),
                generated_on: display_date(today),
                currency: currency.to_string(),
                row_count: rows.len(),
                rows_digest: rows_digest(&rows)?,
                exported_at: chrono::Utc::now().to_rfc3339(),
            },
            selected,
            rows,
            summary: view.summary,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let cur = &self.metadata.currency;
        let mut csv = csv_line(&[
            "Doctor",
            "Total Patients",
            &format!("Total Business ({})", cur),
            &format!("Total Doctor Share ({})", cur),
        ]);

        for row in &self.rows {
            csv.push_str(&csv_line(&[
                &row.doctor_name,
                &row.total_patients.to_string(),
                &row.total_business,
                &row.total_doctor_share,
            ]));
        }

        csv
    }
}
