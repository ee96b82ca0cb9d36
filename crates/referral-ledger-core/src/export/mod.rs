//! Report exports for the document generator.
//!
//! Row construction is a pure projection of already filtered records; the
//! report types add headers, summaries and a digest, and serialize to JSON
//! or CSV.

mod comparison;
mod doctor;

pub use comparison::*;
pub use doctor::*;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Report metadata shared by every export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Heading printed on the document
    pub title: String,
    /// Suggested file name without extension
    pub file_stem: String,
    /// Date-range caption, e.g. `From 1/1/2024 to 1/31/2024`
    pub date_range: String,
    /// Day the report was generated (`M/D/YYYY`)
    pub generated_on: String,
    /// Currency label for monetary columns
    pub currency: String,
    pub row_count: usize,
    /// SHA-256 of the JSON-serialized rows
    pub rows_digest: String,
    /// Export timestamp
    pub exported_at: String,
}

/// Format a monetary amount with exactly two decimals.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Suggested file stem: every whitespace run in the doctor's name, leading
/// and trailing ones included, becomes a single `_`.
pub fn report_file_stem(doctor_name: &str, suffix: &str) -> String {
    let mut stem = String::with_capacity(doctor_name.len() + suffix.len() + 1);
    let mut in_space = false;
    for c in doctor_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    stem.push('_');
    stem.push_str(suffix);
    stem
}

/// SHA-256 hex digest of the rows' JSON form.
pub fn rows_digest<T: Serialize>(rows: &[T]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(rows)?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_line(cells: &[&str]) -> String {
    let mut line = cells
        .iter()
        .map(|cell| escape_csv(cell))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}
