//! Patient billing record models.
//!
//! Records arrive from the store as loosely typed documents. Monetary fields
//! go through [`lenient_amount`] so that missing, `null` or non-numeric values
//! become `0` instead of failing the whole snapshot, and `age` is accepted as
//! either text or a number.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single patient billing record, scoped to one doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    /// Store-assigned record ID
    pub id: String,
    /// Owning doctor ID
    #[serde(default, alias = "doctorId")]
    pub doctor_id: String,
    /// Patient name
    #[serde(default)]
    pub name: String,
    /// Patient age (free text as entered)
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: String,
    /// Test description
    #[serde(default)]
    pub test: String,
    /// Billed total
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: f64,
    /// Discount granted
    #[serde(default, deserialize_with = "lenient_amount")]
    pub discount: f64,
    /// Amount received
    #[serde(default, deserialize_with = "lenient_amount")]
    pub received: f64,
    /// Doctor's share of the received amount
    #[serde(default, alias = "doctorShare", deserialize_with = "lenient_amount")]
    pub doctor_share: f64,
    /// Calendar day as stored (normally `YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    /// Administrator who created the record
    #[serde(default, alias = "author_uid", alias = "authorId")]
    pub author_id: String,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: String,
}

impl PatientRecord {
    /// Parse the stored date; `None` when it is not a valid calendar day.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_record_date(&self.date)
    }
}

/// Parse a stored record date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps. Timestamps keep the calendar day they were written with.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Format a day the way the store keeps it.
pub fn format_record_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Store timestamp for "now": RFC 3339, UTC, fixed nanosecond width so
/// that timestamps order correctly as strings.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// An amount in whole paisa (hundredths), rounded half away from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Render minor units back as a plain amount: no decimals when whole,
/// otherwise exactly two.
pub fn format_minor_units(units: i64) -> String {
    if units % 100 == 0 {
        (units / 100).to_string()
    } else {
        let sign = if units < 0 { "-" } else { "" };
        let abs = units.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Coerce a document value into an amount: numbers and numeric strings pass,
/// everything else (including non-finite values) becomes `0`.
pub fn coerce_amount(value: &Value) -> f64 {
    let amount = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
