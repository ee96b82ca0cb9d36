//! Pre-save validation for patient records.
//!
//! Rules run in a fixed order and the first failure is reported:
//! name, numeric parsing, then the amount ordering rules.

mod input;

pub use input::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{format_record_date, to_minor_units, PatientRecord};

/// Monetary field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountField {
    Total,
    Discount,
    Received,
    DoctorShare,
}

impl std::fmt::Display for AmountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AmountField::Total => "Total",
            AmountField::Discount => "Discount",
            AmountField::Received => "Received",
            AmountField::DoctorShare => "Doctor Share",
        };
        f.write_str(label)
    }
}

/// Validation errors. Nothing is saved when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Patient Name is required.")]
    EmptyName,

    #[error("{field} must be a valid non-negative number.")]
    NonNumericField { field: AmountField },

    #[error("Discount can't be greater than Total amount.")]
    DiscountExceedsTotal,

    #[error("Received amount can't be greater than Total amount.")]
    ReceivedExceedsTotal,

    #[error("Sum of Discount and Received can't exceed Total amount.")]
    DiscountPlusReceivedExceedsTotal,

    #[error("Doctor Share can't be greater than Received amount.")]
    DoctorShareExceedsReceived,

    #[error("Doctor Share can't be negative.")]
    NegativeDoctorShare,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// The four monetary values of a record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Amounts {
    pub total: f64,
    pub discount: f64,
    pub received: f64,
    pub doctor_share: f64,
}

impl Amounts {
    /// Amounts of a stored record.
    pub fn of(record: &PatientRecord) -> Self {
        Self {
            total: record.total,
            discount: record.discount,
            received: record.received,
            doctor_share: record.doctor_share,
        }
    }
}

/// A record that passed every rule and is ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRecord {
    pub name: String,
    pub age: String,
    pub test: String,
    pub amounts: Amounts,
    pub date: NaiveDate,
}

impl ValidatedRecord {
    /// Stamp store-side fields onto the validated values.
    pub fn into_record(
        self,
        id: String,
        doctor_id: String,
        author_id: String,
        created_at: String,
    ) -> PatientRecord {
        PatientRecord {
            id,
            doctor_id,
            name: self.name,
            age: self.age,
            test: self.test,
            total: self.amounts.total,
            discount: self.amounts.discount,
            received: self.amounts.received,
            doctor_share: self.amounts.doctor_share,
            date: format_record_date(self.date),
            author_id,
            created_at,
        }
    }
}

/// Parse an as-typed amount. Blank counts as zero; anything that is not a
/// finite, non-negative number is rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}

/// Validate a draft.
pub fn validate(input: &RecordInput) -> ValidationResult<ValidatedRecord> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let field = |raw: &str, field: AmountField| {
        parse_amount(raw).ok_or(ValidationError::NonNumericField { field })
    };

    let amounts = Amounts {
        total: field(&input.total, AmountField::Total)?,
        discount: field(&input.discount, AmountField::Discount)?,
        received: field(&input.received, AmountField::Received)?,
        doctor_share: field(&input.doctor_share, AmountField::DoctorShare)?,
    };

    check_amounts(&amounts)?;

    Ok(ValidatedRecord {
        name: name.to_string(),
        age: input.age.trim().to_string(),
        test: input.test.trim().to_string(),
        amounts,
        date: input.date,
    })
}

/// Apply the ordering rules to amounts that are already numeric.
///
/// Comparisons run on whole paisa so decimal input like `1000.30` is
/// compared exactly.
pub fn check_amounts(amounts: &Amounts) -> ValidationResult<()> {
    let total = to_minor_units(amounts.total);
    let discount = to_minor_units(amounts.discount);
    let received = to_minor_units(amounts.received);
    let doctor_share = to_minor_units(amounts.doctor_share);

    if discount > total {
        return Err(ValidationError::DiscountExceedsTotal);
    }
    if received > total {
        return Err(ValidationError::ReceivedExceedsTotal);
    }
    if discount + received > total {
        return Err(ValidationError::DiscountPlusReceivedExceedsTotal);
    }
    if doctor_share > received {
        return Err(ValidationError::DoctorShareExceedsReceived);
    }
    if doctor_share < 0 {
        return Err(ValidationError::NegativeDoctorShare);
    }

    Ok(())
}
