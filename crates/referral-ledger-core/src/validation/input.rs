//! Record entry drafts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{format_minor_units, to_minor_units, PatientRecord};

use super::parse_amount;

/// Raw, as-typed values for a patient record before validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordInput {
    pub name: String,
    pub age: String,
    pub test: String,
    pub total: String,
    pub discount: String,
    pub received: String,
    pub doctor_share: String,
    pub date: NaiveDate,
}

impl RecordInput {
    /// An empty draft for the given day.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            test: String::new(),
            total: String::new(),
            discount: String::new(),
            received: String::new(),
            doctor_share: String::new(),
            date,
        }
    }

    /// Pre-fill a draft from an existing record for editing.
    ///
    /// Returns `None` when the stored date cannot be parsed.
    pub fn from_record(record: &PatientRecord) -> Option<Self> {
        Some(Self {
            name: record.name.clone(),
            age: record.age.clone(),
            test: record.test.clone(),
            total: record.total.to_string(),
            discount: record.discount.to_string(),
            received: record.received.to_string(),
            doctor_share: record.doctor_share.to_string(),
            date: record.parsed_date()?,
        })
    }

    /// Set the total and re-derive the default received amount.
    pub fn set_total(&mut self, value: impl Into<String>) {
        self.total = value.into();
        self.derive_received();
    }

    /// Set the discount and re-derive the default received amount.
    pub fn set_discount(&mut self, value: impl Into<String>) {
        self.discount = value.into();
        self.derive_received();
    }

    /// `received = max(0, total - discount)` when both parse; otherwise the
    /// received field is left as it was.
    fn derive_received(&mut self) {
        if let (Some(total), Some(discount)) =
            (parse_amount(&self.total), parse_amount(&self.discount))
        {
            let units = (to_minor_units(total) - to_minor_units(discount)).max(0);
            self.received = format_minor_units(units);
        }
    }
}
