//! Financial totals over a record set.

use serde::{Deserialize, Serialize};

use crate::models::{to_minor_units, PatientRecord};

/// Summed monetary fields and the resulting balance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total: f64,
    pub discount: f64,
    pub received: f64,
    pub doctor_share: f64,
    /// `total - discount - received`
    pub due: f64,
}

/// How a balance should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Balance {
    /// Money still owed
    Outstanding(f64),
    /// More received than owed
    Overpaid(f64),
    Settled,
}

impl Totals {
    /// Classify `due` at currency precision; anything under half a paisa
    /// either way is settled.
    pub fn balance(&self) -> Balance {
        match to_minor_units(self.due) {
            units if units > 0 => Balance::Outstanding(self.due),
            units if units < 0 => Balance::Overpaid(-self.due),
            _ => Balance::Settled,
        }
    }
}

/// Sum every monetary field of `records`.
pub fn totals(records: &[PatientRecord]) -> Totals {
    let mut sums = records.iter().fold(Totals::default(), |mut acc, record| {
        acc.total += record.total;
        acc.discount += record.discount;
        acc.received += record.received;
        acc.doctor_share += record.doctor_share;
        acc
    });
    sums.due = sums.total - sums.discount - sums.received;
    sums
}
