//! Inclusive day ranges.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Optional start and end day, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// No bounds.
    pub fn all_time() -> Self {
        Self::default()
    }

    pub fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// First through last day of the month containing `today`.
    pub fn current_month(today: NaiveDate) -> Self {
        let start = today.with_day(1);
        let end = start
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .and_then(|next| next.pred_opt());
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Start bound normalized to 00:00:00.000.
    pub fn normalized_start(&self) -> Option<NaiveDateTime> {
        self.start.map(|day| day.and_time(NaiveTime::MIN))
    }

    /// End bound normalized to 23:59:59.999.
    pub fn normalized_end(&self) -> Option<NaiveDateTime> {
        self.end.and_then(|day| day.and_hms_milli_opt(23, 59, 59, 999))
    }

    /// Whether a record dated `day` falls inside the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        let at = day.and_time(NaiveTime::MIN);
        let after_start = self.normalized_start().map_or(true, |start| at >= start);
        let before_end = self.normalized_end().map_or(true, |end| at <= end);
        after_start && before_end
    }

    /// Human caption for report headers, e.g. `From 1/1/2024 to End`.
    pub fn caption(&self, unbounded_label: &str) -> String {
        if self.is_unbounded() {
            return unbounded_label.to_string();
        }

        format!(
            "From {} to {}",
            self.start
                .map(display_date)
                .unwrap_or_else(|| "Start".to_string()),
            self.end
                .map(display_date)
                .unwrap_or_else(|| "End".to_string()),
        )
    }
}

/// US-style display date (`M/D/YYYY`).
pub fn display_date(day: NaiveDate) -> String {
    day.format("%-m/%-d/%Y").to_string()
}
