//! Record and comparison-table ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::PatientRecord;

use super::DoctorStats;

/// Sort records most recent first. Stable: equal dates keep fetch order,
/// and unparseable dates sink to the end.
pub fn sort_by_date_desc(records: &mut [PatientRecord]) {
    records.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
}

/// Column of the doctor comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    DoctorName,
    TotalPatients,
    TotalBusiness,
    TotalDoctorShare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current comparison-table ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::DoctorName,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    /// Header click: the same key while ascending flips to descending,
    /// anything else sorts ascending by `key`.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }

    /// Compare two rows under this state.
    pub fn compare(&self, a: &DoctorStats, b: &DoctorStats) -> Ordering {
        let ordering = match self.key {
            SortKey::DoctorName => compare_names(&a.doctor_name, &b.doctor_name),
            SortKey::TotalPatients => a.total_patients.cmp(&b.total_patients),
            SortKey::TotalBusiness => compare_amounts(a.total_business, b.total_business),
            SortKey::TotalDoctorShare => {
                compare_amounts(a.total_doctor_share, b.total_doctor_share)
            }
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Sort comparison rows in place (stable).
pub fn sort_stats(stats: &mut [DoctorStats], state: &SortState) {
    stats.sort_by(|a, b| state.compare(a, b));
}

/// Case-insensitive first, raw text as the tie-breaker.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_amounts(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn make_record(id: &str, date: &str) -> PatientRecord {
        PatientRecord {
            id: id.into(),
            doctor_id: "d1".into(),
            name: String::new(),
            age: String::new(),
            test: String::new(),
            total: 0.0,
            discount: 0.0,
            received: 0.0,
            doctor_share: 0.0,
            date: date.into(),
            author_id: String::new(),
            created_at: String::new(),
        }
    }

    fn make_stats(name: &str, patients: usize, business: f64) -> DoctorStats {
        DoctorStats {
            doctor_id: name.to_lowercase(),
            doctor_name: name.into(),
            monthly_counts: BTreeMap::new(),
            total_patients: patients,
            total_business: business,
            total_doctor_share: business / 4.0,
        }
    }

    fn names(stats: &[DoctorStats]) -> Vec<&str> {
        stats.iter().map(|s| s.doctor_name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date_desc_stable() {
        let mut records = vec![
            make_record("a", "2024-01-05"),
            make_record("b", "2024-02-10"),
            make_record("c", "2024-01-05"),
            make_record("d", "bad"),
            make_record("e", "2024-03-01"),
        ];
        sort_by_date_desc(&mut records);

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["e", "b", "a", "c", "d"]);
    }

    #[test]
    fn test_toggle() {
        let state = SortState::default();
        assert_eq!(state.key, SortKey::DoctorName);
        assert_eq!(state.direction, SortDirection::Ascending);

        let flipped = state.toggle(SortKey::DoctorName);
        assert_eq!(flipped.direction, SortDirection::Descending);

        let back = flipped.toggle(SortKey::DoctorName);
        assert_eq!(back.direction, SortDirection::Ascending);

        let other = flipped.toggle(SortKey::TotalBusiness);
        assert_eq!(other.key, SortKey::TotalBusiness);
        assert_eq!(other.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let mut stats = vec![
            make_stats("dr. zafar", 1, 10.0),
            make_stats("Dr. Ahmed", 2, 20.0),
            make_stats("Dr. bilal", 3, 30.0),
        ];
        sort_stats(&mut stats, &SortState::default());
        assert_eq!(names(&stats), vec!["Dr. Ahmed", "Dr. bilal", "dr. zafar"]);
    }

    #[test]
    fn test_sort_numeric_descending() {
        let mut stats = vec![
            make_stats("A", 5, 100.0),
            make_stats("B", 12, 50.0),
            make_stats("C", 7, 900.0),
        ];

        let state = SortState::default()
            .toggle(SortKey::TotalPatients)
            .toggle(SortKey::TotalPatients);
        sort_stats(&mut stats, &state);
        assert_eq!(names(&stats), vec!["B", "C", "A"]);

        sort_stats(&mut stats, &SortState::default().toggle(SortKey::TotalBusiness));
        assert_eq!(names(&stats), vec!["B", "A", "C"]);
    }
}
