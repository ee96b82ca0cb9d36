//! Role gating over sessions and records.

use chrono::NaiveDate;

use super::Session;
use crate::models::PatientRecord;

/// Add, edit and delete doctors.
pub fn can_manage_doctors(session: &Session) -> bool {
    session.is_superadmin() && session.approved
}

/// Open the cross-doctor analytics view.
pub fn can_view_analytics(session: &Session) -> bool {
    session.is_superadmin() && session.approved
}

pub fn can_delete_record(session: &Session) -> bool {
    session.is_superadmin()
}

pub fn can_export_reports(session: &Session) -> bool {
    session.is_superadmin()
}

/// Pick a custom date range on a doctor's record view.
pub fn can_filter_by_range(session: &Session) -> bool {
    session.is_superadmin()
}

/// Approve, reject and remove administrators.
pub fn can_manage_admins(session: &Session) -> bool {
    session.is_superadmin()
}

/// Records the session may see.
///
/// Super-admins see everything; administrators see only their own records
/// dated `today`.
pub fn visible_records(
    session: &Session,
    records: &[PatientRecord],
    today: NaiveDate,
) -> Vec<PatientRecord> {
    if session.is_superadmin() {
        return records.to_vec();
    }
    if !session.is_admin() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| r.author_id == session.uid && r.parsed_date() == Some(today))
        .cloned()
        .collect()
}

/// The most recent record: greatest `(date, created_at, id)`.
///
/// Records with an unparseable date rank below every dated record.
pub fn latest_record(records: &[PatientRecord]) -> Option<&PatientRecord> {
    records.iter().max_by(|a, b| {
        (a.parsed_date(), &a.created_at, &a.id).cmp(&(b.parsed_date(), &b.created_at, &b.id))
    })
}

/// Whether `record` may be edited, given the list it is shown in.
///
/// Administrators may only correct their own latest entry of the day.
pub fn can_edit_record(
    session: &Session,
    record: &PatientRecord,
    records: &[PatientRecord],
    today: NaiveDate,
) -> bool {
    if session.is_superadmin() {
        return true;
    }

    session.is_admin()
        && record.author_id == session.uid
        && record.parsed_date() == Some(today)
        && latest_record(records).map(|latest| latest.id.as_str()) == Some(record.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn session(role: Role, approved: bool) -> Session {
        Session {
            uid: "u1".into(),
            role,
            approved,
        }
    }

    fn record(id: &str, author: &str, date: &str, created_at: &str) -> PatientRecord {
        PatientRecord {
            id: id.into(),
            doctor_id: "d1".into(),
            name: format!("Patient {}", id),
            age: String::new(),
            test: String::new(),
            total: 100.0,
            discount: 0.0,
            received: 100.0,
            doctor_share: 10.0,
            date: date.into(),
            author_id: author.into(),
            created_at: created_at.into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_superadmin_gates_need_approval() {
        let approved = session(Role::SuperAdmin, true);
        let unapproved = session(Role::SuperAdmin, false);
        let admin = session(Role::Admin, true);

        assert!(can_manage_doctors(&approved));
        assert!(can_view_analytics(&approved));
        assert!(!can_manage_doctors(&unapproved));
        assert!(!can_view_analytics(&unapproved));
        assert!(can_delete_record(&unapproved));
        assert!(can_export_reports(&unapproved));
        assert!(can_filter_by_range(&unapproved));

        assert!(!can_manage_doctors(&admin));
        assert!(!can_delete_record(&admin));
        assert!(!can_export_reports(&admin));
        assert!(!can_manage_admins(&admin));
    }

    #[test]
    fn test_admin_sees_own_records_of_today() {
        let records = vec![
            record("a", "u1", "2024-03-15", "t1"),
            record("b", "u2", "2024-03-15", "t2"),
            record("c", "u1", "2024-03-14", "t3"),
            record("d", "u1", "garbage", "t4"),
        ];

        let admin = session(Role::Admin, true);
        let visible = visible_records(&admin, &records, today());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a");

        let superadmin = session(Role::SuperAdmin, true);
        assert_eq!(visible_records(&superadmin, &records, today()).len(), 4);

        let stranger = session(Role::Unknown("viewer".into()), true);
        assert!(visible_records(&stranger, &records, today()).is_empty());
    }

    #[test]
    fn test_latest_record_ignores_order() {
        let records = vec![
            record("a", "u1", "2024-03-14", "2024-03-14T09:00:00Z"),
            record("b", "u1", "2024-03-15", "2024-03-15T08:00:00Z"),
            record("c", "u1", "2024-03-15", "2024-03-15T10:00:00Z"),
            record("d", "u1", "bad", "2024-03-16T10:00:00Z"),
        ];
        assert_eq!(latest_record(&records).unwrap().id, "c");

        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(latest_record(&reversed).unwrap().id, "c");

        assert!(latest_record(&[]).is_none());
    }

    #[test]
    fn test_admin_edits_only_latest_own_record_of_today() {
        let admin = session(Role::Admin, true);
        let records = vec![
            record("a", "u1", "2024-03-15", "2024-03-15T08:00:00Z"),
            record("b", "u1", "2024-03-15", "2024-03-15T09:00:00Z"),
        ];

        assert!(can_edit_record(&admin, &records[1], &records, today()));
        assert!(!can_edit_record(&admin, &records[0], &records, today()));

        let tomorrow = today().succ_opt().unwrap();
        assert!(!can_edit_record(&admin, &records[1], &records, tomorrow));

        let other = vec![record("x", "u2", "2024-03-15", "2024-03-15T10:00:00Z")];
        assert!(!can_edit_record(&admin, &other[0], &other, today()));
    }

    #[test]
    fn test_superadmin_edits_anything() {
        let superadmin = session(Role::SuperAdmin, false);
        let old = record("a", "u9", "2020-01-01", "");
        assert!(can_edit_record(&superadmin, &old, &[], today()));
    }
}
