//! End-to-end tests through the exported ledger object.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use referral_ledger_core::{
    open_ledger, open_ledger_from_config, open_ledger_in_memory, AdminListener, DoctorListener,
    FfiAnalyticsQuery, FfiDateRange, FfiDoctor, FfiPatientRecord, FfiRecordInput,
    FfiReportFormat, FfiReportKind, FfiSortKey, FfiUserProfile, LedgerError, RecordListener,
    ReferralLedger,
};

const ROOT: &str = "root";
const CLERK: &str = "clerk";

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn input(name: &str, total: &str, received: &str, share: &str, date: &str) -> FfiRecordInput {
    FfiRecordInput {
        name: name.to_string(),
        age: "40".to_string(),
        test: "Lipid Profile".to_string(),
        total: total.to_string(),
        discount: String::new(),
        received: received.to_string(),
        doctor_share: share.to_string(),
        date: date.to_string(),
    }
}

/// A ledger with an approved super-admin, an approved clerk and one doctor.
fn setup() -> Result<(Arc<ReferralLedger>, FfiDoctor)> {
    let ledger = open_ledger_in_memory()?;
    ledger.bootstrap_superadmin(ROOT.into(), "owner@clinic.pk".into())?;
    ledger.register_admin(CLERK.into(), "clerk@clinic.pk".into())?;
    ledger.approve_admin(ROOT.into(), CLERK.into())?;
    let doctor = ledger.save_doctor(
        ROOT.into(),
        None,
        "Dr. Hina Malik".into(),
        "Gynecology".into(),
        None,
    )?;
    Ok((ledger, doctor))
}

#[test]
fn test_session_states() -> Result<()> {
    let (ledger, _) = setup()?;
    ledger.register_admin("new".into(), "new@clinic.pk".into())?;

    let root = ledger.resolve_session(ROOT.into())?;
    assert_eq!(root.status, "authorized");
    assert!(root.can_view_analytics);

    let clerk = ledger.resolve_session(CLERK.into())?;
    assert_eq!(clerk.status, "authorized");
    assert!(!clerk.can_manage_doctors);

    let pending = ledger.resolve_session("new".into())?;
    assert_eq!(pending.status, "pending_approval");
    assert_eq!(
        pending.message.as_deref(),
        Some("Your account is pending approval from the Super Admin.")
    );

    assert_eq!(ledger.resolve_session("ghost".into())?.status, "profile_missing");
    Ok(())
}

#[test]
fn test_bootstrap_only_once() -> Result<()> {
    let (ledger, _) = setup()?;
    let again = ledger.bootstrap_superadmin("other".into(), "x@clinic.pk".into());
    assert!(matches!(again, Err(LedgerError::PermissionDenied(_))));
    Ok(())
}

#[test]
fn test_clerk_cannot_manage_roster() -> Result<()> {
    let (ledger, doctor) = setup()?;

    let add = ledger.save_doctor(CLERK.into(), None, "Dr. X".into(), "ENT".into(), None);
    assert!(matches!(add, Err(LedgerError::PermissionDenied(_))));

    let delete = ledger.delete_doctor(CLERK.into(), doctor.id.clone());
    assert!(matches!(delete, Err(LedgerError::PermissionDenied(_))));

    let blank = ledger.save_doctor(ROOT.into(), None, "  ".into(), "ENT".into(), None);
    assert!(matches!(blank, Err(LedgerError::InvalidInput(_))));
    Ok(())
}

#[test]
fn test_clerk_sees_and_edits_only_latest_own_entry() -> Result<()> {
    let (ledger, doctor) = setup()?;
    let today = today();

    let first = ledger.save_record(
        CLERK.into(),
        doctor.id.clone(),
        None,
        input("Asad", "1000", "1000", "200", &today),
    )?;
    let second = ledger.save_record(
        CLERK.into(),
        doctor.id.clone(),
        None,
        input("Bushra", "800", "800", "100", &today),
    )?;
    ledger.save_record(
        ROOT.into(),
        doctor.id.clone(),
        None,
        input("Chaudhry", "500", "500", "50", "2023-06-01"),
    )?;

    let clerk_view = ledger.doctor_detail(CLERK.into(), doctor.id.clone(), FfiDateRange::default())?;
    assert_eq!(clerk_view.records.len(), 2);
    let editable: Vec<_> = clerk_view
        .records
        .iter()
        .filter(|r| r.can_edit)
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(editable, vec![second.id.clone()]);

    let stale_edit = ledger.save_record(
        CLERK.into(),
        doctor.id.clone(),
        Some(first.id.clone()),
        input("Asad", "900", "900", "200", &today),
    );
    assert!(matches!(stale_edit, Err(LedgerError::PermissionDenied(_))));

    let fixed = ledger.save_record(
        CLERK.into(),
        doctor.id.clone(),
        Some(second.id.clone()),
        input("Bushra Noor", "800", "700", "100", &today),
    )?;
    assert_eq!(fixed.name, "Bushra Noor");
    assert_eq!(fixed.author_id, CLERK);

    let root_view = ledger.doctor_detail(ROOT.into(), doctor.id.clone(), FfiDateRange::default())?;
    assert_eq!(root_view.records.len(), 3);
    assert!(root_view.records.iter().all(|r| r.can_edit));
    assert_eq!(root_view.totals.total, 2300.0);
    assert_eq!(root_view.totals.due, 100.0);
    Ok(())
}

#[test]
fn test_invalid_record_is_not_saved() -> Result<()> {
    let (ledger, doctor) = setup()?;

    let result = ledger.save_record(
        ROOT.into(),
        doctor.id.clone(),
        None,
        input("Dania", "100", "80", "90", &today()),
    );
    match result {
        Err(LedgerError::Validation(msg)) => {
            assert_eq!(msg, "Doctor Share can't be greater than Received amount.")
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let bad_date = ledger.save_record(
        ROOT.into(),
        doctor.id.clone(),
        None,
        input("Dania", "100", "80", "10", "05/01/2024"),
    );
    assert!(matches!(bad_date, Err(LedgerError::InvalidInput(_))));

    let detail = ledger.doctor_detail(ROOT.into(), doctor.id, FfiDateRange::default())?;
    assert!(detail.records.is_empty());
    Ok(())
}

#[test]
fn test_delete_requires_superadmin() -> Result<()> {
    let (ledger, doctor) = setup()?;
    let record = ledger.save_record(
        CLERK.into(),
        doctor.id.clone(),
        None,
        input("Ehsan", "300", "300", "30", &today()),
    )?;

    let denied = ledger.delete_record(CLERK.into(), doctor.id.clone(), record.id.clone());
    assert!(matches!(denied, Err(LedgerError::PermissionDenied(_))));
    assert!(ledger.delete_record(ROOT.into(), doctor.id, record.id)?);
    Ok(())
}

#[test]
fn test_analytics_and_exports() -> Result<()> {
    let (ledger, doctor) = setup()?;
    ledger.save_record(
        ROOT.into(),
        doctor.id.clone(),
        None,
        input("Farah", "1000", "900", "300", "2024-01-05"),
    )?;

    let query = FfiAnalyticsQuery {
        range: FfiDateRange {
            start: Some("2024-01-01".into()),
            end: Some("2024-01-31".into()),
        },
        selected_doctor_id: None,
        sort_key: FfiSortKey::TotalBusiness,
        descending: true,
    };

    let json = ledger.analytics_json(ROOT.into(), query.clone())?;
    let view: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(view["summary"]["total_patients"], 1);
    assert_eq!(view["months"][0], "2024-01");

    let denied = ledger.analytics_json(CLERK.into(), query.clone());
    assert!(matches!(denied, Err(LedgerError::PermissionDenied(_))));

    let csv = ledger.export_analytics(ROOT.into(), query, FfiReportFormat::Csv)?;
    assert!(csv.contains("Dr. Hina Malik"));

    let share = ledger.export_doctor_report(
        ROOT.into(),
        doctor.id.clone(),
        FfiDateRange::default(),
        FfiReportKind::Share,
        FfiReportFormat::Json,
    )?;
    let share: serde_json::Value = serde_json::from_str(&share)?;
    assert_eq!(share["metadata"]["file_stem"], "Dr._Hina_Malik_Doctor_Share_Report");
    assert_eq!(share["total_doctor_share"], 300.0);

    let denied = ledger.export_doctor_report(
        CLERK.into(),
        doctor.id,
        FfiDateRange::default(),
        FfiReportKind::Overall,
        FfiReportFormat::Csv,
    );
    assert!(matches!(denied, Err(LedgerError::PermissionDenied(_))));
    Ok(())
}

#[test]
fn test_admin_management() -> Result<()> {
    let (ledger, _) = setup()?;
    ledger.add_admin(ROOT.into(), "a2".into(), "second@clinic.pk".into())?;
    ledger.register_admin("a3".into(), "third@clinic.pk".into())?;

    let duplicate = ledger.register_admin("a4".into(), "third@clinic.pk".into());
    match duplicate {
        Err(LedgerError::InvalidInput(msg)) => assert_eq!(msg, "User already exists."),
        other => panic!("expected duplicate rejection, got {:?}", other),
    }

    assert_eq!(ledger.list_pending_admins(ROOT.into())?.len(), 2);
    assert!(ledger.reject_admin(ROOT.into(), "a3".into())?);
    assert!(ledger.approve_admin(ROOT.into(), "a2".into())?);
    assert!(ledger.list_pending_admins(ROOT.into())?.is_empty());
    assert_eq!(ledger.list_admins(ROOT.into())?.len(), 2);

    let denied = ledger.list_admins(CLERK.into());
    assert!(matches!(denied, Err(LedgerError::PermissionDenied(_))));

    assert!(ledger.remove_admin(ROOT.into(), CLERK.into())?);
    assert_eq!(ledger.resolve_session(CLERK.into())?.status, "profile_missing");
    Ok(())
}

#[test]
fn test_superadmin_cannot_be_removed() -> Result<()> {
    let (ledger, _) = setup()?;

    let own = ledger.remove_admin(ROOT.into(), ROOT.into());
    assert!(matches!(own, Err(LedgerError::PermissionDenied(_))));
    assert_eq!(ledger.resolve_session(ROOT.into())?.status, "authorized");

    let takeover = ledger.bootstrap_superadmin("mallory".into(), "m@x.pk".into());
    assert!(matches!(takeover, Err(LedgerError::PermissionDenied(_))));

    // unknown uids are simply not removed
    assert!(!ledger.remove_admin(ROOT.into(), "ghost".into())?);
    Ok(())
}

#[test]
fn test_register_existing_uid_rejected() -> Result<()> {
    let (ledger, _) = setup()?;
    match ledger.register_admin(CLERK.into(), "fresh@clinic.pk".into()) {
        Err(LedgerError::InvalidInput(msg)) => assert_eq!(msg, "User already exists."),
        other => panic!("expected duplicate rejection, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_decimal_amounts_saved() -> Result<()> {
    let (ledger, doctor) = setup()?;
    let mut draft = input("Gul", "1000.30", "1000.20", "0", &today());
    draft.discount = "0.10".into();

    let saved = ledger.save_record(ROOT.into(), doctor.id, None, draft)?;
    assert_eq!(saved.total, 1000.3);
    assert_eq!(saved.received, 1000.2);
    Ok(())
}

struct Recorder(Arc<Mutex<Vec<Vec<String>>>>);

impl DoctorListener for Recorder {
    fn on_doctors(&self, doctors: Vec<FfiDoctor>) {
        let names = doctors.into_iter().map(|d| d.name).collect();
        self.0.lock().unwrap().push(names);
    }
}

#[test]
fn test_doctor_subscription() -> Result<()> {
    let (ledger, doctor) = setup()?;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let subscription = ledger.subscribe_doctors(Box::new(Recorder(Arc::clone(&seen))))?;
    ledger.save_doctor(ROOT.into(), None, "Dr. Imran".into(), "ENT".into(), None)?;
    subscription.close()?;
    subscription.close()?;
    ledger.delete_doctor(ROOT.into(), doctor.id)?;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], vec!["Dr. Hina Malik"]);
    assert_eq!(seen[1], vec!["Dr. Hina Malik", "Dr. Imran"]);
    Ok(())
}

struct RecordRecorder(Arc<Mutex<Vec<Vec<(String, bool)>>>>);

impl RecordListener for RecordRecorder {
    fn on_records(&self, records: Vec<FfiPatientRecord>) {
        let seen = records.into_iter().map(|r| (r.name, r.can_edit)).collect();
        self.0.lock().unwrap().push(seen);
    }
}

#[test]
fn test_record_subscription_follows_visibility() -> Result<()> {
    let (ledger, doctor) = setup()?;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let subscription = ledger.subscribe_records(
        CLERK.into(),
        doctor.id.clone(),
        Box::new(RecordRecorder(Arc::clone(&seen))),
    )?;
    ledger.save_record(
        ROOT.into(),
        doctor.id.clone(),
        None,
        input("Hamid", "500", "500", "50", "2023-06-01"),
    )?;
    ledger.save_record(
        CLERK.into(),
        doctor.id.clone(),
        None,
        input("Iqra", "700", "700", "70", &today()),
    )?;
    subscription.close()?;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].is_empty());
    assert!(seen[1].is_empty());
    assert_eq!(seen[2], vec![("Iqra".to_string(), true)]);

    let missing = ledger.subscribe_records(
        CLERK.into(),
        "no-such-doctor".into(),
        Box::new(RecordRecorder(Arc::new(Mutex::new(Vec::new())))),
    );
    assert!(matches!(missing, Err(LedgerError::NotFound(_))));
    Ok(())
}

struct AdminRecorder(Arc<Mutex<Vec<Vec<(String, bool)>>>>);

impl AdminListener for AdminRecorder {
    fn on_admins(&self, admins: Vec<FfiUserProfile>) {
        let seen = admins.into_iter().map(|a| (a.uid, a.approved)).collect();
        self.0.lock().unwrap().push(seen);
    }
}

#[test]
fn test_admin_subscription() -> Result<()> {
    let (ledger, _) = setup()?;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let denied =
        ledger.subscribe_admins(CLERK.into(), Box::new(AdminRecorder(Arc::clone(&seen))));
    assert!(matches!(denied, Err(LedgerError::PermissionDenied(_))));

    let subscription =
        ledger.subscribe_admins(ROOT.into(), Box::new(AdminRecorder(Arc::clone(&seen))))?;
    ledger.register_admin("new".into(), "new@clinic.pk".into())?;
    ledger.approve_admin(ROOT.into(), "new".into())?;
    subscription.close()?;
    ledger.remove_admin(ROOT.into(), "new".into())?;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], vec![(CLERK.to_string(), true)]);
    assert_eq!(seen[1].len(), 2);
    assert!(seen[2].iter().all(|(_, approved)| *approved));
    Ok(())
}

#[test]
fn test_file_backed_ledger_persists() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ledger.sqlite3");
    let path = path.to_string_lossy().to_string();

    {
        let ledger = open_ledger(path.clone())?;
        ledger.bootstrap_superadmin(ROOT.into(), "owner@clinic.pk".into())?;
        ledger.save_doctor(ROOT.into(), None, "Dr. Jamal".into(), "Dermatology".into(), None)?;
    }

    let ledger = open_ledger(path)?;
    let doctors = ledger.search_doctors("derma".into())?;
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].name, "Dr. Jamal");
    Ok(())
}

#[test]
fn test_open_from_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("ledger.json");
    std::fs::write(
        &config_path,
        r#"{"database_path": "ledger.sqlite3", "log_filter": "referral_ledger_core=debug"}"#,
    )?;

    let ledger = open_ledger_from_config(config_path.to_string_lossy().to_string())?;
    ledger.bootstrap_superadmin(ROOT.into(), "owner@clinic.pk".into())?;
    assert!(dir.path().join("ledger.sqlite3").exists());
    Ok(())
}
