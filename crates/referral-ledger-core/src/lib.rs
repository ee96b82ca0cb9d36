//! Referral Ledger Core Library
//!
//! Billing ledger for a diagnostic clinic: patients referred by doctors are
//! billed, and the referring doctor earns a share of what was received.
//!
//! # Architecture
//!
//! ```text
//!   Record entry ──► Validation ──► Store (doctors/{id}/records)
//!                                        │
//!                        snapshot / live subscription
//!                                        │
//!                     ┌──────────────────▼──────────────────┐
//!                     │  Filter (date range, drop malformed) │
//!                     │  Sort (date desc)                    │
//!                     │  Bucket (YYYY-MM)  ·  Totals         │
//!                     └──────────────────┬──────────────────┘
//!                                        │
//!               ┌────────────────────────┼────────────────────────┐
//!               ▼                        ▼                        ▼
//!         Doctor detail          Analytics dashboard        Report export
//!     (records + totals)      (comparison, chart data)     (JSON / CSV)
//! ```
//!
//! Access is gated by role: super-admins manage the roster, approvals,
//! analytics and exports; administrators enter and correct their own
//! records of the day.
//!
//! # Modules
//!
//! - [`db`]: SQLite store with live-query subscriptions
//! - [`models`]: Domain types (Doctor, PatientRecord, UserProfile)
//! - [`validation`]: Record entry checks
//! - [`analytics`]: Filtering, bucketing, sorting and totals
//! - [`export`]: Doctor and comparison reports
//! - [`access`]: Session resolution and role gating
//! - [`config`]: Settings file and logging setup

pub mod access;
pub mod analytics;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use access::{AuthFlow, Session, SessionState};
pub use analytics::{aggregate, doctor_detail, AnalyticsQuery, AnalyticsView, DateRange};
pub use config::LedgerConfig;
pub use db::{Database, RecordStore, Subscription};
pub use models::{Doctor, PatientRecord, Role, UserProfile};
pub use validation::{validate, RecordInput, ValidationError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for LedgerError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => LedgerError::NotFound(what),
            db::DbError::Constraint(msg) => LedgerError::InvalidInput(msg),
            other => LedgerError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::SerializationError(e.to_string())
    }
}

impl From<ValidationError> for LedgerError {
    fn from(e: ValidationError) -> Self {
        LedgerError::Validation(e.to_string())
    }
}

impl From<config::ConfigError> for LedgerError {
    fn from(e: config::ConfigError) -> Self {
        LedgerError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for LedgerError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        LedgerError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn denied(message: &str) -> LedgerError {
    LedgerError::PermissionDenied(message.to_string())
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a ledger database at the given path, default settings.
#[uniffi::export]
pub fn open_ledger(path: String) -> Result<Arc<ReferralLedger>, LedgerError> {
    let config = LedgerConfig {
        database_path: path.into(),
        ..LedgerConfig::default()
    };
    ReferralLedger::open(config)
}

/// Create an in-memory ledger (for testing).
#[uniffi::export]
pub fn open_ledger_in_memory() -> Result<Arc<ReferralLedger>, LedgerError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ReferralLedger {
        db: Arc::new(Mutex::new(db)),
        config: LedgerConfig::default(),
    }))
}

/// Open the ledger described by a JSON settings file (defaults if absent)
/// and install logging with its `log_filter`.
#[uniffi::export]
pub fn open_ledger_from_config(config_path: String) -> Result<Arc<ReferralLedger>, LedgerError> {
    let config = LedgerConfig::load_or_default(&config_path)?;
    config.init_logging();
    ReferralLedger::open(config)
}

/// Install the log subscriber; `None` uses the default filter.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    config::init_logging(&filter.unwrap_or_else(config::default_log_filter))
}

/// User-facing text for an auth provider error code.
#[uniffi::export]
pub fn auth_error_message(flow: FfiAuthFlow, code: String) -> String {
    access::auth_error_message(flow.into(), &code).to_string()
}

/// Check a new password before sending it to the auth provider.
#[uniffi::export]
pub fn check_new_password(password: String, confirm: String) -> Result<(), LedgerError> {
    access::check_new_password(&password, &confirm)
        .map_err(|msg| LedgerError::InvalidInput(msg.to_string()))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe ledger for FFI.
///
/// Every call that acts for a user takes their `uid`; the stored profile
/// decides what they may do.
#[derive(uniffi::Object)]
pub struct ReferralLedger {
    db: Arc<Mutex<Database>>,
    config: LedgerConfig,
}

impl ReferralLedger {
    fn open(config: LedgerConfig) -> Result<Arc<Self>, LedgerError> {
        let db = Database::open(&config.database_path)?;
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        }))
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Resolve `uid` to an authorized session or fail with the sign-in message.
    fn authorize(db: &Database, uid: &str) -> Result<Session, LedgerError> {
        let profile = db.get_user(uid)?;
        match SessionState::resolve(profile.as_ref()) {
            SessionState::Authorized(session) => Ok(session),
            state => Err(denied(state.message().unwrap_or("Unauthorized access."))),
        }
    }

    fn require_doctor(db: &Database, doctor_id: &str) -> Result<Doctor, LedgerError> {
        db.get_doctor(doctor_id)?
            .ok_or_else(|| LedgerError::NotFound(format!("doctor {}", doctor_id)))
    }

    /// Records the session may see for one doctor, and the range applied.
    fn scoped_records(
        db: &Database,
        session: &Session,
        doctor_id: &str,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<(Vec<PatientRecord>, DateRange), LedgerError> {
        let fetched = db.list_patient_records(doctor_id)?;
        let visible = access::visible_records(session, &fetched, today);
        let range = if access::can_filter_by_range(session) {
            range
        } else {
            DateRange::all_time()
        };
        Ok((visible, range))
    }
}

#[uniffi::export]
impl ReferralLedger {
    // =========================================================================
    // Session
    // =========================================================================

    /// Look up the signed-in account and decide whether it may enter.
    pub fn resolve_session(&self, uid: String) -> Result<FfiSessionState, LedgerError> {
        let db = self.db.lock()?;
        let profile = db.get_user(&uid)?;
        Ok(SessionState::resolve(profile.as_ref()).into())
    }

    /// The range a record view opens with, per settings.
    pub fn default_range(&self) -> FfiDateRange {
        self.config.default_range.resolve(Self::today()).into()
    }

    // =========================================================================
    // Doctor Operations
    // =========================================================================

    pub fn list_doctors(&self) -> Result<Vec<FfiDoctor>, LedgerError> {
        let db = self.db.lock()?;
        Ok(db.list_doctors()?.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive search on name or specialty.
    pub fn search_doctors(&self, term: String) -> Result<Vec<FfiDoctor>, LedgerError> {
        let db = self.db.lock()?;
        Ok(db.search_doctors(&term)?.into_iter().map(Into::into).collect())
    }

    /// Add a doctor (`doctor_id` = `None`) or update one.
    pub fn save_doctor(
        &self,
        uid: String,
        doctor_id: Option<String>,
        name: String,
        specialty: String,
        image: Option<String>,
    ) -> Result<FfiDoctor, LedgerError> {
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        if !access::can_manage_doctors(&session) {
            return Err(denied("Only Super Admins can add or update doctors."));
        }

        let name = name.trim().to_string();
        let specialty = specialty.trim().to_string();
        if name.is_empty() || specialty.is_empty() {
            return Err(LedgerError::InvalidInput("Please fill in all fields.".into()));
        }

        let doctor = match doctor_id {
            Some(id) => {
                let mut doctor = Self::require_doctor(&db, &id)?;
                doctor.name = name;
                doctor.specialty = specialty;
                if image.is_some() {
                    doctor.image = image;
                }
                db.update_doctor(&doctor)?;
                doctor
            }
            None => {
                let mut doctor = Doctor::new(name, specialty);
                if image.is_some() {
                    doctor.image = image;
                }
                db.insert_doctor(&doctor)?;
                doctor
            }
        };
        Ok(doctor.into())
    }

    /// Delete a doctor and all their records. Returns the records removed.
    pub fn delete_doctor(&self, uid: String, doctor_id: String) -> Result<u64, LedgerError> {
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        if !access::can_manage_doctors(&session) {
            return Err(denied("Only Super Admins can delete doctors."));
        }

        let removed = db
            .delete_doctor(&doctor_id)?
            .ok_or_else(|| LedgerError::NotFound(format!("doctor {}", doctor_id)))?;
        Ok(removed as u64)
    }

    /// Watch the doctor roster until the returned handle is closed.
    ///
    /// The listener runs while the ledger is locked and must not call back
    /// into it synchronously.
    pub fn subscribe_doctors(
        &self,
        listener: Box<dyn DoctorListener>,
    ) -> Result<Arc<FfiSubscription>, LedgerError> {
        let db = self.db.lock()?;
        let subscription = db.subscribe_doctors(move |doctors| {
            listener.on_doctors(doctors.iter().cloned().map(Into::into).collect());
        })?;
        Ok(FfiSubscription::wrap(subscription))
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// A doctor's records as the session may see them, with totals.
    ///
    /// The range only applies to super-admins; administrators always get
    /// their own records of today.
    pub fn doctor_detail(
        &self,
        uid: String,
        doctor_id: String,
        range: FfiDateRange,
    ) -> Result<FfiDoctorDetail, LedgerError> {
        let range = range.parse()?;
        let today = Self::today();
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        Self::require_doctor(&db, &doctor_id)?;

        let (visible, range) = Self::scoped_records(&db, &session, &doctor_id, range, today)?;
        let detail = analytics::doctor_detail(&visible, &range);

        let records = detail
            .records
            .iter()
            .map(|record| {
                let can_edit = access::can_edit_record(&session, record, &detail.records, today);
                FfiPatientRecord::from_record(record.clone(), can_edit)
            })
            .collect();

        Ok(FfiDoctorDetail {
            records,
            totals: detail.totals.into(),
            monthly_counts: detail
                .monthly_counts
                .into_iter()
                .map(|(month, count)| FfiMonthCount { month, count })
                .collect(),
            dropped_malformed: detail.dropped_malformed as u64,
        })
    }

    /// Validate and save a record (`record_id` = `None` adds one).
    pub fn save_record(
        &self,
        uid: String,
        doctor_id: String,
        record_id: Option<String>,
        input: FfiRecordInput,
    ) -> Result<FfiPatientRecord, LedgerError> {
        let today = Self::today();
        let input: RecordInput = input.try_into()?;
        let validated = validate(&input)?;

        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        Self::require_doctor(&db, &doctor_id)?;

        let saved = match record_id {
            None => db.insert_record(&doctor_id, validated, &session.uid)?,
            Some(record_id) => {
                let existing = db
                    .get_record(&doctor_id, &record_id)?
                    .ok_or_else(|| LedgerError::NotFound(format!("record {}", record_id)))?;
                let fetched = db.list_patient_records(&doctor_id)?;
                let visible = access::visible_records(&session, &fetched, today);
                if !access::can_edit_record(&session, &existing, &visible, today) {
                    return Err(denied("You can only edit your latest record of today."));
                }
                db.update_record(&doctor_id, &record_id, validated)?
            }
        };

        let fetched = db.list_patient_records(&doctor_id)?;
        let visible = access::visible_records(&session, &fetched, today);
        let can_edit = access::can_edit_record(&session, &saved, &visible, today);
        Ok(FfiPatientRecord::from_record(saved, can_edit))
    }

    /// Watch a doctor's records as the session may see them, most recent
    /// first, with edit rights. Same locking rule as `subscribe_doctors`.
    pub fn subscribe_records(
        &self,
        uid: String,
        doctor_id: String,
        listener: Box<dyn RecordListener>,
    ) -> Result<Arc<FfiSubscription>, LedgerError> {
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        Self::require_doctor(&db, &doctor_id)?;

        let subscription = db.subscribe_records(&doctor_id, move |records| {
            let today = Self::today();
            let mut visible = access::visible_records(&session, records, today);
            analytics::sort_by_date_desc(&mut visible);
            let records = visible
                .iter()
                .map(|record| {
                    let can_edit = access::can_edit_record(&session, record, &visible, today);
                    FfiPatientRecord::from_record(record.clone(), can_edit)
                })
                .collect();
            listener.on_records(records);
        })?;
        Ok(FfiSubscription::wrap(subscription))
    }

    pub fn delete_record(
        &self,
        uid: String,
        doctor_id: String,
        record_id: String,
    ) -> Result<bool, LedgerError> {
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        if !access::can_delete_record(&session) {
            return Err(denied("Only Super Admins can delete patient records."));
        }
        Ok(db.delete_record(&doctor_id, &record_id)?)
    }

    /// Load record documents exported from the hosted store.
    pub fn import_records_json(
        &self,
        uid: String,
        doctor_id: String,
        json: String,
    ) -> Result<u64, LedgerError> {
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        if !access::can_manage_doctors(&session) {
            return Err(denied("Only Super Admins can import records."));
        }
        Ok(db.import_records_json(&doctor_id, &json)? as u64)
    }

    // =========================================================================
    // Analytics and Export
    // =========================================================================

    /// The analytics dashboard as JSON.
    pub fn analytics_json(
        &self,
        uid: String,
        query: FfiAnalyticsQuery,
    ) -> Result<String, LedgerError> {
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        let view = Self::analytics_view(&db, &session, &query.to_query()?)?;
        Ok(serde_json::to_string(&view)?)
    }

    /// The analytics dashboard as a report document.
    pub fn export_analytics(
        &self,
        uid: String,
        query: FfiAnalyticsQuery,
        format: FfiReportFormat,
    ) -> Result<String, LedgerError> {
        let query = query.to_query()?;
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        if !access::can_export_reports(&session) {
            return Err(denied("Only Super Admins can export reports."));
        }
        let view = Self::analytics_view(&db, &session, &query)?;

        let report = export::ComparisonReport::build(
            &view,
            &query.range,
            Self::today(),
            &self.config.currency,
        )?;
        match format {
            FfiReportFormat::Json => Ok(report.to_json()?),
            FfiReportFormat::Csv => Ok(report.to_csv()),
        }
    }

    /// One doctor's overall or share report over `range`.
    pub fn export_doctor_report(
        &self,
        uid: String,
        doctor_id: String,
        range: FfiDateRange,
        kind: FfiReportKind,
        format: FfiReportFormat,
    ) -> Result<String, LedgerError> {
        let range = range.parse()?;
        let today = Self::today();
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        if !access::can_export_reports(&session) {
            return Err(denied("Only Super Admins can export reports."));
        }
        let doctor = Self::require_doctor(&db, &doctor_id)?;

        let (visible, range) = Self::scoped_records(&db, &session, &doctor_id, range, today)?;
        let filtered = analytics::filter_records(&visible, &range).records;
        let currency = &self.config.currency;

        match kind {
            FfiReportKind::Overall => {
                let report = export::OverallReport::build(&doctor, &filtered, &range, today, currency)?;
                match format {
                    FfiReportFormat::Json => Ok(report.to_json()?),
                    FfiReportFormat::Csv => Ok(report.to_csv()),
                }
            }
            FfiReportKind::Share => {
                let report = export::ShareReport::build(&doctor, &filtered, &range, today, currency)?;
                match format {
                    FfiReportFormat::Json => Ok(report.to_json()?),
                    FfiReportFormat::Csv => Ok(report.to_csv()),
                }
            }
        }
    }

    // =========================================================================
    // Administrator Management
    // =========================================================================

    /// Create the first, approved super-admin. Refused once one exists.
    pub fn bootstrap_superadmin(
        &self,
        uid: String,
        email: String,
    ) -> Result<FfiUserProfile, LedgerError> {
        let db = self.db.lock()?;
        if db.has_superadmin()? {
            return Err(denied("A Super Admin already exists."));
        }

        let profile = UserProfile {
            uid,
            email: email.trim().to_lowercase(),
            role: Role::SuperAdmin,
            approved: true,
            created_at: models::timestamp_now(),
        };
        db.upsert_user(&profile)?;
        Ok(profile.into())
    }

    /// Self sign-up: creates an unapproved administrator profile.
    pub fn register_admin(&self, uid: String, email: String) -> Result<FfiUserProfile, LedgerError> {
        let db = self.db.lock()?;
        Ok(db.register_admin(&uid, &email)?.into())
    }

    /// A super-admin adds an administrator account they created.
    pub fn add_admin(
        &self,
        uid: String,
        new_uid: String,
        email: String,
    ) -> Result<FfiUserProfile, LedgerError> {
        if email.trim().is_empty() {
            return Err(LedgerError::InvalidInput("Email and password are required.".into()));
        }
        let db = self.db.lock()?;
        let session = Self::authorize(&db, &uid)?;
        if !access::can_manage_admins(&session) {
            return Err(denied("Only Super Admins can add administrators."));
        }
        Ok(db.register_admin(&new_uid, &email)?.into())
    }

    pub fn approve_admin(&self, uid: String, admin_uid: String) -> Result<bool, LedgerError> {
        let db = self.db.lock()?;
        self.require_admin_manager(&db, &uid)?;
        Ok(db.approve_user(&admin_uid)?)
    }

    pub fn reject_admin(&self, uid: String, admin_uid: String) -> Result<bool, LedgerError> {
        let db = self.db.lock()?;
        self.require_admin_manager(&db, &uid)?;
        Ok(db.reject_user(&admin_uid)?)
    }

    /// Remove an administrator. Super-admin accounts cannot be removed.
    pub fn remove_admin(&self, uid: String, admin_uid: String) -> Result<bool, LedgerError> {
        let db = self.db.lock()?;
        self.require_admin_manager(&db, &uid)?;
        match db.get_user(&admin_uid)? {
            Some(profile) if profile.role != Role::Admin => {
                Err(denied("Super Admin accounts cannot be removed."))
            }
            _ => Ok(db.remove_admin(&admin_uid)?),
        }
    }

    /// Watch administrator profiles (super-admins only).
    pub fn subscribe_admins(
        &self,
        uid: String,
        listener: Box<dyn AdminListener>,
    ) -> Result<Arc<FfiSubscription>, LedgerError> {
        let db = self.db.lock()?;
        self.require_admin_manager(&db, &uid)?;
        let subscription = db.subscribe_admins(move |admins| {
            listener.on_admins(admins.iter().cloned().map(Into::into).collect());
        })?;
        Ok(FfiSubscription::wrap(subscription))
    }

    pub fn list_admins(&self, uid: String) -> Result<Vec<FfiUserProfile>, LedgerError> {
        let db = self.db.lock()?;
        self.require_admin_manager(&db, &uid)?;
        Ok(db.list_admins()?.into_iter().map(Into::into).collect())
    }

    pub fn list_pending_admins(&self, uid: String) -> Result<Vec<FfiUserProfile>, LedgerError> {
        let db = self.db.lock()?;
        self.require_admin_manager(&db, &uid)?;
        Ok(db.list_pending_admins()?.into_iter().map(Into::into).collect())
    }
}

impl ReferralLedger {
    fn require_admin_manager(&self, db: &Database, uid: &str) -> Result<Session, LedgerError> {
        let session = Self::authorize(db, uid)?;
        if !access::can_manage_admins(&session) {
            return Err(denied("Only Super Admins can manage administrators."));
        }
        Ok(session)
    }

    fn analytics_view(
        db: &Database,
        session: &Session,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsView, LedgerError> {
        if !access::can_view_analytics(session) {
            return Err(denied("Access denied. Only approved Super Admins can view analytics."));
        }
        let snapshot = RecordStore::snapshot(db)?;
        Ok(aggregate(&snapshot.doctors, &snapshot.records, query))
    }
}

// =========================================================================
// Callback Interfaces
// =========================================================================

/// Receives doctor roster snapshots.
#[uniffi::export(callback_interface)]
pub trait DoctorListener: Send + Sync {
    fn on_doctors(&self, doctors: Vec<FfiDoctor>);
}

/// Receives one doctor's visible records.
#[uniffi::export(callback_interface)]
pub trait RecordListener: Send + Sync {
    fn on_records(&self, records: Vec<FfiPatientRecord>);
}

/// Receives administrator profile lists.
#[uniffi::export(callback_interface)]
pub trait AdminListener: Send + Sync {
    fn on_admins(&self, admins: Vec<FfiUserProfile>);
}

/// Open live query; call `close` when the view goes away.
#[derive(uniffi::Object)]
pub struct FfiSubscription {
    inner: Mutex<Option<Subscription>>,
}

impl FfiSubscription {
    fn wrap(subscription: Subscription) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Some(subscription)),
        })
    }
}

#[uniffi::export]
impl FfiSubscription {
    /// Stop receiving snapshots. Further calls do nothing.
    pub fn close(&self) -> Result<(), LedgerError> {
        if let Some(subscription) = self.inner.lock()?.take() {
            subscription.close();
        }
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn parse_ffi_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidInput(format!("Invalid date: {}", raw)))
}

/// FFI-safe doctor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub image: Option<String>,
    pub created_at: String,
}

impl From<Doctor> for FfiDoctor {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            specialty: doctor.specialty,
            image: doctor.image,
            created_at: doctor.created_at,
        }
    }
}

/// FFI-safe patient record, with the caller's edit right.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientRecord {
    pub id: String,
    pub doctor_id: String,
    pub name: String,
    pub age: String,
    pub test: String,
    pub total: f64,
    pub discount: f64,
    pub received: f64,
    pub doctor_share: f64,
    pub date: String,
    pub author_id: String,
    pub created_at: String,
    pub can_edit: bool,
}

impl FfiPatientRecord {
    fn from_record(record: PatientRecord, can_edit: bool) -> Self {
        Self {
            id: record.id,
            doctor_id: record.doctor_id,
            name: record.name,
            age: record.age,
            test: record.test,
            total: record.total,
            discount: record.discount,
            received: record.received,
            doctor_share: record.doctor_share,
            date: record.date,
            author_id: record.author_id,
            created_at: record.created_at,
            can_edit,
        }
    }
}

/// Record form values as typed; `date` is `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordInput {
    pub name: String,
    pub age: String,
    pub test: String,
    pub total: String,
    pub discount: String,
    pub received: String,
    pub doctor_share: String,
    pub date: String,
}

impl TryFrom<FfiRecordInput> for RecordInput {
    type Error = LedgerError;

    fn try_from(input: FfiRecordInput) -> Result<Self, Self::Error> {
        Ok(RecordInput {
            date: parse_ffi_date(&input.date)?,
            name: input.name,
            age: input.age,
            test: input.test,
            total: input.total,
            discount: input.discount,
            received: input.received,
            doctor_share: input.doctor_share,
        })
    }
}

/// Inclusive `YYYY-MM-DD` bounds; `None` is open.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiDateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FfiDateRange {
    fn parse(&self) -> Result<DateRange, LedgerError> {
        let start = self.start.as_deref().map(parse_ffi_date).transpose()?;
        let end = self.end.as_deref().map(parse_ffi_date).transpose()?;
        Ok(DateRange::between(start, end))
    }
}

impl From<DateRange> for FfiDateRange {
    fn from(range: DateRange) -> Self {
        Self {
            start: range.start.map(models::format_record_date),
            end: range.end.map(models::format_record_date),
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Record)]
pub struct FfiTotals {
    pub total: f64,
    pub discount: f64,
    pub received: f64,
    pub doctor_share: f64,
    pub due: f64,
}

impl From<analytics::Totals> for FfiTotals {
    fn from(t: analytics::Totals) -> Self {
        Self {
            total: t.total,
            discount: t.discount,
            received: t.received,
            doctor_share: t.doctor_share,
            due: t.due,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMonthCount {
    pub month: String,
    pub count: u32,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctorDetail {
    pub records: Vec<FfiPatientRecord>,
    pub totals: FfiTotals,
    pub monthly_counts: Vec<FfiMonthCount>,
    pub dropped_malformed: u64,
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiSortKey {
    DoctorName,
    TotalPatients,
    TotalBusiness,
    TotalDoctorShare,
}

impl From<FfiSortKey> for analytics::SortKey {
    fn from(key: FfiSortKey) -> Self {
        match key {
            FfiSortKey::DoctorName => analytics::SortKey::DoctorName,
            FfiSortKey::TotalPatients => analytics::SortKey::TotalPatients,
            FfiSortKey::TotalBusiness => analytics::SortKey::TotalBusiness,
            FfiSortKey::TotalDoctorShare => analytics::SortKey::TotalDoctorShare,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalyticsQuery {
    pub range: FfiDateRange,
    pub selected_doctor_id: Option<String>,
    pub sort_key: FfiSortKey,
    pub descending: bool,
}

impl FfiAnalyticsQuery {
    fn to_query(&self) -> Result<AnalyticsQuery, LedgerError> {
        Ok(AnalyticsQuery {
            range: self.range.parse()?,
            selected_doctor_id: self.selected_doctor_id.clone(),
            sort: analytics::SortState {
                key: self.sort_key.into(),
                direction: if self.descending {
                    analytics::SortDirection::Descending
                } else {
                    analytics::SortDirection::Ascending
                },
            },
        })
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiReportKind {
    Overall,
    Share,
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiReportFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiAuthFlow {
    Login,
    Signup,
    PasswordReset,
    SetPassword,
}

impl From<FfiAuthFlow> for AuthFlow {
    fn from(flow: FfiAuthFlow) -> Self {
        match flow {
            FfiAuthFlow::Login => AuthFlow::Login,
            FfiAuthFlow::Signup => AuthFlow::Signup,
            FfiAuthFlow::PasswordReset => AuthFlow::PasswordReset,
            FfiAuthFlow::SetPassword => AuthFlow::SetPassword,
        }
    }
}

/// FFI-safe user profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUserProfile {
    pub uid: String,
    pub email: String,
    pub role: String,
    pub approved: bool,
    pub created_at: String,
}

impl From<UserProfile> for FfiUserProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            role: profile.role.as_str().to_string(),
            uid: profile.uid,
            email: profile.email,
            approved: profile.approved,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub uid: String,
    pub role: String,
    pub approved: bool,
}

/// Sign-in outcome: `status` is `authorized`, `pending_approval`,
/// `profile_missing` or `unauthorized`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSessionState {
    pub status: String,
    pub session: Option<FfiSession>,
    pub message: Option<String>,
    pub can_manage_doctors: bool,
    pub can_view_analytics: bool,
    pub can_export_reports: bool,
}

impl From<SessionState> for FfiSessionState {
    fn from(state: SessionState) -> Self {
        let status = match &state {
            SessionState::ProfileMissing => "profile_missing",
            SessionState::PendingApproval => "pending_approval",
            SessionState::Authorized(_) => "authorized",
            SessionState::Unauthorized => "unauthorized",
        };
        let session = state.session();

        Self {
            status: status.to_string(),
            message: state.message().map(str::to_string),
            can_manage_doctors: session.map_or(false, access::can_manage_doctors),
            can_view_analytics: session.map_or(false, access::can_view_analytics),
            can_export_reports: session.map_or(false, access::can_export_reports),
            session: session.map(|s| FfiSession {
                uid: s.uid.clone(),
                role: s.role.as_str().to_string(),
                approved: s.approved,
            }),
        }
    }
}
