//! Database layer for the referral ledger.
//!
//! SQLite stands in for the hosted document store: doctors, their patient
//! records and user profiles, plus live-query style subscriptions that fire
//! after every write.

mod schema;
mod doctors;
mod records;
mod subscription;
mod users;

pub use schema::*;
pub use subscription::*;

use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::models::{Doctor, PatientRecord, UserProfile};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Listener registry lock poisoned: {0}")]
    Lock(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Read side of the data store, as the aggregator needs it.
pub trait RecordStore {
    /// All doctors on the roster.
    fn list_doctors(&self) -> DbResult<Vec<Doctor>>;

    /// A doctor's records, nominally most recent first. Consumers re-sort.
    fn list_patient_records(&self, doctor_id: &str) -> DbResult<Vec<PatientRecord>>;

    /// Every doctor with their records, keyed by doctor ID.
    fn snapshot(&self) -> DbResult<StoreSnapshot> {
        let doctors = self.list_doctors()?;
        let mut records = HashMap::with_capacity(doctors.len());
        for doctor in &doctors {
            records.insert(doctor.id.clone(), self.list_patient_records(&doctor.id)?);
        }
        Ok(StoreSnapshot { doctors, records })
    }
}

/// Point-in-time copy of the roster and all records.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub doctors: Vec<Doctor>,
    pub records: HashMap<String, Vec<PatientRecord>>,
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
    doctor_listeners: ListenerRegistry<Doctor>,
    record_listeners: ListenerRegistry<PatientRecord>,
    user_listeners: ListenerRegistry<UserProfile>,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Opening ledger database");
        Self::with_connection(Connection::open(path)?)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> DbResult<Self> {
        let db = Self {
            conn,
            doctor_listeners: ListenerRegistry::new("doctors"),
            record_listeners: ListenerRegistry::new("patient_records"),
            user_listeners: ListenerRegistry::new("users"),
        };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Watch the doctor roster. The callback gets the current list at once
    /// and again after every doctor write.
    pub fn subscribe_doctors<F>(&self, callback: F) -> DbResult<Subscription>
    where
        F: Fn(&[Doctor]) + Send + Sync + 'static,
    {
        callback(&self.list_doctors()?);
        self.doctor_listeners.register(None, callback)
    }

    /// Watch one doctor's records.
    pub fn subscribe_records<F>(&self, doctor_id: &str, callback: F) -> DbResult<Subscription>
    where
        F: Fn(&[PatientRecord]) + Send + Sync + 'static,
    {
        callback(&self.list_patient_records(doctor_id)?);
        self.record_listeners
            .register(Some(doctor_id.to_string()), callback)
    }

    /// Watch administrator profiles.
    pub fn subscribe_admins<F>(&self, callback: F) -> DbResult<Subscription>
    where
        F: Fn(&[UserProfile]) + Send + Sync + 'static,
    {
        callback(&self.list_admins()?);
        self.user_listeners.register(None, callback)
    }

    fn notify_doctors(&self) -> DbResult<()> {
        if self.doctor_listeners.is_empty() {
            return Ok(());
        }
        let doctors = self.list_doctors()?;
        self.doctor_listeners.notify(None, &doctors)
    }

    fn notify_records(&self, doctor_id: &str) -> DbResult<()> {
        if self.record_listeners.is_empty() {
            return Ok(());
        }
        let records = self.list_patient_records(doctor_id)?;
        self.record_listeners.notify(Some(doctor_id), &records)
    }

    fn notify_users(&self) -> DbResult<()> {
        if self.user_listeners.is_empty() {
            return Ok(());
        }
        let admins = self.list_admins()?;
        self.user_listeners.notify(None, &admins)
    }
}

impl RecordStore for Database {
    fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        Database::list_doctors(self)
    }

    fn list_patient_records(&self, doctor_id: &str) -> DbResult<Vec<PatientRecord>> {
        Database::list_patient_records(self, doctor_id)
    }
}
