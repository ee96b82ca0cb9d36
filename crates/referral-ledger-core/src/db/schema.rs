//! SQLite schema definition.

/// Complete database schema for the referral ledger.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    specialty TEXT NOT NULL DEFAULT '',
    image TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_doctors_name ON doctors(name);

-- ============================================================================
-- Patient Records (scoped to one doctor)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patient_records (
    id TEXT PRIMARY KEY,
    doctor_id TEXT NOT NULL REFERENCES doctors(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    age TEXT NOT NULL DEFAULT '',
    test TEXT NOT NULL DEFAULT '',
    total REAL,                                  -- NULL reads back as 0
    discount REAL,
    received REAL,
    doctor_share REAL,
    date TEXT NOT NULL,                          -- YYYY-MM-DD as entered
    author_id TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_records_doctor_date ON patient_records(doctor_id, date);
CREATE INDEX IF NOT EXISTS idx_records_author ON patient_records(author_id);

-- ============================================================================
-- User Profiles (accounts live with the auth provider)
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    uid TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL,                          -- superadmin, admin
    approved INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role, approved);
"#;
