//! User profile operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Role, UserProfile};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let role: String = row.get(2)?;
    Ok(UserProfile {
        uid: row.get(0)?,
        email: row.get(1)?,
        role: Role::parse(&role),
        approved: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    /// Create the profile of a freshly signed-up administrator.
    ///
    /// The account starts unapproved. A uid or email already on file is
    /// rejected.
    pub fn register_admin(&self, uid: &str, email: &str) -> DbResult<UserProfile> {
        let email = email.trim().to_lowercase();
        if self.get_user(uid)?.is_some() || self.get_user_by_email(&email)?.is_some() {
            return Err(DbError::Constraint("User already exists.".into()));
        }

        let profile = UserProfile::pending_admin(uid.to_string(), email);
        self.conn.execute(
            "INSERT INTO users (uid, email, role, approved, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                profile.uid,
                profile.email,
                profile.role.as_str(),
                profile.approved,
                profile.created_at,
            ],
        )?;

        tracing::info!(uid = %profile.uid, "Administrator registered, awaiting approval");
        self.notify_users()?;
        Ok(profile)
    }

    /// Insert or replace a profile.
    pub fn upsert_user(&self, profile: &UserProfile) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (uid, email, role, approved, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(uid) DO UPDATE SET
                email = excluded.email,
                role = excluded.role,
                approved = excluded.approved
            "#,
            params![
                profile.uid,
                profile.email,
                profile.role.as_str(),
                profile.approved,
                profile.created_at,
            ],
        )?;
        tracing::info!(uid = %profile.uid, role = profile.role.as_str(), "User profile saved");
        self.notify_users()?;
        Ok(())
    }

    pub fn get_user(&self, uid: &str) -> DbResult<Option<UserProfile>> {
        self.conn
            .query_row(
                "SELECT uid, email, role, approved, created_at FROM users WHERE uid = ?",
                [uid],
                user_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_user_by_email(&self, email: &str) -> DbResult<Option<UserProfile>> {
        self.conn
            .query_row(
                "SELECT uid, email, role, approved, created_at FROM users WHERE email = ?",
                [email],
                user_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Whether any super-admin profile exists yet.
    pub fn has_superadmin(&self) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = 'superadmin'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Every administrator profile, approved or not, by email.
    pub fn list_admins(&self) -> DbResult<Vec<UserProfile>> {
        self.query_users(
            "SELECT uid, email, role, approved, created_at FROM users \
             WHERE role = 'admin' ORDER BY email",
        )
    }

    /// Administrators still awaiting approval, oldest first.
    pub fn list_pending_admins(&self) -> DbResult<Vec<UserProfile>> {
        self.query_users(
            "SELECT uid, email, role, approved, created_at FROM users \
             WHERE role = 'admin' AND approved = 0 ORDER BY created_at, email",
        )
    }

    fn query_users(&self, sql: &str) -> DbResult<Vec<UserProfile>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], user_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Mark an account approved.
    pub fn approve_user(&self, uid: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("UPDATE users SET approved = 1 WHERE uid = ?", [uid])?;
        if rows_affected > 0 {
            tracing::info!(uid = %uid, "Administrator approved");
            self.notify_users()?;
        }
        Ok(rows_affected > 0)
    }

    /// Discard a pending sign-up. Approved accounts are left alone.
    pub fn reject_user(&self, uid: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM users WHERE uid = ? AND approved = 0", [uid])?;
        if rows_affected > 0 {
            tracing::info!(uid = %uid, "Administrator sign-up rejected");
            self.notify_users()?;
        }
        Ok(rows_affected > 0)
    }

    /// Remove an administrator's profile. Super-admin profiles are never
    /// touched.
    pub fn remove_admin(&self, uid: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM users WHERE uid = ? AND role = 'admin'", [uid])?;
        if rows_affected > 0 {
            tracing::info!(uid = %uid, "Administrator removed");
            self.notify_users()?;
        }
        Ok(rows_affected > 0)
    }
}
