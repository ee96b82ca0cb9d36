//! Doctor roster operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Doctor;

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
        image: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    /// Insert a new doctor.
    pub fn insert_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO doctors (id, name, specialty, image, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                doctor.id,
                doctor.name,
                doctor.specialty,
                doctor.image,
                doctor.created_at,
            ],
        )?;
        tracing::info!(doctor_id = %doctor.id, "Doctor added");
        self.notify_doctors()?;
        Ok(())
    }

    /// Update name, specialty and image of an existing doctor.
    pub fn update_doctor(&self, doctor: &Doctor) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE doctors SET name = ?2, specialty = ?3, image = ?4 WHERE id = ?1",
            params![doctor.id, doctor.name, doctor.specialty, doctor.image],
        )?;
        if rows_affected > 0 {
            tracing::info!(doctor_id = %doctor.id, "Doctor updated");
            self.notify_doctors()?;
        }
        Ok(rows_affected > 0)
    }

    /// Get a doctor by ID.
    pub fn get_doctor(&self, id: &str) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                "SELECT id, name, specialty, image, created_at FROM doctors WHERE id = ?",
                [id],
                doctor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all doctors, in insertion order.
    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, specialty, image, created_at FROM doctors ORDER BY created_at, rowid",
        )?;
        let rows = stmt.query_map([], doctor_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Case-insensitive substring search on name or specialty.
    pub fn search_doctors(&self, term: &str) -> DbResult<Vec<Doctor>> {
        Ok(self
            .list_doctors()?
            .into_iter()
            .filter(|doctor| doctor.matches_search(term))
            .collect())
    }

    /// Delete a doctor and every record filed under them.
    ///
    /// Returns the number of records removed, or `None` if the doctor did
    /// not exist.
    pub fn delete_doctor(&self, id: &str) -> DbResult<Option<usize>> {
        let tx = self.conn.unchecked_transaction()?;
        let removed_records =
            tx.execute("DELETE FROM patient_records WHERE doctor_id = ?", [id])?;
        let removed_doctor = tx.execute("DELETE FROM doctors WHERE id = ?", [id])?;
        tx.commit()?;

        if removed_doctor == 0 {
            return Ok(None);
        }

        tracing::info!(doctor_id = %id, removed_records, "Doctor deleted");
        self.notify_doctors()?;
        self.notify_records(id)?;
        Ok(Some(removed_records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, RecordInput};
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let doctor = Doctor::new("Dr. Nadia".into(), "Pathology".into());
        db.insert_doctor(&doctor).unwrap();

        let retrieved = db.get_doctor(&doctor.id).unwrap().unwrap();
        assert_eq!(retrieved, doctor);
        assert!(db.get_doctor("missing").unwrap().is_none());
    }

    #[test]
    fn test_update_doctor() {
        let db = setup_db();
        let mut doctor = Doctor::new("Dr. Nadia".into(), "Pathology".into());
        db.insert_doctor(&doctor).unwrap();

        doctor.specialty = "Hematology".into();
        assert!(db.update_doctor(&doctor).unwrap());

        let retrieved = db.get_doctor(&doctor.id).unwrap().unwrap();
        assert_eq!(retrieved.specialty, "Hematology");

        let ghost = Doctor::new("Nobody".into(), String::new());
        assert!(!db.update_doctor(&ghost).unwrap());
    }

    #[test]
    fn test_search_doctors() {
        let db = setup_db();
        db.insert_doctor(&Doctor::new("Dr. Kamran".into(), "Cardiology".into()))
            .unwrap();
        db.insert_doctor(&Doctor::new("Dr. Rabia".into(), "Cardiac Surgery".into()))
            .unwrap();
        db.insert_doctor(&Doctor::new("Dr. Usman".into(), "Orthopedics".into()))
            .unwrap();

        assert_eq!(db.search_doctors("card").unwrap().len(), 2);
        assert_eq!(db.search_doctors("USMAN").unwrap().len(), 1);
        assert_eq!(db.search_doctors("").unwrap().len(), 3);
    }

    #[test]
    fn test_delete_doctor_cascades() {
        let db = setup_db();
        let doctor = Doctor::new("Dr. Nadia".into(), "Pathology".into());
        db.insert_doctor(&doctor).unwrap();

        let mut input = RecordInput::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        input.name = "Hamza".into();
        input.set_total("500");
        let validated = validate(&input).unwrap();
        db.insert_record(&doctor.id, validated, "u1").unwrap();

        assert_eq!(db.delete_doctor(&doctor.id).unwrap(), Some(1));
        assert!(db.get_doctor(&doctor.id).unwrap().is_none());
        assert!(db.list_patient_records(&doctor.id).unwrap().is_empty());
        assert_eq!(db.delete_doctor(&doctor.id).unwrap(), None);
    }
}
