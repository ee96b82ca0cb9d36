//! Patient record operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::PatientRecord;
use crate::validation::ValidatedRecord;

const RECORD_COLUMNS: &str = "id, doctor_id, name, age, test, total, discount, received, \
                              doctor_share, date, author_id, created_at";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PatientRecord> {
    Ok(PatientRecord {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        test: row.get(4)?,
        total: amount(row.get(5)?),
        discount: amount(row.get(6)?),
        received: amount(row.get(7)?),
        doctor_share: amount(row.get(8)?),
        date: row.get(9)?,
        author_id: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Missing or non-finite stored amounts read back as zero.
fn amount(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl Database {
    /// File a validated record under a doctor.
    pub fn insert_record(
        &self,
        doctor_id: &str,
        validated: ValidatedRecord,
        author_id: &str,
    ) -> DbResult<PatientRecord> {
        if self.get_doctor(doctor_id)?.is_none() {
            return Err(DbError::NotFound(format!("doctor {}", doctor_id)));
        }

        let record = validated.into_record(
            uuid::Uuid::new_v4().to_string(),
            doctor_id.to_string(),
            author_id.to_string(),
            crate::models::timestamp_now(),
        );
        self.write_record(&record)?;

        tracing::info!(
            doctor_id = %doctor_id,
            record_id = %record.id,
            "Patient record added"
        );
        self.notify_records(doctor_id)?;
        Ok(record)
    }

    /// Replace the editable fields of an existing record. Author and
    /// creation time are kept.
    pub fn update_record(
        &self,
        doctor_id: &str,
        record_id: &str,
        validated: ValidatedRecord,
    ) -> DbResult<PatientRecord> {
        let existing = self
            .get_record(doctor_id, record_id)?
            .ok_or_else(|| DbError::NotFound(format!("record {}", record_id)))?;

        let record = validated.into_record(
            existing.id,
            existing.doctor_id,
            existing.author_id,
            existing.created_at,
        );
        self.conn.execute(
            r#"
            UPDATE patient_records SET
                name = ?3, age = ?4, test = ?5,
                total = ?6, discount = ?7, received = ?8, doctor_share = ?9,
                date = ?10
            WHERE id = ?1 AND doctor_id = ?2
            "#,
            params![
                record.id,
                record.doctor_id,
                record.name,
                record.age,
                record.test,
                record.total,
                record.discount,
                record.received,
                record.doctor_share,
                record.date,
            ],
        )?;

        tracing::info!(doctor_id = %doctor_id, record_id = %record_id, "Patient record updated");
        self.notify_records(doctor_id)?;
        Ok(record)
    }

    /// Get one record of a doctor.
    pub fn get_record(&self, doctor_id: &str, record_id: &str) -> DbResult<Option<PatientRecord>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM patient_records WHERE doctor_id = ?1 AND id = ?2",
                    RECORD_COLUMNS
                ),
                params![doctor_id, record_id],
                record_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// A doctor's records, most recent date first.
    pub fn list_patient_records(&self, doctor_id: &str) -> DbResult<Vec<PatientRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patient_records WHERE doctor_id = ? ORDER BY date DESC, created_at DESC",
            RECORD_COLUMNS
        ))?;
        let rows = stmt.query_map([doctor_id], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a record.
    pub fn delete_record(&self, doctor_id: &str, record_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM patient_records WHERE doctor_id = ? AND id = ?",
            [doctor_id, record_id],
        )?;
        if rows_affected > 0 {
            tracing::info!(doctor_id = %doctor_id, record_id = %record_id, "Patient record deleted");
            self.notify_records(doctor_id)?;
        }
        Ok(rows_affected > 0)
    }

    /// Import record documents exported from the hosted store.
    ///
    /// `json` is an array of record documents; amounts are coerced by the
    /// lenient model boundary, and documents are written as-is (no
    /// validation) so historic data survives. Returns the number imported.
    pub fn import_records_json(&self, doctor_id: &str, json: &str) -> DbResult<usize> {
        if self.get_doctor(doctor_id)?.is_none() {
            return Err(DbError::NotFound(format!("doctor {}", doctor_id)));
        }

        let documents: Vec<PatientRecord> = serde_json::from_str(json)?;
        let tx = self.conn.unchecked_transaction()?;
        for mut record in documents.iter().cloned() {
            record.doctor_id = doctor_id.to_string();
            if record.created_at.is_empty() {
                record.created_at = crate::models::timestamp_now();
            }
            self.write_record(&record)?;
        }
        tx.commit()?;

        tracing::info!(doctor_id = %doctor_id, count = documents.len(), "Imported patient records");
        self.notify_records(doctor_id)?;
        Ok(documents.len())
    }

    fn write_record(&self, record: &PatientRecord) -> DbResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO patient_records ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                RECORD_COLUMNS
            ),
            params![
                record.id,
                record.doctor_id,
                record.name,
                record.age,
                record.test,
                record.total,
                record.discount,
                record.received,
                record.doctor_share,
                record.date,
                record.author_id,
                record.created_at,
            ],
        )?;
        Ok(())
    }
}
