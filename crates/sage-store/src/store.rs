use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::debug;

use sage_core::types::{DifficultyLevel, NewSubject, Subject};

use crate::error::StoreError;

const DATE_FMT: &str = "%Y-%m-%d";

/// Holds all recorded exam subjects.
///
/// Thread-safe: wraps the SQLite connection in a Mutex. Records are
/// independent documents — no uniqueness constraints, no transactions.
pub struct SubjectStore {
    db: Mutex<Connection>,
}

impl SubjectStore {
    pub fn new(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    /// All subjects, earliest exam first.
    pub fn list(&self) -> Result<Vec<Subject>, StoreError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, sub, date, syllabus, difficulty, comments
             FROM subjects
             ORDER BY date, id",
        )?;
        let rows = stmt.query_map([], row_to_subject)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Insert a subject and return it with its assigned id.
    pub fn create(&self, new: NewSubject) -> Result<Subject, StoreError> {
        let db = self.db.lock().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO subjects (sub, date, syllabus, difficulty, comments, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                new.sub,
                new.date.format(DATE_FMT).to_string(),
                new.syllabus,
                new.difficulty.to_string(),
                new.comments,
                now,
            ],
        )?;
        let id = db.last_insert_rowid();
        debug!(id, sub = %new.sub, "subject created");

        Ok(Subject {
            id,
            sub: new.sub,
            date: new.date,
            syllabus: new.syllabus,
            difficulty: new.difficulty,
            comments: new.comments,
        })
    }

    /// Delete a subject by id, returning the deleted record.
    /// Unknown ids yield `StoreError::NotFound` rather than a silent no-op.
    pub fn delete(&self, id: i64) -> Result<Subject, StoreError> {
        let db = self.db.lock().unwrap();
        let subject = db
            .query_row(
                "SELECT id, sub, date, syllabus, difficulty, comments
                 FROM subjects WHERE id = ?1",
                rusqlite::params![id],
                row_to_subject,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound { id },
                other => StoreError::Database(other),
            })?;

        db.execute("DELETE FROM subjects WHERE id = ?1", rusqlite::params![id])?;
        debug!(id, "subject deleted");
        Ok(subject)
    }
}

fn row_to_subject(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subject> {
    let date_str: String = row.get(2)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let difficulty_str: String = row.get(4)?;
    let difficulty: DifficultyLevel = difficulty_str.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })?;

    Ok(Subject {
        id: row.get(0)?,
        sub: row.get(1)?,
        date,
        syllabus: row.get(3)?,
        difficulty,
        comments: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn store() -> SubjectStore {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        SubjectStore::new(conn)
    }

    fn math() -> NewSubject {
        NewSubject {
            sub: "Math".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            syllabus: "ch1-5".to_string(),
            difficulty: DifficultyLevel::Hard,
            comments: "algebra weak".to_string(),
        }
    }

    #[test]
    fn create_then_list_includes_record() {
        let store = store();
        let created = store.create(math()).unwrap();
        assert!(created.id > 0);

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].sub, "Math");
        assert_eq!(all[0].difficulty, DifficultyLevel::Hard);
        assert_eq!(all[0].comments, "algebra weak");
    }

    #[test]
    fn list_orders_by_exam_date() {
        let store = store();
        let mut later = math();
        later.sub = "History".to_string();
        later.date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        store.create(later).unwrap();
        store.create(math()).unwrap();

        let all = store.list().unwrap();
        assert_eq!(all[0].sub, "Math");
        assert_eq!(all[1].sub, "History");
    }

    #[test]
    fn delete_removes_record() {
        let store = store();
        let created = store.create(math()).unwrap();

        let deleted = store.delete(created.id).unwrap();
        assert_eq!(deleted.id, created.id);
        assert_eq!(deleted.sub, "Math");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let store = store();
        match store.delete(999) {
            Err(StoreError::NotFound { id }) => assert_eq!(id, 999),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn list_empty_store() {
        let store = store();
        assert!(store.list().unwrap().is_empty());
    }
}
