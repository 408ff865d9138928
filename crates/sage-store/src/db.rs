use rusqlite::{Connection, Result};

/// Initialise the subjects table. Safe to call on every startup (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS subjects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            sub         TEXT NOT NULL,
            date        TEXT NOT NULL,
            syllabus    TEXT NOT NULL,
            difficulty  TEXT NOT NULL,
            comments    TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_subjects_date
            ON subjects(date, id);",
    )
}
