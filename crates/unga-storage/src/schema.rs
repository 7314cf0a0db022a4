//! Table and index creation.

use crate::error::StorageError;
use crate::similarity;
use crate::Result;
use rusqlite::Connection;

/// Create tables and indexes if absent and register the similarity function.
///
/// Safe to call on every start; existing rows are never touched.
pub fn ensure_schema(conn: &Connection, dimension: usize) -> Result<()> {
    conn.execute_batch(&schema_sql(dimension))
        .map_err(|e| StorageError::Schema(e.to_string()))?;

    match similarity::register(conn) {
        Ok(_) => {}
        Err(e) if e.to_string().contains("already exists") => {
            tracing::info!(error = %e, "Similarity function already registered, continuing");
        }
        Err(e) => return Err(StorageError::Schema(e.to_string())),
    }

    tracing::debug!(dimension, "Schema ready");
    Ok(())
}

/// Drop both tables and recreate them empty.
pub fn reset(conn: &Connection, dimension: usize) -> Result<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS speeches;
         DROP TABLE IF EXISTS analyses;",
    )?;
    tracing::warn!("Dropped speeches and analyses tables");
    ensure_schema(conn, dimension)
}

fn schema_sql(dimension: usize) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS speeches (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            country_code      TEXT NOT NULL,
            country_name      TEXT NOT NULL,
            region            TEXT NOT NULL,
            session           INTEGER NOT NULL,
            year              INTEGER NOT NULL,
            speech_text       TEXT NOT NULL,
            word_count        INTEGER NOT NULL,
            embedding         BLOB CHECK (embedding IS NULL OR length(embedding) = {bytes}),
            metadata          TEXT NOT NULL DEFAULT '{{}}',
            created_at        TEXT NOT NULL,
            is_african_member INTEGER NOT NULL DEFAULT 0,
            source_filename   TEXT
        );

        CREATE TABLE IF NOT EXISTS analyses (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            country          TEXT NOT NULL,
            classification   TEXT NOT NULL,
            speech_date      TEXT,
            created_at       TEXT NOT NULL,
            sdgs             TEXT NOT NULL DEFAULT '',
            africa_mentioned INTEGER NOT NULL DEFAULT 0,
            source_filename  TEXT,
            raw_text         TEXT NOT NULL,
            prompt_used      TEXT NOT NULL,
            output_markdown  TEXT NOT NULL,
            metadata         TEXT NOT NULL DEFAULT '{{}}'
        );

        CREATE INDEX IF NOT EXISTS idx_speeches_country ON speeches(country_code);
        CREATE INDEX IF NOT EXISTS idx_speeches_year ON speeches(year);
        CREATE INDEX IF NOT EXISTS idx_speeches_region ON speeches(region);
        CREATE INDEX IF NOT EXISTS idx_analyses_country ON analyses(country);
        CREATE INDEX IF NOT EXISTS idx_analyses_classification ON analyses(classification);
        "#,
        bytes = dimension * 4
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('speeches', 'analyses')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_ensure_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn, 4).unwrap();
        conn.execute(
            "INSERT INTO analyses (country, classification, created_at, raw_text, prompt_used, output_markdown)
             VALUES ('Kenya', 'African Member State', '2024-01-01T00:00:00Z', '', '', '')",
            [],
        )
        .unwrap();

        ensure_schema(&conn, 4).unwrap();
        assert_eq!(table_count(&conn), 2);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_indexes_created() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn, 4).unwrap();
        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 5);
    }

    #[test]
    fn test_embedding_width_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn, 4).unwrap();
        let insert = "INSERT INTO speeches (country_code, country_name, region, session, year,
                      speech_text, word_count, embedding, created_at)
                      VALUES ('KEN', 'Kenya', 'Africa', 79, 2024, 'x', 1, ?1, '2024-01-01T00:00:00Z')";
        assert!(conn.execute(insert, [vec![0u8; 16]]).is_ok());
        assert!(conn.execute(insert, [vec![0u8; 12]]).is_err());
    }

    #[test]
    fn test_reset_empties_tables() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn, 4).unwrap();
        conn.execute(
            "INSERT INTO analyses (country, classification, created_at, raw_text, prompt_used, output_markdown)
             VALUES ('Kenya', 'African Member State', '2024-01-01T00:00:00Z', '', '', '')",
            [],
        )
        .unwrap();

        reset(&conn, 4).unwrap();
        assert_eq!(table_count(&conn), 2);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }
}
