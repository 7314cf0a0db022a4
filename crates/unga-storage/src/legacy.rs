//! Import from the older two-table SQLite layout (`speech_data`, `analyses`).

use crate::analyses::parse_sdg_column;
use crate::error::StorageError;
use crate::models::{NewAnalysis, NewSpeech};
use crate::store::SpeechStore;
use crate::Result;
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::Path;
use unga_core::reference;
use unga_core::Classification;

/// Rows copied and rows rejected per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyImportStats {
    pub speeches_imported: usize,
    pub speeches_failed: usize,
    pub analyses_imported: usize,
    pub analyses_failed: usize,
}

struct LegacySpeech {
    country_code: String,
    country_name: Option<String>,
    region: Option<String>,
    session: i64,
    year: i64,
    speech_text: String,
    source_filename: Option<String>,
    is_african_member: Option<bool>,
}

struct LegacyAnalysis {
    country: String,
    classification: Option<String>,
    speech_date: Option<String>,
    sdgs: Option<String>,
    africa_mentioned: Option<bool>,
    source_filename: Option<String>,
    raw_text: Option<String>,
    prompt_used: Option<String>,
    output_markdown: Option<String>,
}

fn has_table(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n > 0)
}

impl SpeechStore {
    /// Copy speeches and analyses out of a legacy database file.
    ///
    /// Speeches are re-embedded with the current provider. Rows that cannot be
    /// read or saved are logged and counted, and the import continues.
    pub fn import_legacy(&self, path: &Path) -> Result<LegacyImportStats> {
        let legacy = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stats = LegacyImportStats::default();
        tracing::info!(path = %path.display(), "Starting legacy import");

        if has_table(&legacy, "speech_data")? {
            let mut stmt = legacy.prepare(
                "SELECT country_code, country_name, region, session, year,
                        speech_text, source_filename, is_african_member
                 FROM speech_data",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(LegacySpeech {
                    country_code: row.get(0)?,
                    country_name: row.get(1)?,
                    region: row.get(2)?,
                    session: row.get(3)?,
                    year: row.get(4)?,
                    speech_text: row.get(5)?,
                    source_filename: row.get(6)?,
                    is_african_member: row.get(7)?,
                })
            })?;

            for row in rows {
                let saved = row
                    .map_err(StorageError::from)
                    .and_then(|legacy| self.save_speech(&legacy.into_speech()));
                match saved {
                    Ok(_) => stats.speeches_imported += 1,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to import legacy speech");
                        stats.speeches_failed += 1;
                    }
                }
            }
        } else {
            tracing::warn!("Legacy database has no speech_data table");
        }

        if has_table(&legacy, "analyses")? {
            let mut stmt = legacy.prepare(
                "SELECT country, classification, speech_date, sdgs, africa_mentioned,
                        source_filename, raw_text, prompt_used, output_markdown
                 FROM analyses",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(LegacyAnalysis {
                    country: row.get(0)?,
                    classification: row.get(1)?,
                    speech_date: row.get(2)?,
                    sdgs: row.get(3)?,
                    africa_mentioned: row.get(4)?,
                    source_filename: row.get(5)?,
                    raw_text: row.get(6)?,
                    prompt_used: row.get(7)?,
                    output_markdown: row.get(8)?,
                })
            })?;

            for row in rows {
                let saved = row
                    .map_err(StorageError::from)
                    .and_then(|legacy| self.save_analysis(&legacy.into_analysis()));
                match saved {
                    Ok(_) => stats.analyses_imported += 1,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to import legacy analysis");
                        stats.analyses_failed += 1;
                    }
                }
            }
        }

        tracing::info!(
            speeches = stats.speeches_imported,
            analyses = stats.analyses_imported,
            failed = stats.speeches_failed + stats.analyses_failed,
            "Legacy import complete"
        );
        Ok(stats)
    }
}

impl LegacySpeech {
    fn into_speech(self) -> NewSpeech {
        let mut speech =
            NewSpeech::from_code(&self.country_code, self.session, self.year, self.speech_text);
        if let Some(name) = self.country_name.filter(|n| !n.trim().is_empty()) {
            speech.country_name = name;
        }
        if let Some(region) = self.region.filter(|r| !r.trim().is_empty()) {
            speech.region = region;
        }
        speech.is_african_member = self
            .is_african_member
            .unwrap_or_else(|| reference::is_african_member_state(&speech.country_name));
        speech.source_filename = self.source_filename;
        speech
    }
}

impl LegacyAnalysis {
    fn into_analysis(self) -> NewAnalysis {
        let classification = self
            .classification
            .as_deref()
            .and_then(|c| c.parse::<Classification>().ok())
            .unwrap_or_else(|| reference::infer_classification(&self.country));
        NewAnalysis {
            classification,
            speech_date: self.speech_date,
            sdgs: parse_sdg_column(self.sdgs.as_deref().unwrap_or_default()),
            africa_mentioned: self.africa_mentioned.unwrap_or(false),
            source_filename: self.source_filename,
            raw_text: self.raw_text.unwrap_or_default(),
            prompt_used: self.prompt_used.unwrap_or_default(),
            output_markdown: self.output_markdown.unwrap_or_default(),
            metadata: serde_json::Map::new(),
            country: self.country,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisFilter;
    use crate::query::SpeechFilter;
    use crate::store::tests::hash_store;

    fn legacy_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE speech_data (
                 id INTEGER PRIMARY KEY, country_code TEXT, country_name TEXT, region TEXT,
                 session INTEGER, year INTEGER, speech_text TEXT, word_count INTEGER,
                 source_filename TEXT, is_african_member BOOLEAN
             );
             INSERT INTO speech_data VALUES
                 (1, 'GHA', 'Ghana', 'Africa', 78, 2023, 'Ghana speaks.', 2, 'GHA_78_2023.txt', 1),
                 (2, 'JPN', NULL, NULL, 78, 2023, 'Japan speaks.', 2, NULL, NULL),
                 (3, 'BAD', 'Bad', 'Nowhere', 78, 2023, NULL, 0, NULL, 0);
             CREATE TABLE analyses (
                 id INTEGER PRIMARY KEY, country TEXT, classification TEXT, speech_date TEXT,
                 sdgs TEXT, africa_mentioned BOOLEAN, source_filename TEXT, raw_text TEXT,
                 prompt_used TEXT, output_markdown TEXT
             );
             INSERT INTO analyses VALUES
                 (1, 'Ghana', 'African Member State', '2023-09-20', '13, 4', 1, NULL, 'raw', 'p', 'out'),
                 (2, 'Japan', 'bogus', NULL, NULL, 0, NULL, 'raw', 'p', 'out');",
        )
        .unwrap();
    }

    #[test]
    fn test_import_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyses.db");
        legacy_db(&path);

        let store = hash_store();
        let stats = store.import_legacy(&path).unwrap();
        assert_eq!(
            stats,
            LegacyImportStats {
                speeches_imported: 2,
                speeches_failed: 1,
                analyses_imported: 2,
                analyses_failed: 0,
            }
        );

        let japan = store
            .search_speeches(&SpeechFilter::new().with_countries(["JPN"]), 10)
            .unwrap();
        assert_eq!(japan[0].country_name, "Japan");
        assert_eq!(japan[0].region, "Asia");
        assert!(!japan[0].is_african_member);

        let analyses = store.list_analyses(&AnalysisFilter::default(), 10, 0).unwrap();
        let ghana = analyses.iter().find(|a| a.country == "Ghana").unwrap();
        assert_eq!(ghana.sdgs, vec![4, 13]);
        let japan = analyses.iter().find(|a| a.country == "Japan").unwrap();
        assert_eq!(japan.classification, Classification::DevelopmentPartner);
    }

    #[test]
    fn test_import_missing_file_fails() {
        let store = hash_store();
        assert!(store.import_legacy(Path::new("/nonexistent/legacy.db")).is_err());
    }
}
