//! SQLite-backed speech store.

use crate::embeddings::{select_provider, EmbeddingProvider};
use crate::error::StorageError;
use crate::models::{CountryEntry, NewSpeech, SpeechHit, SpeechRecord};
use crate::query::{order_clause, SpeechFilter};
use crate::schema;
use crate::similarity::{decode_embedding, encode_embedding, SIMILARITY_FUNCTION};
use crate::Result;
use chrono::Utc;
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use unga_core::config::SearchConfig;
use unga_core::Config;

pub(crate) const SPEECH_COLUMNS: &str = "id, country_code, country_name, region, session, year, \
     speech_text, word_count, source_filename, is_african_member, metadata, created_at";

/// Query tuning shared by every retrieval operation.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub default_limit: usize,
    pub similarity_threshold: f32,
    pub similar_threshold: f32,
    pub systematic_order_above: usize,
    pub year_range_min: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for StoreOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            default_limit: config.default_limit,
            similarity_threshold: config.similarity_threshold,
            similar_threshold: config.similar_threshold,
            systematic_order_above: config.systematic_order_above,
            year_range_min: config.year_range_min,
        }
    }
}

/// Persistent store for speeches and analyses.
///
/// Owns a single connection; every operation locks it for its duration.
pub struct SpeechStore {
    conn: Mutex<Connection>,
    embeddings: Box<dyn EmbeddingProvider>,
    options: StoreOptions,
    path: Option<PathBuf>,
}

impl SpeechStore {
    /// Open (or create) a database file and ensure the schema.
    pub fn open(
        path: impl AsRef<Path>,
        embeddings: Box<dyn EmbeddingProvider>,
        options: StoreOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn, embeddings, options, Some(path.to_path_buf()))?;
        tracing::info!(
            path = %path.display(),
            provider = store.embeddings.name(),
            "Opened speech store"
        );
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(
        embeddings: Box<dyn EmbeddingProvider>,
        options: StoreOptions,
    ) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, embeddings, options, None)
    }

    /// Open the database named by the configuration with its embedding provider.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config.db_path()?;
        let embeddings = select_provider(&config.embeddings);
        Self::open(path, embeddings, StoreOptions::from(&config.search))
    }

    fn with_connection(
        conn: Connection,
        embeddings: Box<dyn EmbeddingProvider>,
        options: StoreOptions,
        path: Option<PathBuf>,
    ) -> Result<Self> {
        schema::ensure_schema(&conn, embeddings.dimension())?;
        Ok(Self {
            conn: Mutex::new(conn),
            embeddings,
            options,
            path,
        })
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Database file, or `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn embeddings(&self) -> &dyn EmbeddingProvider {
        self.embeddings.as_ref()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Re-run schema creation. A no-op on an initialised database.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::ensure_schema(&conn, self.embeddings.dimension())
    }

    /// Drop every speech and analysis.
    pub fn reset(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::reset(&conn, self.embeddings.dimension())
    }

    /// Embed and insert a speech, returning its id.
    pub fn save_speech(&self, speech: &NewSpeech) -> Result<i64> {
        if speech.country_code.trim().is_empty() {
            return Err(StorageError::InvalidInput("country code is empty".to_string()));
        }

        let embedding = self.embeddings.embed(&speech.speech_text)?;
        if embedding.len() != self.embeddings.dimension() {
            return Err(StorageError::Embedding(format!(
                "Expected {} dimensions, got {}",
                self.embeddings.dimension(),
                embedding.len()
            )));
        }
        let metadata = serde_json::to_string(&speech.metadata)?;
        let word_count = speech.word_count();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO speeches (country_code, country_name, region, session, year, speech_text,
                                   word_count, embedding, metadata, created_at, is_african_member,
                                   source_filename)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                speech.country_code.trim().to_uppercase(),
                speech.country_name,
                speech.region,
                speech.session,
                speech.year,
                speech.speech_text,
                word_count,
                encode_embedding(&embedding),
                metadata,
                Utc::now(),
                speech.is_african_member,
                speech.source_filename,
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::info!(
            id,
            country = %speech.country_code,
            year = speech.year,
            word_count,
            "Saved speech"
        );
        Ok(id)
    }

    /// Fetch one speech by id.
    pub fn get_speech(&self, id: i64) -> Result<Option<SpeechRecord>> {
        let conn = self.lock()?;
        let speech = conn
            .query_row(
                &format!("SELECT {SPEECH_COLUMNS} FROM speeches WHERE id = ?1"),
                [id],
                speech_from_row,
            )
            .optional()?;
        Ok(speech)
    }

    /// Whether a speech with this country, session, and year is already stored.
    pub fn speech_exists(&self, country_code: &str, session: i64, year: i64) -> Result<bool> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM speeches WHERE country_code = ?1 AND session = ?2 AND year = ?3 LIMIT 1",
                rusqlite::params![country_code.trim().to_uppercase(), session, year],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Filtered search, at most `limit` rows.
    ///
    /// Small limits sample randomly; larger ones are ordered by year then name.
    pub fn search_speeches(&self, filter: &SpeechFilter, limit: usize) -> Result<Vec<SpeechRecord>> {
        let predicate = filter.predicate(self.options.year_range_min);
        let sql = format!(
            "SELECT {SPEECH_COLUMNS} FROM speeches WHERE {} ORDER BY {} LIMIT ?",
            predicate.sql(),
            order_clause(limit, self.options.systematic_order_above)
        );
        let mut params = predicate.params;
        params.push(Value::Integer(limit as i64));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), speech_from_row)?;
        let speeches = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(results = speeches.len(), limit, "Speech search");
        Ok(speeches)
    }

    /// Rank speeches by similarity to `query`, dropping rows below `threshold`.
    ///
    /// The text predicate of `filter` is ignored. When the embedding provider
    /// has no semantic meaning this degrades to a text search for `query`,
    /// and every hit carries a similarity of 0.0.
    pub fn semantic_search(
        &self,
        query: &str,
        filter: &SpeechFilter,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<SpeechHit>> {
        let filter = filter.without_text();

        if !self.embeddings.is_semantic() {
            tracing::info!(
                provider = self.embeddings.name(),
                "Semantic search unavailable, falling back to text search"
            );
            let speeches = self.search_speeches(&filter.with_text(query), limit)?;
            return Ok(speeches
                .into_iter()
                .map(|speech| SpeechHit {
                    speech,
                    similarity: 0.0,
                })
                .collect());
        }

        let embedding = self.embeddings.embed(query)?;
        let hits = self.ranked(&embedding, &filter, None, limit, threshold)?;
        tracing::info!(results = hits.len(), threshold, "Semantic search");
        Ok(hits)
    }

    /// Speeches most similar to the stored speech `id`, excluding itself.
    ///
    /// An unknown id yields no results.
    pub fn find_similar_speeches(
        &self,
        id: i64,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<SpeechHit>> {
        let blob: Option<Option<Vec<u8>>> = {
            let conn = self.lock()?;
            conn.query_row("SELECT embedding FROM speeches WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?
        };

        let Some(Some(blob)) = blob else {
            tracing::debug!(id, "No stored embedding for speech");
            return Ok(Vec::new());
        };

        self.ranked(
            &decode_embedding(&blob),
            &SpeechFilter::default(),
            Some(id),
            limit,
            threshold,
        )
    }

    fn ranked(
        &self,
        embedding: &[f32],
        filter: &SpeechFilter,
        exclude: Option<i64>,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<SpeechHit>> {
        let predicate = filter.predicate(self.options.year_range_min);
        let exclusion = if exclude.is_some() { " AND id != ?" } else { "" };
        let sql = format!(
            "SELECT {SPEECH_COLUMNS}, similarity FROM (
                 SELECT {SPEECH_COLUMNS}, {SIMILARITY_FUNCTION}(embedding, ?) AS similarity
                 FROM speeches
                 WHERE embedding IS NOT NULL AND {}{exclusion}
             )
             WHERE similarity >= ?
             ORDER BY similarity DESC, id
             LIMIT ?",
            predicate.sql()
        );

        let mut params = Vec::with_capacity(predicate.params.len() + 4);
        params.push(Value::Blob(encode_embedding(embedding)));
        params.extend(predicate.params);
        if let Some(id) = exclude {
            params.push(Value::Integer(id));
        }
        params.push(Value::Real(f64::from(threshold)));
        params.push(Value::Integer(limit as i64));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), |row| {
            Ok(SpeechHit {
                speech: speech_from_row(row)?,
                similarity: row.get::<_, f64>(12)? as f32,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All speeches, optionally narrowed to one country and/or year.
    pub fn speeches_by_country(
        &self,
        country_code: Option<&str>,
        year: Option<i64>,
    ) -> Result<Vec<SpeechRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SPEECH_COLUMNS} FROM speeches
             WHERE (?1 IS NULL OR country_code = ?1) AND (?2 IS NULL OR year = ?2)
             ORDER BY year DESC, country_name"
        ))?;
        let code = country_code.map(|c| c.trim().to_uppercase());
        let rows = stmt.query_map(rusqlite::params![code, year], speech_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Speeches of one year grouped by region.
    pub fn countries_by_region(&self, year: i64) -> Result<BTreeMap<String, Vec<CountryEntry>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT region, country_code, country_name, word_count, is_african_member, year, created_at
             FROM speeches WHERE year = ?1
             ORDER BY region, country_name",
        )?;
        let rows = stmt.query_map([year], |row| {
            Ok((
                row.get::<_, String>(0)?,
                CountryEntry {
                    country_code: row.get(1)?,
                    country_name: row.get(2)?,
                    word_count: row.get(3)?,
                    is_african_member: row.get(4)?,
                    year: row.get(5)?,
                    uploaded_at: row.get(6)?,
                },
            ))
        })?;

        let mut regions: BTreeMap<String, Vec<CountryEntry>> = BTreeMap::new();
        for row in rows {
            let (region, entry) = row?;
            regions.entry(region).or_default().push(entry);
        }
        Ok(regions)
    }

    /// Years with at least one speech, newest first.
    pub fn available_years(&self) -> Result<Vec<i64>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT year FROM speeches ORDER BY year DESC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Regions with at least one speech, alphabetically.
    pub fn available_regions(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT region FROM speeches ORDER BY region")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

/// Parse a JSON TEXT column, reporting failures as a conversion error.
pub(crate) fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
    let text: Option<String> = row.get(idx)?;
    match text.as_deref() {
        None | Some("") => Ok(serde_json::Value::Object(Default::default())),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

fn speech_from_row(row: &Row<'_>) -> rusqlite::Result<SpeechRecord> {
    Ok(SpeechRecord {
        id: row.get(0)?,
        country_code: row.get(1)?,
        country_name: row.get(2)?,
        region: row.get(3)?,
        session: row.get(4)?,
        year: row.get(5)?,
        speech_text: row.get(6)?,
        word_count: row.get(7)?,
        source_filename: row.get(8)?,
        is_african_member: row.get(9)?,
        metadata: json_column(row, 10)?,
        created_at: row.get(11)?,
    })
}
