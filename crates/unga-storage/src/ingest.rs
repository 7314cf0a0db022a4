//! Speech file ingestion.
//!
//! Files are named `{ISO3}_{session}_{year}.txt`, e.g. `KEN_79_2024.txt`.

use crate::error::StorageError;
use crate::models::NewSpeech;
use crate::store::SpeechStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text normalised to English.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    /// Detected source language, when the translator knows it.
    pub source_language: Option<String>,
}

/// Normalises non-English speech text to English before storage.
pub trait Translator: Send + Sync {
    fn to_english(&self, text: &str) -> Result<Translation>;
}

/// Stores text as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn to_english(&self, text: &str) -> Result<Translation> {
        Ok(Translation {
            text: text.to_string(),
            source_language: None,
        })
    }
}

/// Outcome counts for a directory import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Split `KEN_79_2024.txt` into `("KEN", 79, 2024)`.
pub fn parse_filename(filename: &str) -> Option<(String, i64, i64)> {
    let stem = filename.strip_suffix(".txt").unwrap_or(filename);
    let mut parts = stem.split('_');
    let (code, session, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || code.is_empty() {
        return None;
    }
    Some((
        code.to_uppercase(),
        session.parse().ok()?,
        year.parse().ok()?,
    ))
}

fn is_skipped(filename: &str) -> bool {
    matches!(filename.to_lowercase().as_str(), "readme.txt" | "readme.md")
}

/// Reads speech files into a store.
pub struct Ingestor<'a> {
    store: &'a SpeechStore,
    translator: Box<dyn Translator>,
}

impl<'a> Ingestor<'a> {
    pub fn new(store: &'a SpeechStore) -> Self {
        Self {
            store,
            translator: Box::new(PassthroughTranslator),
        }
    }

    /// Use a translator other than passthrough.
    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Ingest one file, returning the new speech id.
    pub fn ingest_file(&self, path: &Path) -> Result<i64> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::InvalidInput(format!("No file name in {}", path.display())))?;
        let (code, session, year) = parse_filename(filename).ok_or_else(|| {
            StorageError::InvalidInput(format!("Invalid filename format: {}", filename))
        })?;

        let text = std::fs::read_to_string(path)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(StorageError::InvalidInput(format!("Empty file: {}", filename)));
        }

        if self.store.speech_exists(&code, session, year)? {
            tracing::warn!(
                country = %code,
                session,
                year,
                file = filename,
                "Speech already stored for this country, session, and year"
            );
        }

        let translation = self.translator.to_english(text)?;
        let mut speech =
            NewSpeech::from_code(&code, session, year, translation.text).with_source(filename);
        if let Some(language) = translation.source_language {
            tracing::info!(file = filename, language = %language, "Translated speech to English");
            speech = speech.with_metadata("source_language", serde_json::Value::String(language));
        }

        let id = self.store.save_speech(&speech)?;
        tracing::info!(
            file = filename,
            country = %speech.country_name,
            code = %speech.country_code,
            "Ingested speech"
        );
        Ok(id)
    }

    /// Ingest every `*.txt` in `dir` (not recursive), counting outcomes.
    ///
    /// Per-file failures are logged and counted, never returned.
    pub fn ingest_directory(&self, dir: &Path) -> Result<IngestStats> {
        if !dir.is_dir() {
            return Err(StorageError::InvalidInput(format!(
                "Directory does not exist: {}",
                dir.display()
            )));
        }

        let mut files: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().map_or(false, |ext| ext == "txt"))
            .collect();
        files.sort();

        let mut stats = IngestStats {
            total_files: files.len(),
            ..Default::default()
        };
        tracing::info!(files = files.len(), dir = %dir.display(), "Found speech files to ingest");

        for path in &files {
            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if is_skipped(filename) {
                stats.skipped += 1;
                continue;
            }
            match self.ingest_file(path) {
                Ok(_) => stats.successful += 1,
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "Failed to ingest speech");
                    stats.failed += 1;
                }
            }
        }

        tracing::info!(
            total = stats.total_files,
            successful = stats.successful,
            failed = stats.failed,
            skipped = stats.skipped,
            "Ingestion complete"
        );
        Ok(stats)
    }
}
