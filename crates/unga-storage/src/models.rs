//! Row types for speeches and analyses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unga_core::reference::{self, Classification};

/// A speech to be written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSpeech {
    /// ISO3 country code.
    pub country_code: String,

    /// Display name.
    pub country_name: String,

    /// Region label.
    pub region: String,

    /// General Assembly session number.
    pub session: i64,

    /// Calendar year.
    pub year: i64,

    /// Full (English) text.
    pub speech_text: String,

    /// Originating file, if any.
    pub source_filename: Option<String>,

    /// African Union membership.
    pub is_african_member: bool,

    /// Free-form metadata.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl NewSpeech {
    /// Build a speech, resolving name, region, and AU membership from the code.
    pub fn from_code(
        country_code: &str,
        session: i64,
        year: i64,
        speech_text: impl Into<String>,
    ) -> Self {
        let code = country_code.trim().to_uppercase();
        let country_name = reference::country_name(&code);
        Self {
            region: reference::region_for_code(&code).to_string(),
            is_african_member: reference::is_african_member_state(&country_name),
            country_code: code,
            country_name,
            session,
            year,
            speech_text: speech_text.into(),
            source_filename: None,
            metadata: serde_json::Map::new(),
        }
    }

    /// Set the source filename.
    pub fn with_source(mut self, filename: impl Into<String>) -> Self {
        self.source_filename = Some(filename.into());
        self
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Whitespace token count, fixed at write time.
    pub fn word_count(&self) -> i64 {
        self.speech_text.split_whitespace().count() as i64
    }
}

/// A stored speech, without its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub id: i64,
    pub country_code: String,
    pub country_name: String,
    pub region: String,
    pub session: i64,
    pub year: i64,
    pub speech_text: String,
    pub word_count: i64,
    pub source_filename: Option<String>,
    pub is_african_member: bool,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A speech returned from a similarity-ranked query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechHit {
    #[serde(flatten)]
    pub speech: SpeechRecord,

    /// Cosine similarity to the query, in [-1, 1].
    pub similarity: f32,
}

/// One country's speech in a per-region listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub country_code: String,
    pub country_name: String,
    pub word_count: i64,
    pub is_african_member: bool,
    pub year: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// An analysis to be written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnalysis {
    pub country: String,
    pub classification: Classification,
    pub speech_date: Option<String>,
    /// Goal numbers, 1..=17.
    #[serde(default)]
    pub sdgs: Vec<u8>,
    pub africa_mentioned: bool,
    pub source_filename: Option<String>,
    pub raw_text: String,
    pub prompt_used: String,
    pub output_markdown: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl NewAnalysis {
    /// Build an analysis, deriving classification, SDGs, and the Africa flag.
    ///
    /// SDGs and the Africa flag are read from the generated output.
    pub fn derive(
        country: impl Into<String>,
        raw_text: impl Into<String>,
        prompt_used: impl Into<String>,
        output_markdown: impl Into<String>,
    ) -> Self {
        let country = country.into();
        let output_markdown = output_markdown.into();
        Self {
            classification: reference::infer_classification(&country),
            sdgs: reference::extract_sdgs(&output_markdown),
            africa_mentioned: reference::detect_africa_mention(&output_markdown),
            country,
            speech_date: None,
            source_filename: None,
            raw_text: raw_text.into(),
            prompt_used: prompt_used.into(),
            output_markdown,
            metadata: serde_json::Map::new(),
        }
    }
}

/// A stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub country: String,
    pub classification: Classification,
    pub speech_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sdgs: Vec<u8>,
    pub africa_mentioned: bool,
    pub source_filename: Option<String>,
    pub raw_text: String,
    pub prompt_used: String,
    pub output_markdown: String,
    pub metadata: serde_json::Value,
}

/// Filters for listing analyses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisFilter {
    /// Case-insensitive substring of the country name.
    pub country: Option<String>,

    /// Exact classification.
    pub classification: Option<Classification>,

    /// Africa-mentioned flag.
    pub africa_mentioned: Option<bool>,

    /// Substring of country, raw text, or output.
    pub search_text: Option<String>,
}
