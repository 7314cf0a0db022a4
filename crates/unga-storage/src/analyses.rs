//! Persistence for AI-generated speech analyses.

use crate::models::{AnalysisFilter, AnalysisRecord, NewAnalysis};
use crate::query::{contains_clause, like_pattern};
use crate::store::{json_column, SpeechStore};
use crate::Result;
use chrono::Utc;
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, OptionalExtension, Row};
use unga_core::Classification;

const ANALYSIS_COLUMNS: &str = "id, country, classification, speech_date, created_at, sdgs, \
     africa_mentioned, source_filename, raw_text, prompt_used, output_markdown, metadata";

/// Comma-separated goal numbers, e.g. `1,13`.
pub fn format_sdg_column(sdgs: &[u8]) -> String {
    let mut sdgs = sdgs.to_vec();
    sdgs.sort_unstable();
    sdgs.dedup();
    sdgs.iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a stored SDG column, skipping anything outside 1..=17.
pub fn parse_sdg_column(value: &str) -> Vec<u8> {
    let mut sdgs: Vec<u8> = value
        .split(',')
        .filter_map(|s| s.trim().parse::<u8>().ok())
        .filter(|n| (1..=unga_core::reference::SDG_COUNT).contains(n))
        .collect();
    sdgs.sort_unstable();
    sdgs.dedup();
    sdgs
}

impl SpeechStore {
    /// Insert an analysis, returning its id.
    pub fn save_analysis(&self, analysis: &NewAnalysis) -> Result<i64> {
        let metadata = serde_json::to_string(&analysis.metadata)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO analyses (country, classification, speech_date, created_at, sdgs,
                                   africa_mentioned, source_filename, raw_text, prompt_used,
                                   output_markdown, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                analysis.country,
                analysis.classification.as_str(),
                analysis.speech_date,
                Utc::now(),
                format_sdg_column(&analysis.sdgs),
                analysis.africa_mentioned,
                analysis.source_filename,
                analysis.raw_text,
                analysis.prompt_used,
                analysis.output_markdown,
                metadata,
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(
            id,
            country = %analysis.country,
            classification = %analysis.classification,
            "Saved analysis"
        );
        Ok(id)
    }

    /// Fetch one analysis by id.
    pub fn get_analysis(&self, id: i64) -> Result<Option<AnalysisRecord>> {
        let conn = self.lock()?;
        let analysis = conn
            .query_row(
                &format!("SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE id = ?1"),
                [id],
                analysis_from_row,
            )
            .optional()?;
        Ok(analysis)
    }

    /// List analyses newest first.
    pub fn list_analyses(
        &self,
        filter: &AnalysisFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AnalysisRecord>> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(country) = filter.country.as_deref().filter(|c| !c.trim().is_empty()) {
            clauses.push(contains_clause("country"));
            params.push(Value::Text(like_pattern(country.trim())));
        }
        if let Some(classification) = filter.classification {
            clauses.push("classification = ?".to_string());
            params.push(Value::Text(classification.as_str().to_string()));
        }
        if let Some(mentioned) = filter.africa_mentioned {
            clauses.push("africa_mentioned = ?".to_string());
            params.push(Value::Integer(i64::from(mentioned)));
        }
        if let Some(text) = filter.search_text.as_deref().filter(|t| !t.trim().is_empty()) {
            clauses.push(format!(
                "({} OR {} OR {})",
                contains_clause("country"),
                contains_clause("raw_text"),
                contains_clause("output_markdown")
            ));
            let pattern = like_pattern(text.trim());
            params.extend(std::iter::repeat(Value::Text(pattern)).take(3));
        }

        let predicate = if clauses.is_empty() {
            "1=1".to_string()
        } else {
            clauses.join(" AND ")
        };
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(offset as i64));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE {predicate}
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))?;
        let rows = stmt.query_map(params_from_iter(params), analysis_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete an analysis. Returns whether a row was removed.
    pub fn delete_analysis(&self, id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM analyses WHERE id = ?1", [id])?;
        if removed > 0 {
            tracing::info!(id, "Deleted analysis");
        }
        Ok(removed > 0)
    }
}

fn analysis_from_row(row: &Row<'_>) -> rusqlite::Result<AnalysisRecord> {
    let classification: String = row.get(2)?;
    let classification = classification
        .parse::<Classification>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;
    let sdgs: Option<String> = row.get(5)?;

    Ok(AnalysisRecord {
        id: row.get(0)?,
        country: row.get(1)?,
        classification,
        speech_date: row.get(3)?,
        created_at: row.get(4)?,
        sdgs: parse_sdg_column(sdgs.as_deref().unwrap_or_default()),
        africa_mentioned: row.get(6)?,
        source_filename: row.get(7)?,
        raw_text: row.get(8)?,
        prompt_used: row.get(9)?,
        output_markdown: row.get(10)?,
        metadata: json_column(row, 11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::hash_store;

    fn analysis(country: &str, output: &str) -> NewAnalysis {
        NewAnalysis::derive(country, format!("{country} speech"), "Summarise", output)
    }

    #[test]
    fn test_save_get_delete() {
        let store = hash_store();
        let mut new = analysis("Ghana", "Ghana spoke on climate change and quality education.");
        new.speech_date = Some("2024-09-24".to_string());
        new.metadata.insert("model".into(), serde_json::json!("gpt"));
        let id = store.save_analysis(&new).unwrap();

        let stored = store.get_analysis(id).unwrap().unwrap();
        assert_eq!(stored.country, "Ghana");
        assert_eq!(stored.classification, Classification::AfricanMemberState);
        assert_eq!(stored.sdgs, vec![4, 13]);
        assert_eq!(stored.speech_date.as_deref(), Some("2024-09-24"));
        assert_eq!(stored.metadata["model"], "gpt");

        assert!(store.delete_analysis(id).unwrap());
        assert!(!store.delete_analysis(id).unwrap());
        assert!(store.get_analysis(id).unwrap().is_none());
    }

    #[test]
    fn test_list_filters_and_order() {
        let store = hash_store();
        let kenya = store
            .save_analysis(&analysis("Kenya", "Kenya urged the African Union to act."))
            .unwrap();
        let japan = store
            .save_analysis(&analysis("Japan", "Japan discussed clean energy."))
            .unwrap();
        let brazil = store
            .save_analysis(&analysis("Brazil", "Brazil praised Africa's growth."))
            .unwrap();

        let all = store.list_analyses(&AnalysisFilter::default(), 10, 0).unwrap();
        assert_eq!(
            all.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![brazil, japan, kenya]
        );

        let african = store
            .list_analyses(
                &AnalysisFilter {
                    classification: Some(Classification::AfricanMemberState),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(african.len(), 1);
        assert_eq!(african[0].id, kenya);

        let mentioned = store
            .list_analyses(
                &AnalysisFilter {
                    africa_mentioned: Some(true),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(mentioned.len(), 2);

        let by_country = store
            .list_analyses(
                &AnalysisFilter {
                    country: Some("jap".into()),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(by_country[0].id, japan);

        let by_text = store
            .list_analyses(
                &AnalysisFilter {
                    search_text: Some("clean energy".into()),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(by_text.len(), 1);

        let page = store.list_analyses(&AnalysisFilter::default(), 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, japan);
    }

    #[test]
    fn test_list_matches_accents_and_literal_wildcards() {
        let store = hash_store();
        let ivory = store
            .save_analysis(&analysis("Côte d'Ivoire", "CÔTE D'IVOIRE reached 100% enrolment."))
            .unwrap();
        store
            .save_analysis(&analysis("Chad", "Chad reached 1000 schools."))
            .unwrap();

        let by_country = store
            .list_analyses(
                &AnalysisFilter {
                    country: Some("CÔTE".into()),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(by_country.len(), 1);
        assert_eq!(by_country[0].id, ivory);

        let accented = store
            .list_analyses(
                &AnalysisFilter {
                    search_text: Some("côte d'ivoire reached".into()),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(accented.len(), 1);

        let percent = store
            .list_analyses(
                &AnalysisFilter {
                    search_text: Some("100%".into()),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].id, ivory);

        let underscore = store
            .list_analyses(
                &AnalysisFilter {
                    search_text: Some("10_0".into()),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert!(underscore.is_empty());
    }

    #[test]
    fn test_sdg_column() {
        assert_eq!(format_sdg_column(&[13, 1, 13]), "1,13");
        assert_eq!(format_sdg_column(&[]), "");
        assert_eq!(parse_sdg_column("1, 13,x,0,18"), vec![1, 13]);
        assert!(parse_sdg_column("").is_empty());
    }
}
