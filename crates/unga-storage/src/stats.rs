//! Dataset-wide counts and cross-year aggregation.

use crate::query::SpeechFilter;
use crate::store::SpeechStore;
use crate::Result;
use rusqlite::{params_from_iter, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts for the dashboard. Recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_speeches: i64,
    pub total_analyses: i64,
    pub countries: i64,
    pub years: i64,
    pub speeches_by_year: BTreeMap<i64, i64>,
    pub speeches_by_region: BTreeMap<String, i64>,
    pub analyses_by_classification: BTreeMap<String, i64>,
}

/// Speech volume for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTrend {
    pub year: i64,
    pub speeches: i64,
    pub total_words: i64,
    pub countries: i64,
}

impl SpeechStore {
    /// Totals and per-year/per-region breakdowns.
    pub fn get_statistics(&self) -> Result<Statistics> {
        let conn = self.lock()?;
        let (total_speeches, countries, years): (i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT country_code), COUNT(DISTINCT year) FROM speeches",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        let total_analyses: i64 = conn.query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))?;

        Ok(Statistics {
            total_speeches,
            total_analyses,
            countries,
            years,
            speeches_by_year: grouped(&conn, "SELECT year, COUNT(*) FROM speeches GROUP BY year")?,
            speeches_by_region: grouped(
                &conn,
                "SELECT region, COUNT(*) FROM speeches GROUP BY region",
            )?,
            analyses_by_classification: grouped(
                &conn,
                "SELECT classification, COUNT(*) FROM analyses GROUP BY classification",
            )?,
        })
    }

    /// Same as [`SpeechStore::get_statistics`].
    pub fn get_speech_statistics(&self) -> Result<Statistics> {
        self.get_statistics()
    }

    /// Per-year volume for the filtered speeches, oldest year first.
    ///
    /// `years` narrows the result and every requested year appears, with zero
    /// counts when nothing matches. An empty slice keeps every year the filter allows.
    pub fn cross_year_trends(&self, filter: &SpeechFilter, years: &[i64]) -> Result<Vec<YearTrend>> {
        let mut filter = filter.clone();
        if !years.is_empty() {
            filter.years = years.to_vec();
        }
        let predicate = filter.predicate(self.options().year_range_min);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT year, COUNT(*), COALESCE(SUM(word_count), 0), COUNT(DISTINCT country_code)
             FROM speeches WHERE {}
             GROUP BY year ORDER BY year",
            predicate.sql()
        ))?;
        let rows = stmt.query_map(params_from_iter(predicate.params), |row| {
            Ok(YearTrend {
                year: row.get(0)?,
                speeches: row.get(1)?,
                total_words: row.get(2)?,
                countries: row.get(3)?,
            })
        })?;
        let mut trends: BTreeMap<i64, YearTrend> = rows
            .map(|row| row.map(|trend| (trend.year, trend)))
            .collect::<rusqlite::Result<_>>()?;
        for &year in years {
            trends.entry(year).or_insert(YearTrend {
                year,
                speeches: 0,
                total_words: 0,
                countries: 0,
            });
        }

        tracing::debug!(years = trends.len(), "Cross-year trends");
        Ok(trends.into_values().collect())
    }
}

fn grouped<K>(conn: &Connection, sql: &str) -> rusqlite::Result<BTreeMap<K, i64>>
where
    K: rusqlite::types::FromSql + Ord,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, K>(0)?, row.get::<_, i64>(1)?)))?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAnalysis, NewSpeech};
    use crate::store::tests::hash_store;

    #[test]
    fn test_empty_statistics() {
        let store = hash_store();
        assert_eq!(store.get_statistics().unwrap(), Statistics::default());
        assert!(store
            .cross_year_trends(&SpeechFilter::new(), &[])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_counts_and_groups() {
        let store = hash_store();
        for (code, year, text) in [
            ("KEN", 2020, "one two three"),
            ("KEN", 2021, "one two"),
            ("FRA", 2021, "one"),
        ] {
            store
                .save_speech(&NewSpeech::from_code(code, year - 1945, year, text))
                .unwrap();
        }
        store
            .save_analysis(&NewAnalysis::derive("Kenya", "raw", "prompt", "output"))
            .unwrap();

        let stats = store.get_speech_statistics().unwrap();
        assert_eq!(stats.total_speeches, 3);
        assert_eq!(stats.total_analyses, 1);
        assert_eq!(stats.countries, 2);
        assert_eq!(stats.years, 2);
        assert_eq!(stats.speeches_by_year[&2021], 2);
        assert_eq!(stats.speeches_by_region["Africa"], 2);
        assert_eq!(stats.analyses_by_classification["African Member State"], 1);

        let trends = store.cross_year_trends(&SpeechFilter::new(), &[]).unwrap();
        assert_eq!(
            trends,
            vec![
                YearTrend { year: 2020, speeches: 1, total_words: 3, countries: 1 },
                YearTrend { year: 2021, speeches: 2, total_words: 3, countries: 2 },
            ]
        );

        let kenya = store
            .cross_year_trends(&SpeechFilter::new().with_countries(["KEN"]), &[2021])
            .unwrap();
        assert_eq!(
            kenya,
            vec![YearTrend { year: 2021, speeches: 1, total_words: 2, countries: 1 }]
        );
    }

    #[test]
    fn test_requested_years_without_speeches_are_zero() {
        let store = hash_store();
        store
            .save_speech(&NewSpeech::from_code("KEN", 75, 2020, "one two"))
            .unwrap();

        let trends = store
            .cross_year_trends(&SpeechFilter::new(), &[2022, 2020, 2021])
            .unwrap();
        assert_eq!(
            trends,
            vec![
                YearTrend { year: 2020, speeches: 1, total_words: 2, countries: 1 },
                YearTrend { year: 2021, speeches: 0, total_words: 0, countries: 0 },
                YearTrend { year: 2022, speeches: 0, total_words: 0, countries: 0 },
            ]
        );

        let empty = hash_store()
            .cross_year_trends(&SpeechFilter::new(), &[2024])
            .unwrap();
        assert_eq!(
            empty,
            vec![YearTrend { year: 2024, speeches: 0, total_words: 0, countries: 0 }]
        );
    }
}
