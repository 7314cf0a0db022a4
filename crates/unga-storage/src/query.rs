//! Filter predicates for speech queries.
//!
//! Filters compile to a SQL fragment with anonymous `?` placeholders plus the
//! values to bind, in placeholder order.

use crate::similarity::CASEFOLD_FUNCTION;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Optional conjunctive filters over speeches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechFilter {
    /// Case-insensitive substring of the speech text.
    #[serde(default)]
    pub text: Option<String>,

    /// Country codes or display names.
    #[serde(default)]
    pub countries: Vec<String>,

    #[serde(default)]
    pub years: Vec<i64>,

    #[serde(default)]
    pub regions: Vec<String>,
}

impl SpeechFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i64>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// The same filter with the text predicate removed.
    pub fn without_text(&self) -> Self {
        Self {
            text: None,
            ..self.clone()
        }
    }

    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.countries.is_empty()
            && self.years.is_empty()
            && self.regions.is_empty()
    }

    /// Compile into a WHERE fragment.
    ///
    /// Year lists with more than `year_range_min` entries that form a
    /// contiguous run become `BETWEEN`.
    pub fn predicate(&self, year_range_min: usize) -> Predicate {
        let mut predicate = Predicate::default();

        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            predicate.push(
                contains_clause("speech_text"),
                vec![Value::Text(like_pattern(text))],
            );
        }

        if !self.countries.is_empty() {
            let marks = placeholders(self.countries.len());
            let mut params: Vec<Value> = self
                .countries
                .iter()
                .map(|c| Value::Text(c.trim().to_uppercase()))
                .collect();
            params.extend(self.countries.iter().map(|c| Value::Text(c.trim().to_string())));
            predicate.push(
                format!("(country_code IN ({marks}) OR country_name IN ({marks}))"),
                params,
            );
        }

        if !self.years.is_empty() {
            let mut years = self.years.clone();
            years.sort_unstable();
            years.dedup();
            match contiguous_range(&years, year_range_min) {
                Some((start, end)) => predicate.push(
                    "year BETWEEN ? AND ?".to_string(),
                    vec![Value::Integer(start), Value::Integer(end)],
                ),
                None => predicate.push(
                    format!("year IN ({})", placeholders(years.len())),
                    years.into_iter().map(Value::Integer).collect(),
                ),
            }
        }

        if !self.regions.is_empty() {
            predicate.push(
                format!("region IN ({})", placeholders(self.regions.len())),
                self.regions.iter().map(|r| Value::Text(r.clone())).collect(),
            );
        }

        predicate
    }
}

/// A compiled WHERE fragment and its bound values.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    clauses: Vec<String>,
    pub params: Vec<Value>,
}

impl Predicate {
    fn push(&mut self, clause: String, params: Vec<Value>) {
        self.clauses.push(clause);
        self.params.extend(params);
    }

    /// The conjunction, or `1=1` when empty.
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            "1=1".to_string()
        } else {
            self.clauses.join(" AND ")
        }
    }
}

/// Random sampling for small result sets, systematic coverage for large ones.
pub fn order_clause(limit: usize, systematic_order_above: usize) -> &'static str {
    if limit <= systematic_order_above {
        "RANDOM()"
    } else {
        "year DESC, country_name"
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Case-insensitive (Unicode-aware) substring test on `column`, bound to one `?`.
pub(crate) fn contains_clause(column: &str) -> String {
    format!("{CASEFOLD_FUNCTION}({column}) LIKE {CASEFOLD_FUNCTION}(?) ESCAPE '\\'")
}

/// `%text%` with LIKE wildcards in `text` escaped.
pub(crate) fn like_pattern(text: &str) -> String {
    format!("%{}%", escape_like(text))
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Sorted, deduplicated years longer than `min_len` with no gaps.
fn contiguous_range(years: &[i64], min_len: usize) -> Option<(i64, i64)> {
    let (first, last) = (*years.first()?, *years.last()?);
    let span = last.checked_sub(first)?;
    if years.len() > min_len && span == years.len() as i64 - 1 {
        Some((first, last))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_true() {
        let predicate = SpeechFilter::new().predicate(20);
        assert_eq!(predicate.sql(), "1=1");
        assert!(predicate.params.is_empty());
        assert!(SpeechFilter::new().is_empty());
    }

    #[test]
    fn test_conjunction_order_matches_params() {
        let filter = SpeechFilter::new()
            .with_text("peace")
            .with_countries(["ken"])
            .with_years([2020])
            .with_regions(["Africa"]);
        let predicate = filter.predicate(20);
        assert_eq!(
            predicate.sql(),
            "casefold(speech_text) LIKE casefold(?) ESCAPE '\\' \
             AND (country_code IN (?) OR country_name IN (?)) AND year IN (?) AND region IN (?)"
        );
        assert_eq!(
            predicate.params,
            vec![
                Value::Text("%peace%".into()),
                Value::Text("KEN".into()),
                Value::Text("ken".into()),
                Value::Integer(2020),
                Value::Text("Africa".into()),
            ]
        );
    }

    #[test]
    fn test_long_contiguous_years_use_between() {
        let predicate = SpeechFilter::new().with_years((2000..=2024).rev()).predicate(20);
        assert_eq!(predicate.sql(), "year BETWEEN ? AND ?");
        assert_eq!(predicate.params, vec![Value::Integer(2000), Value::Integer(2024)]);
    }

    #[test]
    fn test_short_or_gapped_years_use_in() {
        let short = SpeechFilter::new().with_years(2000..=2010).predicate(20);
        assert!(short.sql().starts_with("year IN"));

        let gapped: Vec<i64> = (1990..=2024).filter(|y| *y != 2000).collect();
        let predicate = SpeechFilter::new().with_years(gapped).predicate(20);
        assert!(predicate.sql().starts_with("year IN"));
        assert_eq!(predicate.params.len(), 34);
    }

    #[test]
    fn test_extreme_years_do_not_overflow() {
        let mut years: Vec<i64> = (2000..2030).collect();
        years.extend([i64::MIN, i64::MAX]);
        let predicate = SpeechFilter::new().with_years(years).predicate(20);
        assert!(predicate.sql().starts_with("year IN"));
        assert_eq!(predicate.params.len(), 32);
    }

    #[test]
    fn test_like_wildcards_escaped() {
        let predicate = SpeechFilter::new().with_text("100%_sure").predicate(20);
        assert_eq!(predicate.params, vec![Value::Text("%100\\%\\_sure%".into())]);
    }

    #[test]
    fn test_blank_text_ignored() {
        let filter = SpeechFilter::new().with_text("   ");
        assert!(filter.is_empty());
        assert_eq!(filter.predicate(20).sql(), "1=1");
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(order_clause(10, 1000), "RANDOM()");
        assert_eq!(order_clause(1000, 1000), "RANDOM()");
        assert_eq!(order_clause(1001, 1000), "year DESC, country_name");
    }
}
