use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::IndexId;
use crate::index::store::IndexStore;
use crate::search::fuzzy::FuzzyAutomaton;
use crate::search::popular::{PopularQueries, PopularQuery};
use crate::search::prefix::Vocabulary;

const AUTOCOMPLETE_BOOST: f32 = 0.3;
const FUZZY_WEIGHT: f32 = 0.8;
const POPULAR_WEIGHT: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Autocomplete,
    Fuzzy,
    Popular,
}

impl SuggestionType {
    pub const ALL: [SuggestionType; 3] = [
        SuggestionType::Autocomplete,
        SuggestionType::Fuzzy,
        SuggestionType::Popular,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub index_id: IndexId,
    pub prefix: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub types: Option<Vec<SuggestionType>>,
    #[serde(default)]
    pub fuzzy_max_edits: Option<u8>,
}

impl SuggestionRequest {
    pub fn new(index_id: &str, prefix: &str) -> Self {
        SuggestionRequest {
            index_id: index_id.to_string(),
            prefix: prefix.to_string(),
            limit: None,
            types: None,
            fuzzy_max_edits: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_types(mut self, types: Vec<SuggestionType>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn with_fuzzy_max_edits(mut self, edits: u8) -> Self {
        self.fuzzy_max_edits = Some(edits);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub text: String,
    pub score: f32,
    pub kind: SuggestionType,
    /// Popular-query count, or the number of documents containing the term
    pub frequency: Option<u64>,
}

/// Autocomplete, fuzzy and popular-query suggestions.
///
/// The vocabulary is rebuilt from the index on every call; popular queries
/// live here and survive index changes.
pub struct SuggestionEngine {
    pub store: Arc<IndexStore>,
    pub popular: PopularQueries,
    pub config: Config,
}

impl SuggestionEngine {
    pub fn new(store: Arc<IndexStore>, config: Config) -> Self {
        SuggestionEngine {
            store,
            popular: PopularQueries::new(config.max_recent_queries_per_user),
            config,
        }
    }

    pub fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<SearchSuggestion>> {
        let start = Instant::now();

        let prefix = PopularQueries::normalize(&request.prefix);
        if prefix.is_empty() {
            return Err(Error::validation("Suggestion prefix must contain at least one character"));
        }
        let limit = request.limit.unwrap_or(self.config.default_suggestion_limit);
        if limit == 0 || limit > self.config.max_suggestion_limit {
            return Err(Error::validation(format!(
                "Suggestion limit must be within 1-{}, got {}",
                self.config.max_suggestion_limit, limit
            )));
        }
        let max_edits = request.fuzzy_max_edits.unwrap_or(self.config.default_fuzzy_max_edits);
        if max_edits == 0 || max_edits > self.config.max_fuzzy_edits {
            return Err(Error::validation(format!(
                "fuzzy_max_edits must be within 1-{}, got {}",
                self.config.max_fuzzy_edits, max_edits
            )));
        }
        let types: &[SuggestionType] = request.types.as_deref().unwrap_or(&SuggestionType::ALL);
        let wants = |kind: SuggestionType| types.contains(&kind);

        let vocabulary = self.store.read_index(&request.index_id, |definition, documents| {
            Vocabulary::collect(definition, documents, self.config.min_vocabulary_term_len)
        })??;

        let mut candidates = Vec::new();
        let mut autocompleted = HashSet::new();

        if wants(SuggestionType::Autocomplete) {
            let mut found = autocomplete(&vocabulary, &prefix);
            autocompleted.extend(found.iter().map(|s| s.text.clone()));
            rank(&mut found);
            candidates.extend(found);
        }
        if wants(SuggestionType::Fuzzy) {
            let mut found = fuzzy(&vocabulary, &prefix, max_edits, &autocompleted)?;
            rank(&mut found);
            candidates.extend(found);
        }
        if wants(SuggestionType::Popular) {
            candidates.extend(popular(self.popular.starting_with(&prefix)));
        }

        let mut seen = HashSet::new();
        let mut suggestions: Vec<SearchSuggestion> = candidates
            .into_iter()
            .filter(|s| seen.insert(s.text.to_lowercase()))
            .collect();
        suggestions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        suggestions.truncate(limit);

        debug!(
            index_id = %request.index_id,
            prefix = %prefix,
            vocabulary = vocabulary.len(),
            returned = suggestions.len(),
            took_us = start.elapsed().as_micros() as u64,
            "suggestions computed"
        );
        Ok(suggestions)
    }

    pub fn record_query(&self, query: &str, user_id: Option<&str>) -> Option<PopularQuery> {
        self.popular.record(query, user_id)
    }

    pub fn get_popular_queries(&self, limit: usize) -> Vec<PopularQuery> {
        self.popular.top(limit)
    }

    pub fn get_recent_queries(&self, user_id: &str, limit: usize) -> Vec<String> {
        self.popular.recent(user_id, limit)
    }

    pub fn clear_recent_queries(&self, user_id: &str) -> bool {
        self.popular.clear_recent(user_id)
    }
}

fn char_len(s: &str) -> f32 {
    s.chars().count() as f32
}

fn autocomplete(vocabulary: &Vocabulary, prefix: &str) -> Vec<SearchSuggestion> {
    let prefix_len = char_len(prefix);
    vocabulary
        .search_prefix(prefix)
        .into_iter()
        .filter(|(term, _)| term != prefix)
        .map(|(term, freq)| SearchSuggestion {
            score: (prefix_len / char_len(&term) + AUTOCOMPLETE_BOOST).min(1.0),
            text: term,
            kind: SuggestionType::Autocomplete,
            frequency: Some(freq),
        })
        .collect()
}

fn fuzzy(
    vocabulary: &Vocabulary,
    prefix: &str,
    max_edits: u8,
    exclude: &HashSet<String>,
) -> Result<Vec<SearchSuggestion>> {
    let automaton = FuzzyAutomaton::new(prefix, max_edits)?;
    let prefix_len = char_len(prefix);

    Ok(vocabulary
        .terms()
        .into_iter()
        .filter(|(term, _)| !exclude.contains(term))
        .filter_map(|(term, freq)| {
            let distance = automaton.distance(&term).filter(|d| *d > 0)?;
            let longest = prefix_len.max(char_len(&term));
            Some(SearchSuggestion {
                score: (1.0 - distance as f32 / longest) * FUZZY_WEIGHT,
                text: term,
                kind: SuggestionType::Fuzzy,
                frequency: Some(freq),
            })
        })
        .collect())
}

/// Candidates arrive ordered by count; scores are relative to the best one.
fn popular(candidates: Vec<PopularQuery>) -> Vec<SearchSuggestion> {
    let max_count = candidates.iter().map(|q| q.count).max().unwrap_or(0);
    if max_count == 0 {
        return Vec::new();
    }
    candidates
        .into_iter()
        .map(|q| SearchSuggestion {
            score: (q.count as f32 / max_count as f32) * POPULAR_WEIGHT,
            text: q.query,
            kind: SuggestionType::Popular,
            frequency: Some(q.count),
        })
        .collect()
}

/// Score descending, then more frequent, then alphabetical.
fn rank(suggestions: &mut [SearchSuggestion]) {
    suggestions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.text.cmp(&b.text))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::types::fields_from_json;
    use crate::schema::schema::{FieldDefinition, IndexSettings};
    use serde_json::json;

    fn engine(titles: &[&str]) -> (SuggestionEngine, String) {
        let store = Arc::new(IndexStore::new());
        let index = store
            .create_index(
                "fruit",
                vec![FieldDefinition::text("title"), FieldDefinition::keyword("code")],
                Some(IndexSettings::default().with_stop_words(vec!["and"])),
            )
            .unwrap();
        for (i, title) in titles.iter().enumerate() {
            store
                .index_document(&index.id, &i.to_string(), fields_from_json(json!({"title": title, "code": "appcode"})).unwrap())
                .unwrap();
        }
        (SuggestionEngine::new(store, Config::default()), index.id)
    }

    fn texts(suggestions: &[SearchSuggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn autocomplete_scores_by_coverage() {
        let (engine, index) = engine(&["apple", "apply", "banana", "ap"]);
        let request = SuggestionRequest::new(&index, "ap").with_types(vec![SuggestionType::Autocomplete]);
        let suggestions = engine.suggest(&request).unwrap();

        assert_eq!(texts(&suggestions), vec!["apple", "apply"]);
        assert!(suggestions.iter().all(|s| s.score > 0.3));
        assert!((suggestions[0].score - (2.0 / 5.0 + 0.3)).abs() < 1e-6);
    }

    #[test]
    fn autocomplete_score_is_capped() {
        let (engine, index) = engine(&["abc"]);
        let request = SuggestionRequest::new(&index, "ab").with_types(vec![SuggestionType::Autocomplete]);
        let suggestions = engine.suggest(&request).unwrap();
        assert!((suggestions[0].score - (2.0 / 3.0 + 0.3)).abs() < 1e-6);

        let (engine, index) = self::engine(&["abcd"]);
        let request = SuggestionRequest::new(&index, "abc").with_types(vec![SuggestionType::Autocomplete]);
        assert_eq!(engine.suggest(&request).unwrap()[0].score, 1.0);
    }

    #[test]
    fn fuzzy_within_edit_budget() {
        let (engine, index) = engine(&["apple", "banana", "maple syrup"]);
        let request = SuggestionRequest::new(&index, "aple")
            .with_types(vec![SuggestionType::Fuzzy])
            .with_fuzzy_max_edits(2);
        let suggestions = engine.suggest(&request).unwrap();
        let found = texts(&suggestions);

        assert!(found.contains(&"apple"));
        assert!(found.contains(&"maple"));
        assert!(!found.contains(&"banana"));
        let apple = suggestions.iter().find(|s| s.text == "apple").unwrap();
        assert!((apple.score - (1.0 - 1.0 / 5.0) * 0.8).abs() < 1e-6);
    }

    #[test]
    fn fuzzy_skips_autocompleted_and_exact_terms() {
        let (engine, index) = engine(&["apple", "apples"]);
        let suggestions = engine.suggest(&SuggestionRequest::new(&index, "apple")).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].text, "apples");
        assert_eq!(suggestions[0].kind, SuggestionType::Autocomplete);
    }

    #[test]
    fn popular_queries_scored_relative_to_best() {
        let (engine, index) = engine(&[]);
        for _ in 0..4 {
            engine.record_query("apple pie", None);
        }
        engine.record_query("apple tart", None);
        engine.record_query("banana", None);

        let request = SuggestionRequest::new(&index, "Apple").with_types(vec![SuggestionType::Popular]);
        let suggestions = engine.suggest(&request).unwrap();
        assert_eq!(texts(&suggestions), vec!["apple pie", "apple tart"]);
        assert!((suggestions[0].score - 0.7).abs() < 1e-6);
        assert!((suggestions[1].score - 0.175).abs() < 1e-6);
    }

    #[test]
    fn merged_results_are_deduplicated_and_limited() {
        let (engine, index) = engine(&["apple", "apply", "application", "ample"]);
        engine.record_query("apple", None);

        let suggestions = engine.suggest(&SuggestionRequest::new(&index, "app").with_limit(2)).unwrap();
        assert_eq!(suggestions.len(), 2);

        let all = engine.suggest(&SuggestionRequest::new(&index, "app")).unwrap();
        let apple_count = all.iter().filter(|s| s.text.eq_ignore_ascii_case("apple")).count();
        assert_eq!(apple_count, 1);
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn stop_words_short_terms_and_keywords_are_excluded() {
        let (engine, index) = engine(&["and a android"]);
        let suggestions = engine.suggest(&SuggestionRequest::new(&index, "a")).unwrap();
        let found = texts(&suggestions);
        assert!(found.contains(&"android"));
        assert!(!found.contains(&"and"));
        assert!(!found.contains(&"appcode"));
    }

    #[test]
    fn validates_request() {
        let (engine, index) = engine(&["apple"]);
        let err = engine.suggest(&SuggestionRequest::new(&index, "  ")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = engine.suggest(&SuggestionRequest::new(&index, "a").with_limit(51)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = engine.suggest(&SuggestionRequest::new(&index, "a").with_fuzzy_max_edits(4)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = engine.suggest(&SuggestionRequest::new("missing", "a")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn recent_queries_per_user() {
        let (engine, _) = engine(&[]);
        engine.record_query("Boots", Some("u1"));
        engine.record_query("hats", Some("u1"));
        engine.record_query("socks", Some("u2"));
        assert_eq!(engine.get_recent_queries("u1", 10), vec!["hats", "boots"]);
        assert!(engine.clear_recent_queries("u2"));
        assert!(engine.get_recent_queries("u2", 10).is_empty());
    }
}
