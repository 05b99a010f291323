use std::collections::{HashMap, HashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::analytics::events::{EventKind, SearchAnalyticsEvent};
use crate::core::types::IndexId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: u64,
}

/// Search quality over a time window for one index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQualityMetrics {
    pub index_id: IndexId,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,

    pub total_queries: u64,
    /// Distinct queries, compared case-insensitively
    pub unique_queries: u64,
    pub zero_result_rate: f64,
    pub average_result_count: f64,
    pub click_through_rate: f64,
    pub average_click_position: f64,
    pub average_response_time_ms: f64,
    pub suggestion_click_count: u64,

    pub top_queries: Vec<QueryCount>,
    pub top_zero_result_queries: Vec<QueryCount>,
}

impl SearchQualityMetrics {
    /// Aggregate `events`, which the caller has already narrowed to one index and window.
    pub fn compute<'a, I>(
        index_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        events: I,
        top_limit: usize,
    ) -> Self
    where
        I: IntoIterator<Item = &'a SearchAnalyticsEvent>,
    {
        let mut total_queries = 0u64;
        let mut zero_results = 0u64;
        let mut clicks = 0u64;
        let mut suggestion_clicks = 0u64;
        let mut result_sum = 0u64;
        let mut response_sum = 0u64;
        let mut position_sum = 0u64;
        let mut unique = HashSet::new();
        let mut query_counts: HashMap<String, u64> = HashMap::new();
        let mut zero_counts: HashMap<String, u64> = HashMap::new();

        for event in events {
            match &event.kind {
                EventKind::Query { query, result_count, response_time_ms, .. } => {
                    total_queries += 1;
                    result_sum = result_sum.saturating_add(*result_count as u64);
                    response_sum = response_sum.saturating_add(*response_time_ms);
                    let normalized = query.trim().to_lowercase();
                    unique.insert(normalized.clone());
                    *query_counts.entry(normalized).or_insert(0) += 1;
                }
                EventKind::ZeroResults { query } => {
                    zero_results += 1;
                    *zero_counts.entry(query.trim().to_lowercase()).or_insert(0) += 1;
                }
                EventKind::Click { position, .. } => {
                    clicks += 1;
                    position_sum = position_sum.saturating_add(*position as u64);
                }
                EventKind::SuggestionClick { .. } => suggestion_clicks += 1,
            }
        }

        let per_query = |value: u64| ratio(value, total_queries);

        SearchQualityMetrics {
            index_id: index_id.to_string(),
            period_start: start,
            period_end: end,
            total_queries,
            unique_queries: unique.len() as u64,
            zero_result_rate: per_query(zero_results),
            average_result_count: per_query(result_sum),
            click_through_rate: per_query(clicks),
            average_click_position: ratio(position_sum, clicks),
            average_response_time_ms: per_query(response_sum),
            suggestion_click_count: suggestion_clicks,
            top_queries: top_counts(query_counts, top_limit),
            top_zero_result_queries: top_counts(zero_counts, top_limit),
        }
    }
}

fn ratio(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 / total as f64
    }
}

fn top_counts(counts: HashMap<String, u64>, limit: usize) -> Vec<QueryCount> {
    let mut counts: Vec<QueryCount> = counts
        .into_iter()
        .map(|(query, count)| QueryCount { query, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: &str, results: usize, ms: u64) -> SearchAnalyticsEvent {
        SearchAnalyticsEvent::new("idx", EventKind::Query {
            query: q.to_string(),
            result_count: results,
            response_time_ms: ms,
            filters_used: HashMap::new(),
        })
    }

    #[test]
    fn empty_window_has_zero_ratios() {
        let now = Utc::now();
        let metrics = SearchQualityMetrics::compute("idx", now, now, std::iter::empty(), 20);
        assert_eq!(metrics.total_queries, 0);
        assert_eq!(metrics.zero_result_rate, 0.0);
        assert_eq!(metrics.click_through_rate, 0.0);
        assert_eq!(metrics.average_click_position, 0.0);
        assert!(metrics.top_queries.is_empty());
    }

    #[test]
    fn aggregates_counts_and_averages() {
        let events = vec![
            query("Shoes", 10, 4),
            query("shoes", 0, 6),
            SearchAnalyticsEvent::new("idx", EventKind::ZeroResults { query: "shoes".into() }),
            query("hats", 5, 2),
            SearchAnalyticsEvent::new("idx", EventKind::Click {
                query: "hats".into(),
                document_id: "d1".into(),
                position: 3,
            }),
            SearchAnalyticsEvent::new("idx", EventKind::SuggestionClick {
                prefix: "ha".into(),
                suggestion: "hats".into(),
                position: 0,
            }),
        ];
        let now = Utc::now();
        let metrics = SearchQualityMetrics::compute("idx", now, now, &events, 20);

        assert_eq!(metrics.total_queries, 3);
        assert_eq!(metrics.unique_queries, 2);
        assert!((metrics.zero_result_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((metrics.average_result_count - 5.0).abs() < 1e-9);
        assert!((metrics.average_response_time_ms - 4.0).abs() < 1e-9);
        assert!((metrics.click_through_rate - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.average_click_position, 3.0);
        assert_eq!(metrics.suggestion_click_count, 1);
        assert_eq!(metrics.top_queries[0], QueryCount { query: "shoes".into(), count: 2 });
        assert_eq!(metrics.top_zero_result_queries, vec![QueryCount { query: "shoes".into(), count: 1 }]);
    }

    #[test]
    fn top_lists_break_ties_alphabetically_and_truncate() {
        let events: Vec<_> = ["b", "a", "c", "a"].iter().map(|q| query(q, 1, 1)).collect();
        let now = Utc::now();
        let metrics = SearchQualityMetrics::compute("idx", now, now, &events, 2);
        let names: Vec<_> = metrics.top_queries.iter().map(|q| q.query.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn huge_response_times_saturate_instead_of_overflowing() {
        let events = vec![query("slow", 1, u64::MAX), query("slower", usize::MAX, u64::MAX)];
        let now = Utc::now();
        let metrics = SearchQualityMetrics::compute("idx", now, now, &events, 20);
        assert_eq!(metrics.total_queries, 2);
        assert_eq!(metrics.average_response_time_ms, u64::MAX as f64 / 2.0);
        assert!(metrics.average_result_count.is_finite());
    }
}
