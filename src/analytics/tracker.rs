use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;
use crate::analytics::events::{ClickLog, EventKind, QueryLog, SearchAnalyticsEvent, SuggestionClickLog};
use crate::analytics::metrics::SearchQualityMetrics;
use crate::core::config::Config;

/// Bounded, append-only log of search events.
///
/// Oldest events are evicted once the log reaches `max_events`; eviction
/// happens under the same lock as the append.
pub struct AnalyticsTracker {
    events: Mutex<VecDeque<SearchAnalyticsEvent>>,
    max_events: usize,
    top_queries_limit: usize,
}

impl AnalyticsTracker {
    pub fn new(config: &Config) -> Self {
        AnalyticsTracker {
            events: Mutex::new(VecDeque::new()),
            max_events: config.max_analytics_events.max(1),
            top_queries_limit: config.top_queries_limit,
        }
    }

    /// Append one event, evicting from the front if over capacity.
    pub fn record_event(&self, event: SearchAnalyticsEvent) {
        let mut events = self.events.lock();
        events.push_back(event);
        let overflow = events.len().saturating_sub(self.max_events);
        if overflow > 0 {
            events.drain(..overflow);
            debug!(evicted = overflow, cap = self.max_events, "analytics log at capacity");
        }
    }

    /// Logs a query, plus a zero-results event when nothing matched.
    pub fn log_query(&self, log: QueryLog) -> SearchAnalyticsEvent {
        let QueryLog { index_id, query, result_count, response_time_ms, user_id, session_id, filters_used } = log;

        let event = SearchAnalyticsEvent::new(&index_id, EventKind::Query {
            query: query.clone(),
            result_count,
            response_time_ms,
            filters_used,
        })
        .with_user(user_id.clone(), session_id.clone());
        self.record_event(event.clone());

        if result_count == 0 {
            let zero = SearchAnalyticsEvent::new(&index_id, EventKind::ZeroResults { query })
                .with_user(user_id, session_id)
                .at(event.timestamp);
            self.record_event(zero);
        }
        event
    }

    pub fn log_click(&self, log: ClickLog) -> SearchAnalyticsEvent {
        let event = SearchAnalyticsEvent::new(&log.index_id, EventKind::Click {
            query: log.query,
            document_id: log.document_id,
            position: log.position,
        })
        .with_user(log.user_id, log.session_id);
        self.record_event(event.clone());
        event
    }

    pub fn log_suggestion_click(&self, log: SuggestionClickLog) -> SearchAnalyticsEvent {
        let event = SearchAnalyticsEvent::new(&log.index_id, EventKind::SuggestionClick {
            prefix: log.prefix,
            suggestion: log.suggestion,
            position: log.position,
        })
        .with_user(log.user_id, log.session_id);
        self.record_event(event.clone());
        event
    }

    /// Metrics over events of `index_id` with `start <= timestamp <= end`.
    pub fn compute_metrics(
        &self,
        index_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SearchQualityMetrics {
        let events = self.events.lock();
        let in_window = events
            .iter()
            .filter(|e| e.index_id == index_id && e.timestamp >= start && e.timestamp <= end);
        SearchQualityMetrics::compute(index_id, start, end, in_window, self.top_queries_limit)
    }

    /// Drop events older than `cutoff`; returns how many were removed.
    pub fn prune_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut events = self.events.lock();
        let before = events.len();
        events.retain(|e| e.timestamp >= cutoff);
        let removed = before - events.len();
        if removed > 0 {
            debug!(removed, remaining = events.len(), "pruned analytics events");
        }
        removed
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn events_for_index(&self, index_id: &str) -> Vec<SearchAnalyticsEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.index_id == index_id)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for AnalyticsTracker {
    fn default() -> Self {
        AnalyticsTracker::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::hours(1), now + Duration::hours(1))
    }

    #[test]
    fn zero_result_queries_log_two_events() {
        let tracker = AnalyticsTracker::default();
        let event = tracker.log_query(QueryLog::new("idx", "nothing", 0, 3).with_user("u1"));
        assert_eq!(event.kind.name(), "query");
        assert_eq!(event.user_id.as_deref(), Some("u1"));
        assert_eq!(tracker.event_count(), 2);

        tracker.log_query(QueryLog::new("idx", "something", 4, 3));
        assert_eq!(tracker.event_count(), 3);
    }

    #[test]
    fn rates_over_ten_queries() {
        let tracker = AnalyticsTracker::default();
        for i in 0..10 {
            let results = if i < 2 { 0 } else { 5 };
            tracker.log_query(QueryLog::new("idx", &format!("q{}", i), results, 10));
        }
        for i in 0..4 {
            tracker.log_click(ClickLog::new("idx", "q5", &format!("d{}", i), i + 1));
        }
        tracker.log_query(QueryLog::new("other", "elsewhere", 0, 1));

        let (start, end) = window();
        let metrics = tracker.compute_metrics("idx", start, end);
        assert_eq!(metrics.total_queries, 10);
        assert!((metrics.zero_result_rate - 0.2).abs() < 1e-9);
        assert!((metrics.click_through_rate - 0.4).abs() < 1e-9);
        assert!((metrics.average_click_position - 2.5).abs() < 1e-9);
        assert_eq!(metrics.top_zero_result_queries.len(), 2);
    }

    #[test]
    fn window_excludes_outside_events() {
        let tracker = AnalyticsTracker::default();
        tracker.log_query(QueryLog::new("idx", "now", 1, 1));
        let old = SearchAnalyticsEvent::new("idx", EventKind::ZeroResults { query: "old".into() })
            .at(Utc::now() - Duration::days(2));
        tracker.record_event(old);

        let (start, end) = window();
        let metrics = tracker.compute_metrics("idx", start, end);
        assert_eq!(metrics.total_queries, 1);
        assert_eq!(metrics.zero_result_rate, 0.0);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let config = Config::builder().max_analytics_events(3).build().unwrap();
        let tracker = AnalyticsTracker::new(&config);
        for i in 0..5 {
            tracker.log_suggestion_click(SuggestionClickLog::new("idx", "a", &format!("s{}", i), 0));
        }
        assert_eq!(tracker.event_count(), 3);
        let kept: Vec<_> = tracker
            .events_for_index("idx")
            .into_iter()
            .map(|e| match e.kind {
                EventKind::SuggestionClick { suggestion, .. } => suggestion,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(kept, vec!["s2", "s3", "s4"]);
    }

    #[test]
    fn prune_and_clear() {
        let tracker = AnalyticsTracker::default();
        tracker.record_event(
            SearchAnalyticsEvent::new("idx", EventKind::ZeroResults { query: "x".into() })
                .at(Utc::now() - Duration::days(10)),
        );
        tracker.log_query(QueryLog::new("idx", "fresh", 2, 1));
        assert_eq!(tracker.prune_older_than(Utc::now() - Duration::days(1)), 1);
        assert_eq!(tracker.event_count(), 1);
        tracker.clear();
        assert_eq!(tracker.event_count(), 0);
    }
}
