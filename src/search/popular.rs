use std::collections::{HashMap, VecDeque};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularQuery {
    pub query: String,
    pub count: u64,
    pub last_searched: DateTime<Utc>,
}

#[derive(Default)]
struct PopularInner {
    queries: HashMap<String, PopularQuery>,
    recent: HashMap<String, VecDeque<String>>,
}

/// Cumulative per-query counters plus per-user recent query lists.
pub struct PopularQueries {
    inner: Mutex<PopularInner>,
    max_recent_per_user: usize,
}

impl PopularQueries {
    pub fn new(max_recent_per_user: usize) -> Self {
        PopularQueries {
            inner: Mutex::new(PopularInner::default()),
            max_recent_per_user,
        }
    }

    pub fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Count one search of `query`. Blank queries are ignored.
    pub fn record(&self, query: &str, user_id: Option<&str>) -> Option<PopularQuery> {
        let normalized = Self::normalize(query);
        if normalized.is_empty() {
            return None;
        }

        let now = Utc::now();
        let mut inner = self.inner.lock();

        let entry = inner
            .queries
            .entry(normalized.clone())
            .or_insert_with(|| PopularQuery { query: normalized.clone(), count: 0, last_searched: now });
        entry.count += 1;
        entry.last_searched = now;
        let recorded = entry.clone();

        if let Some(user_id) = user_id {
            let recent = inner.recent.entry(user_id.to_string()).or_default();
            recent.push_front(normalized);
            recent.truncate(self.max_recent_per_user);
        }

        Some(recorded)
    }

    /// Most searched first; ties go to the most recently searched.
    pub fn top(&self, limit: usize) -> Vec<PopularQuery> {
        let inner = self.inner.lock();
        let mut queries: Vec<PopularQuery> = inner.queries.values().cloned().collect();
        sort_by_popularity(&mut queries);
        queries.truncate(limit);
        queries
    }

    /// Recorded queries starting with `prefix` (already normalised), by popularity.
    pub fn starting_with(&self, prefix: &str) -> Vec<PopularQuery> {
        let inner = self.inner.lock();
        let mut queries: Vec<PopularQuery> = inner
            .queries
            .values()
            .filter(|q| q.query.starts_with(prefix))
            .cloned()
            .collect();
        sort_by_popularity(&mut queries);
        queries
    }

    /// A user's queries, most recent first.
    pub fn recent(&self, user_id: &str, limit: usize) -> Vec<String> {
        self.inner
            .lock()
            .recent
            .get(user_id)
            .map(|recent| recent.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear_recent(&self, user_id: &str) -> bool {
        self.inner.lock().recent.remove(user_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sort_by_popularity(queries: &mut [PopularQuery]) {
    queries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.last_searched.cmp(&a.last_searched))
            .then_with(|| a.query.cmp(&b.query))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_normalized_queries() {
        let popular = PopularQueries::new(100);
        popular.record("Shoes", None);
        popular.record("  shoes ", None);
        popular.record("shoes", None);
        popular.record("shirts", None);

        let top = popular.top(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].query, "shoes");
        assert_eq!(top[0].count, 3);
        assert_eq!(popular.len(), 2);
    }

    #[test]
    fn blank_queries_are_ignored() {
        let popular = PopularQueries::new(100);
        assert!(popular.record("   ", Some("u1")).is_none());
        assert!(popular.is_empty());
        assert!(popular.recent("u1", 10).is_empty());
    }

    #[test]
    fn recent_list_is_capped_and_newest_first() {
        let popular = PopularQueries::new(3);
        for q in ["a1", "a2", "a3", "a4"] {
            popular.record(q, Some("u1"));
        }
        assert_eq!(popular.recent("u1", 10), vec!["a4", "a3", "a2"]);
        assert_eq!(popular.recent("u1", 1), vec!["a4"]);
        assert!(popular.clear_recent("u1"));
        assert!(!popular.clear_recent("u1"));
    }

    #[test]
    fn prefix_candidates() {
        let popular = PopularQueries::new(10);
        popular.record("running shoes", None);
        popular.record("running shoes", None);
        popular.record("run club", None);
        popular.record("boots", None);

        let found: Vec<_> = popular.starting_with("run").into_iter().map(|q| q.query).collect();
        assert_eq!(found, vec!["running shoes", "run club"]);
    }
}
