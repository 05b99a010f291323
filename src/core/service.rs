use std::sync::Arc;
use crate::analytics::events::QueryLog;
use crate::analytics::tracker::AnalyticsTracker;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::index::store::IndexStore;
use crate::query::types::SearchQuery;
use crate::search::executor::QueryEngine;
use crate::search::results::SearchResult;
use crate::search::suggest::SuggestionEngine;

/// The four search components wired around one shared store.
pub struct SearchService {
    config: Config,
    store: Arc<IndexStore>,
    engine: QueryEngine,
    suggestions: SuggestionEngine,
    analytics: AnalyticsTracker,
}

impl SearchService {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(IndexStore::new());

        Ok(Self {
            engine: QueryEngine::new(store.clone(), config.clone()),
            suggestions: SuggestionEngine::new(store.clone(), config.clone()),
            analytics: AnalyticsTracker::new(&config),
            store,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    pub fn analytics(&self) -> &AnalyticsTracker {
        &self.analytics
    }

    /// Run `query`, count it as a popular query and log its outcome.
    ///
    /// Failed searches are neither counted nor logged.
    pub fn search_and_record(&self, query: &SearchQuery, user_id: Option<&str>) -> Result<SearchResult> {
        let result = self.engine.search(query)?;

        self.suggestions.record_query(&query.query, user_id);

        let mut log = QueryLog::new(&query.index_id, &query.query, result.total_hits, result.took_ms);
        log.user_id = user_id.map(str::to_string);
        for filter in &query.filters {
            log.filters_used.insert(filter.field.clone(), filter.op.operand());
        }
        self.analytics.log_query(log);

        Ok(result)
    }
}
