use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::types::IndexedDocument;
use crate::query::facet::FacetBucket;

/// Search results container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub hits: Vec<SearchHit>,
    pub total_hits: usize,          // Filtered set size, before pagination
    pub max_score: f32,
    pub facets: Option<HashMap<String, Vec<FacetBucket>>>,
    pub took_ms: u64,
    pub query: String,
}

/// Document with relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub document: IndexedDocument,
    pub highlights: HashMap<String, String>,
}

/// A document that survived scoring, before pagination.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoredDocument<'a> {
    pub document: &'a IndexedDocument,
    pub score: f32,
}
