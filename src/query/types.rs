use serde::{Deserialize, Serialize};
use crate::core::types::IndexId;
use crate::query::filter::Filter;

/// Sort order for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,   // Ascending: 0 → 9, A → Z
    Desc,  // Descending: 9 → 0, Z → A
}

/// Field name that sorts by relevance score instead of a document field.
pub const SCORE_FIELD: &str = "_score";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn asc(field: &str) -> Self {
        SortSpec { field: field.to_string(), order: SortOrder::Asc }
    }

    pub fn desc(field: &str) -> Self {
        SortSpec { field: field.to_string(), order: SortOrder::Desc }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRequest {
    pub field: String,
    #[serde(default = "FacetRequest::default_size")]
    pub size: usize,
    #[serde(default = "FacetRequest::default_min_count")]
    pub min_count: usize,
}

impl FacetRequest {
    pub fn new(field: &str) -> Self {
        FacetRequest {
            field: field.to_string(),
            size: Self::default_size(),
            min_count: Self::default_min_count(),
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }

    fn default_size() -> usize {
        10
    }

    fn default_min_count() -> usize {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRequest {
    pub fields: Vec<String>,
    pub pre_tag: Option<String>,
    pub post_tag: Option<String>,
}

impl HighlightRequest {
    pub fn new(fields: Vec<&str>) -> Self {
        HighlightRequest {
            fields: fields.into_iter().map(String::from).collect(),
            pre_tag: None,
            post_tag: None,
        }
    }

    pub fn with_tags(mut self, pre: &str, post: &str) -> Self {
        self.pre_tag = Some(pre.to_string());
        self.post_tag = Some(post.to_string());
        self
    }
}

/// A search request against one index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub index_id: IndexId,

    /// Free text; empty matches every document
    pub query: String,

    /// Restricts scoring to these fields (still intersected with searchable fields)
    #[serde(default)]
    pub fields: Option<Vec<String>>,

    #[serde(default)]
    pub filters: Vec<Filter>,

    #[serde(default)]
    pub facets: Vec<FacetRequest>,

    #[serde(default)]
    pub highlight: Option<HighlightRequest>,

    #[serde(default)]
    pub sort: Vec<SortSpec>,

    #[serde(default)]
    pub offset: usize,

    /// Page size; the engine's configured default applies when absent
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(index_id: &str, query: impl Into<String>) -> Self {
        SearchQuery {
            index_id: index_id.to_string(),
            query: query.into(),
            fields: None,
            filters: Vec::new(),
            facets: Vec::new(),
            highlight: None,
            sort: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<&str>) -> Self {
        self.fields = Some(fields.into_iter().map(String::from).collect());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_facet(mut self, facet: FacetRequest) -> Self {
        self.facets.push(facet);
        self
    }

    pub fn with_highlight(mut self, highlight: HighlightRequest) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
