use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use crate::analysis::analyzer::Analyzer;
use crate::analysis::synonym::SynonymMap;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::{FieldValue, IndexedDocument};
use crate::index::store::{DocumentTable, IndexStore};
use crate::query::facet::compute_facets;
use crate::query::filter::matches_all;
use crate::query::highlight::Highlighter;
use crate::query::types::{SearchQuery, SortOrder, SortSpec, SCORE_FIELD};
use crate::schema::schema::{FieldDefinition, IndexDefinition};
use crate::scoring::scorer::{Scorer, TermFrequencyScorer};
use crate::search::results::{ScoredDocument, SearchHit, SearchResult};

/// Executes ranked, filtered, faceted search over an index's documents.
///
/// Every search is a full scan of the index: score, filter, sort, facet,
/// paginate, highlight.
pub struct QueryEngine {
    pub store: Arc<IndexStore>,
    pub scorer: Box<dyn Scorer>,
    pub analyzer: Analyzer,
    pub config: Config,
}

impl QueryEngine {
    pub fn new(store: Arc<IndexStore>, config: Config) -> Self {
        QueryEngine {
            store,
            scorer: Box::new(TermFrequencyScorer::default()),
            analyzer: Analyzer::standard(),
            config,
        }
    }

    pub fn with_scorer(mut self, scorer: Box<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let start = Instant::now();

        let mut result = self
            .store
            .read_index(&query.index_id, |definition, documents| {
                self.execute(definition, documents, query)
            })?;

        result.took_ms = start.elapsed().as_millis() as u64;
        debug!(
            index_id = %query.index_id,
            query = %query.query,
            total_hits = result.total_hits,
            took_ms = result.took_ms,
            "search executed"
        );
        Ok(result)
    }

    fn execute(
        &self,
        definition: &IndexDefinition,
        documents: &DocumentTable,
        query: &SearchQuery,
    ) -> SearchResult {
        let tokens = self.analyzer.terms(&query.query);

        // Score (or match everything on an empty query)
        let mut scored: Vec<ScoredDocument> = if tokens.is_empty() {
            documents
                .values()
                .map(|document| ScoredDocument { document, score: 1.0 })
                .collect()
        } else {
            let terms = SynonymMap::new(&definition.settings.synonyms).expand(&tokens);
            let fields = self.scoring_fields(definition, query);
            documents
                .values()
                .filter_map(|document| {
                    let score = self.score_document(document, &terms, &fields);
                    (score > 0.0).then_some(ScoredDocument { document, score })
                })
                .collect()
        };

        // Filter
        scored.retain(|hit| matches_all(&query.filters, &hit.document.fields));

        // Sort
        scored.sort_by(|a, b| compare_hits(a, b, &query.sort));

        let total_hits = scored.len();
        let max_score = scored.iter().map(|h| h.score).fold(0.0f32, f32::max);

        // Facets over the whole filtered set
        let facets = (!query.facets.is_empty()).then(|| {
            let docs: Vec<&IndexedDocument> = scored.iter().map(|h| h.document).collect();
            compute_facets(&docs, &query.facets)
        });

        // Paginate
        let limit = query
            .limit
            .unwrap_or(self.config.default_limit)
            .clamp(1, self.config.max_limit);
        let page = scored.iter().skip(query.offset).take(limit);

        // Highlight against the original query tokens, not synonyms
        let highlighter = query.highlight.as_ref().and_then(|request| {
            let pre = request.pre_tag.as_deref().unwrap_or(&self.config.highlight_pre_tag);
            let post = request.post_tag.as_deref().unwrap_or(&self.config.highlight_post_tag);
            Highlighter::new(&tokens, pre, post).map(|h| (h, &request.fields))
        });

        let hits = page
            .map(|hit| {
                let highlights = highlighter
                    .as_ref()
                    .map(|(h, fields)| h.highlight_fields(&hit.document.fields, fields))
                    .unwrap_or_default();
                SearchHit {
                    id: hit.document.id.clone(),
                    score: hit.score,
                    document: stored_view(definition, hit.document),
                    highlights,
                }
            })
            .collect();

        SearchResult {
            hits,
            total_hits,
            max_score,
            facets,
            took_ms: 0,
            query: query.query.clone(),
        }
    }

    /// Searchable fields considered for scoring, optionally narrowed by the query.
    fn scoring_fields<'a>(&self, definition: &'a IndexDefinition, query: &SearchQuery) -> Vec<&'a FieldDefinition> {
        let fields = definition.search_fields();
        match &query.fields {
            Some(requested) => fields.into_iter().filter(|f| requested.contains(&f.name)).collect(),
            None => fields,
        }
    }

    fn score_document(&self, document: &IndexedDocument, terms: &[String], fields: &[&FieldDefinition]) -> f32 {
        let mut total = 0.0;
        for field in fields {
            let Some(value) = document.get_field(&field.name) else {
                continue;
            };
            let field_tokens: Vec<String> = value
                .text_values()
                .into_iter()
                .flat_map(|text| self.analyzer.terms(text))
                .collect();
            total += self.scorer.score_field(terms, &field_tokens) * field.weight;
        }
        total.max(0.0)
    }
}

/// Caller sort entries in order, then descending score. Missing values sort
/// last whatever the direction.
fn compare_hits(a: &ScoredDocument, b: &ScoredDocument, sort: &[SortSpec]) -> Ordering {
    for spec in sort {
        let ordering = if spec.field == SCORE_FIELD {
            let by_score = a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal);
            match spec.order {
                SortOrder::Asc => by_score,
                SortOrder::Desc => by_score.reverse(),
            }
        } else {
            compare_field(
                a.document.get_field(&spec.field),
                b.document.get_field(&spec.field),
                spec.order,
            )
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

fn compare_field(a: Option<&FieldValue>, b: Option<&FieldValue>, order: SortOrder) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.compare(b);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        }
    }
}

/// Copy of the document carrying only fields declared as stored.
fn stored_view(definition: &IndexDefinition, document: &IndexedDocument) -> IndexedDocument {
    let mut view = document.clone();
    view.fields.retain(|name, _| definition.get_field(name).is_none_or(|f| f.stored));
    view
}
