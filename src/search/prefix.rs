use std::collections::BTreeMap;
use fst::{IntoStreamer, Map, Streamer};
use crate::analysis::analyzer::Analyzer;
use crate::core::error::Result;
use crate::index::store::DocumentTable;
use crate::schema::schema::IndexDefinition;

/// Distinct terms of an index with their document frequency, held in an FST
/// for ordered prefix scans.
pub struct Vocabulary {
    /// Finite state transducer: term → document frequency
    fst: Map<Vec<u8>>,
}

impl Vocabulary {
    /// Build FST from terms
    pub fn build<I>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        // FST requires sorted, unique input
        let sorted: BTreeMap<String, u64> = terms.into_iter().collect();
        let fst = Map::from_iter(sorted)?;
        Ok(Vocabulary { fst })
    }

    /// Collect terms from every searchable string value of an index.
    pub fn collect(
        definition: &IndexDefinition,
        documents: &DocumentTable,
        min_term_len: usize,
    ) -> Result<Self> {
        let analyzer = Analyzer::vocabulary(&definition.settings.stop_words, min_term_len);
        let searchable: Vec<&str> = definition
            .fields
            .iter()
            .filter(|f| f.searchable)
            .map(|f| f.name.as_str())
            .collect();

        let mut frequencies: BTreeMap<String, u64> = BTreeMap::new();
        for document in documents.values() {
            let mut terms: Vec<String> = searchable
                .iter()
                .filter_map(|name| document.get_field(name))
                .flat_map(|value| value.text_values())
                .flat_map(|text| analyzer.terms(text))
                .collect();
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *frequencies.entry(term).or_insert(0) += 1;
            }
        }

        Vocabulary::build(frequencies)
    }

    pub fn len(&self) -> usize {
        self.fst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// Find all terms with given prefix, in lexicographic order
    pub fn search_prefix(&self, prefix: &str) -> Vec<(String, u64)> {
        let mut results = Vec::new();
        let prefix_bytes = prefix.as_bytes();

        // Use FST range query for efficient prefix search
        let mut stream = self.fst.range().ge(prefix_bytes).into_stream();

        while let Some((term_bytes, freq)) = stream.next() {
            if !term_bytes.starts_with(prefix_bytes) {
                break;
            }

            if let Ok(term) = String::from_utf8(term_bytes.to_vec()) {
                results.push((term, freq));
            }
        }

        results
    }

    /// Every term, in lexicographic order
    pub fn terms(&self) -> Vec<(String, u64)> {
        let mut results = Vec::with_capacity(self.len());
        let mut stream = self.fst.stream();

        while let Some((term_bytes, freq)) = stream.next() {
            if let Ok(term) = String::from_utf8(term_bytes.to_vec()) {
                results.push((term, freq));
            }
        }

        results
    }
}
