use std::collections::{HashMap, HashSet};
use crate::analysis::tokenizer::tokenize;

/// Term → alternates expansion built from index settings.
#[derive(Debug, Clone, Default)]
pub struct SynonymMap {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymMap {
    /// Keys and alternates are normalised through the standard tokenizer.
    /// Entries whose key or alternates normalise to nothing are skipped.
    pub fn new(synonyms: &HashMap<String, Vec<String>>) -> Self {
        let mut entries = HashMap::new();

        for (term, alternates) in synonyms {
            let key = term.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let expanded: Vec<String> = alternates.iter().flat_map(|alt| tokenize(alt)).collect();
            if expanded.is_empty() {
                continue;
            }
            entries.entry(key).or_insert_with(Vec::new).extend(expanded);
        }

        SynonymMap { entries }
    }

    /// Original tokens first, then alternates, without duplicates.
    pub fn expand(&self, tokens: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut terms = Vec::with_capacity(tokens.len());

        for token in tokens {
            if seen.insert(token.clone()) {
                terms.push(token.clone());
            }
        }
        for token in tokens {
            if let Some(alternates) = self.entries.get(token) {
                for alt in alternates {
                    if seen.insert(alt.clone()) {
                        terms.push(alt.clone());
                    }
                }
            }
        }

        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_terms() {
        let mut config = HashMap::new();
        config.insert("Laptop".to_string(), vec!["notebook".to_string(), "Ultra-Book".to_string()]);
        config.insert("empty".to_string(), vec!["  ".to_string()]);
        let synonyms = SynonymMap::new(&config);

        let terms = synonyms.expand(&["laptop".to_string(), "bag".to_string()]);
        assert_eq!(terms, vec!["laptop", "bag", "notebook", "ultra", "book"]);
        assert_eq!(synonyms.expand(&["empty".to_string()]), vec!["empty"]);
    }
}
