use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::length::MinLengthFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    pub fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|t| t.text).collect()
    }

    /// Query/field analysis used for scoring: tokenize only.
    pub fn standard() -> Self {
        Analyzer::new("standard".to_string(),
                      Box::new(StandardTokenizer::default()))
    }

    /// Analysis used to build suggestion vocabularies.
    pub fn vocabulary(stop_words: &[String], min_term_len: usize) -> Self {
        Analyzer::new("vocabulary".to_string(),
                      Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(MinLengthFilter::new(min_term_len)))
            .add_filter(Box::new(StopWordFilter::new(stop_words)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_drops_short_terms_and_stop_words() {
        let analyzer = Analyzer::vocabulary(&["The".to_string()], 2);
        assert_eq!(analyzer.terms("The a quick fox"), vec!["quick", "fox"]);
    }

    #[test]
    fn standard_keeps_everything() {
        assert_eq!(Analyzer::standard().terms("The a fox"), vec!["the", "a", "fox"]);
    }
}
