use std::collections::HashMap;
use regex::{Captures, Regex, RegexBuilder};
use tracing::warn;
use crate::core::types::Fields;

/// Wraps case-insensitive occurrences of query terms in markup tags.
pub struct Highlighter {
    pattern: Regex,
    pre_tag: String,
    post_tag: String,
}

impl Highlighter {
    /// Returns `None` when there is nothing to highlight or the pattern
    /// cannot be compiled; highlighting is then skipped.
    pub fn new(terms: &[String], pre_tag: &str, post_tag: &str) -> Option<Self> {
        let mut terms: Vec<&str> = terms.iter().map(String::as_str).filter(|t| !t.is_empty()).collect();
        if terms.is_empty() {
            return None;
        }
        // Longest alternatives first so "runner" wins over "run".
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terms.dedup();

        let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
        match RegexBuilder::new(&alternation).case_insensitive(true).build() {
            Ok(pattern) => Some(Highlighter {
                pattern,
                pre_tag: pre_tag.to_string(),
                post_tag: post_tag.to_string(),
            }),
            Err(e) => {
                warn!(error = %e, "highlight pattern rejected, skipping highlighting");
                None
            }
        }
    }

    pub fn highlight_text(&self, text: &str) -> Option<String> {
        if !self.pattern.is_match(text) {
            return None;
        }
        let marked = self.pattern.replace_all(text, |caps: &Captures| {
            format!("{}{}{}", self.pre_tag, &caps[0], self.post_tag)
        });
        Some(marked.into_owned())
    }

    /// Highlighted string values of the requested fields; fields without a
    /// match are left out.
    pub fn highlight_fields(&self, fields: &Fields, requested: &[String]) -> HashMap<String, String> {
        requested
            .iter()
            .filter_map(|name| {
                let text = fields.get(name)?.as_str()?;
                self.highlight_text(text).map(|marked| (name.clone(), marked))
            })
            .collect()
    }
}
