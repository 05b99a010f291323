/// Scorer trait
pub trait Scorer: Send + Sync {
    /// Relevance of one field's tokens for a set of query terms, before the
    /// field weight is applied.
    fn score_field(&self, terms: &[String], field_tokens: &[String]) -> f32;

    fn name(&self) -> &str;
}

/// Normalised term frequency with a bonus for tokens the term is a strict
/// prefix of.
pub struct TermFrequencyScorer {
    pub prefix_bonus: f32,  // Multiplier for prefix matches (default: 0.5)
}

impl Default for TermFrequencyScorer {
    fn default() -> Self {
        TermFrequencyScorer {
            prefix_bonus: 0.5,
        }
    }
}

impl Scorer for TermFrequencyScorer {
    fn score_field(&self, terms: &[String], field_tokens: &[String]) -> f32 {
        if field_tokens.is_empty() {
            return 0.0;
        }
        let len = field_tokens.len() as f32;

        let mut score = 0.0;
        for term in terms {
            let mut exact = 0usize;
            let mut prefixed = 0usize;
            for token in field_tokens {
                if token == term {
                    exact += 1;
                } else if token.starts_with(term.as_str()) {
                    prefixed += 1;
                }
            }

            // TF = occurrences / field length
            score += exact as f32 / len;
            score += (prefixed as f32 / len) * self.prefix_bonus;
        }

        score
    }

    fn name(&self) -> &str {
        "term_frequency"
    }
}
