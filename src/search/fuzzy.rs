use std::sync::OnceLock;
use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder, DFA};
use crate::core::error::{Error, Result};

/// Largest edit distance the automaton builders are prepared for.
pub const MAX_EDIT_DISTANCE: u8 = 3;

/// Builders are costly to construct (they precompute the parametric
/// automaton), so one per distance is built lazily and shared.
static BUILDERS: [OnceLock<LevenshteinAutomatonBuilder>; MAX_EDIT_DISTANCE as usize] =
    [OnceLock::new(), OnceLock::new(), OnceLock::new()];

fn builder(max_edit_distance: u8) -> &'static LevenshteinAutomatonBuilder {
    BUILDERS[(max_edit_distance - 1) as usize]
        .get_or_init(|| LevenshteinAutomatonBuilder::new(max_edit_distance, false))
}

/// Automaton for fuzzy matching with edit distance
pub struct FuzzyAutomaton {
    /// Maximum allowed edit distance (1-3)
    max_edit_distance: u8,

    /// Built DFA for matching
    dfa: DFA,
}

impl FuzzyAutomaton {
    pub fn new(term: &str, max_edit_distance: u8) -> Result<Self> {
        if max_edit_distance == 0 || max_edit_distance > MAX_EDIT_DISTANCE {
            return Err(Error::invalid_input(format!(
                "Edit distance must be within 1-{}, got {}",
                MAX_EDIT_DISTANCE, max_edit_distance
            )));
        }

        Ok(Self {
            max_edit_distance,
            dfa: builder(max_edit_distance).build_dfa(term),
        })
    }

    /// Levenshtein distance to `candidate`, or `None` beyond the maximum.
    pub fn distance(&self, candidate: &str) -> Option<u8> {
        match self.dfa.eval(candidate) {
            Distance::Exact(d) if d <= self.max_edit_distance => Some(d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain Levenshtein distance over characters (insert, delete, substitute).
    fn edit_distance(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let len_a = a.len();
        let len_b = b.len();

        if len_a == 0 {
            return len_b;
        }
        if len_b == 0 {
            return len_a;
        }

        let mut prev_row: Vec<usize> = (0..=len_b).collect();
        let mut curr_row = vec![0; len_b + 1];

        for i in 1..=len_a {
            curr_row[0] = i;

            for j in 1..=len_b {
                let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };

                curr_row[j] = std::cmp::min(
                    std::cmp::min(
                        prev_row[j] + 1,     // deletion
                        curr_row[j - 1] + 1, // insertion
                    ),
                    prev_row[j - 1] + cost,  // substitution
                );
            }

            std::mem::swap(&mut prev_row, &mut curr_row);
        }

        prev_row[len_b]
    }

    #[test]
    fn automaton_reports_exact_distance() {
        let automaton = FuzzyAutomaton::new("aple", 2).unwrap();
        assert_eq!(automaton.distance("aple"), Some(0));
        assert_eq!(automaton.distance("apple"), Some(1));
        assert_eq!(automaton.distance("maple"), Some(1));
        assert_eq!(automaton.distance("ample"), Some(1));
        assert_eq!(automaton.distance("banana"), None);
        assert_eq!(automaton.distance("orange"), None);
    }

    #[test]
    fn transpositions_cost_two() {
        let automaton = FuzzyAutomaton::new("the", 2).unwrap();
        assert_eq!(automaton.distance("teh"), Some(2));
    }

    #[test]
    fn automaton_agrees_with_dynamic_programming() {
        let words = ["apple", "apply", "ape", "maple", "applesauce", "banana", "aplomb", "café"];
        for max in 1..=MAX_EDIT_DISTANCE {
            let automaton = FuzzyAutomaton::new("aple", max).unwrap();
            for word in words {
                let expected = edit_distance("aple", word);
                let expected = (expected <= max as usize).then_some(expected as u8);
                assert_eq!(automaton.distance(word), expected, "word {} max {}", word, max);
            }
        }
    }

    #[test]
    fn rejects_out_of_range_distance() {
        assert!(FuzzyAutomaton::new("x", 0).is_err());
        assert!(FuzzyAutomaton::new("x", 4).is_err());
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("café", "cafe"), 1);
    }
}
