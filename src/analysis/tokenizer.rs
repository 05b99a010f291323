use crate::analysis::token::Token;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Lowercases and splits on every run of non-alphanumeric characters.
#[derive(Debug, Clone)]
pub struct StandardTokenizer {
    pub max_token_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer {
            max_token_length: 255,
        }
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;
        let mut start: Option<usize> = None;

        let mut emit = |from: usize, to: usize, tokens: &mut Vec<Token>| {
            let word = &text[from..to];
            if word.len() <= self.max_token_length {
                tokens.push(Token::new(word.to_lowercase(), position, from, to - from));
                position += 1;
            }
        };

        for (idx, ch) in text.char_indices() {
            if ch.is_alphanumeric() {
                if start.is_none() {
                    start = Some(idx);
                }
            } else if let Some(from) = start.take() {
                emit(from, idx, &mut tokens);
            }
        }
        if let Some(from) = start {
            emit(from, text.len(), &mut tokens);
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}

/// Shorthand for the token texts produced by the standard tokenizer.
pub fn tokenize(text: &str) -> Vec<String> {
    StandardTokenizer::default()
        .tokenize(text)
        .into_iter()
        .map(|t| t.text)
        .collect()
}
