use serde::{Serialize, Deserialize};

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,      // Lowercased token text
    pub position: u32,     // Ordinal position in the source text
    pub offset: usize,     // Byte offset in original text
    pub length: usize,     // Length in bytes of the original slice
}

impl Token {
    pub fn new(text: String, position: u32, offset: usize, length: usize) -> Self {
        Token {
            text,
            position,
            offset,
            length,
        }
    }
}
