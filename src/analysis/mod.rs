pub mod analyzer;
pub mod filter;
pub mod filters;
pub mod synonym;
pub mod token;
pub mod tokenizer;
