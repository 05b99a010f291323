pub mod facet;
pub mod filter;
pub mod highlight;
pub mod types;
