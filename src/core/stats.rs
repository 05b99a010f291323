use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use crate::core::types::IndexId;

/// Per-index statistics for monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub index_id: IndexId,
    pub name: String,

    // Content
    pub document_count: usize,
    pub field_count: usize,
    pub searchable_fields: Vec<String>,

    // Terms across searchable fields
    pub total_terms: usize,
    pub average_document_terms: f64,

    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
