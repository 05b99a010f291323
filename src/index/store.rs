use std::collections::HashMap;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::{Error, Result};
use crate::core::stats::IndexStats;
use crate::core::types::{Fields, IndexId, IndexedDocument};
use crate::schema::schema::{
    validate_fields, validate_index_name, FieldDefinition, IndexDefinition, IndexSettings,
    IndexUpdate,
};

/// Documents of one index, keyed by caller-supplied id
pub type DocumentTable = HashMap<String, IndexedDocument>;

struct IndexEntry {
    definition: IndexDefinition,
    documents: DocumentTable,
}

#[derive(Default)]
struct StoreInner {
    indices: HashMap<IndexId, IndexEntry>,
    names: HashMap<String, IndexId>,
}

impl StoreInner {
    fn entry(&self, index_id: &str) -> Result<&IndexEntry> {
        self.indices
            .get(index_id)
            .ok_or_else(|| Error::not_found(format!("Index '{}' not found", index_id)))
    }

    fn entry_mut(&mut self, index_id: &str) -> Result<&mut IndexEntry> {
        self.indices
            .get_mut(index_id)
            .ok_or_else(|| Error::not_found(format!("Index '{}' not found", index_id)))
    }
}

/// Input item for `bulk_index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub id: String,
    pub fields: Fields,
}

impl DocumentInput {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        DocumentInput { id: id.into(), fields }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkIndexError {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkIndexResult {
    pub indexed: usize,
    pub errors: Vec<BulkIndexError>,
}

/// Owns index definitions and the documents of each index.
///
/// All mutations take the write lock, so writes to the store are serialized;
/// reads share the lock.
#[derive(Default)]
pub struct IndexStore {
    inner: RwLock<StoreInner>,
}

impl IndexStore {
    pub fn new() -> Self {
        IndexStore::default()
    }

    pub fn create_index(
        &self,
        name: &str,
        fields: Vec<FieldDefinition>,
        settings: Option<IndexSettings>,
    ) -> Result<IndexDefinition> {
        validate_index_name(name)?;
        validate_fields(&fields)?;

        let mut inner = self.inner.write();
        if inner.names.contains_key(name) {
            return Err(Error::conflict(format!("Index '{}' already exists", name)));
        }

        let now = Utc::now();
        let definition = IndexDefinition {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            fields,
            settings: settings.unwrap_or_default(),
            document_count: 0,
            created_at: now,
            updated_at: now,
        };

        inner.names.insert(definition.name.clone(), definition.id.clone());
        inner.indices.insert(definition.id.clone(), IndexEntry {
            definition: definition.clone(),
            documents: HashMap::new(),
        });

        info!(index_id = %definition.id, name, fields = definition.fields.len(), "index created");
        Ok(definition)
    }

    pub fn get_index(&self, index_id: &str) -> Option<IndexDefinition> {
        self.inner.read().indices.get(index_id).map(|e| e.definition.clone())
    }

    pub fn find_index_by_name(&self, name: &str) -> Option<IndexDefinition> {
        let inner = self.inner.read();
        inner.names
            .get(name)
            .and_then(|id| inner.indices.get(id))
            .map(|e| e.definition.clone())
    }

    /// All definitions, oldest first.
    pub fn list_indices(&self) -> Vec<IndexDefinition> {
        let inner = self.inner.read();
        let mut definitions: Vec<_> = inner.indices.values().map(|e| e.definition.clone()).collect();
        definitions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        definitions
    }

    pub fn update_index(&self, index_id: &str, update: IndexUpdate) -> Result<IndexDefinition> {
        if let Some(fields) = &update.fields {
            validate_fields(fields)?;
        }

        let mut inner = self.inner.write();
        let entry = inner.entry_mut(index_id)?;

        if let Some(fields) = update.fields {
            entry.definition.fields = fields;
        }
        if let Some(settings) = update.settings {
            entry.definition.settings = settings;
        }
        entry.definition.updated_at = Utc::now();

        info!(index_id, "index updated");
        Ok(entry.definition.clone())
    }

    /// Removes the index and every document it holds.
    pub fn delete_index(&self, index_id: &str) -> bool {
        let mut inner = self.inner.write();
        match inner.indices.remove(index_id) {
            Some(entry) => {
                inner.names.remove(&entry.definition.name);
                info!(index_id, documents = entry.documents.len(), "index deleted");
                true
            }
            None => false,
        }
    }

    /// Upsert a document. Every field name must be declared on the index.
    pub fn index_document(&self, index_id: &str, doc_id: &str, fields: Fields) -> Result<IndexedDocument> {
        let mut inner = self.inner.write();
        let entry = inner.entry_mut(index_id)?;
        Self::upsert(entry, doc_id, fields)
    }

    fn upsert(entry: &mut IndexEntry, doc_id: &str, fields: Fields) -> Result<IndexedDocument> {
        let mut unknown: Vec<&str> = fields
            .keys()
            .filter(|name| !entry.definition.has_field(name))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(Error::validation(format!(
                "Unknown field(s) for index '{}': {}",
                entry.definition.name,
                unknown.join(", ")
            )));
        }

        let now = Utc::now();
        let document = IndexedDocument {
            id: doc_id.to_string(),
            index_id: entry.definition.id.clone(),
            fields,
            indexed_at: now,
        };

        let previous = entry.documents.insert(doc_id.to_string(), document.clone());
        if previous.is_none() {
            entry.definition.document_count += 1;
        }
        entry.definition.updated_at = now;

        Ok(document)
    }

    pub fn remove_document(&self, index_id: &str, doc_id: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        let entry = inner.entry_mut(index_id)?;

        if entry.documents.remove(doc_id).is_none() {
            return Ok(false);
        }
        entry.definition.document_count -= 1;
        entry.definition.updated_at = Utc::now();
        Ok(true)
    }

    /// Removes every document but keeps the definition.
    pub fn clear_index(&self, index_id: &str) -> Result<usize> {
        let mut inner = self.inner.write();
        let entry = inner.entry_mut(index_id)?;

        let removed = entry.documents.len();
        entry.documents.clear();
        entry.definition.document_count = 0;
        entry.definition.updated_at = Utc::now();

        info!(index_id, removed, "index cleared");
        Ok(removed)
    }

    pub fn get_document(&self, index_id: &str, doc_id: &str) -> Result<Option<IndexedDocument>> {
        let inner = self.inner.read();
        Ok(inner.entry(index_id)?.documents.get(doc_id).cloned())
    }

    pub fn get_all_documents(&self, index_id: &str) -> Result<Vec<IndexedDocument>> {
        let inner = self.inner.read();
        Ok(inner.entry(index_id)?.documents.values().cloned().collect())
    }

    /// Index each item independently; failures are reported, never propagated.
    pub fn bulk_index(&self, index_id: &str, documents: Vec<DocumentInput>) -> Result<BulkIndexResult> {
        let mut inner = self.inner.write();
        let entry = inner.entry_mut(index_id)?;

        let mut result = BulkIndexResult::default();
        for DocumentInput { id, fields } in documents {
            match Self::upsert(entry, &id, fields) {
                Ok(_) => result.indexed += 1,
                Err(e) => {
                    warn!(index_id, doc_id = %id, error = %e, "bulk item rejected");
                    result.errors.push(BulkIndexError { id, error: e.to_string() });
                }
            }
        }

        info!(index_id, indexed = result.indexed, failed = result.errors.len(), "bulk index finished");
        Ok(result)
    }

    /// Run `f` against an index's definition and documents under the read lock.
    pub fn read_index<R>(
        &self,
        index_id: &str,
        f: impl FnOnce(&IndexDefinition, &DocumentTable) -> R,
    ) -> Result<R> {
        let inner = self.inner.read();
        let entry = inner.entry(index_id)?;
        Ok(f(&entry.definition, &entry.documents))
    }

    pub fn get_index_stats(&self, index_id: &str) -> Result<IndexStats> {
        self.read_index(index_id, |definition, documents| {
            let analyzer = Analyzer::standard();
            let search_fields = definition.search_fields();

            let mut total_terms = 0usize;
            for document in documents.values() {
                for field in &search_fields {
                    if let Some(value) = document.fields.get(&field.name) {
                        for text in value.text_values() {
                            total_terms += analyzer.analyze(text).len();
                        }
                    }
                }
            }

            let stats = IndexStats {
                index_id: definition.id.clone(),
                name: definition.name.clone(),
                document_count: definition.document_count,
                field_count: definition.fields.len(),
                searchable_fields: search_fields.iter().map(|f| f.name.clone()).collect(),
                total_terms,
                average_document_terms: if documents.is_empty() {
                    0.0
                } else {
                    total_terms as f64 / documents.len() as f64
                },
                created_at: definition.created_at,
                last_updated: definition.updated_at,
            };
            debug!(index_id, total_terms, "index stats computed");
            stats
        })
    }
}
