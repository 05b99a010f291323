use std::collections::{HashMap, HashSet};
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use crate::core::error::{Error, Result};
use crate::core::types::IndexId;

pub const MAX_INDEX_NAME_LEN: usize = 128;
pub const MAX_FIELD_WEIGHT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Keyword,
    Number,
    Date,
    Boolean,
    GeoPoint,
}

/// Field declaration on an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub weight: f32,
    pub searchable: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub stored: bool,
}

impl FieldDefinition {
    /// Plain field: weight 1, filterable and stored, searchable only for text.
    pub fn new(name: &str, field_type: FieldType) -> Self {
        FieldDefinition {
            name: name.to_string(),
            field_type,
            weight: 1.0,
            searchable: field_type == FieldType::Text,
            filterable: true,
            sortable: false,
            stored: true,
        }
    }

    pub fn text(name: &str) -> Self {
        FieldDefinition::new(name, FieldType::Text)
    }

    pub fn keyword(name: &str) -> Self {
        FieldDefinition::new(name, FieldType::Keyword)
    }

    pub fn number(name: &str) -> Self {
        FieldDefinition::new(name, FieldType::Number).sortable(true)
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub default_search_fields: Vec<String>,
    pub stop_words: Vec<String>,
    pub synonyms: HashMap<String, Vec<String>>,
}

impl IndexSettings {
    pub fn with_default_search_fields(mut self, fields: Vec<&str>) -> Self {
        self.default_search_fields = fields.into_iter().map(String::from).collect();
        self
    }

    pub fn with_stop_words(mut self, words: Vec<&str>) -> Self {
        self.stop_words = words.into_iter().map(String::from).collect();
        self
    }

    pub fn with_synonym(mut self, term: &str, alternates: Vec<&str>) -> Self {
        self.synonyms.insert(
            term.to_string(),
            alternates.into_iter().map(String::from).collect(),
        );
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub id: IndexId,
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    pub settings: IndexSettings,
    pub document_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IndexDefinition {
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Fields considered for scoring: the configured default search fields
    /// that are searchable, or every searchable field when none are configured.
    pub fn search_fields(&self) -> Vec<&FieldDefinition> {
        let searchable = self.fields.iter().filter(|f| f.searchable);
        if self.settings.default_search_fields.is_empty() {
            return searchable.collect();
        }
        searchable
            .filter(|f| self.settings.default_search_fields.contains(&f.name))
            .collect()
    }
}

/// Partial replacement applied by `update_index`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexUpdate {
    pub fields: Option<Vec<FieldDefinition>>,
    pub settings: Option<IndexSettings>,
}

impl IndexUpdate {
    pub fn fields(fields: Vec<FieldDefinition>) -> Self {
        IndexUpdate { fields: Some(fields), settings: None }
    }

    pub fn settings(settings: IndexSettings) -> Self {
        IndexUpdate { fields: None, settings: Some(settings) }
    }
}

pub fn validate_index_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_INDEX_NAME_LEN {
        return Err(Error::validation(format!(
            "Index name must be 1-{} characters, got {}",
            MAX_INDEX_NAME_LEN, len
        )));
    }
    Ok(())
}

pub fn validate_fields(fields: &[FieldDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            return Err(Error::validation("Field name must not be empty"));
        }
        if !(0.0..=MAX_FIELD_WEIGHT).contains(&field.weight) {
            return Err(Error::validation(format!(
                "Field '{}' weight {} is outside 0-{}",
                field.name, field.weight, MAX_FIELD_WEIGHT
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(Error::validation(format!(
                "Field '{}' is declared more than once",
                field.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn definition(fields: Vec<FieldDefinition>, settings: IndexSettings) -> IndexDefinition {
        IndexDefinition {
            id: "idx".to_string(),
            name: "products".to_string(),
            fields,
            settings,
            document_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn name_length_bounds() {
        assert!(validate_index_name("a").is_ok());
        assert!(validate_index_name(&"x".repeat(128)).is_ok());
        assert_eq!(validate_index_name("").unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(
            validate_index_name(&"x".repeat(129)).unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[test]
    fn field_validation() {
        assert!(validate_fields(&[FieldDefinition::text("title").with_weight(100.0)]).is_ok());
        assert!(validate_fields(&[FieldDefinition::text("title").with_weight(101.0)]).is_err());
        assert!(validate_fields(&[FieldDefinition::text("title").with_weight(-1.0)]).is_err());
        assert!(validate_fields(&[
            FieldDefinition::text("title"),
            FieldDefinition::keyword("title"),
        ])
        .is_err());
    }

    #[test]
    fn search_fields_respect_defaults() {
        let fields = vec![
            FieldDefinition::text("title"),
            FieldDefinition::text("body"),
            FieldDefinition::keyword("sku"),
        ];

        let all = definition(fields.clone(), IndexSettings::default());
        let names: Vec<_> = all.search_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "body"]);

        let narrowed = definition(
            fields,
            IndexSettings::default().with_default_search_fields(vec!["body", "sku"]),
        );
        let names: Vec<_> = narrowed.search_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["body"]);
    }
}
