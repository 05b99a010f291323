use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::types::{FieldValue, IndexId};

/// What happened, with the payload specific to that kind of event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Query {
        query: String,
        result_count: usize,
        response_time_ms: u64,
        #[serde(default)]
        filters_used: HashMap<String, FieldValue>,
    },
    ZeroResults {
        query: String,
    },
    Click {
        query: String,
        document_id: String,
        position: usize,
    },
    SuggestionClick {
        prefix: String,
        suggestion: String,
        position: usize,
    },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Query { .. } => "query",
            EventKind::ZeroResults { .. } => "zero_results",
            EventKind::Click { .. } => "click",
            EventKind::SuggestionClick { .. } => "suggestion_click",
        }
    }
}

/// Immutable entry of the analytics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchAnalyticsEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub index_id: IndexId,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl SearchAnalyticsEvent {
    pub fn new(index_id: &str, kind: EventKind) -> Self {
        SearchAnalyticsEvent {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            index_id: index_id.to_string(),
            user_id: None,
            session_id: None,
            kind,
        }
    }

    pub fn with_user(mut self, user_id: Option<String>, session_id: Option<String>) -> Self {
        self.user_id = user_id;
        self.session_id = session_id;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryLog {
    pub index_id: IndexId,
    pub query: String,
    pub result_count: usize,
    pub response_time_ms: u64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub filters_used: HashMap<String, FieldValue>,
}

impl QueryLog {
    pub fn new(index_id: &str, query: &str, result_count: usize, response_time_ms: u64) -> Self {
        QueryLog {
            index_id: index_id.to_string(),
            query: query.to_string(),
            result_count,
            response_time_ms,
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn with_session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    pub fn with_filter(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.filters_used.insert(field.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickLog {
    pub index_id: IndexId,
    pub query: String,
    pub document_id: String,
    pub position: usize,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ClickLog {
    pub fn new(index_id: &str, query: &str, document_id: &str, position: usize) -> Self {
        ClickLog {
            index_id: index_id.to_string(),
            query: query.to_string(),
            document_id: document_id.to_string(),
            position,
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionClickLog {
    pub index_id: IndexId,
    pub prefix: String,
    pub suggestion: String,
    pub position: usize,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl SuggestionClickLog {
    pub fn new(index_id: &str, prefix: &str, suggestion: &str, position: usize) -> Self {
        SuggestionClickLog {
            index_id: index_id.to_string(),
            prefix: prefix.to_string(),
            suggestion: suggestion.to_string(),
            position,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_tag() {
        let event = SearchAnalyticsEvent::new("idx", EventKind::ZeroResults { query: "nothing".into() });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "zero_results");
        assert_eq!(json["query"], "nothing");
        assert_eq!(json["index_id"], "idx");

        let back: SearchAnalyticsEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn events_get_distinct_ids() {
        let a = SearchAnalyticsEvent::new("idx", EventKind::ZeroResults { query: "q".into() });
        let b = SearchAnalyticsEvent::new("idx", EventKind::ZeroResults { query: "q".into() });
        assert_ne!(a.id, b.id);
        assert_eq!(a.kind.name(), "zero_results");
    }
}
