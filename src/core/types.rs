use serde::{Serialize, Deserialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use chrono::{DateTime, Utc};

pub type IndexId = String;

/// Field name → value map carried by a document.
pub type Fields = HashMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// A document field value.
///
/// Serialised untagged, so a plain JSON payload maps straight onto it. An
/// object holding exactly `lat` and `lon` is a geo point; any other object
/// is kept as a nested map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<FieldValue>),
    GeoPoint(GeoPoint),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Every string reachable from this value: the text itself, or the
    /// text elements of an array.
    pub fn text_values(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(s) => vec![s.as_str()],
            FieldValue::Array(values) => values.iter().filter_map(|v| v.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Stable key used to group identical values (facets, dedup).
    pub fn group_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Position of this value's kind in the cross-kind order.
    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Number(_) => 2,
            FieldValue::Text(_) => 3,
            FieldValue::Array(_) => 4,
            FieldValue::GeoPoint(_) => 5,
            FieldValue::Object(_) => 6,
        }
    }

    /// Total order over all values: by kind
    /// (null < bool < number < text < array < geo point < object), then
    /// naturally within a kind. Arrays and objects compare element-wise.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Array(a), FieldValue::Array(b)) => a
                .iter()
                .zip(b)
                .map(|(x, y)| x.compare(y))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (FieldValue::GeoPoint(a), FieldValue::GeoPoint(b)) => {
                a.lat.total_cmp(&b.lat).then_with(|| a.lon.total_cmp(&b.lon))
            }
            (FieldValue::Object(a), FieldValue::Object(b)) => a
                .iter()
                .zip(b)
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.compare(vb)))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => {
                let lat = map.get("lat").and_then(Value::as_f64);
                let lon = map.get("lon").and_then(Value::as_f64);
                match (lat, lon) {
                    (Some(lat), Some(lon)) if map.len() == 2 => {
                        FieldValue::GeoPoint(GeoPoint { lat, lon })
                    }
                    _ => FieldValue::Object(
                        map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
                    ),
                }
            }
        }
    }
}

/// Convert a JSON object into document fields.
pub fn fields_from_json(value: serde_json::Value) -> Option<Fields> {
    match value {
        serde_json::Value::Object(map) => Some(
            map.into_iter()
                .map(|(name, v)| (name, FieldValue::from(v)))
                .collect(),
        ),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: String,
    pub index_id: IndexId,
    pub fields: Fields,
    pub indexed_at: DateTime<Utc>,
}

impl IndexedDocument {
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
