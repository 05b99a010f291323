//! Filter predicates applied after scoring.
//!
//! Filters combine as a logical AND. Each operator family has its own
//! variant, so evaluation is an exhaustive match; an operator name that is
//! not recognised parses to [`FilterOp::Unknown`], which never matches.

use std::cmp::Ordering;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::core::types::{FieldValue, Fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq(FieldValue),
    Neq(FieldValue),
    Gt(FieldValue),
    Gte(FieldValue),
    Lt(FieldValue),
    Lte(FieldValue),
    In(Vec<FieldValue>),
    Nin(Vec<FieldValue>),
    /// `true` requires a non-null value, `false` requires its absence
    Exists(bool),
    Range { min: Option<f64>, max: Option<f64> },
    Prefix(String),
    Unknown(String),
}

impl FilterOp {
    /// The operand as a single value, for logging which filters a query used.
    pub fn operand(&self) -> FieldValue {
        match self {
            FilterOp::Eq(v) | FilterOp::Neq(v) | FilterOp::Gt(v) | FilterOp::Gte(v) | FilterOp::Lt(v) | FilterOp::Lte(v) => v.clone(),
            FilterOp::In(values) | FilterOp::Nin(values) => FieldValue::Array(values.clone()),
            FilterOp::Exists(b) => FieldValue::Bool(*b),
            FilterOp::Range { min, max } => FieldValue::Array(vec![
                min.map(FieldValue::Number).unwrap_or(FieldValue::Null),
                max.map(FieldValue::Number).unwrap_or(FieldValue::Null),
            ]),
            FilterOp::Prefix(p) => FieldValue::Text(p.clone()),
            FilterOp::Unknown(_) => FieldValue::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
}

impl Filter {
    pub fn new(field: &str, op: FilterOp) -> Self {
        Filter { field: field.to_string(), op }
    }

    /// Build a filter from its wire form: a field, an operator name and a
    /// JSON operand. Operands of the wrong shape for a known operator, and
    /// unrecognised operator names, produce a filter that matches nothing.
    pub fn parse(field: &str, operator: &str, value: Value) -> Self {
        let op = match operator {
            "eq" => FilterOp::Eq(value.into()),
            "neq" => FilterOp::Neq(value.into()),
            "gt" => FilterOp::Gt(value.into()),
            "gte" => FilterOp::Gte(value.into()),
            "lt" => FilterOp::Lt(value.into()),
            "lte" => FilterOp::Lte(value.into()),
            "in" => FilterOp::In(list_operand(value)),
            "nin" => FilterOp::Nin(list_operand(value)),
            "exists" => FilterOp::Exists(match value {
                Value::Bool(b) => b,
                Value::Null => false,
                _ => true,
            }),
            "range" => match value {
                Value::Object(map) => FilterOp::Range {
                    min: map.get("min").and_then(Value::as_f64),
                    max: map.get("max").and_then(Value::as_f64),
                },
                _ => FilterOp::Unknown(operator.to_string()),
            },
            "prefix" => match value {
                Value::String(s) => FilterOp::Prefix(s),
                _ => FilterOp::Unknown(operator.to_string()),
            },
            other => FilterOp::Unknown(other.to_string()),
        };
        Filter::new(field, op)
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        let value = fields.get(&self.field).filter(|v| !v.is_null());

        match &self.op {
            FilterOp::Eq(expected) => value.is_some_and(|v| v == expected),

            FilterOp::Neq(expected) => value.is_none_or(|v| v != expected),

            FilterOp::Gt(bound) => compare(value, bound).is_some_and(|o| o == Ordering::Greater),
            FilterOp::Gte(bound) => compare(value, bound).is_some_and(|o| o != Ordering::Less),
            FilterOp::Lt(bound) => compare(value, bound).is_some_and(|o| o == Ordering::Less),
            FilterOp::Lte(bound) => compare(value, bound).is_some_and(|o| o != Ordering::Greater),

            FilterOp::In(candidates) => value.is_some_and(|v| member_of(v, candidates)),

            FilterOp::Nin(candidates) => value.is_none_or(|v| !member_of(v, candidates)),

            FilterOp::Exists(expected) => value.is_some() == *expected,

            FilterOp::Range { min, max } => {
                let Some(n) = value.and_then(FieldValue::as_f64) else {
                    return false;
                };
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }

            FilterOp::Prefix(prefix) => value
                .and_then(FieldValue::as_str)
                .is_some_and(|s| s.starts_with(prefix.as_str())),

            FilterOp::Unknown(_) => false,
        }
    }
}

pub fn matches_all(filters: &[Filter], fields: &Fields) -> bool {
    filters.iter().all(|f| f.matches(fields))
}

fn list_operand(value: Value) -> Vec<FieldValue> {
    match value {
        Value::Array(items) => items.into_iter().map(FieldValue::from).collect(),
        other => vec![FieldValue::from(other)],
    }
}

/// Array-valued fields match when any element is a candidate.
fn member_of(value: &FieldValue, candidates: &[FieldValue]) -> bool {
    match value {
        FieldValue::Array(items) => items.iter().any(|item| candidates.contains(item)),
        scalar => candidates.contains(scalar),
    }
}

/// Numbers compare numerically; strings compare only when both parse as dates.
fn compare(value: Option<&FieldValue>, bound: &FieldValue) -> Option<Ordering> {
    match (value?, bound) {
        (FieldValue::Number(a), FieldValue::Number(b)) => a.partial_cmp(b),
        (FieldValue::Text(a), FieldValue::Text(b)) => {
            let (a, b) = (parse_date(a)?, parse_date(b)?);
            Some(a.cmp(&b))
        }
        _ => None,
    }
}

/// RFC 3339 timestamps or plain `YYYY-MM-DD` dates, as epoch milliseconds.
pub(crate) fn parse_date(text: &str) -> Option<i64> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
