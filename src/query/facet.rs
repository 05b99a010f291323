use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use crate::core::types::{FieldValue, IndexedDocument};
use crate::query::types::FacetRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub value: FieldValue,
    pub count: usize,
}

/// Count documents per distinct value of each requested field.
///
/// Array values count once per distinct element, so no bucket can exceed the
/// number of documents passed in.
pub fn compute_facets(
    documents: &[&IndexedDocument],
    requests: &[FacetRequest],
) -> HashMap<String, Vec<FacetBucket>> {
    let mut facets = HashMap::new();

    for request in requests {
        let mut buckets: HashMap<String, FacetBucket> = HashMap::new();

        for document in documents {
            let Some(value) = document.get_field(&request.field) else {
                continue;
            };
            let mut seen = HashSet::new();
            for item in facet_values(value) {
                let key = item.group_key();
                if !seen.insert(key.clone()) {
                    continue;
                }
                buckets
                    .entry(key)
                    .or_insert_with(|| FacetBucket { value: item.clone(), count: 0 })
                    .count += 1;
            }
        }

        let mut counts: Vec<FacetBucket> = buckets
            .into_values()
            .filter(|b| b.count >= request.min_count)
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.compare(&b.value)));
        counts.truncate(request.size);

        facets.insert(request.field.clone(), counts);
    }

    facets
}

fn facet_values(value: &FieldValue) -> Vec<&FieldValue> {
    match value {
        FieldValue::Null => Vec::new(),
        FieldValue::Array(items) => items.iter().filter(|v| !v.is_null()).collect(),
        scalar => vec![scalar],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::fields_from_json;
    use chrono::Utc;
    use serde_json::json;

    fn doc(id: usize, fields: serde_json::Value) -> IndexedDocument {
        IndexedDocument {
            id: id.to_string(),
            index_id: "idx".to_string(),
            fields: fields_from_json(fields).unwrap(),
            indexed_at: Utc::now(),
        }
    }

    #[test]
    fn counts_sorted_by_frequency() {
        let docs: Vec<_> = ["a", "a", "b", "c", "c"]
            .iter()
            .enumerate()
            .map(|(i, c)| doc(i, json!({ "category": c })))
            .collect();
        let refs: Vec<_> = docs.iter().collect();

        let facets = compute_facets(&refs, &[FacetRequest::new("category")]);
        let buckets: Vec<_> = facets["category"]
            .iter()
            .map(|b| (b.value.as_str().unwrap(), b.count))
            .collect();
        assert_eq!(buckets, vec![("a", 2), ("c", 2), ("b", 1)]);
    }

    #[test]
    fn min_count_and_size() {
        let docs: Vec<_> = ["a", "a", "a", "b", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, c)| doc(i, json!({ "category": c })))
            .collect();
        let refs: Vec<_> = docs.iter().collect();

        let request = FacetRequest::new("category").with_min_count(2).with_size(1);
        let facets = compute_facets(&refs, &[request]);
        assert_eq!(facets["category"].len(), 1);
        assert_eq!(facets["category"][0].count, 3);
    }

    #[test]
    fn arrays_count_each_element_once_per_document() {
        let docs = vec![
            doc(1, json!({"tags": ["x", "x", "y"]})),
            doc(2, json!({"tags": ["x"]})),
            doc(3, json!({"other": 1})),
        ];
        let refs: Vec<_> = docs.iter().collect();

        let facets = compute_facets(&refs, &[FacetRequest::new("tags")]);
        let tags = &facets["tags"];
        assert_eq!(tags[0].value, FieldValue::from("x"));
        assert_eq!(tags[0].count, 2);
        assert_eq!(tags[1].count, 1);
        assert!(tags.iter().all(|b| b.count <= refs.len()));
    }

    #[test]
    fn ties_across_kinds_follow_value_order() {
        let docs = vec![
            doc(1, json!({"size": "m"})),
            doc(2, json!({"size": 42})),
            doc(3, json!({"size": true})),
            doc(4, json!({"size": 38})),
            doc(5, json!({"size": {"eu": 40.5}})),
            doc(6, json!({"size": {"eu": 40.5}})),
        ];
        let refs: Vec<_> = docs.iter().collect();

        let facets = compute_facets(&refs, &[FacetRequest::new("size")]);
        let values: Vec<_> = facets["size"].iter().map(|b| (b.value.clone(), b.count)).collect();
        assert_eq!(values[0].1, 2);
        assert!(matches!(values[0].0, FieldValue::Object(_)));
        assert_eq!(values[1..].to_vec(), vec![
            (FieldValue::Bool(true), 1),
            (FieldValue::Number(38.0), 1),
            (FieldValue::Number(42.0), 1),
            (FieldValue::from("m"), 1),
        ]);
    }
}
