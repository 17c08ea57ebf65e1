//! # Query
//! A query selects one collection and orders its documents. Ordering follows the usual hosted-database
//! rules: values of different JSON types rank `null < bool < number < string < array < object`, a
//! document that lacks an ordered field is left out of the results, and ties are broken by document id
//! in the direction of the last ordering.
//!
//! Strings compare lexicographically. A field holding `"1000"` sorts *below* `"200"`.

use std::cmp::Ordering;

use serde_json::Value;

use crate::data_model::{CollectionPath, DocumentSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Query {
    collection: CollectionPath,
    order_by: Vec<OrderBy>,
}

impl Query {
    pub fn new(collection: CollectionPath) -> Self {
        Self {
            collection,
            order_by: Vec::new(),
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn matches(&self, document: &DocumentSnapshot) -> bool {
        self.order_by
            .iter()
            .all(|order| document.get(&order.field).is_some())
    }

    pub fn compare(&self, a: &DocumentSnapshot, b: &DocumentSnapshot) -> Ordering {
        for order in &self.order_by {
            let ordering = match (a.get(&order.field), b.get(&order.field)) {
                (Some(a), Some(b)) => compare_values(a, b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            };
            if ordering != Ordering::Equal {
                return order.direction.apply(ordering);
            }
        }

        let tie_break = self
            .order_by
            .last()
            .map(|order| order.direction)
            .unwrap_or(Direction::Ascending);
        tie_break.apply(a.id.cmp(&b.id))
    }

    /// Filters and sorts `documents` into result order.
    pub fn apply(&self, documents: impl IntoIterator<Item = DocumentSnapshot>) -> Vec<DocumentSnapshot> {
        let mut results: Vec<DocumentSnapshot> = documents
            .into_iter()
            .filter(|document| self.matches(document))
            .collect();
        results.sort_by(|a, b| self.compare(a, b));
        results
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(a, b)| compare_values(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(id: &str, value: Value) -> DocumentSnapshot {
        let mut data = serde_json::Map::new();
        if !value.is_null() {
            data.insert("date".to_string(), value);
        }
        DocumentSnapshot::new(id, data)
    }

    fn query() -> Query {
        Query::new(CollectionPath::parse("notes").unwrap()).order_by("date", Direction::Descending)
    }

    fn ids(documents: &[DocumentSnapshot]) -> Vec<&str> {
        documents.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let results = query().apply([doc("a", json!(200)), doc("b", json!(1000)), doc("c", json!(30))]);
        assert_eq!(ids(&results), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_strings_sort_lexicographically() {
        let results =
            query().apply([doc("a", json!("200")), doc("b", json!("1000")), doc("c", json!("30"))]);
        assert_eq!(ids(&results), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_missing_field_is_excluded() {
        let results = query().apply([doc("a", json!(1)), doc("b", Value::Null)]);
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn test_ties_break_by_id_in_last_direction() {
        let results = query().apply([doc("a", json!(1)), doc("c", json!(1)), doc("b", json!(1))]);
        assert_eq!(ids(&results), vec!["c", "b", "a"]);

        let ascending = Query::new(CollectionPath::parse("notes").unwrap())
            .order_by("date", Direction::Ascending)
            .apply([doc("b", json!(1)), doc("a", json!(1))]);
        assert_eq!(ids(&ascending), vec!["a", "b"]);
    }

    #[test]
    fn test_type_rank() {
        assert_eq!(compare_values(&json!(false), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(99), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!(1.5), &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1])), Ordering::Greater);
    }
}
