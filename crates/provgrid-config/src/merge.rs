//! Deep JSON merge for configuration documents.

use serde_json::{Map, Value};

/// Merge configuration documents in order, later documents overriding
/// earlier ones.
///
/// Objects are merged recursively key-by-key; any other value type (arrays
/// included) is replaced wholesale by the later document.
pub fn merge_documents<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut merged = Map::new();
    for document in documents {
        if let Value::Object(fields) = document {
            merge_into(&mut merged, fields);
        }
    }
    Value::Object(merged)
}

fn merge_into(target: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
