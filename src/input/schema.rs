//! JSON Schema key extraction.
//!
//! Walks a JSON-Schema-like document depth-first (pre-order) and produces the
//! dotted keys of every `title` / `description` that needs a translation.
//! Only `properties`, `items` and the `oneOf` / `anyOf` / `allOf` branches are
//! followed; no other keyword has meaning here.

use serde_json::{
    Map,
    Value,
};

use crate::types::TranslationKey;

/// Union keywords visited, in this order.
const UNION_KEYWORDS: &[&str] = &["oneOf", "anyOf", "allOf"];

/// Extract translatable keys from a schema document.
///
/// Output is in traversal order. Duplicates are only possible when the schema
/// itself repeats a shape; deduplication is left to the caller.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use json_i18n_translator::input::extract_schema_keys;
///
/// let schema = json!({
///     "title": "Root",
///     "properties": { "name": { "title": "Name" } }
/// });
///
/// assert_eq!(extract_schema_keys(&schema), vec!["title", "properties.name.title"]);
/// ```
#[must_use]
pub fn extract_schema_keys(schema: &Value) -> Vec<TranslationKey> {
    let mut keys = Vec::new();
    if let Value::Object(node) = schema {
        traverse(node, "", &mut keys);
    }
    keys
}

/// Pre-order walk; `prefix` ends with a dot unless empty.
fn traverse(node: &Map<String, Value>, prefix: &str, keys: &mut Vec<TranslationKey>) {
    if node.contains_key("title") {
        keys.push(format!("{prefix}title"));
    }
    if node.contains_key("description") {
        keys.push(format!("{prefix}description"));
    }

    if let Some(Value::Object(properties)) = node.get("properties") {
        for (name, property) in properties {
            if let Value::Object(child) = property {
                traverse(child, &format!("{prefix}properties.{name}."), keys);
            }
        }
    }

    if node.get("type").and_then(Value::as_str) == Some("array")
        && let Some(Value::Object(items)) = node.get("items")
    {
        traverse(items, &format!("{prefix}items."), keys);
    }

    for keyword in UNION_KEYWORDS {
        if let Some(Value::Array(branches)) = node.get(*keyword) {
            for (index, branch) in branches.iter().enumerate() {
                if let Value::Object(child) = branch {
                    traverse(child, &format!("{prefix}{keyword}.{index}."), keys);
                }
            }
        }
    }
}
