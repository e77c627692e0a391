//! Upload classification and normalization.
//!
//! An uploaded document goes through an ordered predicate chain
//! (schema → canonical → flat → fallback); the first match decides how it is
//! turned into a [`TranslationTable`] or a list of schema keys.

use serde_json::{
    Map,
    Value,
};

use super::schema::extract_schema_keys;
use super::types::{
    Upload,
    UploadError,
    UploadKind,
};
use crate::types::{
    TranslationEntry,
    TranslationTable,
};

/// Separator used when flattening nested uploads.
pub const DEFAULT_KEY_SEPARATOR: &str = ".";

/// `properties`, `$schema`, or `type: "object"` marks a schema document.
#[must_use]
pub fn is_schema(object: &Map<String, Value>) -> bool {
    object.get("properties").is_some_and(|v| !v.is_null())
        || object.get("$schema").is_some_and(|v| !v.is_null())
        || object.get("type").and_then(Value::as_str) == Some("object")
}

/// Every value is an object whose every value is a string.
#[must_use]
pub fn is_canonical_table(object: &Map<String, Value>) -> bool {
    object.values().all(|value| {
        value.as_object().is_some_and(|languages| languages.values().all(Value::is_string))
    })
}

/// Every value is a string.
#[must_use]
pub fn is_flat_map(object: &Map<String, Value>) -> bool {
    object.values().all(Value::is_string)
}

/// Classify an uploaded document. Pure and total.
#[must_use]
pub fn classify(value: &Value) -> UploadKind {
    let Value::Object(object) = value else {
        return UploadKind::Rejected;
    };

    if is_schema(object) {
        UploadKind::Schema
    } else if is_canonical_table(object) {
        UploadKind::Canonical
    } else if is_flat_map(object) {
        UploadKind::Flat
    } else {
        UploadKind::Fallback
    }
}

/// Classify and normalize an uploaded document.
///
/// # Arguments
/// * `value` - Parsed JSON document
/// * `assumed_language` - Language given to values of flat and nested uploads
/// * `separator` - Separator for flattened key paths
///
/// # Errors
/// [`UploadError::Unsupported`] when the top level is not an object.
pub fn normalize(
    value: &Value,
    assumed_language: &str,
    separator: &str,
) -> Result<Upload, UploadError> {
    let kind = classify(value);
    tracing::debug!(?kind, "Classified upload");

    let Value::Object(object) = value else {
        return Err(UploadError::Unsupported(json_type_name(value)));
    };

    let upload = match kind {
        UploadKind::Schema => Upload::Schema { keys: extract_schema_keys(value) },
        UploadKind::Canonical => Upload::Translations { kind, table: canonical_table(object) },
        UploadKind::Flat => Upload::Translations {
            kind,
            table: wrap_values(
                object.iter().map(|(key, v)| (key.clone(), leaf_to_string(v))),
                assumed_language,
            ),
        },
        UploadKind::Fallback => Upload::Translations {
            kind,
            table: wrap_values(flatten_object(value, separator), assumed_language),
        },
        UploadKind::Rejected => return Err(UploadError::Unsupported(json_type_name(value))),
    };

    Ok(upload)
}

/// Parse uploaded text as JSON.
///
/// # Errors
/// [`UploadError::Malformed`] when the text is not valid JSON.
pub fn parse_upload(text: &str) -> Result<Value, UploadError> {
    Ok(serde_json::from_str(text)?)
}

/// Flatten a nested object into dotted key paths.
///
/// Arrays and primitives are leaves: strings are kept verbatim, everything else
/// becomes its compact JSON text. Empty nested objects produce no key.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use json_i18n_translator::input::flatten_object;
///
/// let json = json!({
///     "common": { "hello": "Hello", "tags": ["a", "b"] },
///     "count": 3
/// });
///
/// let flattened = flatten_object(&json, ".");
/// assert_eq!(flattened.get("common.hello").map(String::as_str), Some("Hello"));
/// assert_eq!(flattened.get("common.tags").map(String::as_str), Some(r#"["a","b"]"#));
/// assert_eq!(flattened.get("count").map(String::as_str), Some("3"));
/// ```
#[must_use]
pub fn flatten_object(json: &Value, separator: &str) -> TranslationEntry {
    let mut result = TranslationEntry::new();
    flatten_value(json, separator, None, &mut result);
    result
}

/// Recursive step of [`flatten_object`].
fn flatten_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut TranslationEntry,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_value(value, separator, Some(&full_key), result);
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), leaf_to_string(json));
            }
        }
    }
}

/// Strings verbatim, anything else as compact JSON.
fn leaf_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Copy a canonical table into owned strings.
fn canonical_table(object: &Map<String, Value>) -> TranslationTable {
    object
        .iter()
        .map(|(key, languages)| {
            let entry = languages
                .as_object()
                .map(|langs| {
                    langs
                        .iter()
                        .map(|(lang, text)| (lang.clone(), leaf_to_string(text)))
                        .collect::<TranslationEntry>()
                })
                .unwrap_or_default();
            (key.clone(), entry)
        })
        .collect()
}

/// Give every value to `language`.
fn wrap_values(
    values: impl IntoIterator<Item = (String, String)>,
    language: &str,
) -> TranslationTable {
    values
        .into_iter()
        .map(|(key, text)| {
            let mut entry = TranslationEntry::new();
            entry.insert(language.to_string(), text);
            (key, entry)
        })
        .collect()
}

/// Article and type name for error messages.
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn object(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    #[rstest]
    #[case::properties(json!({ "properties": {} }), true)]
    #[case::dollar_schema(json!({ "$schema": "https://json-schema.org/draft/2020-12/schema" }), true)]
    #[case::object_type(json!({ "type": "object" }), true)]
    #[case::string_type(json!({ "type": "string" }), false)]
    #[case::null_properties(json!({ "properties": null }), false)]
    #[case::translations(json!({ "hello": { "en": "Hello" } }), false)]
    fn test_is_schema(#[case] value: Value, #[case] expected: bool) {
        assert_that!(is_schema(object(&value)), eq(expected));
    }

    #[rstest]
    #[case::canonical(json!({ "a": { "en": "A", "de": "A" } }), true)]
    #[case::empty_object(json!({}), true)]
    #[case::empty_entry(json!({ "a": {} }), true)]
    #[case::nested_too_deep(json!({ "a": { "b": { "c": "x" } } }), false)]
    #[case::array_value(json!({ "a": ["x"] }), false)]
    #[case::null_value(json!({ "a": null }), false)]
    #[case::number_leaf(json!({ "a": { "en": 1 } }), false)]
    #[case::flat(json!({ "a": "x" }), false)]
    fn test_is_canonical_table(#[case] value: Value, #[case] expected: bool) {
        assert_that!(is_canonical_table(object(&value)), eq(expected));
    }

    #[rstest]
    #[case::flat(json!({ "a": "x", "b.c": "y" }), true)]
    #[case::number(json!({ "a": "x", "b": 2 }), false)]
    #[case::nested(json!({ "a": { "b": "x" } }), false)]
    fn test_is_flat_map(#[case] value: Value, #[case] expected: bool) {
        assert_that!(is_flat_map(object(&value)), eq(expected));
    }

    #[rstest]
    #[case::schema_wins_over_canonical(json!({ "properties": { "a": { "title": "A" } } }), UploadKind::Schema)]
    #[case::canonical(json!({ "a": { "en": "A" } }), UploadKind::Canonical)]
    #[case::flat(json!({ "a": "A" }), UploadKind::Flat)]
    #[case::mixed(json!({ "a": "A", "b": { "c": { "d": "D" } } }), UploadKind::Fallback)]
    #[case::with_numbers(json!({ "a": 1 }), UploadKind::Fallback)]
    #[case::array(json!(["a"]), UploadKind::Rejected)]
    #[case::string(json!("a"), UploadKind::Rejected)]
    #[case::null(json!(null), UploadKind::Rejected)]
    fn test_classify(#[case] value: Value, #[case] expected: UploadKind) {
        assert_that!(classify(&value), eq(expected));
    }

    #[googletest::test]
    fn test_normalize_flat_map_wraps_in_assumed_language() {
        let value = json!({ "a.b": "hello" });

        let upload = normalize(&value, "en", ".").unwrap();

        let Upload::Translations { kind, table } = upload else {
            panic!("expected translations");
        };
        expect_that!(kind, eq(UploadKind::Flat));
        assert_eq!(table, serde_json::from_value::<TranslationTable>(json!({ "a.b": { "en": "hello" } })).unwrap());
    }

    #[googletest::test]
    fn test_normalize_canonical_is_unchanged() {
        let value = json!({ "greeting": { "en": "Hello", "de": "Hallo" } });

        let upload = normalize(&value, "en", ".").unwrap();

        let Upload::Translations { kind, table } = upload else {
            panic!("expected translations");
        };
        expect_that!(kind, eq(UploadKind::Canonical));
        assert_eq!(table["greeting"]["de"], "Hallo");
        assert_eq!(
            table["greeting"].keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["en", "de"]
        );
    }

    #[googletest::test]
    fn test_normalize_fallback_flattens_nested_object() {
        let value = json!({
            "title": "Shop",
            "cart": { "empty": "Nothing here", "items": ["x", "y"], "total": 3, "meta": {} }
        });

        let upload = normalize(&value, "de", ".").unwrap();

        let Upload::Translations { kind, table } = upload else {
            panic!("expected translations");
        };
        expect_that!(kind, eq(UploadKind::Fallback));
        assert_eq!(
            table.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["title", "cart.empty", "cart.items", "cart.total"]
        );
        assert_eq!(table["cart.empty"]["de"], "Nothing here");
        assert_eq!(table["cart.items"]["de"], r#"["x","y"]"#);
        assert_eq!(table["cart.total"]["de"], "3");
    }

    #[googletest::test]
    fn test_normalize_schema_returns_keys() {
        let value = json!({ "$schema": "x", "title": "Root" });

        let upload = normalize(&value, "en", ".").unwrap();

        assert_eq!(upload, Upload::Schema { keys: vec!["title".to_string()] });
    }

    #[googletest::test]
    fn test_normalize_rejects_non_object() {
        let result = normalize(&json!([1, 2]), "en", ".");

        assert!(matches!(result, Err(UploadError::Unsupported("an array"))));
    }

    #[googletest::test]
    fn test_parse_upload_malformed() {
        let result = parse_upload("{ not json");

        assert!(matches!(result, Err(UploadError::Malformed(_))));
    }

    #[googletest::test]
    fn test_flatten_object_custom_separator() {
        let json = json!({ "common": { "hello": "Hello" } });

        let result = flatten_object(&json, "_");

        expect_that!(result.get("common_hello"), some(eq(&"Hello".to_string())));
    }

    #[googletest::test]
    fn test_flatten_object_null_and_bool_leaves() {
        let json = json!({ "flag": true, "nothing": null });

        let result = flatten_object(&json, ".");

        expect_that!(result.get("flag"), some(eq(&"true".to_string())));
        expect_that!(result.get("nothing"), some(eq(&"null".to_string())));
    }
}
