// Response envelope normalization.
//
// The backend has shipped several envelope generations and different
// endpoints still answer in different shapes: a bare array, `{users: []}`,
// `{data: {users: []}}`, or `{success: true, data: {users: []}}`. All
// endpoint methods funnel their bodies through this module so the rest of
// the workspace only ever sees canonical values.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// Strip any number of `data` wrapper layers: `{success, data: X}` or
/// `{data: X}` become `X`. A non-object value passes through unchanged.
fn unwrap_data(mut value: Value) -> Value {
    loop {
        value = match value {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => return other,
        };
    }
}

/// Extract a list payload from any known envelope shape.
///
/// `keys` names the field(s) the list may live under once `data` layers
/// are stripped (e.g. `["users"]`). A bare array at any level matches
/// directly. Missing payloads normalize to an empty list rather than an
/// error -- the partial-failure policy upstream treats "no data" and
/// "empty data" identically.
pub fn extract_list<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Result<Vec<T>, Error> {
    let body_preview = preview(&value);
    let inner = unwrap_data(value);

    let list = match inner {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => {
            let mut found = Value::Array(Vec::new());
            for key in keys {
                if let Some(v) = map.remove(*key) {
                    // Lists are occasionally wrapped one level deeper, e.g.
                    // `{users: {data: [...]}}` from the paginated endpoints.
                    found = unwrap_data(v);
                    break;
                }
            }
            found
        }
        Value::Null => Value::Array(Vec::new()),
        other => other,
    };

    serde_json::from_value(list).map_err(|e| Error::Deserialization {
        message: format!("{e}"),
        body: body_preview,
    })
}

/// Extract a single-object payload from any known envelope shape.
///
/// `keys` names optional field(s) the object may live under once `data`
/// layers are stripped (e.g. `["user"]`); with no match the stripped value
/// itself is deserialized.
pub fn extract_object<T: DeserializeOwned>(value: Value, keys: &[&str]) -> Result<T, Error> {
    let body_preview = preview(&value);
    let inner = unwrap_data(value);

    let object = match inner {
        Value::Object(mut map) => {
            let mut found = None;
            for key in keys {
                if let Some(v) = map.remove(*key) {
                    found = Some(unwrap_data(v));
                    break;
                }
            }
            found.unwrap_or(Value::Object(map))
        }
        other => other,
    };

    serde_json::from_value(object).map_err(|e| Error::Deserialization {
        message: format!("{e}"),
        body: body_preview,
    })
}

/// Pull the human-readable message out of a response body, if any.
///
/// Checks `message` then `error` at the top level and inside `data`.
pub fn extract_message(value: &Value) -> Option<String> {
    let from_map = |v: &Value| -> Option<String> {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    from_map(value).or_else(|| value.get("data").and_then(|d| from_map(d)))
}

fn preview(value: &Value) -> String {
    let s = value.to_string();
    let mut p: String = s.chars().take(200).collect();
    if p.len() < s.len() {
        p.push('…');
    }
    p
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn bare_array() {
        let items: Vec<Item> = extract_list(json!([{"id": "a"}, {"id": "b"}]), &["items"]).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn keyed_list() {
        let items: Vec<Item> = extract_list(json!({"items": [{"id": "a"}]}), &["items"]).unwrap();
        assert_eq!(items, vec![Item { id: "a".into() }]);
    }

    #[test]
    fn data_wrapped_keyed_list() {
        let items: Vec<Item> =
            extract_list(json!({"data": {"items": [{"id": "a"}]}}), &["items"]).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn success_envelope() {
        let items: Vec<Item> = extract_list(
            json!({"success": true, "data": {"items": [{"id": "a"}]}}),
            &["items"],
        )
        .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn data_wrapped_bare_array() {
        let items: Vec<Item> = extract_list(json!({"data": [{"id": "a"}]}), &["items"]).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn alternate_key_names() {
        let items: Vec<Item> =
            extract_list(json!({"products": [{"id": "a"}]}), &["bundles", "products"]).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn missing_payload_is_empty() {
        let items: Vec<Item> = extract_list(json!({"success": true}), &["items"]).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn null_payload_is_empty() {
        let items: Vec<Item> = extract_list(Value::Null, &["items"]).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn object_direct_and_keyed() {
        let a: Item = extract_object(json!({"id": "x"}), &["user"]).unwrap();
        assert_eq!(a.id, "x");
        let b: Item = extract_object(json!({"data": {"user": {"id": "y"}}}), &["user"]).unwrap();
        assert_eq!(b.id, "y");
    }

    #[test]
    fn message_preference_order() {
        assert_eq!(
            extract_message(&json!({"message": "m", "error": "e"})).as_deref(),
            Some("m")
        );
        assert_eq!(extract_message(&json!({"error": "e"})).as_deref(), Some("e"));
        assert_eq!(
            extract_message(&json!({"data": {"message": "inner"}})).as_deref(),
            Some("inner")
        );
        assert_eq!(extract_message(&json!({"ok": true})), None);
    }
}
