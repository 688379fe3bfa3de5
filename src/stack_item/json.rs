//! JSON form of stack items, as returned by node RPC responses.
//!
//! ```text
//! {"type": "Integer", "value": "1124"}
//! {"type": "ByteString", "value": "V29vbG9uZw=="}
//! {"type": "Map", "value": [{"key": {...}, "value": {...}}, ...]}
//! {"type": "InteropInterface", "interface": "IIterator", "id": "fcf7b800-..."}
//! {"type": "InteropInterface", "iterator": [...], "truncated": false}
//! ```
//!
//! Fields other than the ones a type uses are ignored.

use crate::stack_item::{Interop, JsonError, StackItem, StackItemType, StackMap};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

/// Signature of a decoder for one stack item.
pub type DecodeFn = fn(&Value) -> Result<StackItem, JsonError>;

fn invalid(item_type: StackItemType, reason: impl Into<String>) -> JsonError {
    JsonError::InvalidValue {
        item_type,
        reason: reason.into(),
    }
}

/// The `value` field, with JSON `null` treated as missing.
fn value_field(object: &Map<String, Value>) -> Option<&Value> {
    object.get("value").filter(|v| !v.is_null())
}

impl StackItem {
    /// Decodes a stack item, recursing into nested items.
    pub fn from_json(value: &Value) -> Result<StackItem, JsonError> {
        let object = value.as_object().ok_or(JsonError::NotAnObject)?;
        let type_name = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(JsonError::MissingType)?;
        let item_type = StackItemType::from_json_value(type_name)?;
        let value = value_field(object);

        Ok(match item_type {
            StackItemType::Any => StackItem::Any(value.cloned()),
            StackItemType::Pointer => StackItem::Pointer(decode_integer(item_type, value)?),
            StackItemType::Integer => StackItem::Integer(decode_integer(item_type, value)?),
            StackItemType::Boolean => StackItem::Boolean(decode_boolean(value)?),
            StackItemType::ByteString => StackItem::ByteString(decode_bytes(item_type, value)?),
            StackItemType::Buffer => StackItem::Buffer(decode_bytes(item_type, value)?),
            StackItemType::Array => {
                StackItem::Array(decode_list(item_type, value, StackItem::from_json)?)
            }
            StackItemType::Struct => {
                StackItem::Struct(decode_list(item_type, value, StackItem::from_json)?)
            }
            StackItemType::Map => StackItem::Map(decode_map(value, StackItem::from_json)?),
            StackItemType::InteropInterface => {
                StackItem::InteropInterface(decode_interop(object, StackItem::from_json)?)
            }
        })
    }

    /// Encodes the item. A null list, struct or map is written as `[]`.
    pub fn to_json(&self) -> Value {
        let type_name = self.item_type().json_value();
        match self {
            StackItem::Any(value) => json!({ "type": type_name, "value": value }),
            StackItem::Pointer(value) | StackItem::Integer(value) => json!({
                "type": type_name,
                "value": value.as_ref().map(ToString::to_string),
            }),
            StackItem::Boolean(value) => json!({ "type": type_name, "value": value }),
            StackItem::ByteString(value) | StackItem::Buffer(value) => json!({
                "type": type_name,
                "value": value.as_ref().map(|bytes| BASE64.encode(bytes)),
            }),
            StackItem::Array(items) | StackItem::Struct(items) => json!({
                "type": type_name,
                "value": items
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(StackItem::to_json)
                    .collect::<Vec<_>>(),
            }),
            StackItem::Map(map) => {
                let pairs: Vec<Value> = map
                    .iter()
                    .flat_map(StackMap::iter)
                    .map(|(key, value)| json!({ "key": key.to_json(), "value": value.to_json() }))
                    .collect();
                json!({ "type": type_name, "value": pairs })
            }
            StackItem::InteropInterface(Some(Interop::Opaque { interface, id })) => {
                let mut object = json!({ "type": type_name, "id": id });
                if let (Some(interface), Some(fields)) = (interface, object.as_object_mut()) {
                    fields.insert("interface".into(), Value::from(interface.as_str()));
                }
                object
            }
            StackItem::InteropInterface(Some(Interop::Iterator { items, truncated })) => json!({
                "type": type_name,
                "iterator": items.iter().map(StackItem::to_json).collect::<Vec<_>>(),
                "truncated": truncated,
            }),
            StackItem::InteropInterface(None) => json!({ "type": type_name }),
        }
    }
}

/// Integers arrive as decimal strings or JSON numbers; `""` means no value.
fn decode_integer(
    item_type: StackItemType,
    value: Option<&Value>,
) -> Result<Option<BigInt>, JsonError> {
    let text = match value {
        None => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(invalid(item_type, format!("expected an integer, got {other}"))),
    };
    text.parse::<BigInt>()
        .map(Some)
        .map_err(|e| invalid(item_type, format!("{text:?}: {e}")))
}

/// Booleans arrive as JSON booleans or as `"true"` / `"false"`.
fn decode_boolean(value: Option<&Value>) -> Result<Option<bool>, JsonError> {
    match value {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(invalid(
            StackItemType::Boolean,
            format!("expected a boolean, got {other}"),
        )),
    }
}

/// Byte payloads arrive base64-encoded.
fn decode_bytes(
    item_type: StackItemType,
    value: Option<&Value>,
) -> Result<Option<Bytes>, JsonError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => BASE64
            .decode(s)
            .map(|bytes| Some(Bytes::from(bytes)))
            .map_err(|e| invalid(item_type, format!("invalid base64: {e}"))),
        Some(other) => Err(invalid(item_type, format!("expected base64 text, got {other}"))),
    }
}

fn decode_list(
    item_type: StackItemType,
    value: Option<&Value>,
    decode: DecodeFn,
) -> Result<Option<Vec<StackItem>>, JsonError> {
    match value {
        None => Ok(None),
        Some(Value::Array(elements)) => elements
            .iter()
            .map(decode)
            .collect::<Result<_, _>>()
            .map(Some),
        Some(other) => Err(invalid(item_type, format!("expected an array, got {other}"))),
    }
}

/// Decodes the `[{"key": item, "value": item}, ...]` form of a map.
///
/// Keys and values go through `decode`. A repeated key keeps its first
/// position and takes the later value.
pub fn decode_map(value: Option<&Value>, decode: DecodeFn) -> Result<Option<StackMap>, JsonError> {
    let elements = match value {
        None => return Ok(None),
        Some(Value::Array(elements)) => elements,
        Some(other) => {
            return Err(invalid(
                StackItemType::Map,
                format!("expected an array of key/value pairs, got {other}"),
            ));
        }
    };

    let mut map = StackMap::new();
    for (index, element) in elements.iter().enumerate() {
        let field = |name: &str| {
            element.get(name).ok_or_else(|| {
                invalid(StackItemType::Map, format!("entry {index} has no \"{name}\""))
            })
        };
        let key = decode(field("key")?)?;
        let value = decode(field("value")?)?;
        if let Some(previous) = map.insert(key, value) {
            crate::warn!("duplicate key in map stack item, replacing {previous}");
        }
    }
    Ok(Some(map))
}

/// An interop item is an iterator page when `iterator` is present, otherwise
/// an opaque handle when `id` is present.
fn decode_interop(
    object: &Map<String, Value>,
    decode: DecodeFn,
) -> Result<Option<Interop>, JsonError> {
    let item_type = StackItemType::InteropInterface;
    if let Some(iterator) = object.get("iterator").filter(|v| !v.is_null()) {
        let items = decode_list(item_type, Some(iterator), decode)?.unwrap_or_default();
        let truncated = match object.get("truncated") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(invalid(
                    item_type,
                    format!("truncated must be a boolean, got {other}"),
                ));
            }
        };
        return Ok(Some(Interop::Iterator { items, truncated }));
    }

    let id = match object.get("id").or_else(|| value_field(object)) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(id)) => id.clone(),
        Some(other) => return Err(invalid(item_type, format!("id must be a string, got {other}"))),
    };
    let interface = object
        .get("interface")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(Some(Interop::Opaque { interface, id }))
}

impl Serialize for StackItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StackItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StackItem::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::test::item;

    #[test]
    fn ignores_unknown_fields() {
        let parsed = item(r#"{"type":"Integer","value":"5","extra":{"nested":true}}"#);
        assert_eq!(parsed, StackItem::integer(5));
    }

    #[test]
    fn integer_accepts_numbers_and_strings() {
        assert_eq!(item(r#"{"type":"Integer","value":42}"#), StackItem::integer(42));
        assert_eq!(
            item(r#"{"type":"Integer","value":"-123456789012345678901234567890"}"#)
                .as_string()
                .unwrap(),
            "-123456789012345678901234567890"
        );
        assert_eq!(item(r#"{"type":"Integer","value":""}"#), StackItem::Integer(None));
        assert_eq!(item(r#"{"type":"Pointer"}"#), StackItem::Pointer(None));
    }

    #[test]
    fn malformed_values_are_errors() {
        let bad = [
            r#"{"type":"Integer","value":"12a"}"#,
            r#"{"type":"Integer","value":1.5}"#,
            r#"{"type":"Boolean","value":"yes"}"#,
            r#"{"type":"ByteString","value":"!!"}"#,
            r#"{"type":"Array","value":{}}"#,
            r#"{"type":"Map","value":[{"key":{"type":"Integer","value":"1"}}]}"#,
        ];
        for json in bad {
            let value: Value = serde_json::from_str(json).unwrap();
            assert!(
                matches!(StackItem::from_json(&value), Err(JsonError::InvalidValue { .. })),
                "{json}"
            );
        }
    }

    #[test]
    fn type_errors() {
        assert_eq!(StackItem::from_json(&json!([])), Err(JsonError::NotAnObject));
        assert_eq!(StackItem::from_json(&json!({"value": 1})), Err(JsonError::MissingType));
        assert_eq!(
            StackItem::from_json(&json!({"type": "Float"})),
            Err(JsonError::UnknownType("Float".into()))
        );
        assert!(serde_json::from_str::<StackItem>(r#"{"type":"Float"}"#).is_err());
    }

    #[test]
    fn nested_map_decodes_recursively() {
        let parsed = item(
            r#"{"type":"Map","value":[
                {"key":{"type":"Integer","value":"1"},
                 "value":{"type":"Map","value":[
                    {"key":{"type":"ByteString","value":"YQ=="},"value":{"type":"Array","value":[]}}
                 ]}}
            ]}"#,
        );
        let inner = parsed
            .as_map()
            .unwrap()
            .get(&StackItem::integer(1))
            .unwrap()
            .as_map()
            .unwrap();
        assert_eq!(inner.get_by_str("a"), Some(&StackItem::array(vec![])));
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let parsed = item(
            r#"{"type":"Map","value":[
                {"key":{"type":"ByteString","value":"YQ=="},"value":{"type":"Integer","value":"1"}},
                {"key":{"type":"ByteString","value":"YQ=="},"value":{"type":"Integer","value":"2"}}
            ]}"#,
        );
        let map = parsed.as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_by_str("a"), Some(&StackItem::integer(2)));
    }

    #[test]
    fn decode_map_takes_any_decoder() {
        fn always_null(_: &Value) -> Result<StackItem, JsonError> {
            Ok(StackItem::Any(None))
        }
        let pairs = json!([{"key": 1, "value": 2}]);
        let map = decode_map(Some(&pairs), always_null).unwrap().unwrap();
        assert_eq!(map.get(&StackItem::Any(None)), Some(&StackItem::Any(None)));
    }

    #[test]
    fn interop_iterator_page() {
        let parsed = item(
            r#"{"type":"InteropInterface","iterator":[{"type":"Integer","value":"1"}],"truncated":true}"#,
        );
        assert_eq!(parsed.as_iterator().unwrap(), &[StackItem::integer(1)]);
        assert!(matches!(&parsed, StackItem::InteropInterface(Some(i)) if i.is_truncated()));
        assert!(matches!(
            parsed.as_iterator_id(),
            Err(crate::stack_item::CastError::Unsupported { .. })
        ));
    }

    #[test]
    fn encodes_documented_shapes() {
        assert_eq!(
            StackItem::integer(1124).to_json(),
            json!({"type": "Integer", "value": "1124"})
        );
        assert_eq!(
            StackItem::buffer(b"Woolong".to_vec()).to_json(),
            json!({"type": "Buffer", "value": "V29vbG9uZw=="})
        );
        assert_eq!(
            StackItem::boolean(false).to_json(),
            json!({"type": "Boolean", "value": false})
        );
        assert_eq!(
            StackItem::Array(None).to_json(),
            json!({"type": "Array", "value": []})
        );
        assert_eq!(StackItem::Map(None).to_json(), json!({"type": "Map", "value": []}));
        assert_eq!(
            StackItem::InteropInterface(Some(Interop::Opaque {
                interface: Some("IIterator".into()),
                id: "abc".into(),
            }))
            .to_json(),
            json!({"type": "InteropInterface", "interface": "IIterator", "id": "abc"})
        );
    }

    #[test]
    fn encoded_items_decode_to_equal_items() {
        let map: StackMap = [(StackItem::byte_string(b"k".to_vec()), StackItem::pointer(9))]
            .into_iter()
            .collect();
        let original = StackItem::structure(vec![
            StackItem::Any(None),
            StackItem::integer(-7),
            StackItem::map(map),
            StackItem::InteropInterface(Some(Interop::Iterator {
                items: vec![StackItem::boolean(true)],
                truncated: false,
            })),
        ]);
        let text = serde_json::to_string(&original).unwrap();
        assert_eq!(serde_json::from_str::<StackItem>(&text).unwrap(), original);
    }
}
