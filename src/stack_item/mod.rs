//! Values returned by virtual machine execution.
//!
//! A [`StackItem`] is one of ten tagged variants. Every variant may carry no
//! value (null), independently of its tag. Values are read through typed
//! accessors (`as_bool`, `as_integer`, ...) that either convert or fail with a
//! [`CastError`]; an item without a value fails every accessor with
//! [`CastError::NullValue`].
//!
//! | variant            | bool | integer | address | string | hex | bytes | list | map | pointer | iterator |
//! |--------------------|------|---------|---------|--------|-----|-------|------|-----|---------|----------|
//! | `Any`              |      |         |         |        |     |       |      |     |         |          |
//! | `Pointer`          |      | x       |         |        |     |       |      |     | x       |          |
//! | `Boolean`          | x    | x       |         | x      |     |       |      |     |         |          |
//! | `Integer`          | x    | x       |         | x      | x   | x     |      |     |         |          |
//! | `ByteString`       | x    | x       | x       | x      | x   | x     |      |     |         |          |
//! | `Buffer`           | x    | x       | x       | x      | x   | x     |      |     |         |          |
//! | `Array`/`Struct`   |      |         |         |        |     |       | x    |     |         |          |
//! | `Map`              |      |         |         |        |     |       |      | x   |         |          |
//! | `InteropInterface` |      |         |         |        |     |       |      |     |         | x        |
//!
//! Items are decoded from and encoded to their JSON form in [`json`].

pub mod errors;
pub mod json;
pub mod map;
pub mod stack_item_type;


pub use errors::{CastError, JsonError};
pub use map::StackMap;
pub use stack_item_type::StackItemType;

use crate::types::big_int;
use crate::types::script_hash::ScriptHash;
use bytes::Bytes;
use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Longest value rendering kept in [`Display`](fmt::Display) output and cast errors.
pub const MAX_VALUE_STRING_LENGTH: usize = 80;

/// Payload of an `InteropInterface` item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Interop {
    /// A handle the node keeps; `id` addresses it in later requests.
    Opaque {
        interface: Option<String>,
        id: String,
    },
    /// A page of iterator results unwrapped by the node.
    Iterator {
        items: Vec<StackItem>,
        truncated: bool,
    },
}

impl Interop {
    /// Whether the node held back further iterator items.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Interop::Iterator { truncated: true, .. })
    }
}

/// A virtual machine stack value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackItem {
    Any(Option<serde_json::Value>),
    Pointer(Option<BigInt>),
    Boolean(Option<bool>),
    Integer(Option<BigInt>),
    ByteString(Option<Bytes>),
    Buffer(Option<Bytes>),
    Array(Option<Vec<StackItem>>),
    Struct(Option<Vec<StackItem>>),
    Map(Option<StackMap>),
    InteropInterface(Option<Interop>),
}

impl StackItem {
    pub fn boolean(value: bool) -> Self {
        StackItem::Boolean(Some(value))
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        StackItem::Integer(Some(value.into()))
    }

    pub fn pointer(value: impl Into<BigInt>) -> Self {
        StackItem::Pointer(Some(value.into()))
    }

    pub fn byte_string(value: impl Into<Bytes>) -> Self {
        StackItem::ByteString(Some(value.into()))
    }

    pub fn buffer(value: impl Into<Bytes>) -> Self {
        StackItem::Buffer(Some(value.into()))
    }

    pub fn array(items: Vec<StackItem>) -> Self {
        StackItem::Array(Some(items))
    }

    pub fn structure(items: Vec<StackItem>) -> Self {
        StackItem::Struct(Some(items))
    }

    pub fn map(map: StackMap) -> Self {
        StackItem::Map(Some(map))
    }

    pub fn item_type(&self) -> StackItemType {
        match self {
            StackItem::Any(_) => StackItemType::Any,
            StackItem::Pointer(_) => StackItemType::Pointer,
            StackItem::Boolean(_) => StackItemType::Boolean,
            StackItem::Integer(_) => StackItemType::Integer,
            StackItem::ByteString(_) => StackItemType::ByteString,
            StackItem::Buffer(_) => StackItemType::Buffer,
            StackItem::Array(_) => StackItemType::Array,
            StackItem::Struct(_) => StackItemType::Struct,
            StackItem::Map(_) => StackItemType::Map,
            StackItem::InteropInterface(_) => StackItemType::InteropInterface,
        }
    }

    /// Whether the item carries no value.
    pub fn is_null(&self) -> bool {
        match self {
            StackItem::Any(v) => v.as_ref().is_none_or(serde_json::Value::is_null),
            StackItem::Pointer(v) | StackItem::Integer(v) => v.is_none(),
            StackItem::Boolean(v) => v.is_none(),
            StackItem::ByteString(v) | StackItem::Buffer(v) => v.is_none(),
            StackItem::Array(v) | StackItem::Struct(v) => v.is_none(),
            StackItem::Map(v) => v.is_none(),
            StackItem::InteropInterface(v) => v.is_none(),
        }
    }

    fn null_check(&self) -> Result<(), CastError> {
        if self.is_null() {
            return Err(CastError::NullValue);
        }
        Ok(())
    }

    fn unsupported(&self, target: &'static str) -> CastError {
        CastError::Unsupported {
            item: self.to_string(),
            target,
        }
    }

    fn conversion(&self, reason: impl fmt::Display) -> CastError {
        CastError::Conversion {
            item: self.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Byte payload of a `ByteString` or `Buffer`.
    fn payload(&self) -> Option<&Bytes> {
        match self {
            StackItem::ByteString(Some(bytes)) | StackItem::Buffer(Some(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// The item as a boolean.
    ///
    /// An `Integer` converts only from exactly 0 or 1. A byte payload is
    /// `true` when it reads as an integer greater than zero.
    pub fn as_bool(&self) -> Result<bool, CastError> {
        self.null_check()?;
        match self {
            StackItem::Boolean(Some(value)) => Ok(*value),
            StackItem::Integer(Some(value)) if value.is_one() => Ok(true),
            StackItem::Integer(Some(value)) if value.is_zero() => Ok(false),
            StackItem::ByteString(_) | StackItem::Buffer(_) => {
                Ok(self.as_integer()?.sign() == Sign::Plus)
            }
            _ => Err(self.unsupported("a boolean")),
        }
    }

    /// The item as an integer. Byte payloads are read as little-endian two's complement.
    pub fn as_integer(&self) -> Result<BigInt, CastError> {
        self.null_check()?;
        match self {
            StackItem::Integer(Some(value)) | StackItem::Pointer(Some(value)) => Ok(value.clone()),
            StackItem::Boolean(Some(value)) => Ok(BigInt::from(u8::from(*value))),
            _ => match self.payload() {
                Some(bytes) => big_int::from_le_bytes(bytes).map_err(|e| self.conversion(e)),
                None => Err(self.unsupported("an integer")),
            },
        }
    }

    /// The address of the little-endian script hash held in a byte payload.
    pub fn as_address(&self) -> Result<String, CastError> {
        self.null_check()?;
        let bytes = self.payload().ok_or_else(|| self.unsupported("an address"))?;
        ScriptHash::from_le_bytes(bytes)
            .map(|hash| hash.to_address())
            .map_err(|e| self.conversion(e))
    }

    /// The item as a string: UTF-8 for byte payloads, decimal for integers.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn as_string(&self) -> Result<String, CastError> {
        self.null_check()?;
        match self {
            StackItem::Integer(Some(value)) => Ok(value.to_string()),
            StackItem::Boolean(Some(value)) => Ok(value.to_string()),
            _ => match self.payload() {
                Some(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
                None => Err(self.unsupported("a string")),
            },
        }
    }

    /// Lowercase hex of [`as_byte_array`](Self::as_byte_array), without prefix.
    pub fn as_hex_string(&self) -> Result<String, CastError> {
        self.null_check()?;
        match self {
            StackItem::Integer(Some(value)) => Ok(hex::encode(big_int::to_le_bytes(value))),
            _ => match self.payload() {
                Some(bytes) => Ok(hex::encode(bytes)),
                None => Err(self.unsupported("a hex string")),
            },
        }
    }

    /// The raw bytes of a byte payload, or the little-endian two's complement of an integer.
    pub fn as_byte_array(&self) -> Result<Bytes, CastError> {
        self.null_check()?;
        match self {
            StackItem::Integer(Some(value)) => Ok(Bytes::from(big_int::to_le_bytes(value))),
            _ => match self.payload() {
                Some(bytes) => Ok(bytes.clone()),
                None => Err(self.unsupported("a byte array")),
            },
        }
    }

    /// The elements of an `Array` or `Struct`.
    pub fn as_list(&self) -> Result<&[StackItem], CastError> {
        self.null_check()?;
        match self {
            StackItem::Array(Some(items)) | StackItem::Struct(Some(items)) => Ok(items),
            _ => Err(self.unsupported("a list")),
        }
    }

    pub fn as_map(&self) -> Result<&StackMap, CastError> {
        self.null_check()?;
        match self {
            StackItem::Map(Some(map)) => Ok(map),
            _ => Err(self.unsupported("a map")),
        }
    }

    pub fn as_pointer(&self) -> Result<BigInt, CastError> {
        self.null_check()?;
        match self {
            StackItem::Pointer(Some(value)) => Ok(value.clone()),
            _ => Err(self.unsupported("a neo-vm pointer")),
        }
    }

    /// The session-scoped id of an opaque `InteropInterface`.
    pub fn as_iterator_id(&self) -> Result<&str, CastError> {
        self.null_check()?;
        match self {
            StackItem::InteropInterface(Some(Interop::Opaque { id, .. })) => Ok(id),
            _ => Err(self.unsupported("a neo-vm session id")),
        }
    }

    /// The iterator page carried by an unwrapped `InteropInterface`.
    pub fn as_iterator(&self) -> Result<&[StackItem], CastError> {
        self.null_check()?;
        match self {
            StackItem::InteropInterface(Some(Interop::Iterator { items, .. })) => Ok(items),
            _ => Err(self.unsupported("an iterator")),
        }
    }

    /// Untruncated rendering of the value, `None` when the item is null.
    pub fn value_string(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        let rendered = match self {
            StackItem::Any(Some(value)) => value.to_string(),
            StackItem::Pointer(Some(value)) | StackItem::Integer(Some(value)) => value.to_string(),
            StackItem::Boolean(Some(value)) => value.to_string(),
            StackItem::ByteString(Some(bytes)) | StackItem::Buffer(Some(bytes)) => {
                hex::encode(bytes)
            }
            StackItem::Array(Some(items)) | StackItem::Struct(Some(items)) => join(items),
            StackItem::Map(Some(map)) => map
                .iter()
                .map(|(key, value)| format!("{key} -> {value}"))
                .collect::<Vec<_>>()
                .join(", "),
            StackItem::InteropInterface(Some(Interop::Opaque { id, .. })) => id.clone(),
            StackItem::InteropInterface(Some(Interop::Iterator { items, .. })) => join(items),
            _ => return None,
        };
        Some(rendered)
    }
}

fn join(items: &[StackItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Type{value='...'}`, the value cut at [`MAX_VALUE_STRING_LENGTH`] characters.
impl fmt::Display for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value_string().unwrap_or_else(|| "null".to_string());
        match value.char_indices().nth(MAX_VALUE_STRING_LENGTH) {
            Some((cut, _)) => write!(f, "{}{{value='{}...'}}", self.item_type(), &value[..cut]),
            None => write!(f, "{}{{value='{}'}}", self.item_type(), value),
        }
    }
}

impl Hash for StackItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.item_type().hash(state);
        match self {
            // JSON values have no Hash; equal values print equally.
            StackItem::Any(value) => value.as_ref().map(ToString::to_string).hash(state),
            StackItem::Pointer(value) | StackItem::Integer(value) => value.hash(state),
            StackItem::Boolean(value) => value.hash(state),
            StackItem::ByteString(value) | StackItem::Buffer(value) => value.hash(state),
            StackItem::Array(value) | StackItem::Struct(value) => value.hash(state),
            StackItem::Map(value) => value.hash(state),
            StackItem::InteropInterface(value) => value.hash(state),
        }
    }
}
