//! Errors raised by stack item accessors and by the JSON decoder.

use crate::stack_item::stack_item_type::StackItemType;
use neo_codec_derive::Error;

/// A stack item accessor could not produce the requested value.
///
/// `item` is the item's rendering, truncated to 80 characters of value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    /// The item carries no value.
    #[error("Cannot cast stack item because its value is null")]
    NullValue,
    /// The item's type has no conversion to `target`.
    #[error("Cannot cast stack item {item} to {target}.")]
    Unsupported { item: String, target: &'static str },
    /// The conversion exists but the value could not be converted.
    #[error("Cannot cast stack item {item}: {reason}")]
    Conversion { item: String, reason: String },
}

/// The JSON form of a stack item is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    #[error("stack item must be a JSON object")]
    NotAnObject,
    #[error("stack item has no \"type\" field")]
    MissingType,
    #[error("unknown stack item type \"{0}\"")]
    UnknownType(String),
    #[error("invalid {item_type} value: {reason}")]
    InvalidValue {
        item_type: StackItemType,
        reason: String,
    },
}
