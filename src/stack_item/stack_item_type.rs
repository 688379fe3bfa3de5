//! Stack item type tags: JSON names and VM byte codes.

use crate::stack_item::errors::JsonError;
use crate::types::binary_reader::BinaryReader;
use crate::types::binary_writer::BinaryWriter;
use crate::types::errors::CodecError;
use crate::types::serializable::Serializable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::Write;

/// Tag of a [`StackItem`](crate::stack_item::StackItem).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StackItemType {
    Any = 0x00,
    Pointer = 0x10,
    Boolean = 0x20,
    Integer = 0x21,
    ByteString = 0x28,
    Buffer = 0x30,
    Array = 0x40,
    Struct = 0x41,
    Map = 0x48,
    InteropInterface = 0x60,
}

impl StackItemType {
    pub const ALL: [StackItemType; 10] = [
        StackItemType::Any,
        StackItemType::Pointer,
        StackItemType::Boolean,
        StackItemType::Integer,
        StackItemType::ByteString,
        StackItemType::Buffer,
        StackItemType::Array,
        StackItemType::Struct,
        StackItemType::Map,
        StackItemType::InteropInterface,
    ];

    /// Name used in the `type` field of the JSON form.
    pub const fn json_value(self) -> &'static str {
        match self {
            StackItemType::Any => "Any",
            StackItemType::Pointer => "Pointer",
            StackItemType::Boolean => "Boolean",
            StackItemType::Integer => "Integer",
            StackItemType::ByteString => "ByteString",
            StackItemType::Buffer => "Buffer",
            StackItemType::Array => "Array",
            StackItemType::Struct => "Struct",
            StackItemType::Map => "Map",
            StackItemType::InteropInterface => "InteropInterface",
        }
    }

    pub const fn byte(self) -> u8 {
        self as u8
    }

    pub fn from_json_value(name: &str) -> Result<Self, JsonError> {
        Self::ALL
            .into_iter()
            .find(|t| t.json_value() == name)
            .ok_or_else(|| JsonError::UnknownType(name.to_string()))
    }

    pub fn from_byte(byte: u8) -> Result<Self, CodecError> {
        Self::ALL
            .into_iter()
            .find(|t| t.byte() == byte)
            .ok_or_else(|| CodecError::InvalidValue(format!("unknown stack item type {byte:#04x}")))
    }
}

impl fmt::Display for StackItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_value())
    }
}

impl Serializable for StackItemType {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write_u8(self.byte())
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        Self::from_byte(reader.read_u8()?)
    }

    fn size(&self) -> usize {
        1
    }
}

impl Serialize for StackItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.json_value())
    }
}

impl<'de> Deserialize<'de> for StackItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <String as Deserialize>::deserialize(deserializer)?;
        Self::from_json_value(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_values() {
        assert_eq!(StackItemType::Buffer.byte(), 48);
        assert_eq!(StackItemType::from_byte(33).unwrap(), StackItemType::Integer);
        assert!(matches!(
            StackItemType::from_byte(0x22),
            Err(CodecError::InvalidValue(_))
        ));
    }

    #[test]
    fn json_values() {
        assert_eq!(
            StackItemType::from_json_value("Boolean").unwrap(),
            StackItemType::Boolean
        );
        assert_eq!(StackItemType::Buffer.to_string(), "Buffer");
        assert_eq!(
            StackItemType::from_json_value("boolean"),
            Err(JsonError::UnknownType("boolean".into()))
        );
    }

    #[test]
    fn every_type_round_trips() {
        for t in StackItemType::ALL {
            assert_eq!(StackItemType::from_json_value(t.json_value()).unwrap(), t);
            assert_eq!(StackItemType::from_array(&t.to_array().unwrap()).unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(serde_json::from_str::<StackItemType>(&json).unwrap(), t);
        }
    }

    #[test]
    fn serde_reads_type_names() {
        let t: StackItemType = serde_json::from_str("\"InteropInterface\"").unwrap();
        assert_eq!(t, StackItemType::InteropInterface);
        assert!(serde_json::from_str::<StackItemType>("\"Integer8\"").is_err());
    }
}
