//! The `Serializable` contract and its impls for primitive and container types.

use crate::types::binary_reader::BinaryReader;
use crate::types::binary_writer::BinaryWriter;
use crate::types::errors::CodecError;
use crate::types::var_int;
use bytes::Bytes;
use std::io::Write;

/// A type with an exact binary wire form.
///
/// Implementations must keep `size() == to_array()?.len()` and
/// `from_array(&x.to_array()?) == Ok(x)`.
pub trait Serializable: Sized {
    /// Writes `self` to `writer`.
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError>;

    /// Reads one value from `reader`.
    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError>;

    /// Serialized length in bytes, including any length prefixes.
    fn size(&self) -> usize;

    /// Serializes `self` into a fresh buffer.
    fn to_array(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = BinaryWriter::new(Vec::with_capacity(self.size()));
        self.serialize(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Decodes a value that must occupy all of `bytes`.
    fn from_array(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = BinaryReader::new(Bytes::copy_from_slice(bytes));
        let value = Self::deserialize(&mut reader)?;
        match reader.available() {
            0 => Ok(value),
            left => Err(CodecError::TrailingBytes(left)),
        }
    }
}

/// Size of a count-framed list of `values`.
pub fn list_size<T: Serializable>(values: &[T]) -> usize {
    var_int::encoded_size(values.len() as u64) + values.iter().map(T::size).sum::<usize>()
}

/// Size of a byte-length-framed list of `values`.
pub fn list_var_bytes_size<T: Serializable>(values: &[T]) -> usize {
    let span: usize = values.iter().map(T::size).sum();
    var_int::encoded_size(span as u64) + span
}

impl Serializable for u8 {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write_u8(*self)
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        reader.read_u8()
    }

    fn size(&self) -> usize {
        1
    }
}

impl Serializable for bool {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write_bool(*self)
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        reader.read_bool()
    }

    fn size(&self) -> usize {
        1
    }
}

/// Fixed-width little-endian integers.
macro_rules! impl_serializable_int {
    ($($ty:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl Serializable for $ty {
                fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
                    writer.$write(*self)
                }

                fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
                    reader.$read()
                }

                fn size(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }
            }
        )*
    };
}

impl_serializable_int! {
    i16 => write_i16, read_i16;
    u16 => write_u16, read_u16;
    i32 => write_i32, read_i32;
    u32 => write_u32, read_u32;
    i64 => write_i64, read_i64;
    u64 => write_u64, read_u64;
}

/// Fixed-length arrays carry no prefix.
impl<T: Serializable, const N: usize> Serializable for [T; N] {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        for item in self {
            item.serialize(writer)?;
        }
        Ok(())
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::deserialize(reader)?);
        }
        items
            .try_into()
            .map_err(|_| CodecError::InvalidValue(format!("expected {N} array elements")))
    }

    fn size(&self) -> usize {
        self.iter().map(T::size).sum()
    }
}

/// Vectors are count-framed.
impl<T: Serializable> Serializable for Vec<T> {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write_serializable_list(self)
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        reader.read_serializable_list()
    }

    fn size(&self) -> usize {
        list_size(self)
    }
}

impl Serializable for String {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write_var_string(self)
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        reader.read_var_string()
    }

    fn size(&self) -> usize {
        var_int::var_bytes_size(self.len())
    }
}

impl Serializable for Bytes {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write_var_bytes(self)
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        reader.read_var_bytes()
    }

    fn size(&self) -> usize {
        var_int::var_bytes_size(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_codec_derive::Serializable;

    #[derive(Debug, PartialEq, Eq, Serializable)]
    struct Signer {
        account: [u8; 4],
        scopes: u8,
        contracts: Vec<u16>,
        name: String,
    }

    #[derive(Debug, PartialEq, Eq, Serializable)]
    struct Nonce(u32);

    #[derive(Debug, PartialEq, Eq, Serializable)]
    #[repr(u8)]
    enum Witness {
        Empty,
        Invocation(Bytes),
        Pair { first: u8, second: bool } = 7,
    }

    fn assert_round_trip<T: Serializable + PartialEq + std::fmt::Debug>(value: T) {
        let bytes = value.to_array().unwrap();
        assert_eq!(value.size(), bytes.len(), "size of {value:?}");
        assert_eq!(T::from_array(&bytes).unwrap(), value);
    }

    // ====== Primitive Tests ======

    #[test]
    fn primitives_round_trip() {
        assert_round_trip(0xABu8);
        assert_round_trip(true);
        assert_round_trip(-12_345i16);
        assert_round_trip(u16::MAX);
        assert_round_trip(i32::MIN);
        assert_round_trip(u32::MAX);
        assert_round_trip(i64::MIN);
        assert_round_trip(u64::MAX);
    }

    #[test]
    fn string_and_bytes_are_var_framed() {
        assert_eq!("neo".to_string().to_array().unwrap(), b"\x03neo");
        assert_eq!(
            Bytes::from_static(&[0xAA, 0xBB]).to_array().unwrap(),
            vec![0x02, 0xAA, 0xBB]
        );
        assert_round_trip("x".repeat(300));
        assert_eq!("x".repeat(300).size(), 303);
    }

    #[test]
    fn arrays_have_no_prefix() {
        let value = [1u8, 2, 3];
        assert_eq!(value.to_array().unwrap(), vec![1, 2, 3]);
        assert_round_trip([0x1234u16, 0x5678]);
    }

    #[test]
    fn vectors_are_count_framed() {
        let value = vec![1u16, 2, 3];
        assert_eq!(value.to_array().unwrap(), vec![3, 1, 0, 2, 0, 3, 0]);
        assert_eq!(list_size(&value), 7);
        assert_eq!(list_var_bytes_size(&value), 7);
        assert_round_trip(value);
    }

    #[test]
    fn list_sizes_differ_for_variable_elements() {
        let value: Vec<u8> = vec![0; 300];
        assert_eq!(list_size(&value), 3 + 300);
        assert_eq!(list_var_bytes_size(&value), 3 + 300);
        let value: Vec<u64> = vec![0; 40];
        assert_eq!(list_size(&value), 1 + 320);
        assert_eq!(list_var_bytes_size(&value), 3 + 320);
    }

    #[test]
    fn from_array_rejects_trailing_bytes() {
        assert_eq!(u16::from_array(&[1, 0, 9]), Err(CodecError::TrailingBytes(1)));
        assert_eq!(u16::from_array(&[1]), Err(CodecError::UnexpectedEof));
    }

    // ====== Derive Tests ======

    #[test]
    fn derived_struct_round_trip() {
        assert_round_trip(Signer {
            account: [1, 2, 3, 4],
            scopes: 0x80,
            contracts: vec![7, 8],
            name: "alice".into(),
        });
        assert_round_trip(Nonce(42));
    }

    #[test]
    fn derived_struct_writes_fields_in_order() {
        let signer = Signer {
            account: [1, 2, 3, 4],
            scopes: 0x01,
            contracts: vec![],
            name: String::new(),
        };
        assert_eq!(signer.to_array().unwrap(), vec![1, 2, 3, 4, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn derived_enum_round_trip() {
        assert_round_trip(Witness::Empty);
        assert_round_trip(Witness::Invocation(Bytes::from_static(b"sig")));
        assert_round_trip(Witness::Pair {
            first: 9,
            second: true,
        });
        assert_eq!(Witness::Pair { first: 9, second: false }.to_array().unwrap()[0], 7);
    }

    #[test]
    fn derived_enum_rejects_unknown_tag() {
        assert!(matches!(
            Witness::from_array(&[3]),
            Err(CodecError::InvalidValue(_))
        ));
    }
}
