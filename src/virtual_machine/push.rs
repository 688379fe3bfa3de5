//! Push instructions: extracting script literals and emitting them.
//!
//! Decoding reads exactly one instruction at the reader's cursor. Emission
//! picks the shortest instruction that carries the literal.

use crate::types::big_int;
use crate::types::binary_reader::BinaryReader;
use crate::types::binary_writer::BinaryWriter;
use crate::types::errors::CodecError;
use crate::virtual_machine::op_code::{OpCode, Operand};
use bytes::Bytes;
use num_bigint::BigInt;
use std::io::Write;

impl BinaryReader {
    /// Reads a PUSHDATA1/2/4 instruction and returns its literal bytes.
    ///
    /// The PUSHDATA2 and PUSHDATA4 length fields are read as signed values;
    /// a negative length is rejected.
    pub fn read_push_data(&mut self) -> Result<Bytes, CodecError> {
        let opcode = self.read_u8()?;
        let len = match OpCode::try_from(opcode) {
            Ok(OpCode::PushData1) => i64::from(self.read_u8()?),
            Ok(OpCode::PushData2) => i64::from(self.read_i16()?),
            Ok(OpCode::PushData4) => i64::from(self.read_i32()?),
            _ => return Err(CodecError::NotPushData(opcode)),
        };
        let len = usize::try_from(len)
            .map_err(|_| CodecError::InvalidValue(format!("negative push data length {len}")))?;
        self.read_bytes(len)
    }

    /// Reads a PUSHDATA instruction and decodes its literal as UTF-8.
    pub fn read_push_string(&mut self) -> Result<String, CodecError> {
        let data = self.read_push_data()?;
        String::from_utf8(data.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    /// Reads an integer push: PUSHM1..PUSH16 or PUSHINT8..PUSHINT256.
    pub fn read_push_big_integer(&mut self) -> Result<BigInt, CodecError> {
        let opcode = self.read_u8()?;
        match OpCode::try_from(opcode) {
            Ok(op) if (OpCode::PushM1.byte()..=OpCode::Push16.byte()).contains(&opcode) => {
                Ok(BigInt::from(i16::from(op.byte()) - i16::from(OpCode::Push0.byte())))
            }
            Ok(
                op @ (OpCode::PushInt8
                | OpCode::PushInt16
                | OpCode::PushInt32
                | OpCode::PushInt64
                | OpCode::PushInt128
                | OpCode::PushInt256),
            ) => {
                let Operand::Fixed(width) = op.operand() else {
                    return Err(CodecError::NotPushInt(opcode));
                };
                big_int::from_le_bytes(&self.read_bytes(width)?)
            }
            _ => Err(CodecError::NotPushInt(opcode)),
        }
    }

    /// Reads an integer push whose value must fit in an `i32`.
    pub fn read_push_integer(&mut self) -> Result<i32, CodecError> {
        let value = self.read_push_big_integer()?;
        i32::try_from(&value).map_err(|_| {
            CodecError::InvalidValue(format!("pushed integer {value} exceeds 32 bits"))
        })
    }
}

impl<W: Write> BinaryWriter<W> {
    pub fn write_op_code(&mut self, op: OpCode) -> Result<(), CodecError> {
        self.write_u8(op.byte())
    }

    /// Emits `data` with the shortest PUSHDATA form that holds its length.
    pub fn write_push_data(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let len = data.len();
        if len <= 0xFF {
            self.write_op_code(OpCode::PushData1)?;
            self.write_u8(len as u8)?;
        } else if len <= 0xFFFF {
            self.write_op_code(OpCode::PushData2)?;
            self.write_u16(len as u16)?;
        } else {
            let len = u32::try_from(len).map_err(|_| {
                CodecError::InvalidArgument(format!("push data of {len} bytes is too long"))
            })?;
            self.write_op_code(OpCode::PushData4)?;
            self.write_u32(len)?;
        }
        self.write(data)
    }

    pub fn write_push_string(&mut self, value: &str) -> Result<(), CodecError> {
        self.write_push_data(value.as_bytes())
    }

    /// Emits `value` as PUSHM1..PUSH16 when possible, otherwise as the
    /// narrowest PUSHINT that holds it.
    pub fn write_push_integer(&mut self, value: &BigInt) -> Result<(), CodecError> {
        if let Some(op) = i64::try_from(value).ok().and_then(OpCode::small_int) {
            return self.write_op_code(op);
        }
        let minimal = big_int::to_le_bytes(value).len();
        let op = [
            OpCode::PushInt8,
            OpCode::PushInt16,
            OpCode::PushInt32,
            OpCode::PushInt64,
            OpCode::PushInt128,
            OpCode::PushInt256,
        ]
        .into_iter()
        .find(|op| matches!(op.operand(), Operand::Fixed(width) if width >= minimal))
        .ok_or_else(|| {
            CodecError::InvalidArgument(format!("{value} does not fit in a 256-bit push"))
        })?;
        let Operand::Fixed(width) = op.operand() else {
            return Err(CodecError::InvalidArgument(format!("{op} has no fixed operand")));
        };
        self.write_op_code(op)?;
        self.write(&big_int::to_le_bytes_padded(value, width)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(hex_str: &str) -> BinaryReader {
        BinaryReader::new(hex::decode(hex_str).unwrap())
    }

    // ====== Push Data Tests ======

    #[test]
    fn pushdata1_literal() {
        let mut r = reader("0c0161");
        assert_eq!(r.read_push_data().unwrap().as_ref(), &[0x61]);
        assert_eq!(r.available(), 0);
    }

    #[test]
    fn pushdata2_and_4_literals() {
        let mut r = reader("0d0200abcd0e03000000010203");
        assert_eq!(r.read_push_data().unwrap().as_ref(), &[0xAB, 0xCD]);
        assert_eq!(r.read_push_data().unwrap().as_ref(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn pushdata2_length_is_signed() {
        let mut r = reader("0d0080");
        assert!(matches!(r.read_push_data(), Err(CodecError::InvalidValue(_))));
    }

    #[test]
    fn push_data_rejects_other_opcodes() {
        let mut r = reader("1001");
        assert_eq!(r.read_push_data(), Err(CodecError::NotPushData(0x10)));
    }

    #[test]
    fn push_data_truncated() {
        let mut r = reader("0c05aabb");
        assert_eq!(r.read_push_data(), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn push_string_literal() {
        let mut r = reader("0c0568656c6c6f");
        assert_eq!(r.read_push_string().unwrap(), "hello");
    }

    // ====== Push Integer Tests ======

    #[test]
    fn small_integer_opcodes() {
        assert_eq!(reader("10").read_push_integer().unwrap(), 0);
        assert_eq!(reader("0f").read_push_integer().unwrap(), -1);
        assert_eq!(reader("20").read_push_integer().unwrap(), 16);
        assert_eq!(reader("15").read_push_integer().unwrap(), 5);
    }

    #[test]
    fn pushint_operands() {
        assert_eq!(reader("00ff").read_push_integer().unwrap(), -1);
        assert_eq!(reader("01e803").read_push_integer().unwrap(), 1000);
        assert_eq!(reader("02a0860100").read_push_integer().unwrap(), 100_000);
        assert_eq!(
            reader("030000000001000000").read_push_big_integer().unwrap(),
            BigInt::from(1i64 << 32)
        );
    }

    #[test]
    fn pushint_beyond_i32_is_rejected_by_narrow_reader() {
        let mut r = reader("030000000001000000");
        assert!(matches!(r.read_push_integer(), Err(CodecError::InvalidValue(_))));
    }

    #[test]
    fn push_integer_rejects_other_opcodes() {
        assert_eq!(reader("0c0161").read_push_integer(), Err(CodecError::NotPushInt(0x0C)));
        assert_eq!(reader("0b").read_push_integer(), Err(CodecError::NotPushInt(0x0B)));
        assert_eq!(reader("21").read_push_integer(), Err(CodecError::NotPushInt(0x21)));
    }

    // ====== Emission Tests ======

    #[test]
    fn emits_shortest_push_data() {
        let mut w = BinaryWriter::buffer();
        w.write_push_data(&[0x61]).unwrap();
        assert_eq!(hex::encode(w.as_slice()), "0c0161");

        let mut w = BinaryWriter::buffer();
        w.write_push_data(&[0u8; 256]).unwrap();
        assert_eq!(&w.as_slice()[..3], &[0x0D, 0x00, 0x01]);
        assert_eq!(w.as_slice().len(), 3 + 256);
    }

    #[test]
    fn emits_smallest_integer_form() {
        let cases: &[(i64, &str)] = &[
            (-1, "0f"),
            (0, "10"),
            (16, "20"),
            (17, "0011"),
            (-2, "00fe"),
            (128, "018000"),
            (1000, "01e803"),
            (100_000, "02a0860100"),
            (1 << 40, "030000000000010000"),
        ];
        for (value, expected) in cases {
            let mut w = BinaryWriter::buffer();
            w.write_push_integer(&BigInt::from(*value)).unwrap();
            assert_eq!(hex::encode(w.as_slice()), *expected, "value {value}");
        }
    }

    #[test]
    fn emitted_integers_read_back() {
        let values = [
            BigInt::from(-1000),
            BigInt::from(u64::MAX),
            BigInt::from(i64::MIN) * BigInt::from(4),
        ];
        for value in values {
            let mut w = BinaryWriter::buffer();
            w.write_push_integer(&value).unwrap();
            let mut r = BinaryReader::new(w.into_inner());
            assert_eq!(r.read_push_big_integer().unwrap(), value);
        }
    }

    #[test]
    fn oversized_integer_is_rejected() {
        let value = BigInt::from(1) << 300;
        let mut w = BinaryWriter::buffer();
        assert!(matches!(
            w.write_push_integer(&value),
            Err(CodecError::InvalidArgument(_))
        ));
    }
}
