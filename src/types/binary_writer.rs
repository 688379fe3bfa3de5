//! Little-endian writer, the inverse of [`BinaryReader`](crate::types::binary_reader::BinaryReader).

use crate::types::ec_point::EcPoint;
use crate::types::errors::CodecError;
use crate::types::serializable::Serializable;
use crate::types::var_int;
use std::io::Write;

/// Writes primitives, VarInt-framed runs and [`Serializable`] objects to any [`Write`] sink.
///
/// `BinaryWriter<Vec<u8>>` is the usual in-memory form; see [`BinaryWriter::buffer`].
#[derive(Debug)]
pub struct BinaryWriter<W: Write> {
    inner: W,
}

impl BinaryWriter<Vec<u8>> {
    /// Creates a writer over an empty in-memory buffer.
    pub fn buffer() -> Self {
        Self::new(Vec::new())
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Consumes the writer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Writes raw bytes with no framing.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.write_u8(value as u8)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.write(&[value])
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), CodecError> {
        self.write(&value.to_le_bytes())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), CodecError> {
        self.write(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), CodecError> {
        self.write(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), CodecError> {
        self.write(&value.to_le_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), CodecError> {
        self.write(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), CodecError> {
        self.write(&value.to_le_bytes())
    }

    /// Writes the low 16 bits of a wider value, rejecting values outside `[0, 0xFFFF]`.
    pub fn write_uint16(&mut self, value: i64) -> Result<(), CodecError> {
        let narrowed = u16::try_from(value).map_err(|_| {
            CodecError::InvalidArgument(format!("{value} does not fit in an unsigned 16-bit field"))
        })?;
        self.write_u16(narrowed)
    }

    /// Writes the low 32 bits of a wider value, rejecting values outside `[0, 0xFFFF_FFFF]`.
    pub fn write_uint32(&mut self, value: i64) -> Result<(), CodecError> {
        let narrowed = u32::try_from(value).map_err(|_| {
            CodecError::InvalidArgument(format!("{value} does not fit in an unsigned 32-bit field"))
        })?;
        self.write_u32(narrowed)
    }

    pub fn write_var_int(&mut self, value: u64) -> Result<(), CodecError> {
        let mut buf = Vec::with_capacity(var_int::encoded_size(value));
        var_int::encode_into(value, &mut buf);
        self.write(&buf)
    }

    /// Writes a VarInt length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.write_var_int(bytes.len() as u64)?;
        self.write(bytes)
    }

    /// Writes `value` as UTF-8 VarBytes.
    pub fn write_var_string(&mut self, value: &str) -> Result<(), CodecError> {
        self.write_var_bytes(value.as_bytes())
    }

    /// Writes `value` as UTF-8 into exactly `length` bytes, zero-padded on the right.
    pub fn write_fixed_string(&mut self, value: &str, length: usize) -> Result<(), CodecError> {
        let bytes = value.as_bytes();
        if bytes.len() > length {
            return Err(CodecError::InvalidArgument(format!(
                "string of {} bytes does not fit in a fixed field of {length}",
                bytes.len()
            )));
        }
        self.write(bytes)?;
        self.write(&vec![0u8; length - bytes.len()])
    }

    /// Writes `point` in compressed form, or the single byte `0x00` for infinity.
    pub fn write_ec_point(&mut self, point: &EcPoint) -> Result<(), CodecError> {
        self.write(&point.to_compressed_bytes())
    }

    pub fn write_serializable<T: Serializable>(&mut self, value: &T) -> Result<(), CodecError> {
        value.serialize(self)
    }

    /// Writes a count-framed list: the element count as a VarInt, then each element.
    pub fn write_serializable_list<T: Serializable>(
        &mut self,
        values: &[T],
    ) -> Result<(), CodecError> {
        self.write_var_int(values.len() as u64)?;
        for value in values {
            value.serialize(self)?;
        }
        Ok(())
    }

    /// Writes a byte-length-framed list: the total serialized size of the elements
    /// as a VarInt, then each element.
    pub fn write_serializable_list_var_bytes<T: Serializable>(
        &mut self,
        values: &[T],
    ) -> Result<(), CodecError> {
        let span: usize = values.iter().map(Serializable::size).sum();
        self.write_var_int(span as u64)?;
        for value in values {
            value.serialize(self)?;
        }
        Ok(())
    }

    /// Writes `value` serialized into a VarBytes run.
    pub fn write_serializable_var_bytes<T: Serializable>(
        &mut self,
        value: &T,
    ) -> Result<(), CodecError> {
        self.write_var_bytes(&value.to_array()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::binary_reader::BinaryReader;

    #[test]
    fn fixed_width_integers_are_little_endian() {
        let mut w = BinaryWriter::buffer();
        w.write_u16(0x1234).unwrap();
        w.write_i32(-2).unwrap();
        w.write_u64(1).unwrap();
        assert_eq!(
            w.as_slice(),
            &[0x34, 0x12, 0xFE, 0xFF, 0xFF, 0xFF, 1, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn range_checked_unsigned_writes() {
        let mut w = BinaryWriter::buffer();
        w.write_uint16(0xFFFF).unwrap();
        w.write_uint32(0xFFFF_FFFF).unwrap();
        assert_eq!(w.as_slice(), &[0xFF; 6]);

        assert!(matches!(w.write_uint16(0x1_0000), Err(CodecError::InvalidArgument(_))));
        assert!(matches!(w.write_uint16(-1), Err(CodecError::InvalidArgument(_))));
        assert!(matches!(w.write_uint32(0x1_0000_0000), Err(CodecError::InvalidArgument(_))));
        assert_eq!(w.as_slice().len(), 6);
    }

    #[test]
    fn var_int_boundaries() {
        let cases: &[(u64, &[u8])] = &[
            (0xFC, &[0xFC]),
            (0xFD, &[0xFD, 0xFD, 0x00]),
            (0xFFFF, &[0xFD, 0xFF, 0xFF]),
            (0x1_0000, &[0xFE, 0x00, 0x00, 0x01, 0x00]),
        ];
        for (value, expected) in cases {
            let mut w = BinaryWriter::buffer();
            w.write_var_int(*value).unwrap();
            assert_eq!(w.as_slice(), *expected, "value {value:#x}");
        }
    }

    #[test]
    fn fixed_string_pads_with_zeros() {
        let mut w = BinaryWriter::buffer();
        w.write_fixed_string("ab", 4).unwrap();
        assert_eq!(w.as_slice(), b"ab\0\0");
    }

    #[test]
    fn fixed_string_rejects_overflow() {
        let mut w = BinaryWriter::buffer();
        assert!(matches!(
            w.write_fixed_string("hello", 4),
            Err(CodecError::InvalidArgument(_))
        ));
        assert!(w.as_slice().is_empty());
    }

    #[test]
    fn var_string_is_read_back() {
        let mut w = BinaryWriter::buffer();
        w.write_var_string("neo").unwrap();
        assert_eq!(w.as_slice(), b"\x03neo");
        let mut r = BinaryReader::new(w.into_inner());
        assert_eq!(r.read_var_string().unwrap(), "neo");
    }

    #[test]
    fn list_framings_differ_in_prefix() {
        let values: Vec<u16> = vec![1, 2, 3];

        let mut counted = BinaryWriter::buffer();
        counted.write_serializable_list(&values).unwrap();
        assert_eq!(counted.as_slice()[0], 3);

        let mut spanned = BinaryWriter::buffer();
        spanned.write_serializable_list_var_bytes(&values).unwrap();
        assert_eq!(spanned.as_slice()[0], 6);

        assert_eq!(counted.as_slice()[1..], spanned.as_slice()[1..]);

        let mut r = BinaryReader::new(spanned.into_inner());
        let read: Vec<u16> = r.read_serializable_list_var_bytes().unwrap();
        assert_eq!(read, values);
    }

    #[test]
    fn serializable_var_bytes_wraps_object() {
        let mut w = BinaryWriter::buffer();
        w.write_serializable_var_bytes(&0x0102_0304u32).unwrap();
        assert_eq!(w.as_slice(), &[0x04, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn writes_to_any_sink() {
        let mut sink = std::io::Cursor::new(Vec::new());
        {
            let mut w = BinaryWriter::new(&mut sink);
            w.write_var_bytes(&[0xAB]).unwrap();
            w.flush().unwrap();
        }
        assert_eq!(sink.into_inner(), vec![0x01, 0xAB]);
    }
}
