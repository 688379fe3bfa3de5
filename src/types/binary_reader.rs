//! Cursor-based reader for the little-endian wire format.
//!
//! The reader owns its input as a [`Bytes`] buffer, so byte runs handed back
//! to callers (`read_bytes`, `read_var_bytes`) are cheap slices of the input
//! rather than copies. A reader serves one decode at a time; parallel decodes
//! use independent readers over independent buffers.

use crate::config::ReaderLimits;
use crate::types::ec_point::EcPoint;
use crate::types::errors::CodecError;
use crate::types::serializable::Serializable;
use crate::types::var_int;
use bytes::Bytes;
use std::io::Read;

/// Saved cursor for speculative parsing.
#[derive(Debug, Clone, Copy)]
struct Mark {
    position: usize,
    read_limit: usize,
}

/// Reads primitives, VarInt-framed runs and [`Serializable`] objects from a byte buffer.
#[derive(Debug, Clone)]
pub struct BinaryReader {
    data: Bytes,
    position: usize,
    mark: Option<Mark>,
    limits: ReaderLimits,
}

impl BinaryReader {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            mark: None,
            limits: ReaderLimits::default(),
        }
    }

    /// Drains `stream` into an owned buffer and returns a reader over it.
    ///
    /// The stream is consumed and dropped before this returns, on success and
    /// on failure alike.
    pub fn from_stream<R: Read>(mut stream: R) -> Result<Self, CodecError> {
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Ok(Self::new(data))
    }

    /// Replaces the default length-prefix limits.
    pub fn with_limits(mut self, limits: ReaderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits currently applied to length prefixes.
    pub fn limits(&self) -> ReaderLimits {
        self.limits
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Position recorded by the last [`mark`](Self::mark), if any.
    pub fn mark_position(&self) -> Option<usize> {
        self.mark.map(|m| m.position)
    }

    /// Number of bytes left to read.
    pub fn available(&self) -> usize {
        self.data.len() - self.position
    }

    /// Records the current position so that [`reset`](Self::reset) can rewind to it.
    ///
    /// The mark stays valid while at most `read_limit` bytes are read past it.
    pub fn mark(&mut self, read_limit: usize) {
        self.mark = Some(Mark {
            position: self.position,
            read_limit,
        });
    }

    /// Rewinds to the last mark.
    pub fn reset(&mut self) -> Result<(), CodecError> {
        let mark = self.mark.ok_or(CodecError::MarkInvalidated)?;
        if self.position - mark.position > mark.read_limit {
            self.mark = None;
            return Err(CodecError::MarkInvalidated);
        }
        self.position = mark.position;
        Ok(())
    }

    /// Advances past `n` bytes and returns them as a slice of the input.
    fn take(&mut self, n: usize) -> Result<&[u8], CodecError> {
        if self.available() < n {
            return Err(CodecError::UnexpectedEof);
        }
        let start = self.position;
        self.position += n;
        Ok(&self.data[start..self.position])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Fills `buf` completely from the input.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        let src = self.take(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    /// Reads one byte as a boolean; any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Returns the next byte without advancing.
    pub fn peek_u8(&self) -> Result<u8, CodecError> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(CodecError::UnexpectedEof)
    }

    /// Reads `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Bytes, CodecError> {
        if self.available() < count {
            return Err(CodecError::UnexpectedEof);
        }
        let slice = self.data.slice(self.position..self.position + count);
        self.position += count;
        Ok(slice)
    }

    pub fn read_i16(&mut self) -> Result<i16, CodecError> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Reads an unbounded VarInt.
    pub fn read_var_int(&mut self) -> Result<u64, CodecError> {
        self.read_var_int_max(u64::MAX)
    }

    /// Reads a VarInt, failing if it exceeds `max`.
    pub fn read_var_int_max(&mut self, max: u64) -> Result<u64, CodecError> {
        let mut input = &self.data[self.position..];
        let before = input.len();
        let value = var_int::decode(&mut input, max)?;
        self.position += before - input.len();
        Ok(value)
    }

    /// Reads a VarInt-prefixed byte run bounded by the reader's `max_var_bytes`.
    pub fn read_var_bytes(&mut self) -> Result<Bytes, CodecError> {
        self.read_var_bytes_max(self.limits.max_var_bytes)
    }

    /// Reads a VarInt-prefixed byte run whose length may not exceed `max`.
    pub fn read_var_bytes_max(&mut self, max: u64) -> Result<Bytes, CodecError> {
        let len = self.read_var_int_max(max)?;
        let len = usize::try_from(len).map_err(|_| CodecError::UnexpectedEof)?;
        self.read_bytes(len)
    }

    /// Reads a VarBytes run as UTF-8.
    pub fn read_var_string(&mut self) -> Result<String, CodecError> {
        let bytes = self.read_var_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    /// Reads an EC point in SEC1 form: `0x00` (infinity), compressed or uncompressed.
    pub fn read_ec_point(&mut self) -> Result<EcPoint, CodecError> {
        let prefix = self.read_u8()?;
        let body_len = match prefix {
            0x00 => 0,
            0x02 | 0x03 => 32,
            0x04 => 64,
            other => return Err(CodecError::InvalidEcPointPrefix(other)),
        };
        let mut encoded = Vec::with_capacity(1 + body_len);
        encoded.push(prefix);
        encoded.extend_from_slice(self.take(body_len)?);
        EcPoint::from_sec1_bytes(&encoded)
    }

    /// Reads a 33-byte compressed point encoding without decoding it on the curve.
    pub fn read_encoded_ec_point(&mut self) -> Result<[u8; 33], CodecError> {
        let prefix = self.read_u8()?;
        if prefix != 0x02 && prefix != 0x03 {
            return Err(CodecError::InvalidEcPointPrefix(prefix));
        }
        let mut encoded = [0u8; 33];
        encoded[0] = prefix;
        self.read_into(&mut encoded[1..])?;
        Ok(encoded)
    }

    /// Reads one object.
    pub fn read_serializable<T: Serializable>(&mut self) -> Result<T, CodecError> {
        T::deserialize(self)
    }

    /// Reads a count-framed list: a VarInt element count, then the elements.
    pub fn read_serializable_list<T: Serializable>(&mut self) -> Result<Vec<T>, CodecError> {
        let count = self.read_var_int_max(self.limits.max_list_len)?;
        // Capacity is capped by the remaining input, every element takes at least one byte.
        let mut list = Vec::with_capacity((count as usize).min(self.available()));
        for _ in 0..count {
            list.push(T::deserialize(self)?);
        }
        Ok(list)
    }

    /// Reads a byte-length-framed list: a VarInt byte span, then elements until
    /// exactly that many bytes are consumed.
    ///
    /// An element that runs past the declared span is a framing error.
    pub fn read_serializable_list_var_bytes<T: Serializable>(
        &mut self,
    ) -> Result<Vec<T>, CodecError> {
        let span = self.read_var_int_max(self.limits.max_list_len)?;
        let span = usize::try_from(span).map_err(|_| CodecError::UnexpectedEof)?;
        if span > self.available() {
            return Err(CodecError::UnexpectedEof);
        }
        let start = self.position;
        let mut list = Vec::new();
        while self.position - start < span {
            let before = self.position;
            list.push(T::deserialize(self)?);
            if self.position == before {
                return Err(CodecError::InvalidValue(
                    "list element consumed no bytes".to_string(),
                ));
            }
        }
        let consumed = self.position - start;
        if consumed != span {
            return Err(CodecError::InvalidValue(format!(
                "list elements consumed {consumed} bytes, frame declared {span}"
            )));
        }
        Ok(list)
    }
}
