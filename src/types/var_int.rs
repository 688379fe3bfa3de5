//! Variable-length unsigned integer encoding.
//!
//! | value range                 | encoding                              |
//! |-----------------------------|---------------------------------------|
//! | `[0, 0xFD)`                 | 1 byte: the value itself              |
//! | `[0xFD, 0xFFFF]`            | `0xFD` + 2-byte little-endian         |
//! | `(0xFFFF, 0xFFFF_FFFF]`     | `0xFE` + 4-byte little-endian         |
//! | `(0xFFFF_FFFF, u64::MAX]`   | `0xFF` + 8-byte little-endian         |
//!
//! Values are `u64`, so negative inputs cannot reach the encoder. Callers
//! holding a signed length convert with `u64::try_from` and surface the
//! failure as [`CodecError::InvalidArgument`].

use crate::types::errors::CodecError;

/// Marker for a 2-byte payload.
pub const MARKER_U16: u8 = 0xFD;
/// Marker for a 4-byte payload.
pub const MARKER_U32: u8 = 0xFE;
/// Marker for an 8-byte payload.
pub const MARKER_U64: u8 = 0xFF;

/// Returns the number of bytes `encode(value)` produces, without encoding.
pub const fn encoded_size(value: u64) -> usize {
    if value < MARKER_U16 as u64 {
        1
    } else if value <= 0xFFFF {
        3
    } else if value <= 0xFFFF_FFFF {
        5
    } else {
        9
    }
}

/// Encodes `value` into a fresh buffer.
pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_size(value));
    encode_into(value, &mut out);
    out
}

/// Appends the encoding of `value` to `out`.
pub fn encode_into(value: u64, out: &mut Vec<u8>) {
    if value < MARKER_U16 as u64 {
        out.push(value as u8);
    } else if value <= 0xFFFF {
        out.push(MARKER_U16);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xFFFF_FFFF {
        out.push(MARKER_U32);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(MARKER_U64);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Decodes a VarInt from the front of `input`, advancing it.
///
/// Fails with [`CodecError::VarIntTooLarge`] when the value exceeds `max`.
pub fn decode(input: &mut &[u8], max: u64) -> Result<u64, CodecError> {
    let (&marker, rest) = input.split_first().ok_or(CodecError::UnexpectedEof)?;
    *input = rest;
    let value = match marker {
        MARKER_U16 => u16::from_le_bytes(take(input)?) as u64,
        MARKER_U32 => u32::from_le_bytes(take(input)?) as u64,
        MARKER_U64 => u64::from_le_bytes(take(input)?),
        byte => byte as u64,
    };
    if value > max {
        return Err(CodecError::VarIntTooLarge { value, max });
    }
    Ok(value)
}

/// Size of a VarBytes run holding `len` bytes: prefix plus payload.
pub fn var_bytes_size(len: usize) -> usize {
    encoded_size(len as u64) + len
}

fn take<const N: usize>(input: &mut &[u8]) -> Result<[u8; N], CodecError> {
    if input.len() < N {
        return Err(CodecError::UnexpectedEof);
    }
    let (head, rest) = input.split_at(N);
    *input = rest;
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries_switch_width() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(0xFC), vec![0xFC]);
        assert_eq!(encode(0xFD), vec![0xFD, 0xFD, 0x00]);
        assert_eq!(encode(0xFFFF), vec![0xFD, 0xFF, 0xFF]);
        assert_eq!(encode(0x1_0000), vec![0xFE, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(encode(0xFFFF_FFFF), vec![0xFE, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(
            encode(0x1_0000_0000),
            vec![0xFF, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn encoded_size_at_boundaries() {
        for (value, size) in [
            (0xFCu64, 1usize),
            (0xFD, 3),
            (0xFFFF, 3),
            (0x1_0000, 5),
            (0xFFFF_FFFF, 5),
            (0x1_0000_0000, 9),
            (u64::MAX, 9),
        ] {
            assert_eq!(encoded_size(value), size, "size of {value:#x}");
        }
    }

    #[test]
    fn decode_rejects_values_over_max() {
        let bytes = encode(0x1_0000);
        let mut input = bytes.as_slice();
        assert_eq!(
            decode(&mut input, 0xFFFF),
            Err(CodecError::VarIntTooLarge {
                value: 0x1_0000,
                max: 0xFFFF
            })
        );
    }

    #[test]
    fn decode_truncated_payload() {
        let mut input: &[u8] = &[0xFE, 0x01, 0x02];
        assert_eq!(decode(&mut input, u64::MAX), Err(CodecError::UnexpectedEof));
        let mut empty: &[u8] = &[];
        assert_eq!(decode(&mut empty, u64::MAX), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn decode_advances_input() {
        let mut input: &[u8] = &[0xFD, 0x34, 0x12, 0xAA];
        assert_eq!(decode(&mut input, u64::MAX), Ok(0x1234));
        assert_eq!(input, &[0xAA]);
    }

    proptest! {
        #[test]
        fn roundtrip_and_size_agree(value in any::<u64>()) {
            let bytes = encode(value);
            prop_assert_eq!(bytes.len(), encoded_size(value));
            let mut input = bytes.as_slice();
            prop_assert_eq!(decode(&mut input, u64::MAX), Ok(value));
            prop_assert!(input.is_empty());
        }
    }
}
