//! Little-endian two's-complement conversions for arbitrary-precision integers.

use crate::types::errors::CodecError;
use num_bigint::{BigInt, Sign};

/// Interprets `bytes` as a little-endian two's-complement integer.
///
/// An empty slice carries no digits and is rejected.
pub fn from_le_bytes(bytes: &[u8]) -> Result<BigInt, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::InvalidValue("zero length integer".into()));
    }
    Ok(BigInt::from_signed_bytes_le(bytes))
}

/// Minimal little-endian two's-complement encoding of `value`.
pub fn to_le_bytes(value: &BigInt) -> Vec<u8> {
    value.to_signed_bytes_le()
}

/// Encodes `value` into exactly `len` bytes, sign-extending.
///
/// Fails if the minimal encoding is longer than `len`.
pub fn to_le_bytes_padded(value: &BigInt, len: usize) -> Result<Vec<u8>, CodecError> {
    let mut bytes = to_le_bytes(value);
    if bytes.len() > len {
        return Err(CodecError::InvalidArgument(format!(
            "{value} does not fit in {len} bytes"
        )));
    }
    let fill = if value.sign() == Sign::Minus { 0xFF } else { 0x00 };
    bytes.resize(len, fill);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_twos_complement() {
        assert_eq!(from_le_bytes(&[0x7B]).unwrap(), BigInt::from(123));
        assert_eq!(from_le_bytes(&[0xE8, 0x03]).unwrap(), BigInt::from(1000));
        assert_eq!(from_le_bytes(&[0xFF]).unwrap(), BigInt::from(-1));
        assert_eq!(from_le_bytes(&[0x80, 0x00]).unwrap(), BigInt::from(128));
        assert_eq!(from_le_bytes(&[0x00, 0x80]).unwrap(), BigInt::from(-32768));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(from_le_bytes(&[]), Err(CodecError::InvalidValue(_))));
    }

    #[test]
    fn minimal_encoding() {
        assert_eq!(to_le_bytes(&BigInt::from(1000)), vec![0xE8, 0x03]);
        assert_eq!(to_le_bytes(&BigInt::from(128)), vec![0x80, 0x00]);
        assert_eq!(to_le_bytes(&BigInt::from(-1)), vec![0xFF]);
    }

    #[test]
    fn padding_sign_extends() {
        assert_eq!(
            to_le_bytes_padded(&BigInt::from(-2), 4).unwrap(),
            vec![0xFE, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            to_le_bytes_padded(&BigInt::from(300), 4).unwrap(),
            vec![0x2C, 0x01, 0x00, 0x00]
        );
        assert!(to_le_bytes_padded(&BigInt::from(300), 1).is_err());
    }
}
