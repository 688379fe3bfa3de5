//! Error type shared by the binary reader, writer and `Serializable` impls.

use neo_codec_derive::Error;
use std::io;

/// Errors raised while framing or unframing the binary wire format.
///
/// Every variant except [`CodecError::InvalidArgument`] means the byte stream
/// does not match the expected layout. `InvalidArgument` is a caller bug: a
/// value handed to the writer that the format cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended before the expected data was read.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A VarInt decoded to a value above the caller's bound.
    #[error("var int {value} exceeds the maximum of {max}")]
    VarIntTooLarge { value: u64, max: u64 },
    /// The opcode at the cursor is not PUSHDATA1/2/4.
    #[error("stream did not contain a PUSHDATA opcode at the current position (found {0:#04x})")]
    NotPushData(u8),
    /// The opcode at the cursor is not one of the integer push opcodes.
    #[error("couldn't parse PUSHINT opcode (found {0:#04x})")]
    NotPushInt(u8),
    /// First byte of an EC point is not a known SEC1 prefix.
    #[error("invalid EC point encoding prefix {0:#04x}")]
    InvalidEcPointPrefix(u8),
    /// Well-framed EC point bytes that are not on the curve.
    #[error("invalid EC point: {0}")]
    InvalidEcPoint(String),
    /// A VarString or push string was not valid UTF-8.
    #[error("invalid utf8 in string")]
    InvalidUtf8,
    /// Data does not represent a valid value for the target type.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// A whole-buffer decode left bytes behind.
    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),
    /// `reset` was called without a mark, or after reading past the mark's limit.
    #[error("mark is not set or was invalidated by reading past its limit")]
    MarkInvalidated,
    /// Underlying stream failure.
    #[error("io error: {0}")]
    Io(String),
    /// The writer was handed a value the format cannot represent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => CodecError::UnexpectedEof,
            _ => CodecError::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_eof_maps_to_unexpected_eof() {
        let err: CodecError = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert_eq!(err, CodecError::UnexpectedEof);
    }

    #[test]
    fn other_io_errors_keep_their_message() {
        let err: CodecError = io::Error::other("disk on fire").into();
        assert_eq!(err, CodecError::Io("disk on fire".to_string()));
    }

    #[test]
    fn messages_render_opcodes_in_hex() {
        assert_eq!(
            CodecError::NotPushInt(0x21).to_string(),
            "couldn't parse PUSHINT opcode (found 0x21)"
        );
        assert_eq!(
            CodecError::VarIntTooLarge { value: 300, max: 255 }.to_string(),
            "var int 300 exceeds the maximum of 255"
        );
    }
}
