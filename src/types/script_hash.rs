//! 20-byte script hashes and their Base58Check address form.

use crate::types::binary_reader::BinaryReader;
use crate::types::binary_writer::BinaryWriter;
use crate::types::errors::CodecError;
use crate::types::serializable::Serializable;
use std::fmt;
use std::io::Write;

/// Script hash length in bytes.
pub const SCRIPT_HASH_LEN: usize = 20;

/// Version byte prefixed to the script hash before Base58Check encoding.
pub const ADDRESS_VERSION: u8 = 0x35;

/// Identifies an account or contract.
///
/// Held big-endian (the order it is displayed in); serialized little-endian,
/// which is also the order stack items and addresses carry it in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Ord, PartialOrd)]
pub struct ScriptHash(pub [u8; SCRIPT_HASH_LEN]);

impl ScriptHash {
    /// Builds a script hash from its little-endian byte form.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut be: [u8; SCRIPT_HASH_LEN] = bytes.try_into().map_err(|_| {
            CodecError::InvalidValue(format!(
                "script hash must be {SCRIPT_HASH_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        be.reverse();
        Ok(Self(be))
    }

    pub fn to_le_bytes(&self) -> [u8; SCRIPT_HASH_LEN] {
        let mut le = self.0;
        le.reverse();
        le
    }

    /// Base58Check of the version byte followed by the little-endian hash.
    pub fn to_address(&self) -> String {
        let mut payload = Vec::with_capacity(1 + SCRIPT_HASH_LEN);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&self.to_le_bytes());
        bs58::encode(payload).with_check().into_string()
    }

    /// Parses an address produced by [`to_address`](Self::to_address).
    pub fn from_address(address: &str) -> Result<Self, CodecError> {
        let payload = bs58::decode(address)
            .with_check(None)
            .into_vec()
            .map_err(|e| CodecError::InvalidValue(format!("invalid address: {e}")))?;
        match payload.split_first() {
            Some((&ADDRESS_VERSION, hash)) => Self::from_le_bytes(hash),
            Some((&version, _)) => Err(CodecError::InvalidValue(format!(
                "unexpected address version {version:#04x}"
            ))),
            None => Err(CodecError::InvalidValue("empty address".into())),
        }
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl Serializable for ScriptHash {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write(&self.to_le_bytes())
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        Self::from_le_bytes(&reader.read_bytes(SCRIPT_HASH_LEN)?)
    }

    fn size(&self) -> usize {
        SCRIPT_HASH_LEN
    }
}
