//! secp256r1 points in SEC1 encoding.

use crate::types::binary_reader::BinaryReader;
use crate::types::binary_writer::BinaryWriter;
use crate::types::errors::CodecError;
use crate::types::serializable::Serializable;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{AffinePoint, EncodedPoint};
use std::fmt;
use std::io::Write;

/// Length of a compressed point encoding.
pub const COMPRESSED_LEN: usize = 33;

/// A point on secp256r1, the curve ledger public keys live on.
///
/// Always written compressed; the point at infinity is the single byte `0x00`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcPoint(pub AffinePoint);

impl EcPoint {
    /// The point at infinity.
    pub const IDENTITY: EcPoint = EcPoint(AffinePoint::IDENTITY);

    /// Decodes a SEC1 encoding (`0x00`, `0x02`/`0x03` + 32 bytes, or `0x04` + 64 bytes).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|e| CodecError::InvalidEcPoint(e.to_string()))?;
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(EcPoint)
            .ok_or_else(|| CodecError::InvalidEcPoint("point is not on the curve".into()))
    }

    pub fn is_identity(&self) -> bool {
        self.0 == AffinePoint::IDENTITY
    }

    /// Compressed encoding: 33 bytes, or `[0x00]` for the identity.
    pub fn to_compressed_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Uncompressed encoding: 65 bytes, or `[0x00]` for the identity.
    pub fn to_uncompressed_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }
}

impl From<p256::PublicKey> for EcPoint {
    fn from(key: p256::PublicKey) -> Self {
        EcPoint(*key.as_affine())
    }
}

impl fmt::Display for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_compressed_bytes()))
    }
}

impl Serializable for EcPoint {
    fn serialize<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<(), CodecError> {
        writer.write_ec_point(self)
    }

    fn deserialize(reader: &mut BinaryReader) -> Result<Self, CodecError> {
        reader.read_ec_point()
    }

    fn size(&self) -> usize {
        if self.is_identity() { 1 } else { COMPRESSED_LEN }
    }
}
