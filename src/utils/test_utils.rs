//! Fixtures shared by unit tests across modules.

#[cfg(test)]
pub mod test {
    use crate::stack_item::StackItem;
    use crate::types::ec_point::EcPoint;
    use rand_core::OsRng;

    /// Compressed encoding of the secp256r1 generator.
    pub const GENERATOR_COMPRESSED: &str =
        "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";

    /// A ByteString holding the little-endian script hash of
    /// `NfFrJpFaLPCVuRRPhmBYRmZqSQLJ5fPuhz`, as base64.
    pub const SCRIPT_HASH_BASE64: &str = "1Cz3qTHOPEZVD9kN5IJYP8XqcBo=";
    pub const SCRIPT_HASH_ADDRESS: &str = "NfFrJpFaLPCVuRRPhmBYRmZqSQLJ5fPuhz";

    /// Public key of a fresh random secp256r1 key pair.
    pub fn random_point() -> EcPoint {
        EcPoint::from(p256::SecretKey::random(&mut OsRng).public_key())
    }

    /// Parses a stack item from JSON text.
    pub fn item(json: &str) -> StackItem {
        serde_json::from_str(json).unwrap()
    }
}
