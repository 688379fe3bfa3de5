//! Binary codec types.
//!
//! - `BinaryReader` / `BinaryWriter`: little-endian cursor and sink
//! - `Serializable`: the wire contract and its primitive impls
//! - `EcPoint`, `ScriptHash`: ledger value types with fixed encodings
//! - `var_int`, `big_int`: integer encodings shared by the rest of the crate

pub mod big_int;
pub mod binary_reader;
pub mod binary_writer;
pub mod ec_point;
pub mod errors;
pub mod script_hash;
pub mod serializable;
pub mod var_int;
