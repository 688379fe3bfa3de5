//! Wire-level codec for a virtual-machine ledger.
//!
//! Provides the little-endian binary format (VarInt framing, primitive and
//! EC point encodings, the `Serializable` contract), push instruction
//! decoding, and the stack item model returned by VM execution.

pub mod config;
pub mod stack_item;
pub mod types;
pub mod utils;
pub mod virtual_machine;
