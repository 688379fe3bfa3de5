//! Virtual machine script primitives.
//!
//! - [`op_code`]: push-family opcode table
//! - [`push`]: push instruction decoding and emission

pub mod op_code;
pub mod push;
