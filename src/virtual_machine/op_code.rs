//! Push-family opcodes of the ledger virtual machine.
//!
//! The [`for_each_op_code!`](crate::for_each_op_code) macro holds the opcode
//! table and invokes a callback macro for code generation, so the enum,
//! decoding and operand layout stay in one place.
//!
//! # Operand Layout
//!
//! - `None`: the opcode is the whole instruction
//! - `Fixed(n)`: `n` operand bytes follow
//! - `Prefixed(n)`: an `n`-byte little-endian length follows, then that many bytes

use crate::types::errors::CodecError;

/// Shape of the operand following an opcode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    None,
    Fixed(usize),
    Prefixed(usize),
}

/// Invokes a callback macro with the complete opcode definition list.
#[macro_export]
macro_rules! for_each_op_code {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Integer literals
            // =========================
            /// PUSHINT8 imm8 ; push a 1-byte signed integer
            PushInt8 = 0x00, "PUSHINT8" => Fixed(1), 1,
            /// PUSHINT16 imm16 ; push a 2-byte signed integer
            PushInt16 = 0x01, "PUSHINT16" => Fixed(2), 1,
            /// PUSHINT32 imm32 ; push a 4-byte signed integer
            PushInt32 = 0x02, "PUSHINT32" => Fixed(4), 1,
            /// PUSHINT64 imm64 ; push an 8-byte signed integer
            PushInt64 = 0x03, "PUSHINT64" => Fixed(8), 1,
            /// PUSHINT128 imm128 ; push a 16-byte signed integer
            PushInt128 = 0x04, "PUSHINT128" => Fixed(16), 4,
            /// PUSHINT256 imm256 ; push a 32-byte signed integer
            PushInt256 = 0x05, "PUSHINT256" => Fixed(32), 4,
            // =========================
            // Constants
            // =========================
            /// PUSHT ; push true
            PushT = 0x08, "PUSHT" => None, 1,
            /// PUSHF ; push false
            PushF = 0x09, "PUSHF" => None, 1,
            /// PUSHA offset32 ; push a pointer relative to this instruction
            PushA = 0x0A, "PUSHA" => Fixed(4), 4,
            /// PUSHNULL ; push null
            PushNull = 0x0B, "PUSHNULL" => None, 1,
            // =========================
            // Byte literals
            // =========================
            /// PUSHDATA1 len8 data ; push up to 255 bytes
            PushData1 = 0x0C, "PUSHDATA1" => Prefixed(1), 8,
            /// PUSHDATA2 len16 data ; push up to 65535 bytes
            PushData2 = 0x0D, "PUSHDATA2" => Prefixed(2), 512,
            /// PUSHDATA4 len32 data ; push a long byte run
            PushData4 = 0x0E, "PUSHDATA4" => Prefixed(4), 4096,
            // =========================
            // Small integers
            // =========================
            /// PUSHM1 ; push -1
            PushM1 = 0x0F, "PUSHM1" => None, 1,
            /// PUSH0 ; push 0
            Push0 = 0x10, "PUSH0" => None, 1,
            Push1 = 0x11, "PUSH1" => None, 1,
            Push2 = 0x12, "PUSH2" => None, 1,
            Push3 = 0x13, "PUSH3" => None, 1,
            Push4 = 0x14, "PUSH4" => None, 1,
            Push5 = 0x15, "PUSH5" => None, 1,
            Push6 = 0x16, "PUSH6" => None, 1,
            Push7 = 0x17, "PUSH7" => None, 1,
            Push8 = 0x18, "PUSH8" => None, 1,
            Push9 = 0x19, "PUSH9" => None, 1,
            Push10 = 0x1A, "PUSH10" => None, 1,
            Push11 = 0x1B, "PUSH11" => None, 1,
            Push12 = 0x1C, "PUSH12" => None, 1,
            Push13 = 0x1D, "PUSH13" => None, 1,
            Push14 = 0x1E, "PUSH14" => None, 1,
            Push15 = 0x1F, "PUSH15" => None, 1,
            /// PUSH16 ; push 16
            Push16 = 0x20, "PUSH16" => None, 1,
        }
    };
}

#[macro_export]
macro_rules! define_op_codes {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $opcode:expr, $mnemonic:literal => $operand:ident $( ($width:expr) )?, $price:expr
        ),* $(,)?
    ) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #[repr(u8)]
        pub enum OpCode {
            $(
                $(#[$doc])*
                $name = $opcode,
            )*
        }

        impl TryFrom<u8> for OpCode {
            type Error = CodecError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $opcode => Ok(OpCode::$name), )*
                    _ => Err(CodecError::InvalidValue(format!(
                        "unknown opcode {value:#04x}"
                    ))),
                }
            }
        }

        impl OpCode {
            /// Returns the assembly mnemonic for this opcode.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( OpCode::$name => $mnemonic, )*
                }
            }

            /// Returns the operand layout following this opcode.
            pub const fn operand(&self) -> Operand {
                match self {
                    $( OpCode::$name => Operand::$operand $( ($width) )?, )*
                }
            }

            /// Returns the base execution price of this opcode.
            pub const fn price(&self) -> u64 {
                match self {
                    $( OpCode::$name => $price, )*
                }
            }
        }
    };
}

for_each_op_code!(define_op_codes);

impl OpCode {
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// The small-integer opcode pushing `value`, for `-1..=16`.
    pub fn small_int(value: i64) -> Option<OpCode> {
        if !(-1..=16).contains(&value) {
            return None;
        }
        OpCode::try_from((OpCode::Push0 as i64 + value) as u8).ok()
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_code_try_from_invalid() {
        assert!(matches!(
            OpCode::try_from(0x06),
            Err(CodecError::InvalidValue(_))
        ));
        assert!(OpCode::try_from(0x21).is_err());
    }

    #[test]
    fn op_code_bytes_match_table() {
        for byte in 0x00..=0x20u8 {
            if let Ok(op) = OpCode::try_from(byte) {
                assert_eq!(op.byte(), byte, "{op}");
            }
        }
        assert_eq!(OpCode::PushData1.byte(), 0x0C);
        assert_eq!(OpCode::PushM1.byte(), 0x0F);
        assert_eq!(OpCode::Push16.byte(), 0x20);
    }

    #[test]
    fn operand_layouts() {
        assert_eq!(OpCode::PushInt256.operand(), Operand::Fixed(32));
        assert_eq!(OpCode::PushData2.operand(), Operand::Prefixed(2));
        assert_eq!(OpCode::Push7.operand(), Operand::None);
        assert_eq!(OpCode::PushData4.mnemonic(), "PUSHDATA4");
    }

    #[test]
    fn small_int_range() {
        assert_eq!(OpCode::small_int(-1), Some(OpCode::PushM1));
        assert_eq!(OpCode::small_int(0), Some(OpCode::Push0));
        assert_eq!(OpCode::small_int(16), Some(OpCode::Push16));
        assert_eq!(OpCode::small_int(17), None);
        assert_eq!(OpCode::small_int(-2), None);
    }
}
