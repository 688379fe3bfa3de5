//! Decoder limits.
//!
//! Bounds applied by [`BinaryReader`](crate::types::binary_reader::BinaryReader)
//! to length prefixes, so a hostile prefix cannot make the reader allocate or
//! loop without end.

/// Default upper bound for a VarBytes / VarString run (16 MiB).
pub const DEFAULT_MAX_VAR_BYTES: u64 = 0x0100_0000;

/// Default upper bound for list counts and byte-length-framed spans.
pub const DEFAULT_MAX_LIST_LEN: u64 = 0x1000_0000;

/// Length-prefix limits enforced while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderLimits {
    /// Largest accepted VarBytes length.
    pub max_var_bytes: u64,
    /// Largest accepted element count (count-framed) or byte span (byte-length-framed).
    pub max_list_len: u64,
}

impl Default for ReaderLimits {
    fn default() -> Self {
        Self {
            max_var_bytes: DEFAULT_MAX_VAR_BYTES,
            max_list_len: DEFAULT_MAX_LIST_LEN,
        }
    }
}
