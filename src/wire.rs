//! Wire type tag carried in each record's key byte(s).

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The 3-bit wire type identifying a record's payload shape.
///
/// Values outside this enumeration (3, 4, 6, 7) are reserved so future wire
/// types can be added without a receiver silently misinterpreting them.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum WireType {
    /// Base-128 unsigned varint, 1–5 bytes.
    Varint = 0,
    /// Reserved; never emitted by `Sender`.
    Fix64 = 1,
    /// A varint length `N` followed by `N` raw bytes.
    Len = 2,
    /// 4 little-endian bytes (e.g. an IEEE-754 float bit pattern).
    Fix32 = 5,
}

impl WireType {
    /// Recovers a `WireType` from its 3-bit wire value, returning `None` for
    /// the reserved/undefined codes.
    #[must_use]
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::iter().find(|w| *w as u32 == value)
    }
}
