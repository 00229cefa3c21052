//! The single-bit value type.
//!
//! A `Bit` can only be built from the integers 0 and 1. Passing the character
//! codes for `'0'` or `'1'` is reported separately from other bad values since
//! it is by far the most common mistake.

use crate::error::BitError;
use std::fmt;

/// A single binary digit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bit(bool);

impl Bit {
    /// The bit 0.
    pub const ZERO: Bit = Bit(false);

    /// The bit 1.
    pub const ONE: Bit = Bit(true);

    /// Build a bit from the numeric value 0 or 1.
    ///
    /// # Errors
    /// - `BitError::CharacterConfusion` for the codes of `'0'` and `'1'`
    /// - `BitError::InvalidValue` for anything else that is not 0 or 1
    pub fn new(value: i32) -> Result<Self, BitError> {
        match value {
            0 => Ok(Bit::ZERO),
            1 => Ok(Bit::ONE),
            v if v == '0' as i32 => Err(BitError::CharacterConfusion('0')),
            v if v == '1' as i32 => Err(BitError::CharacterConfusion('1')),
            v => Err(BitError::InvalidValue(v)),
        }
    }

    /// Whether this bit is 1.
    #[inline]
    pub fn is_set(self) -> bool {
        self.0
    }
}

impl TryFrom<i32> for Bit {
    type Error = BitError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Bit::new(value)
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        Bit(value)
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        bit.0
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "1" } else { "0" })
    }
}
