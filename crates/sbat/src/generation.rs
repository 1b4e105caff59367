use core::fmt;
use core::num::NonZeroU32;

use ascii::AsciiStr;

use crate::{Error, Result};

/// SBAT generation number.
///
/// Generations start at 1 and only ever increase. In a revocation list
/// the generation is the lowest still-allowed generation for its
/// component; in image metadata it is the generation the image claims.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Generation(NonZeroU32);

impl Generation {
    /// First valid generation.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Create a generation from a raw number. Zero is rejected.
    pub fn new(value: u32) -> Result<Self> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(Error::InvalidGeneration)
    }

    /// Parse a generation from an ASCII decimal field. No sign, no
    /// surrounding whitespace; leading zeros are accepted.
    pub fn from_ascii(field: &AsciiStr) -> Result<Self> {
        if field.is_empty() {
            return Err(Error::InvalidGeneration);
        }

        let mut value: u32 = 0;
        for ch in field.chars() {
            let digit = ch.as_char().to_digit(10).ok_or(Error::InvalidGeneration)?;
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or(Error::InvalidGeneration)?;
        }
        Self::new(value)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Generation {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.get())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn ascii(s: &str) -> &AsciiStr {
        AsciiStr::from_ascii(s).unwrap()
    }

    #[test]
    fn parses_plain_decimal() {
        assert_eq!(Generation::from_ascii(ascii("1")).unwrap().get(), 1);
        assert_eq!(Generation::from_ascii(ascii("42")).unwrap().get(), 42);
        assert_eq!(Generation::from_ascii(ascii("4294967295")).unwrap().get(), u32::MAX);
    }

    #[test]
    fn accepts_leading_zeros() {
        assert_eq!(Generation::from_ascii(ascii("007")).unwrap().get(), 7);
    }

    #[test]
    fn rejects_zero() {
        assert_eq!(Generation::new(0), Err(Error::InvalidGeneration));
        assert_eq!(Generation::from_ascii(ascii("0")), Err(Error::InvalidGeneration));
    }

    #[test]
    fn rejects_empty_and_non_digits() {
        assert_eq!(Generation::from_ascii(ascii("")), Err(Error::InvalidGeneration));
        assert_eq!(Generation::from_ascii(ascii("-1")), Err(Error::InvalidGeneration));
        assert_eq!(Generation::from_ascii(ascii("+1")), Err(Error::InvalidGeneration));
        assert_eq!(Generation::from_ascii(ascii("1a")), Err(Error::InvalidGeneration));
        assert_eq!(Generation::from_ascii(ascii(" 1")), Err(Error::InvalidGeneration));
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(Generation::from_ascii(ascii("4294967296")), Err(Error::InvalidGeneration));
    }

    #[test]
    fn orders_numerically() {
        let two = Generation::new(2).unwrap();
        let ten = Generation::new(10).unwrap();
        assert!(two < ten);
        assert!(Generation::FIRST < two);
    }
}
