use bitvec::prelude::*;

use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

const SYNTAX: &str = "Bit String";

/// A Bit String value: `'0101...'B`. The digit sequence, including a
/// possibly-empty one, is preserved exactly.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BitString(BitVec<u8, Msb0>);

impl BitString {
    /// Wraps a raw bit sequence.
    pub fn from_bits(bits: BitVec<u8, Msb0>) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the quoted `'...'B` form.
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        let digits = text
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix("'B"))
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "expected '<binary>'B"))?;

        let mut bits = BitVec::with_capacity(digits.len());
        for ch in digits.chars() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => {
                    return Err(SyntaxError::bad(
                        SYNTAX,
                        format!("'{other}' is not a binary digit"),
                    ));
                }
            }
        }
        Ok(Self(bits))
    }

    /// Encodes the value as a DER BIT STRING.
    pub fn to_der(&self) -> Vec<u8> {
        crate::der::encode_bit_string(&self.0)
    }

    /// Decodes a DER BIT STRING.
    pub fn from_der(input: &[u8]) -> SyntaxResult<Self> {
        crate::der::decode_bit_string(input)
            .map(Self)
            .map_err(|error| SyntaxError::bad(SYNTAX, error.to_string()))
    }
}

impl core::fmt::Display for BitString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("'")?;
        for bit in self.0.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        f.write_str("'B")
    }
}

impl TryFrom<&'_ str> for BitString {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&'_ [u8]> for BitString {
    type Error = SyntaxError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match core::str::from_utf8(value) {
            Ok(text) => Self::parse(text),
            Err(_) => Self::from_der(value),
        }
    }
}

pub(super) fn check(input: Input<'_>) -> SyntaxResult<Value> {
    match input {
        Input::Text(text) => BitString::parse(text).map(Value::BitString),
        Input::Bytes(bytes) => BitString::try_from(bytes).map(Value::BitString),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quoted_form_round_trips() {
        let value = BitString::parse("'10100101'B").unwrap();
        assert_eq!(value.to_string(), "'10100101'B");
        assert_eq!(value.len(), 8);
    }

    #[test]
    fn empty_run_is_valid() {
        let value = BitString::parse("''B").unwrap();
        assert!(value.is_empty());
        assert_eq!(value.to_string(), "''B");
    }

    #[test]
    fn missing_terminator_fails() {
        assert!(BitString::parse("'01001011").is_err());
        assert!(BitString::parse("'01001011'").is_err());
        assert!(BitString::parse("01001011'B").is_err());
    }

    #[test]
    fn non_binary_digit_fails() {
        assert!(BitString::parse("'012'B").is_err());
    }

    #[test]
    fn der_round_trip_preserves_width() {
        let value = BitString::parse("'10110'B").unwrap();
        let encoded = value.to_der();
        assert_eq!(BitString::from_der(&encoded).unwrap(), value);
    }
}
