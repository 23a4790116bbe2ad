use num_bigint::BigInt;

use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

const SYNTAX: &str = "INTEGER";

/// Parses the INTEGER syntax: an optional `-` followed by digits, with no
/// leading zeros except the value `0` itself.
pub fn integer(text: &str) -> SyntaxResult<BigInt> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() {
        return Err(SyntaxError::BadLength {
            syntax: SYNTAX,
            length: text.len(),
        });
    }
    if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(SyntaxError::bad(SYNTAX, "non-digit character"));
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(SyntaxError::bad(SYNTAX, "leading zero"));
    }
    if text == "-0" {
        return Err(SyntaxError::bad(SYNTAX, "negative zero"));
    }
    text.parse::<BigInt>()
        .map_err(|_| SyntaxError::bad(SYNTAX, "unparseable integer"))
}

pub(super) fn check(input: Input<'_>) -> SyntaxResult<Value> {
    integer(input.text(SYNTAX)?).map(Value::Integer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_signed_decimal() {
        assert_eq!(integer("0").unwrap(), BigInt::from(0));
        assert_eq!(integer("-1").unwrap(), BigInt::from(-1));
        assert_eq!(
            integer("18446744073709551616").unwrap().to_string(),
            "18446744073709551616"
        );
    }

    #[test]
    fn rejects_malformed() {
        for rejected in ["", "-", "007", "-0", "+1", "1 2", "0x10"] {
            assert!(integer(rejected).is_err(), "{rejected:?} should fail");
        }
    }
}
