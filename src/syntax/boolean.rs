use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

/// Parses the Boolean syntax: exactly `TRUE` or `FALSE`.
pub fn boolean(text: &str) -> SyntaxResult<bool> {
    match text {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(SyntaxError::bad("Boolean", "expected TRUE or FALSE")),
    }
}

pub(super) fn check(input: Input<'_>) -> SyntaxResult<Value> {
    boolean(input.text("Boolean")?).map(Value::Boolean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_spelling_only() {
        assert!(boolean("TRUE").unwrap());
        assert!(!boolean("FALSE").unwrap());
        for rejected in ["true", "False", "T", "1", "TRUE ", ""] {
            assert!(boolean(rejected).is_err(), "{rejected:?} should fail");
        }
    }
}
