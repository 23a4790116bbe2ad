use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

const SYNTAX: &str = "UUID";

/// Parses the RFC 4122 textual form, `8-4-4-4-12` hex digits. The braced,
/// URN, and undashed shorthands accepted by some tooling are rejected.
pub fn parse(text: &str) -> SyntaxResult<uuid::Uuid> {
    if text.len() != 36 {
        return Err(SyntaxError::BadLength {
            syntax: SYNTAX,
            length: text.len(),
        });
    }
    for (index, byte) in text.bytes().enumerate() {
        let ok = match index {
            8 | 13 | 18 | 23 => byte == b'-',
            _ => byte.is_ascii_hexdigit(),
        };
        if !ok {
            return Err(SyntaxError::bad(
                SYNTAX,
                format!("unexpected character at position {index}"),
            ));
        }
    }
    uuid::Uuid::parse_str(text).map_err(|error| SyntaxError::bad(SYNTAX, error.to_string()))
}

pub(super) fn check(input: Input<'_>) -> SyntaxResult<Value> {
    match input {
        Input::Text(text) => parse(text).map(Value::Uuid),
        // A 16-octet input is the RFC 4530 transfer form.
        Input::Bytes(bytes) if bytes.len() == 16 => {
            let octets: [u8; 16] = bytes.try_into().map_err(|_| SyntaxError::BadLength {
                syntax: SYNTAX,
                length: bytes.len(),
            })?;
            Ok(Value::Uuid(uuid::Uuid::from_bytes(octets)))
        }
        Input::Bytes(_) => parse(input.text(SYNTAX)?).map(Value::Uuid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_only() {
        assert!(parse("f81d4fae-7dec-11d0-a765-00a0c91e6bf6").is_ok());
        assert!(parse("F81D4FAE-7DEC-11D0-A765-00A0C91E6BF6").is_ok());
        assert!(parse("f81d4fae7dec11d0a76500a0c91e6bf6").is_err());
        assert!(parse("{f81d4fae-7dec-11d0-a765-00a0c91e6bf6}").is_err());
        assert!(parse("urn:uuid:f81d4fae-7dec-11d0-a765-00a0c91e6bf6").is_err());
        assert!(parse("f81d4fae-7dec-11d0-a765-00a0c91e6bg6").is_err());
    }
}
