//! Postal Address and Delivery Method.

use super::{Input, Value};
use crate::chars::split_unescaped;
use crate::error::{SyntaxError, SyntaxResult};

/// A `$`-separated sequence of address lines. Lines are kept in their
/// escaped transfer form; [`PostalAddress::decoded_lines`] resolves the
/// `\24` and `\5C` escapes.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct PostalAddress(Vec<String>);

impl PostalAddress {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "Postal Address";
        if text.is_empty() {
            return Err(SyntaxError::BadLength {
                syntax: SYNTAX,
                length: 0,
            });
        }

        let mut lines = Vec::new();
        for line in split_unescaped(text, b'$', b'\\') {
            if line.is_empty() {
                return Err(SyntaxError::bad(
                    SYNTAX,
                    "empty line (consecutive unescaped '$')",
                ));
            }
            // Backslash may only introduce the \24 and \5C escapes.
            let bytes = line.as_bytes();
            let mut index = 0;
            while index < bytes.len() {
                if bytes[index] == b'\\' {
                    let escape = bytes.get(index + 1..index + 3).ok_or_else(|| {
                        SyntaxError::bad(SYNTAX, "truncated escape in line")
                    })?;
                    if !escape.eq_ignore_ascii_case(b"24") && !escape.eq_ignore_ascii_case(b"5c") {
                        return Err(SyntaxError::bad(
                            SYNTAX,
                            "only \\24 and \\5C escapes are permitted",
                        ));
                    }
                    index += 3;
                } else {
                    index += 1;
                }
            }
            lines.push(line.to_owned());
        }
        Ok(Self(lines))
    }

    /// The lines in their escaped transfer form.
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    /// The lines with `\24` and `\5C` resolved to `$` and `\`.
    pub fn decoded_lines(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|line| {
                line.replace("\\24", "$")
                    .replace("\\5C", "\\")
                    .replace("\\5c", "\\")
            })
            .collect()
    }
}

impl core::fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0.join("$"))
    }
}

impl TryFrom<&'_ str> for PostalAddress {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// The ten delivery modes of RFC 4517 §3.3.5.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeliveryMode {
    Any,
    Mhs,
    Physical,
    Telex,
    Teletex,
    G3Fax,
    G4Fax,
    Ia5,
    Videotex,
    Telephone,
}

impl DeliveryMode {
    const TABLE: &'static [(&'static str, DeliveryMode)] = &[
        ("any", DeliveryMode::Any),
        ("mhs", DeliveryMode::Mhs),
        ("physical", DeliveryMode::Physical),
        ("telex", DeliveryMode::Telex),
        ("teletex", DeliveryMode::Teletex),
        ("g3fax", DeliveryMode::G3Fax),
        ("g4fax", DeliveryMode::G4Fax),
        ("ia5", DeliveryMode::Ia5),
        ("videotex", DeliveryMode::Videotex),
        ("telephone", DeliveryMode::Telephone),
    ];

    fn parse(token: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, mode)| *mode)
    }

    pub fn as_str(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(name, _)| *name)
            .unwrap_or("any")
    }
}

/// A preference-ordered list of delivery modes.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct DeliveryMethod(Vec<DeliveryMode>);

impl DeliveryMethod {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "Delivery Method";
        if text.is_empty() {
            return Err(SyntaxError::BadLength {
                syntax: SYNTAX,
                length: 0,
            });
        }
        let mut modes = Vec::new();
        for token in text.split('$') {
            let token = token.trim();
            let mode = DeliveryMode::parse(token).ok_or_else(|| {
                SyntaxError::bad(SYNTAX, format!("unknown delivery mode '{token}'"))
            })?;
            modes.push(mode);
        }
        Ok(Self(modes))
    }

    pub fn modes(&self) -> &[DeliveryMode] {
        &self.0
    }
}

impl core::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, mode) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("$")?;
            }
            f.write_str(mode.as_str())?;
        }
        Ok(())
    }
}

impl TryFrom<&'_ str> for DeliveryMethod {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

pub(super) fn check_postal_address(input: Input<'_>) -> SyntaxResult<Value> {
    PostalAddress::parse(input.text("Postal Address")?).map(Value::PostalAddress)
}

pub(super) fn check_delivery_method(input: Input<'_>) -> SyntaxResult<Value> {
    DeliveryMethod::parse(input.text("Delivery Method")?).map(Value::DeliveryMethod)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn postal_lines_split_on_dollar() {
        let value = PostalAddress::parse("1234 Main St.$Anytown, CA 12345$USA").unwrap();
        assert_eq!(value.lines().len(), 3);
        assert_eq!(value.to_string(), "1234 Main St.$Anytown, CA 12345$USA");
    }

    #[test]
    fn postal_escapes() {
        let value = PostalAddress::parse(r"\241,000,000 Sweepstakes$PO Box 1000000$Anytown, CA 12345$USA").unwrap();
        assert_eq!(value.decoded_lines()[0], "$1,000,000 Sweepstakes");
    }

    #[test]
    fn postal_rejects_empty_lines() {
        assert!(PostalAddress::parse("a$$b").is_err());
        assert!(PostalAddress::parse("").is_err());
        assert!(PostalAddress::parse(r"bad\2Xescape").is_err());
    }

    #[test]
    fn delivery_method_vocabulary() {
        let value = DeliveryMethod::parse("telephone $videotex").unwrap();
        assert_eq!(
            value.modes(),
            &[DeliveryMode::Telephone, DeliveryMode::Videotex]
        );
        assert_eq!(value.to_string(), "telephone$videotex");
        assert!(DeliveryMethod::parse("carrier-pigeon").is_err());
        assert!(DeliveryMethod::parse("Telephone").is_err());
    }
}
