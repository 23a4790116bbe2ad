//! RFC 4514 string-form distinguished names.

use super::bit_string::BitString;
use super::oid::Oid;
use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

const SYNTAX: &str = "DN";

/// One attribute-type-and-value pair inside an RDN.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Ava {
    pub attribute: Oid,
    pub value: AvaValue,
}

/// An AVA value: decoded text, or the `#hexstring` binary form.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum AvaValue {
    Text(String),
    Hex(Vec<u8>),
}

impl Ava {
    /// Case/space-insensitive comparison used by distinguishedNameMatch.
    fn matches(&self, other: &Ava) -> bool {
        let type_match = self
            .attribute
            .to_string()
            .eq_ignore_ascii_case(&other.attribute.to_string());
        type_match
            && match (&self.value, &other.value) {
                (AvaValue::Text(left), AvaValue::Text(right)) => {
                    crate::matching::normalize_case_ignore(left)
                        == crate::matching::normalize_case_ignore(right)
                }
                (AvaValue::Hex(left), AvaValue::Hex(right)) => left == right,
                _ => false,
            }
    }
}

/// A relative distinguished name: an unordered set of AVAs.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Rdn(pub Vec<Ava>);

impl Rdn {
    fn matches(&self, other: &Rdn) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .all(|ava| other.0.iter().any(|candidate| ava.matches(candidate)))
    }
}

/// An ordered sequence of RDNs, leftmost first as written.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub struct DistinguishedName(pub Vec<Rdn>);

impl DistinguishedName {
    /// Parses the RFC 4514 string form. The empty string is the zero-RDN
    /// name of the root.
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        if text.is_empty() {
            return Ok(Self(Vec::new()));
        }
        let mut parser = DnParser::new(text);
        let mut rdns = vec![parser.rdn()?];
        while parser.eat(',') {
            rdns.push(parser.rdn()?);
        }
        if !parser.at_end() {
            return Err(SyntaxError::bad(SYNTAX, "unconsumed input after final RDN"));
        }
        Ok(Self(rdns))
    }

    pub fn rdns(&self) -> &[Rdn] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Equality under distinguishedNameMatch: RDN count, then per-RDN
    /// unordered AVA comparison.
    pub fn matches(&self, other: &DistinguishedName) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(left, right)| left.matches(right))
    }

    /// Every AVA in the name, for extensible-match `dnAttributes` joins.
    pub fn avas(&self) -> impl Iterator<Item = &Ava> {
        self.0.iter().flat_map(|rdn| rdn.0.iter())
    }
}

struct DnParser<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> DnParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected as u8) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn rdn(&mut self) -> SyntaxResult<Rdn> {
        let mut avas = vec![self.ava()?];
        while self.eat('+') {
            avas.push(self.ava()?);
        }
        Ok(Rdn(avas))
    }

    fn ava(&mut self) -> SyntaxResult<Ava> {
        let attribute = self.attribute_type()?;
        if !self.eat('=') {
            return Err(SyntaxError::bad(SYNTAX, "expected '=' after attribute type"));
        }
        let value = self.attribute_value()?;
        Ok(Ava { attribute, value })
    }

    fn attribute_type(&mut self) -> SyntaxResult<Oid> {
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte == b'=' || byte == b',' || byte == b'+' {
                break;
            }
            self.position += 1;
        }
        let raw = core::str::from_utf8(&self.bytes[start..self.position])
            .map_err(|_| SyntaxError::bad(SYNTAX, "attribute type is not UTF-8"))?;
        Oid::parse(raw)
            .map_err(|_| SyntaxError::bad(SYNTAX, format!("bad attribute type '{raw}'")))
    }

    fn attribute_value(&mut self) -> SyntaxResult<AvaValue> {
        if self.eat('#') {
            return self.hex_value();
        }
        let mut decoded = Vec::new();
        let mut leading = true;
        while let Some(byte) = self.peek() {
            match byte {
                b',' | b'+' => break,
                b'\\' => {
                    self.position += 1;
                    decoded.push(self.escaped_byte()?);
                }
                b'"' | b';' | b'<' | b'>' => {
                    return Err(SyntaxError::bad(
                        SYNTAX,
                        format!("unescaped special '{}'", byte as char),
                    ));
                }
                b'#' if leading => {
                    return Err(SyntaxError::bad(SYNTAX, "unescaped leading '#'"));
                }
                _ => {
                    decoded.push(byte);
                    self.position += 1;
                }
            }
            leading = false;
        }
        let text = String::from_utf8(decoded)
            .map_err(|_| SyntaxError::bad(SYNTAX, "value is not UTF-8"))?;
        Ok(AvaValue::Text(text))
    }

    fn escaped_byte(&mut self) -> SyntaxResult<u8> {
        let byte = self
            .peek()
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "dangling escape"))?;
        if byte.is_ascii_hexdigit() {
            let second = self
                .bytes
                .get(self.position + 1)
                .copied()
                .filter(u8::is_ascii_hexdigit)
                .ok_or_else(|| SyntaxError::bad(SYNTAX, "truncated hex escape"))?;
            self.position += 2;
            let high = (byte as char).to_digit(16).unwrap_or(0) as u8;
            let low = (second as char).to_digit(16).unwrap_or(0) as u8;
            Ok((high << 4) | low)
        } else {
            self.position += 1;
            Ok(byte)
        }
    }

    fn hex_value(&mut self) -> SyntaxResult<AvaValue> {
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte == b',' || byte == b'+' {
                break;
            }
            if !byte.is_ascii_hexdigit() {
                return Err(SyntaxError::bad(SYNTAX, "non-hex digit in hexstring"));
            }
            self.position += 1;
        }
        let raw = &self.bytes[start..self.position];
        if raw.is_empty() || raw.len() % 2 != 0 {
            return Err(SyntaxError::bad(SYNTAX, "hexstring must be 1*hexpair"));
        }
        let mut decoded = Vec::with_capacity(raw.len() / 2);
        for pair in raw.chunks_exact(2) {
            let high = (pair[0] as char).to_digit(16).unwrap_or(0) as u8;
            let low = (pair[1] as char).to_digit(16).unwrap_or(0) as u8;
            decoded.push((high << 4) | low);
        }
        Ok(AvaValue::Hex(decoded))
    }
}

fn escape_value(value: &str, out: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    use core::fmt::Write;

    let chars: Vec<char> = value.chars().collect();
    for (index, ch) in chars.iter().enumerate() {
        let escape = matches!(ch, '"' | '+' | ',' | ';' | '<' | '>' | '\\')
            || (*ch == ' ' && (index == 0 || index == chars.len() - 1))
            || (*ch == '#' && index == 0);
        if *ch == '\0' {
            out.write_str("\\00")?;
        } else {
            if escape {
                out.write_char('\\')?;
            }
            out.write_char(*ch)?;
        }
    }
    Ok(())
}

impl core::fmt::Display for Ava {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}=", self.attribute)?;
        match &self.value {
            AvaValue::Text(text) => escape_value(text, f),
            AvaValue::Hex(bytes) => {
                f.write_str("#")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl core::fmt::Display for Rdn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, ava) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("+")?;
            }
            ava.fmt(f)?;
        }
        Ok(())
    }
}

impl core::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, rdn) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            rdn.fmt(f)?;
        }
        Ok(())
    }
}

impl TryFrom<&'_ str> for DistinguishedName {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// RFC 4517 §3.3.21: a DN optionally followed by `#` and a Bit String
/// distinguishing among multiple entries with the same name.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct NameAndOptionalUid {
    pub name: DistinguishedName,
    pub uid: Option<BitString>,
}

impl NameAndOptionalUid {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        // The optional UID is anchored at the end; an unescaped '#' inside
        // the DN belongs to a hexstring AVA, never to a `'…'B` suffix.
        if let Some(position) = text.rfind('#') {
            let (head, tail) = (&text[..position], &text[position + 1..]);
            if tail.starts_with('\'') {
                let uid = BitString::parse(tail)?;
                let name = DistinguishedName::parse(head)?;
                return Ok(Self {
                    name,
                    uid: Some(uid),
                });
            }
        }
        Ok(Self {
            name: DistinguishedName::parse(text)?,
            uid: None,
        })
    }
}

impl core::fmt::Display for NameAndOptionalUid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.name.fmt(f)?;
        if let Some(uid) = &self.uid {
            write!(f, "#{uid}")?;
        }
        Ok(())
    }
}

pub(super) fn check(input: Input<'_>) -> SyntaxResult<Value> {
    DistinguishedName::parse(input.text(SYNTAX)?).map(Value::DistinguishedName)
}

pub(super) fn check_name_and_optional_uid(input: Input<'_>) -> SyntaxResult<Value> {
    NameAndOptionalUid::parse(input.text("Name And Optional UID")?)
        .map(Value::NameAndOptionalUid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_dn_round_trips() {
        let dn = DistinguishedName::parse("cn=Jane Doe,ou=People,dc=example,dc=com").unwrap();
        assert_eq!(dn.rdns().len(), 4);
        assert_eq!(dn.to_string(), "cn=Jane Doe,ou=People,dc=example,dc=com");
    }

    #[test]
    fn multi_valued_rdn() {
        let dn = DistinguishedName::parse("cn=Doe+uid=jdoe,dc=example").unwrap();
        assert_eq!(dn.rdns()[0].0.len(), 2);
        assert_eq!(dn.to_string(), "cn=Doe+uid=jdoe,dc=example");
    }

    #[test]
    fn escapes_decode_and_re_encode() {
        let dn = DistinguishedName::parse(r"cn=Doe\, Jane,dc=example").unwrap();
        match &dn.rdns()[0].0[0].value {
            AvaValue::Text(text) => assert_eq!(text, "Doe, Jane"),
            other => panic!("unexpected value {other:?}"),
        }
        assert_eq!(dn.to_string(), r"cn=Doe\, Jane,dc=example");

        let dn = DistinguishedName::parse(r"cn=Before\0dAfter,dc=example").unwrap();
        match &dn.rdns()[0].0[0].value {
            AvaValue::Text(text) => assert_eq!(text, "Before\rAfter"),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn hexstring_value() {
        let dn = DistinguishedName::parse("1.3.6.1.4.1.1466.0=#04024869,dc=example").unwrap();
        match &dn.rdns()[0].0[0].value {
            AvaValue::Hex(bytes) => assert_eq!(bytes, &[0x04, 0x02, 0x48, 0x69]),
            other => panic!("unexpected value {other:?}"),
        }
        assert_eq!(dn.to_string(), "1.3.6.1.4.1.1466.0=#04024869,dc=example");
    }

    #[test]
    fn empty_dn_is_root() {
        assert!(DistinguishedName::parse("").unwrap().is_empty());
    }

    #[test]
    fn malformed_dns() {
        for rejected in ["cn", "cn=a,", "=x,dc=example", "cn=a;b", "cn=#zz"] {
            assert!(
                DistinguishedName::parse(rejected).is_err(),
                "{rejected:?} should fail"
            );
        }
    }

    #[test]
    fn dn_match_ignores_case_and_ava_order() {
        let left = DistinguishedName::parse("CN=Jane+UID=jdoe,DC=Example").unwrap();
        let right = DistinguishedName::parse("uid=JDOE+cn=jane,dc=example").unwrap();
        assert!(left.matches(&right));

        let different = DistinguishedName::parse("cn=jane,dc=other").unwrap();
        assert!(!left.matches(&different));
    }

    #[test]
    fn name_and_optional_uid() {
        let value = NameAndOptionalUid::parse("1.3.6.1.4.1.1466.0=#04024869,o=Test,c=GB#'0101'B")
            .unwrap();
        assert_eq!(value.uid.as_ref().unwrap().to_string(), "'0101'B");
        assert_eq!(
            value.to_string(),
            "1.3.6.1.4.1.1466.0=#04024869,o=Test,c=GB#'0101'B"
        );

        let plain = NameAndOptionalUid::parse("cn=Jane,dc=example").unwrap();
        assert!(plain.uid.is_none());
    }
}
