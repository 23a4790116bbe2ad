//! The character-string syntaxes: PrintableString, IA5String,
//! NumericString, CountryString, TeletexString, the two wide forms
//! (BMPString, UniversalString), the DirectoryString union over all five,
//! and the OctetString admission check.

use super::{Input, Value};
use crate::chars::{is_ia5, is_printable_char, is_teletex_byte, utf8_str};
use crate::error::{SyntaxError, SyntaxResult};

/// A non-empty string restricted to the X.680 printable set.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PrintableString(String);

impl PrintableString {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        if text.is_empty() {
            return Err(SyntaxError::BadLength {
                syntax: "PrintableString",
                length: 0,
            });
        }
        match text.chars().find(|&ch| !is_printable_char(ch)) {
            None => Ok(Self(text.to_owned())),
            Some(ch) => Err(SyntaxError::bad(
                "PrintableString",
                format!("'{ch}' not in the printable set"),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A string of ISO 646 characters (`%x00-7F`). May be empty.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ia5String(String);

impl Ia5String {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        match text.chars().find(|&ch| !is_ia5(ch)) {
            None => Ok(Self(text.to_owned())),
            Some(ch) => Err(SyntaxError::bad(
                "IA5String",
                format!("'{ch}' above %x7F"),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A non-empty string of digits and SPACE.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NumericString(String);

impl NumericString {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        if text.is_empty() {
            return Err(SyntaxError::BadLength {
                syntax: "NumericString",
                length: 0,
            });
        }
        match text.chars().find(|&ch| !ch.is_ascii_digit() && ch != ' ') {
            None => Ok(Self(text.to_owned())),
            Some(ch) => Err(SyntaxError::bad(
                "NumericString",
                format!("'{ch}' is neither DIGIT nor SPACE"),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An ISO 3166 two-letter code.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CountryString([u8; 2]);

impl CountryString {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(SyntaxError::BadLength {
                syntax: "Country String",
                length: bytes.len(),
            });
        }
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(SyntaxError::bad(
                "Country String",
                "both characters must be letters",
            ));
        }
        Ok(Self([bytes[0], bytes[1]]))
    }

    pub fn as_str(&self) -> &str {
        // Both bytes were checked as ASCII letters.
        core::str::from_utf8(&self.0).unwrap_or("??")
    }
}

/// A byte string over the T.61 repertoire.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TeletexString(Vec<u8>);

impl TeletexString {
    pub fn from_bytes(bytes: &[u8]) -> SyntaxResult<Self> {
        match bytes.iter().find(|&&byte| !is_teletex_byte(byte)) {
            None => Ok(Self(bytes.to_owned())),
            Some(byte) => Err(SyntaxError::bad(
                "TeletexString",
                format!("byte 0x{byte:02X} outside the T.61 repertoire"),
            )),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A UTF-16BE string restricted to the Basic Multilingual Plane. Surrogate
/// code units are rejected outright, so no character above `U+FFFF` can be
/// smuggled in as a pair.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BmpString(String);

impl BmpString {
    pub fn from_utf16be(bytes: &[u8]) -> SyntaxResult<Self> {
        if bytes.len() % 2 != 0 {
            return Err(SyntaxError::BadLength {
                syntax: "BMPString",
                length: bytes.len(),
            });
        }
        let mut decoded = String::with_capacity(bytes.len() / 2);
        for unit in bytes.chunks_exact(2) {
            let unit = u16::from_be_bytes([unit[0], unit[1]]);
            let ch = char::from_u32(u32::from(unit)).ok_or_else(|| {
                SyntaxError::bad("BMPString", format!("surrogate code unit 0x{unit:04X}"))
            })?;
            decoded.push(ch);
        }
        Ok(Self(decoded))
    }

    pub fn from_text(text: &str) -> SyntaxResult<Self> {
        match text.chars().find(|&ch| (ch as u32) > 0xFFFF) {
            None => Ok(Self(text.to_owned())),
            Some(ch) => Err(SyntaxError::bad(
                "BMPString",
                format!("'{ch}' above the Basic Multilingual Plane"),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A UTF-32BE string. Each unit must be a Unicode scalar value, which
/// excludes surrogates and anything above `U+10FFFF`.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UniversalString(String);

impl UniversalString {
    pub fn from_utf32be(bytes: &[u8]) -> SyntaxResult<Self> {
        if bytes.len() % 4 != 0 {
            return Err(SyntaxError::BadLength {
                syntax: "UniversalString",
                length: bytes.len(),
            });
        }
        let mut decoded = String::with_capacity(bytes.len() / 4);
        for unit in bytes.chunks_exact(4) {
            let unit = u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]]);
            let ch = char::from_u32(unit).ok_or_else(|| {
                SyntaxError::bad(
                    "UniversalString",
                    format!("0x{unit:08X} is not a Unicode scalar value"),
                )
            })?;
            decoded.push(ch);
        }
        Ok(Self(decoded))
    }

    pub fn from_text(text: &str) -> Self {
        Self(text.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The DirectoryString union: whichever sub-syntax admitted the value is
/// remembered and re-emitted, without transcoding.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum DirectoryString {
    Teletex(TeletexString),
    Printable(PrintableString),
    Utf8(String),
    Universal(UniversalString),
    Bmp(BmpString),
}

impl DirectoryString {
    /// Admits a text value: the printable subset keeps its narrower
    /// sub-syntax, everything else is UTF8String. Empty values are
    /// rejected (RFC 4517 requires at least one character).
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        if text.is_empty() {
            return Err(SyntaxError::BadLength {
                syntax: "Directory String",
                length: 0,
            });
        }
        if text.chars().all(is_printable_char) {
            Ok(DirectoryString::Printable(PrintableString(text.to_owned())))
        } else {
            Ok(DirectoryString::Utf8(text.to_owned()))
        }
    }

    /// Admits a byte value, resolving the untagged CHOICE by shape. The
    /// wide transfer forms carry NUL octets in the high bytes of ordinary
    /// characters, which RFC 4512 UTF-8 text never does, so NUL-bearing
    /// input is read as UTF-32BE, then UTF-16BE. NUL-free input is read
    /// as UTF-8, falling back to the T.61 repertoire when the multibyte
    /// shapes do not hold.
    pub fn from_bytes(bytes: &[u8]) -> SyntaxResult<Self> {
        if bytes.is_empty() {
            return Err(SyntaxError::BadLength {
                syntax: "Directory String",
                length: 0,
            });
        }
        if bytes.contains(&0) {
            if bytes.len() % 4 == 0 {
                if let Ok(value) = UniversalString::from_utf32be(bytes) {
                    return Ok(DirectoryString::Universal(value));
                }
            }
            if bytes.len() % 2 == 0 {
                if let Ok(value) = BmpString::from_utf16be(bytes) {
                    return Ok(DirectoryString::Bmp(value));
                }
            }
            return Err(SyntaxError::bad(
                "Directory String",
                "NUL octets outside a wide transfer form",
            ));
        }
        if let Some(text) = utf8_str(bytes) {
            return Self::parse(text);
        }
        TeletexString::from_bytes(bytes)
            .map(DirectoryString::Teletex)
            .map_err(|_| {
                SyntaxError::bad(
                    "Directory String",
                    "not UTF-8, UTF-16BE, UTF-32BE, or T.61",
                )
            })
    }

    /// The character content regardless of sub-syntax. Teletex bytes are
    /// interpreted as their ASCII subset with lossy replacement.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            DirectoryString::Teletex(value) => String::from_utf8_lossy(value.as_bytes()),
            DirectoryString::Printable(value) => value.as_str().into(),
            DirectoryString::Utf8(value) => value.as_str().into(),
            DirectoryString::Universal(value) => value.as_str().into(),
            DirectoryString::Bmp(value) => value.as_str().into(),
        }
    }
}

impl core::fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.text())
    }
}

/// Any byte sequence, admitted through a DER OCTET STRING round-trip so
/// that tagged transfer forms stay well-formed.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct OctetString(bytes::Bytes);

impl OctetString {
    /// Admits raw contents by encoding them and decoding the result.
    pub fn new(contents: &[u8]) -> SyntaxResult<Self> {
        let encoded = crate::der::encode_octet_string(contents);
        crate::der::decode_octet_string(&encoded)
            .map(Self)
            .map_err(|error| SyntaxError::bad("Octet String", error.to_string()))
    }

    /// Decodes an already-encoded DER OCTET STRING TLV.
    pub fn from_der(input: &[u8]) -> SyntaxResult<Self> {
        crate::der::decode_octet_string(input)
            .map(Self)
            .map_err(|error| SyntaxError::bad("Octet String", error.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_der(&self) -> Vec<u8> {
        crate::der::encode_octet_string(&self.0)
    }
}

impl core::fmt::Display for OctetString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

macro_rules! string_try_from {
    ($($type:ident),+ $(,)?) => {
        $(
            impl TryFrom<&'_ str> for $type {
                type Error = SyntaxError;

                fn try_from(value: &str) -> Result<Self, Self::Error> {
                    Self::parse(value)
                }
            }

            impl TryFrom<String> for $type {
                type Error = SyntaxError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::parse(&value)
                }
            }

            impl core::fmt::Display for $type {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    }
}

string_try_from!(PrintableString, Ia5String, NumericString, CountryString);

impl core::fmt::Display for TeletexString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl core::fmt::Display for BmpString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::fmt::Display for UniversalString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

pub(super) fn check_printable(input: Input<'_>) -> SyntaxResult<Value> {
    PrintableString::parse(input.text("PrintableString")?).map(Value::PrintableString)
}

pub(super) fn check_ia5(input: Input<'_>) -> SyntaxResult<Value> {
    match input {
        Input::Text(text) => Ia5String::parse(text).map(Value::Ia5String),
        Input::Bytes(bytes) => match bytes.iter().find(|&&byte| byte > 0x7F) {
            None => Ia5String::parse(core::str::from_utf8(bytes).map_err(|_| {
                SyntaxError::bad("IA5String", "undecodable input")
            })?)
            .map(Value::Ia5String),
            Some(byte) => Err(SyntaxError::bad(
                "IA5String",
                format!("byte 0x{byte:02X} above %x7F"),
            )),
        },
    }
}

pub(super) fn check_numeric(input: Input<'_>) -> SyntaxResult<Value> {
    NumericString::parse(input.text("NumericString")?).map(Value::NumericString)
}

pub(super) fn check_country(input: Input<'_>) -> SyntaxResult<Value> {
    CountryString::parse(input.text("Country String")?).map(Value::CountryString)
}

pub(super) fn check_directory(input: Input<'_>) -> SyntaxResult<Value> {
    match input {
        Input::Text(text) => DirectoryString::parse(text).map(Value::DirectoryString),
        Input::Bytes(bytes) => DirectoryString::from_bytes(bytes).map(Value::DirectoryString),
    }
}

pub(super) fn check_octet(input: Input<'_>) -> SyntaxResult<Value> {
    OctetString::new(input.bytes()).map(Value::OctetString)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn printable_rejects_at_sign() {
        assert!(PrintableString::parse("Jane Doe").is_ok());
        assert!(PrintableString::parse("jane@example").is_err());
        assert!(PrintableString::parse("").is_err());
    }

    #[test]
    fn country_codes() {
        for accepted in ["US", "CA", "JP", "de"] {
            assert!(CountryString::parse(accepted).is_ok(), "{accepted}");
        }
        assert!(matches!(
            CountryString::parse("U"),
            Err(SyntaxError::BadLength { .. })
        ));
        assert!(matches!(
            CountryString::parse("U1"),
            Err(SyntaxError::BadSyntax { .. })
        ));
        assert!(matches!(
            CountryString::parse("USA"),
            Err(SyntaxError::BadLength { .. })
        ));
    }

    #[test]
    fn bmp_rejects_surrogate_units() {
        assert_eq!(
            BmpString::from_utf16be(&[0x00, 0x4A, 0x00, 0x61]).unwrap().as_str(),
            "Ja"
        );
        assert!(BmpString::from_utf16be(&[0xD8, 0x00]).is_err());
        assert!(BmpString::from_utf16be(&[0x00]).is_err());
        assert!(BmpString::from_text("𝄞").is_err());
    }

    #[test]
    fn universal_rejects_out_of_range() {
        assert_eq!(
            UniversalString::from_utf32be(&[0x00, 0x01, 0xD1, 0x1E]).unwrap().as_str(),
            "𝄞"
        );
        assert!(UniversalString::from_utf32be(&[0x00, 0x11, 0x00, 0x00]).is_err());
        assert!(UniversalString::from_utf32be(&[0x00, 0x00, 0xD8, 0x00]).is_err());
    }

    #[test]
    fn directory_string_remembers_sub_syntax() {
        assert!(matches!(
            DirectoryString::parse("printable only").unwrap(),
            DirectoryString::Printable(_)
        ));
        assert!(matches!(
            DirectoryString::parse("smörgåsbord").unwrap(),
            DirectoryString::Utf8(_)
        ));
        assert!(DirectoryString::parse("").is_err());
    }

    #[test]
    fn directory_string_reaches_all_five_variants() {
        let printable = DirectoryString::from_bytes(b"Jane Doe").unwrap();
        assert!(matches!(printable, DirectoryString::Printable(_)));

        let utf8 = DirectoryString::from_bytes("smörgåsbord".as_bytes()).unwrap();
        assert!(matches!(utf8, DirectoryString::Utf8(_)));

        // UTF-16BE "Ja": the 0x4A0061 reading exceeds the Unicode range,
        // so the UTF-32 attempt falls through to BMP.
        let bmp = DirectoryString::from_bytes(&[0x00, 0x4A, 0x00, 0x61]).unwrap();
        assert!(matches!(&bmp, DirectoryString::Bmp(value) if value.as_str() == "Ja"));

        let universal =
            DirectoryString::from_bytes(&[0x00, 0x00, 0x00, 0x4A, 0x00, 0x01, 0xD1, 0x1E])
                .unwrap();
        assert!(matches!(&universal, DirectoryString::Universal(value) if value.as_str() == "J𝄞"));

        // Latin-1 e-acute is not well-formed UTF-8 but sits in the T.61
        // right-hand graphic set.
        let teletex = DirectoryString::from_bytes(&[b'c', b'a', b'f', 0xE9]).unwrap();
        assert!(matches!(&teletex, DirectoryString::Teletex(value) if value.as_bytes().len() == 4));
    }

    #[test]
    fn directory_string_rejects_unclassifiable_bytes() {
        // NUL-bearing input that is neither UTF-32BE nor UTF-16BE.
        assert!(DirectoryString::from_bytes(&[0x00, 0xD8, 0x00]).is_err());
        // NUL-free input outside both UTF-8 and the T.61 repertoire.
        assert!(DirectoryString::from_bytes(&[0xE9, 0x01]).is_err());
        assert!(DirectoryString::from_bytes(&[]).is_err());
    }

    #[test]
    fn octet_string_round_trip() {
        let value = OctetString::new(&[0x00, 0xFF, 0x10]).unwrap();
        assert_eq!(value.as_bytes(), &[0x00, 0xFF, 0x10]);
        assert_eq!(OctetString::from_der(&value.to_der()).unwrap(), value);
    }
}
