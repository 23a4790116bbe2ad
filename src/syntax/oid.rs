use super::{Input, Value};
use crate::chars::{is_alpha, is_digit};
use crate::error::{SyntaxError, SyntaxResult};

const SYNTAX: &str = "OID";

/// An RFC 4512 `numericoid`: dot-separated decimal arcs with no leading
/// zeros (the arc `0` itself excepted).
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NumericOid(Vec<u32>);

impl NumericOid {
    /// Creates a numeric OID from `arcs`.
    ///
    /// # Panics
    /// If `arcs` is empty.
    pub fn new(arcs: Vec<u32>) -> Self {
        assert!(!arcs.is_empty(), "NumericOid requires at least one arc");
        Self(arcs)
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub fn parse(text: &str) -> SyntaxResult<Self> {
        if text.is_empty() {
            return Err(SyntaxError::BadLength {
                syntax: SYNTAX,
                length: 0,
            });
        }
        let mut arcs = Vec::new();
        for arc in text.split('.') {
            if arc.is_empty() {
                return Err(SyntaxError::bad(SYNTAX, "empty arc"));
            }
            if arc.len() > 1 && arc.starts_with('0') {
                return Err(SyntaxError::bad(SYNTAX, format!("leading zero in arc '{arc}'")));
            }
            if !arc.chars().all(is_digit) {
                return Err(SyntaxError::bad(SYNTAX, format!("non-digit in arc '{arc}'")));
            }
            let value = arc
                .parse::<u32>()
                .map_err(|_| SyntaxError::bad(SYNTAX, format!("arc '{arc}' out of range")))?;
            arcs.push(value);
        }
        Ok(Self(arcs))
    }

    /// Encodes the OID in DER; requires at least two arcs.
    pub fn to_der(&self) -> Vec<u8> {
        crate::der::encode_object_identifier(&self.0)
    }

    pub fn from_der(input: &[u8]) -> SyntaxResult<Self> {
        crate::der::decode_object_identifier(input)
            .map(Self)
            .map_err(|error| SyntaxError::bad(SYNTAX, error.to_string()))
    }
}

impl core::fmt::Display for NumericOid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

impl core::ops::Deref for NumericOid {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An RFC 4512 `descr`: ALPHA followed by ALPHA / DIGIT / HYPHEN.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Descriptor(String);

impl Descriptor {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        let mut chars = text.chars();
        let leading = chars.next().ok_or(SyntaxError::BadLength {
            syntax: "descr",
            length: 0,
        })?;
        if !is_alpha(leading) {
            return Err(SyntaxError::bad("descr", "must begin with ALPHA"));
        }
        if !chars.all(|ch| is_alpha(ch) || is_digit(ch) || ch == '-') {
            return Err(SyntaxError::bad(
                "descr",
                "only ALPHA, DIGIT, and HYPHEN permitted",
            ));
        }
        Ok(Self(text.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The OID syntax admits either form.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Oid {
    Numeric(NumericOid),
    Descr(Descriptor),
}

impl Oid {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        if text.starts_with(|ch: char| ch.is_ascii_digit()) {
            NumericOid::parse(text).map(Oid::Numeric)
        } else {
            Descriptor::parse(text).map(Oid::Descr)
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Oid::Numeric(_))
    }
}

impl core::fmt::Display for Oid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Oid::Numeric(oid) => oid.fmt(f),
            Oid::Descr(descr) => descr.fmt(f),
        }
    }
}

impl TryFrom<&'_ str> for Oid {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

pub(super) fn check(input: Input<'_>) -> SyntaxResult<Value> {
    Oid::parse(input.text(SYNTAX)?).map(Value::Oid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numericoid_forms() {
        assert_eq!(
            NumericOid::parse("2.5.4.3").unwrap().arcs(),
            &[2, 5, 4, 3]
        );
        assert_eq!(NumericOid::parse("0").unwrap().arcs(), &[0]);
        assert!(NumericOid::parse("2.05.4").is_err());
        assert!(NumericOid::parse("2..4").is_err());
        assert!(NumericOid::parse(".2.4").is_err());
        assert!(NumericOid::parse("2.5a").is_err());
    }

    #[test]
    fn descr_forms() {
        assert!(Descriptor::parse("cn").is_ok());
        assert!(Descriptor::parse("caseIgnoreMatch").is_ok());
        assert!(Descriptor::parse("x-my-attr2").is_ok());
        assert!(Descriptor::parse("2cn").is_err());
        assert!(Descriptor::parse("-cn").is_err());
        assert!(Descriptor::parse("c n").is_err());
        assert!(Descriptor::parse("").is_err());
    }

    #[test]
    fn either_form_through_oid() {
        assert!(Oid::parse("1.3.6.1.4.1.1466.115.121.1.15").unwrap().is_numeric());
        assert!(!Oid::parse("name").unwrap().is_numeric());
        assert!(Oid::parse("9cn").is_err());
    }
}
