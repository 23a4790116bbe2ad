//! Telephone Number, Facsimile Telephone Number, and Telex Number.

use super::strings::PrintableString;
use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

/// An international telephone number: printable characters with the E.123
/// leading `+` and at least one digit.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct TelephoneNumber(String);

impl TelephoneNumber {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "Telephone Number";
        let printable = PrintableString::parse(text)
            .map_err(|_| SyntaxError::bad(SYNTAX, "not a printable string"))?;
        if !text.starts_with('+') {
            return Err(SyntaxError::bad(SYNTAX, "missing leading '+'"));
        }
        if !text.bytes().any(|byte| byte.is_ascii_digit()) {
            return Err(SyntaxError::bad(SYNTAX, "no digits"));
        }
        Ok(Self(printable.as_str().to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TelephoneNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&'_ str> for TelephoneNumber {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// The G3 facsimile parameters of RFC 4517 §3.3.11.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum FaxParameter {
    TwoDimensional,
    FineResolution,
    UnlimitedLength,
    B4Length,
    A3Width,
    B4Width,
    Uncompressed,
}

impl FaxParameter {
    const TABLE: &'static [(&'static str, FaxParameter)] = &[
        ("twoDimensional", FaxParameter::TwoDimensional),
        ("fineResolution", FaxParameter::FineResolution),
        ("unlimitedLength", FaxParameter::UnlimitedLength),
        ("b4Length", FaxParameter::B4Length),
        ("a3Width", FaxParameter::A3Width),
        ("b4Width", FaxParameter::B4Width),
        ("uncompressed", FaxParameter::Uncompressed),
    ];

    fn parse(token: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, parameter)| *parameter)
    }

    pub fn as_str(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, parameter)| *parameter == self)
            .map(|(name, _)| *name)
            .unwrap_or("uncompressed")
    }
}

/// A telephone number optionally followed by `$`-separated fax parameters.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FacsimileTelephoneNumber {
    pub number: TelephoneNumber,
    pub parameters: Vec<FaxParameter>,
}

impl FacsimileTelephoneNumber {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "Facsimile Telephone Number";
        let mut fields = text.split('$');
        let number = TelephoneNumber::parse(fields.next().unwrap_or(""))
            .map_err(|error| SyntaxError::bad(SYNTAX, error.to_string()))?;
        let mut parameters = Vec::new();
        for field in fields {
            let parameter = FaxParameter::parse(field).ok_or_else(|| {
                SyntaxError::bad(SYNTAX, format!("unknown fax parameter '{field}'"))
            })?;
            parameters.push(parameter);
        }
        Ok(Self { number, parameters })
    }
}

impl core::fmt::Display for FacsimileTelephoneNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.number.fmt(f)?;
        for parameter in &self.parameters {
            write!(f, "${}", parameter.as_str())?;
        }
        Ok(())
    }
}

/// `actual-number $ country-code $ answerback`, each a printable string.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct TelexNumber {
    pub number: PrintableString,
    pub country_code: PrintableString,
    pub answerback: PrintableString,
}

impl TelexNumber {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "Telex Number";
        let fields: Vec<&str> = text.split('$').collect();
        let [number, country_code, answerback] = fields.as_slice() else {
            return Err(SyntaxError::bad(
                SYNTAX,
                "expected number$country-code$answerback",
            ));
        };
        let component = |label: &str, field: &str| {
            PrintableString::parse(field)
                .map_err(|_| SyntaxError::bad(SYNTAX, format!("bad {label} component")))
        };
        Ok(Self {
            number: component("actual-number", number)?,
            country_code: component("country-code", country_code)?,
            answerback: component("answerback", answerback)?,
        })
    }
}

impl core::fmt::Display for TelexNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}${}${}", self.number, self.country_code, self.answerback)
    }
}

pub(super) fn check_telephone(input: Input<'_>) -> SyntaxResult<Value> {
    TelephoneNumber::parse(input.text("Telephone Number")?).map(Value::TelephoneNumber)
}

pub(super) fn check_facsimile(input: Input<'_>) -> SyntaxResult<Value> {
    FacsimileTelephoneNumber::parse(input.text("Facsimile Telephone Number")?)
        .map(Value::FacsimileTelephoneNumber)
}

pub(super) fn check_telex(input: Input<'_>) -> SyntaxResult<Value> {
    TelexNumber::parse(input.text("Telex Number")?).map(Value::TelexNumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn telephone_requires_plus_and_digits() {
        assert!(TelephoneNumber::parse("+1 512 305 0280").is_ok());
        assert!(TelephoneNumber::parse("1 512 305 0280").is_err());
        assert!(TelephoneNumber::parse("+").is_err());
        assert!(TelephoneNumber::parse("").is_err());
    }

    #[test]
    fn facsimile_parameters() {
        let value =
            FacsimileTelephoneNumber::parse("+61 3 9896 7830$fineResolution$b4Width").unwrap();
        assert_eq!(value.parameters.len(), 2);
        assert_eq!(
            value.to_string(),
            "+61 3 9896 7830$fineResolution$b4Width"
        );
        assert!(FacsimileTelephoneNumber::parse("+61 3$sepia").is_err());
    }

    #[test]
    fn telex_components() {
        let value = TelexNumber::parse("12345$US$JANEDOE").unwrap();
        assert_eq!(value.to_string(), "12345$US$JANEDOE");
        assert!(TelexNumber::parse("12345$US").is_err());
        assert!(TelexNumber::parse("12345$US$A$B").is_err());
    }
}
