//! # RFC 4515 search filters
//!
//! A recursive-descent parser from the string representation into a tagged
//! AST, the inverse rendering, and three-valued evaluation against a
//! caller-supplied attribute provider. Matching rules are resolved through
//! a [`SubschemaSubentry`]; an attribute with no applicable rule makes the
//! enclosing comparison UNDEFINED rather than an error.

use crate::error::{SyntaxError, SyntaxResult};
use crate::matching::{self, OrderingOperator, Ternary};
use crate::schema::SubschemaSubentry;
use crate::syntax::{DistinguishedName, SubstringAssertion};

const SYNTAX: &str = "Filter";

/// An attribute description with an assertion value, shared by the
/// equality, ordering, and approximate filter items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub attribute: String,
    pub value: Vec<u8>,
}

/// The RFC 4515 filter AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Equality(Comparison),
    Substrings {
        attribute: String,
        assertion: SubstringAssertion,
    },
    GreaterOrEqual(Comparison),
    LessOrEqual(Comparison),
    Present {
        attribute: String,
    },
    Approx(Comparison),
    Extensible {
        matching_rule: Option<String>,
        attribute: Option<String>,
        value: Vec<u8>,
        dn_attributes: bool,
    },
}

/// Supplies the notional entry's attributes during evaluation.
pub trait AttributeProvider {
    /// The values present for `attribute`, empty when absent.
    fn values(&self, attribute: &str) -> Vec<Vec<u8>>;

    /// Whether the attribute is present at all.
    fn is_present(&self, attribute: &str) -> bool {
        !self.values(attribute).is_empty()
    }

    /// Attribute descriptions carried by the entry, for extensible
    /// matches that name no type.
    fn attributes(&self) -> Vec<String> {
        Vec::new()
    }

    /// The entry's name, joined into extensible matches with `:dn`.
    fn distinguished_name(&self) -> Option<&DistinguishedName> {
        None
    }
}

/// Parses the parenthesized string representation.
pub fn parse(text: &str) -> SyntaxResult<Filter> {
    let mut parser = FilterParser::new(text);
    let filter = parser.filter()?;
    if !parser.at_end() {
        return Err(SyntaxError::bad(SYNTAX, "trailing characters after filter"));
    }
    Ok(filter)
}

impl TryFrom<&'_ str> for Filter {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value)
    }
}

struct FilterParser<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> FilterParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn expect(&mut self, expected: u8) -> SyntaxResult<()> {
        if self.peek() == Some(expected) {
            self.position += 1;
            Ok(())
        } else {
            Err(SyntaxError::bad(
                SYNTAX,
                format!("expected '{}'", expected as char),
            ))
        }
    }

    fn filter(&mut self) -> SyntaxResult<Filter> {
        self.expect(b'(')?;
        let filter = match self.peek() {
            Some(b'&') => {
                self.position += 1;
                Filter::And(self.filter_list()?)
            }
            Some(b'|') => {
                self.position += 1;
                Filter::Or(self.filter_list()?)
            }
            Some(b'!') => {
                self.position += 1;
                Filter::Not(Box::new(self.filter()?))
            }
            _ => self.item()?,
        };
        self.expect(b')')?;
        Ok(filter)
    }

    fn filter_list(&mut self) -> SyntaxResult<Vec<Filter>> {
        let mut filters = Vec::new();
        while self.peek() == Some(b'(') {
            filters.push(self.filter()?);
        }
        if filters.is_empty() {
            return Err(SyntaxError::bad(SYNTAX, "empty filter list"));
        }
        Ok(filters)
    }

    /// `attr [":dn"] [":" oid] (":=" / "=" / ">=" / "<=" / "~=") value`
    fn item(&mut self) -> SyntaxResult<Filter> {
        let attribute = self.attribute_token();

        // Extensible match: options introduced by ':'.
        if self.peek() == Some(b':') {
            return self.extensible(attribute);
        }

        let operator = match (self.peek(), self.bytes.get(self.position + 1)) {
            (Some(b'='), _) => {
                self.position += 1;
                b'='
            }
            (Some(b'>'), Some(b'=')) => {
                self.position += 2;
                b'>'
            }
            (Some(b'<'), Some(b'=')) => {
                self.position += 2;
                b'<'
            }
            (Some(b'~'), Some(b'=')) => {
                self.position += 2;
                b'~'
            }
            _ => return Err(SyntaxError::bad(SYNTAX, "expected a filter operator")),
        };
        if attribute.is_empty() {
            return Err(SyntaxError::bad(SYNTAX, "missing attribute description"));
        }

        if operator == b'=' {
            let raw = self.raw_value();
            if raw == "*" {
                return Ok(Filter::Present { attribute });
            }
            if raw.contains('*') {
                let assertion = SubstringAssertion::parse(raw)
                    .map_err(|error| SyntaxError::bad(SYNTAX, error.to_string()))?;
                return Ok(Filter::Substrings {
                    attribute,
                    assertion,
                });
            }
            let value = unescape(raw)?;
            return Ok(Filter::Equality(Comparison { attribute, value }));
        }

        let value = unescape(self.raw_value())?;
        let comparison = Comparison { attribute, value };
        Ok(match operator {
            b'>' => Filter::GreaterOrEqual(comparison),
            b'<' => Filter::LessOrEqual(comparison),
            _ => Filter::Approx(comparison),
        })
    }

    fn extensible(&mut self, attribute: String) -> SyntaxResult<Filter> {
        let attribute = (!attribute.is_empty()).then_some(attribute);
        let mut dn_attributes = false;
        let mut matching_rule = None;

        loop {
            self.expect(b':')?;
            if self.peek() == Some(b'=') {
                self.position += 1;
                break;
            }
            let token = self.attribute_token();
            if token.eq_ignore_ascii_case("dn") {
                if dn_attributes {
                    return Err(SyntaxError::bad(SYNTAX, "repeated ':dn'"));
                }
                dn_attributes = true;
            } else if matching_rule.is_none() && !token.is_empty() {
                matching_rule = Some(token);
            } else {
                return Err(SyntaxError::bad(SYNTAX, "malformed extensible match"));
            }
        }

        if attribute.is_none() && matching_rule.is_none() {
            return Err(SyntaxError::bad(
                SYNTAX,
                "extensible match needs a type or a rule",
            ));
        }
        let value = unescape(self.raw_value())?;
        Ok(Filter::Extensible {
            matching_rule,
            attribute,
            value,
            dn_attributes,
        })
    }

    fn attribute_token(&mut self) -> String {
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b';') {
                self.position += 1;
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.bytes[start..self.position]).into_owned()
    }

    /// The raw assertion text up to the closing parenthesis, escapes
    /// still in place.
    fn raw_value(&mut self) -> &'a str {
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte == b')' || byte == b'(' {
                break;
            }
            self.position += 1;
        }
        core::str::from_utf8(&self.bytes[start..self.position]).unwrap_or("")
    }
}

/// Decodes `\XX` escapes to single bytes.
fn unescape(raw: &str) -> SyntaxResult<Vec<u8>> {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'\\' {
            let pair = bytes
                .get(index + 1..index + 3)
                .ok_or_else(|| SyntaxError::bad(SYNTAX, "truncated escape"))?;
            let high = (pair[0] as char)
                .to_digit(16)
                .ok_or_else(|| SyntaxError::bad(SYNTAX, "non-hex escape"))?;
            let low = (pair[1] as char)
                .to_digit(16)
                .ok_or_else(|| SyntaxError::bad(SYNTAX, "non-hex escape"))?;
            decoded.push(((high << 4) | low) as u8);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }
    Ok(decoded)
}

fn escape_into(value: &[u8], f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for &byte in value {
        match byte {
            b'(' => f.write_str("\\28")?,
            b')' => f.write_str("\\29")?,
            b'*' => f.write_str("\\2a")?,
            b'\\' => f.write_str("\\5c")?,
            0x00 => f.write_str("\\00")?,
            _ => core::fmt::Write::write_char(f, byte as char)?,
        }
    }
    Ok(())
}

impl core::fmt::Display for Filter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Filter::And(filters) => {
                f.write_str("(&")?;
                for filter in filters {
                    filter.fmt(f)?;
                }
                f.write_str(")")
            }
            Filter::Or(filters) => {
                f.write_str("(|")?;
                for filter in filters {
                    filter.fmt(f)?;
                }
                f.write_str(")")
            }
            Filter::Not(filter) => write!(f, "(!{filter})"),
            Filter::Equality(comparison) => {
                write!(f, "({}=", comparison.attribute)?;
                escape_into(&comparison.value, f)?;
                f.write_str(")")
            }
            Filter::Substrings {
                attribute,
                assertion,
            } => write!(f, "({attribute}={assertion})"),
            Filter::GreaterOrEqual(comparison) => {
                write!(f, "({}>=", comparison.attribute)?;
                escape_into(&comparison.value, f)?;
                f.write_str(")")
            }
            Filter::LessOrEqual(comparison) => {
                write!(f, "({}<=", comparison.attribute)?;
                escape_into(&comparison.value, f)?;
                f.write_str(")")
            }
            Filter::Present { attribute } => write!(f, "({attribute}=*)"),
            Filter::Approx(comparison) => {
                write!(f, "({}~=", comparison.attribute)?;
                escape_into(&comparison.value, f)?;
                f.write_str(")")
            }
            Filter::Extensible {
                matching_rule,
                attribute,
                value,
                dn_attributes,
            } => {
                f.write_str("(")?;
                if let Some(attribute) = attribute {
                    f.write_str(attribute)?;
                }
                if *dn_attributes {
                    f.write_str(":dn")?;
                }
                if let Some(rule) = matching_rule {
                    write!(f, ":{rule}")?;
                }
                f.write_str(":=")?;
                escape_into(value, f)?;
                f.write_str(")")
            }
        }
    }
}

/// Evaluates `filter` against `entry`, resolving matching rules for each
/// attribute through `schema`.
pub fn evaluate(
    filter: &Filter,
    entry: &dyn AttributeProvider,
    schema: &SubschemaSubentry,
) -> Ternary {
    match filter {
        Filter::And(filters) => filters
            .iter()
            .fold(Ternary::True, |accumulator, filter| {
                accumulator.and(evaluate(filter, entry, schema))
            }),
        Filter::Or(filters) => filters
            .iter()
            .fold(Ternary::False, |accumulator, filter| {
                accumulator.or(evaluate(filter, entry, schema))
            }),
        Filter::Not(filter) => evaluate(filter, entry, schema).not(),
        Filter::Present { attribute } => entry.is_present(attribute).into(),
        Filter::Equality(comparison) => {
            let Some(rule) = schema.effective_equality(&comparison.attribute) else {
                return Ternary::Undefined;
            };
            any_value(entry, &comparison.attribute, |value| {
                matching::equality(&rule, value, &comparison.value).unwrap_or(Ternary::Undefined)
            })
        }
        Filter::Approx(comparison) => {
            // With no algorithm-specific approximation registered,
            // approximate match degrades to caseIgnoreMatch.
            let rule = schema
                .effective_equality(&comparison.attribute)
                .unwrap_or_else(|| "caseIgnoreMatch".to_owned());
            any_value(entry, &comparison.attribute, |value| {
                matching::equality(&rule, value, &comparison.value).unwrap_or(Ternary::Undefined)
            })
        }
        Filter::GreaterOrEqual(comparison) => ordered(
            entry,
            schema,
            comparison,
            OrderingOperator::GreaterOrEqual,
        ),
        Filter::LessOrEqual(comparison) => {
            ordered(entry, schema, comparison, OrderingOperator::LessOrEqual)
        }
        Filter::Substrings {
            attribute,
            assertion,
        } => {
            let Some(rule) = schema.effective_substr(attribute) else {
                return Ternary::Undefined;
            };
            any_value(entry, attribute, |value| {
                matching::substrings(&rule, value, assertion).unwrap_or(Ternary::Undefined)
            })
        }
        Filter::Extensible {
            matching_rule,
            attribute,
            value,
            dn_attributes,
        } => extensible(
            entry,
            schema,
            matching_rule.as_deref(),
            attribute.as_deref(),
            value,
            *dn_attributes,
        ),
    }
}

fn any_value(
    entry: &dyn AttributeProvider,
    attribute: &str,
    mut test: impl FnMut(&[u8]) -> Ternary,
) -> Ternary {
    let mut result = Ternary::False;
    for value in entry.values(attribute) {
        result = result.or(test(&value));
        if result.is_true() {
            return result;
        }
    }
    result
}

fn ordered(
    entry: &dyn AttributeProvider,
    schema: &SubschemaSubentry,
    comparison: &Comparison,
    operator: OrderingOperator,
) -> Ternary {
    let Some(rule) = schema.effective_ordering(&comparison.attribute) else {
        return Ternary::Undefined;
    };
    any_value(entry, &comparison.attribute, |value| {
        matching::ordering(&rule, value, &comparison.value, operator)
            .unwrap_or(Ternary::Undefined)
    })
}

fn extensible(
    entry: &dyn AttributeProvider,
    schema: &SubschemaSubentry,
    matching_rule: Option<&str>,
    attribute: Option<&str>,
    assertion: &[u8],
    dn_attributes: bool,
) -> Ternary {
    let resolve_rule = |attribute: &str| -> Option<String> {
        match matching_rule {
            Some(rule) => Some(rule.to_owned()),
            None => schema.effective_equality(attribute),
        }
    };

    let candidates: Vec<String> = match attribute {
        Some(attribute) => vec![attribute.to_owned()],
        None => entry.attributes(),
    };

    let mut result = Ternary::False;
    for candidate in &candidates {
        let Some(rule) = resolve_rule(candidate) else {
            result = result.or(Ternary::Undefined);
            continue;
        };
        result = result.or(any_value(entry, candidate, |value| {
            matching::equality(&rule, value, assertion).unwrap_or(Ternary::Undefined)
        }));
        if result.is_true() {
            return result;
        }
    }

    if dn_attributes {
        if let Some(name) = entry.distinguished_name() {
            for ava in name.avas() {
                let ava_type = ava.attribute.to_string();
                let applicable = attribute
                    .map(|wanted| wanted.eq_ignore_ascii_case(&ava_type))
                    .unwrap_or(true);
                if !applicable {
                    continue;
                }
                if let crate::syntax::AvaValue::Text(text) = &ava.value {
                    let Some(rule) = resolve_rule(&ava_type) else {
                        result = result.or(Ternary::Undefined);
                        continue;
                    };
                    result = result.or(matching::equality(&rule, text.as_bytes(), assertion)
                        .unwrap_or(Ternary::Undefined));
                    if result.is_true() {
                        return result;
                    }
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seed_filter_round_trips() {
        let text = "(&(cn=foo*)(|(sn=bar)(!(uid=baz))))";
        let filter = parse(text).unwrap();
        assert_eq!(filter.to_string(), text);
    }

    #[test]
    fn item_shapes() {
        assert!(matches!(parse("(cn=*)").unwrap(), Filter::Present { .. }));
        assert!(matches!(parse("(cn=a*b)").unwrap(), Filter::Substrings { .. }));
        assert!(matches!(parse("(age>=21)").unwrap(), Filter::GreaterOrEqual(_)));
        assert!(matches!(parse("(age<=65)").unwrap(), Filter::LessOrEqual(_)));
        assert!(matches!(parse("(cn~=jane)").unwrap(), Filter::Approx(_)));
    }

    #[test]
    fn extensible_forms() {
        let filter = parse("(cn:caseExactMatch:=Jane)").unwrap();
        match &filter {
            Filter::Extensible {
                matching_rule,
                attribute,
                dn_attributes,
                ..
            } => {
                assert_eq!(matching_rule.as_deref(), Some("caseExactMatch"));
                assert_eq!(attribute.as_deref(), Some("cn"));
                assert!(!dn_attributes);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(filter.to_string(), "(cn:caseExactMatch:=Jane)");

        let filter = parse("(ou:dn:=People)").unwrap();
        assert_eq!(filter.to_string(), "(ou:dn:=People)");

        assert!(parse("(:=x)").is_err());
    }

    #[test]
    fn escapes_decode_to_bytes() {
        let filter = parse(r"(cn=left\28right\29)").unwrap();
        match &filter {
            Filter::Equality(comparison) => {
                assert_eq!(comparison.value, b"left(right)");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(filter.to_string(), r"(cn=left\28right\29)");
    }

    #[test]
    fn malformed_filters() {
        for rejected in [
            "cn=x",
            "(cn=x",
            "(&)",
            "(cn=x))",
            "(>=5)",
            "(cn>5)",
            r"(cn=\2x)",
        ] {
            assert!(parse(rejected).is_err(), "{rejected:?} should fail");
        }
    }
}
