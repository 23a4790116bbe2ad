//! RFC 3672 subtree specifications.

use super::dn::DistinguishedName;
use super::oid::Oid;
use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

const SYNTAX: &str = "Subtree Specification";

/// A chop point relative to the subtree base.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum SpecificExclusion {
    ChopBefore(DistinguishedName),
    ChopAfter(DistinguishedName),
}

/// The refinement alternatives of a specification filter.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Refinement {
    Item(Oid),
    And(Vec<Refinement>),
    Or(Vec<Refinement>),
    Not(Box<Refinement>),
}

impl Refinement {
    /// Whether an entry bearing `object_classes` satisfies the refinement.
    pub fn matches(&self, object_classes: &[&str]) -> bool {
        match self {
            Refinement::Item(oid) => {
                let identifier = oid.to_string();
                object_classes
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(&identifier))
            }
            Refinement::And(refinements) => refinements
                .iter()
                .all(|refinement| refinement.matches(object_classes)),
            Refinement::Or(refinements) => refinements
                .iter()
                .any(|refinement| refinement.matches(object_classes)),
            Refinement::Not(refinement) => !refinement.matches(object_classes),
        }
    }
}

/// A subtree specification: base, chop arguments, and an optional
/// refinement over object classes.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub struct SubtreeSpecification {
    pub base: Option<DistinguishedName>,
    pub specific_exclusions: Vec<SpecificExclusion>,
    pub minimum: Option<u32>,
    pub maximum: Option<u32>,
    pub specification_filter: Option<Refinement>,
}

impl SubtreeSpecification {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        let mut parser = SubtreeParser::new(text);
        parser.expect('{')?;

        let mut specification = SubtreeSpecification::default();
        loop {
            parser.skip_ws();
            if parser.peek() == Some(b'}') {
                parser.position += 1;
                break;
            }
            let keyword = parser.bareword();
            match keyword {
                "base" => specification.base = Some(parser.quoted_dn()?),
                "minimum" => specification.minimum = Some(parser.integer()?),
                "maximum" => specification.maximum = Some(parser.integer()?),
                "specificExclusions" => {
                    specification.specific_exclusions = parser.exclusions()?;
                }
                "specificationFilter" => {
                    specification.specification_filter = Some(parser.refinement()?);
                }
                other => {
                    return Err(SyntaxError::bad(
                        SYNTAX,
                        format!("unrecognized keyword '{other}'"),
                    ));
                }
            }
            parser.skip_ws();
            if parser.peek() == Some(b',') {
                parser.position += 1;
            }
        }
        parser.skip_ws();
        if !parser.at_end() {
            return Err(SyntaxError::bad(SYNTAX, "trailing characters"));
        }
        Ok(specification)
    }
}

struct SubtreeParser<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SubtreeParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            position: 0,
        }
    }

    fn skip_ws(&mut self) {
        while matches!(
            self.bytes.get(self.position),
            Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')
        ) {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn expect(&mut self, expected: char) -> SyntaxResult<()> {
        self.skip_ws();
        if self.peek() == Some(expected as u8) {
            self.position += 1;
            Ok(())
        } else {
            Err(SyntaxError::bad(SYNTAX, format!("expected '{expected}'")))
        }
    }

    fn bareword(&mut self) -> &'a str {
        self.skip_ws();
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'-' {
                self.position += 1;
            } else {
                break;
            }
        }
        core::str::from_utf8(&self.bytes[start..self.position]).unwrap_or("")
    }

    fn quoted_dn(&mut self) -> SyntaxResult<DistinguishedName> {
        self.expect('"')?;
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte == b'"' {
                break;
            }
            self.position += 1;
        }
        if self.peek() != Some(b'"') {
            return Err(SyntaxError::bad(SYNTAX, "unterminated quoted name"));
        }
        let raw = core::str::from_utf8(&self.bytes[start..self.position])
            .map_err(|_| SyntaxError::bad(SYNTAX, "quoted name is not UTF-8"))?;
        self.position += 1;
        DistinguishedName::parse(raw)
    }

    fn integer(&mut self) -> SyntaxResult<u32> {
        let word = self.bareword();
        word.parse::<u32>()
            .map_err(|_| SyntaxError::bad(SYNTAX, format!("bad base distance '{word}'")))
    }

    fn exclusions(&mut self) -> SyntaxResult<Vec<SpecificExclusion>> {
        self.expect('{')?;
        let mut exclusions = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b'}') {
                self.position += 1;
                break;
            }
            let keyword = self.bareword();
            self.expect(':')?;
            let name = self.quoted_dn()?;
            match keyword {
                "chopBefore" => exclusions.push(SpecificExclusion::ChopBefore(name)),
                "chopAfter" => exclusions.push(SpecificExclusion::ChopAfter(name)),
                other => {
                    return Err(SyntaxError::bad(
                        SYNTAX,
                        format!("unknown exclusion '{other}'"),
                    ));
                }
            }
            self.skip_ws();
            if self.peek() == Some(b',') {
                self.position += 1;
            }
        }
        Ok(exclusions)
    }

    fn refinement(&mut self) -> SyntaxResult<Refinement> {
        let keyword = self.bareword();
        match keyword {
            "item" => {
                self.expect(':')?;
                let word = self.bareword();
                Oid::parse(word)
                    .map(Refinement::Item)
                    .map_err(|_| SyntaxError::bad(SYNTAX, "bad item identifier"))
            }
            "and" | "or" => {
                self.expect(':')?;
                self.expect('{')?;
                let mut refinements = Vec::new();
                loop {
                    self.skip_ws();
                    if self.peek() == Some(b'}') {
                        self.position += 1;
                        break;
                    }
                    refinements.push(self.refinement()?);
                    self.skip_ws();
                    if self.peek() == Some(b',') {
                        self.position += 1;
                    }
                }
                if keyword == "and" {
                    Ok(Refinement::And(refinements))
                } else {
                    Ok(Refinement::Or(refinements))
                }
            }
            "not" => {
                self.expect(':')?;
                Ok(Refinement::Not(Box::new(self.refinement()?)))
            }
            other => Err(SyntaxError::bad(
                SYNTAX,
                format!("unknown refinement '{other}'"),
            )),
        }
    }
}

impl core::fmt::Display for Refinement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Refinement::Item(oid) => write!(f, "item:{oid}"),
            Refinement::And(refinements) | Refinement::Or(refinements) => {
                f.write_str(if matches!(self, Refinement::And(_)) {
                    "and:{"
                } else {
                    "or:{"
                })?;
                for (index, refinement) in refinements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    refinement.fmt(f)?;
                }
                f.write_str("}")
            }
            Refinement::Not(refinement) => write!(f, "not:{refinement}"),
        }
    }
}

impl core::fmt::Display for SpecificExclusion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SpecificExclusion::ChopBefore(name) => write!(f, "chopBefore:\"{name}\""),
            SpecificExclusion::ChopAfter(name) => write!(f, "chopAfter:\"{name}\""),
        }
    }
}

impl core::fmt::Display for SubtreeSpecification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        let mut wrote_field = false;
        let mut separator = |f: &mut core::fmt::Formatter<'_>, wrote: &mut bool| {
            let result = if *wrote { f.write_str(", ") } else { f.write_str(" ") };
            *wrote = true;
            result
        };
        if let Some(base) = &self.base {
            separator(f, &mut wrote_field)?;
            write!(f, "base \"{base}\"")?;
        }
        if !self.specific_exclusions.is_empty() {
            separator(f, &mut wrote_field)?;
            f.write_str("specificExclusions {")?;
            for (index, exclusion) in self.specific_exclusions.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                exclusion.fmt(f)?;
            }
            f.write_str("}")?;
        }
        if let Some(minimum) = self.minimum {
            separator(f, &mut wrote_field)?;
            write!(f, "minimum {minimum}")?;
        }
        if let Some(maximum) = self.maximum {
            separator(f, &mut wrote_field)?;
            write!(f, "maximum {maximum}")?;
        }
        if let Some(filter) = &self.specification_filter {
            separator(f, &mut wrote_field)?;
            write!(f, "specificationFilter {filter}")?;
        }
        if wrote_field {
            f.write_str(" ")?;
        }
        f.write_str("}")
    }
}

impl TryFrom<&'_ str> for SubtreeSpecification {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

pub(super) fn check(input: Input<'_>) -> SyntaxResult<Value> {
    SubtreeSpecification::parse(input.text(SYNTAX)?).map(Value::SubtreeSpecification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_specification_is_whole_subtree() {
        let spec = SubtreeSpecification::parse("{}").unwrap();
        assert_eq!(spec, SubtreeSpecification::default());
        assert_eq!(spec.to_string(), "{}");
    }

    #[test]
    fn full_specification_round_trips() {
        let text = "{ base \"ou=People\", specificExclusions {chopBefore:\"cn=x\", chopAfter:\"cn=y\"}, minimum 1, maximum 3, specificationFilter item:person }";
        let spec = SubtreeSpecification::parse(text).unwrap();
        assert_eq!(spec.minimum, Some(1));
        assert_eq!(spec.maximum, Some(3));
        assert_eq!(spec.specific_exclusions.len(), 2);
        assert_eq!(spec.to_string(), text);
    }

    #[test]
    fn nested_refinements() {
        let spec = SubtreeSpecification::parse(
            "{ specificationFilter and:{item:2.5.6.6, not:item:2.5.6.7, or:{item:person}} }",
        )
        .unwrap();
        let filter = spec.specification_filter.unwrap();
        assert!(filter.matches(&["2.5.6.6", "person"]));
        assert!(!filter.matches(&["2.5.6.6", "2.5.6.7"]));
    }

    #[test]
    fn unknown_keyword_rejected() {
        assert!(SubtreeSpecification::parse("{ radius 4 }").is_err());
        assert!(SubtreeSpecification::parse("{ minimum }").is_err());
        assert!(SubtreeSpecification::parse("{").is_err());
        assert!(SubtreeSpecification::parse("{} tail").is_err());
    }
}
