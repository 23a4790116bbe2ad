//! Guide and Enhanced Guide, with the `criteria` sub-grammar of RFC 4517
//! §3.3.10 / §3.3.14.
//!
//! ```text
//! criteria   = and-term *( "|" and-term )
//! and-term   = term *( "&" term )
//! term       = "!" term / attributeType "$" match-type /
//!              "(" criteria ")" / "?true" / "?false"
//! match-type = "EQ" / "SUBSTR" / "GE" / "LE" / "APPROX"
//! ```
//!
//! Parenthesized groups are kept as their own node so the canonical
//! rendering reproduces the input's bracketing.

use super::oid::Oid;
use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

const SYNTAX: &str = "Guide";

/// The five assertion kinds a criteria term may name.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MatchType {
    Equality,
    Substr,
    Ge,
    Le,
    Approx,
}

impl MatchType {
    const TABLE: &'static [(&'static str, MatchType)] = &[
        ("EQ", MatchType::Equality),
        ("SUBSTR", MatchType::Substr),
        ("GE", MatchType::Ge),
        ("LE", MatchType::Le),
        ("APPROX", MatchType::Approx),
    ];

    pub fn as_str(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, match_type)| *match_type == self)
            .map(|(name, _)| *name)
            .unwrap_or("EQ")
    }
}

/// One criteria term.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Term {
    Not(Box<Term>),
    AttributeMatch(Oid, MatchType),
    Bool(bool),
    Group(Box<Criteria>),
}

/// A `&`-joined run of terms.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct AndTerm(pub Vec<Term>);

/// A `|`-joined run of and-terms.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Criteria(pub Vec<AndTerm>);

impl Criteria {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        let mut parser = CriteriaParser::new(text);
        let criteria = parser.criteria()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(SyntaxError::bad(SYNTAX, "trailing characters after criteria"));
        }
        Ok(criteria)
    }

    /// Whether the whole criteria is one parenthesized group, in which
    /// case an outer canonicalizer must not add another pair.
    fn is_group(&self) -> bool {
        matches!(
            self.0.as_slice(),
            [AndTerm(terms)] if matches!(terms.as_slice(), [Term::Group(_)])
        )
    }
}

struct CriteriaParser<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> CriteriaParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            position: 0,
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.bytes.get(self.position), Some(b' ') | Some(b'\t')) {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn criteria(&mut self) -> SyntaxResult<Criteria> {
        let mut and_terms = vec![self.and_term()?];
        loop {
            self.skip_ws();
            if self.peek() == Some(b'|') {
                self.position += 1;
                and_terms.push(self.and_term()?);
            } else {
                break;
            }
        }
        Ok(Criteria(and_terms))
    }

    fn and_term(&mut self) -> SyntaxResult<AndTerm> {
        let mut terms = vec![self.term()?];
        loop {
            self.skip_ws();
            if self.peek() == Some(b'&') {
                self.position += 1;
                terms.push(self.term()?);
            } else {
                break;
            }
        }
        Ok(AndTerm(terms))
    }

    fn term(&mut self) -> SyntaxResult<Term> {
        self.skip_ws();
        match self.peek() {
            Some(b'!') => {
                self.position += 1;
                Ok(Term::Not(Box::new(self.term()?)))
            }
            Some(b'(') => {
                self.position += 1;
                let inner = self.criteria()?;
                self.skip_ws();
                if self.peek() != Some(b')') {
                    return Err(SyntaxError::bad(SYNTAX, "unbalanced parenthesis"));
                }
                self.position += 1;
                Ok(Term::Group(Box::new(inner)))
            }
            Some(b'?') => {
                self.position += 1;
                let word = self.bareword();
                match word {
                    "true" => Ok(Term::Bool(true)),
                    "false" => Ok(Term::Bool(false)),
                    other => Err(SyntaxError::bad(
                        SYNTAX,
                        format!("expected ?true or ?false, found ?{other}"),
                    )),
                }
            }
            Some(_) => {
                let attribute = self.bareword();
                if attribute.is_empty() {
                    return Err(SyntaxError::bad(SYNTAX, "expected a term"));
                }
                let attribute = Oid::parse(attribute)
                    .map_err(|_| SyntaxError::bad(SYNTAX, "bad attribute type in term"))?;
                self.skip_ws();
                if self.peek() != Some(b'$') {
                    return Err(SyntaxError::bad(SYNTAX, "expected '$' after attribute type"));
                }
                self.position += 1;
                self.skip_ws();
                let word = self.bareword();
                let match_type = MatchType::TABLE
                    .iter()
                    .find(|(name, _)| *name == word)
                    .map(|(_, match_type)| *match_type)
                    .ok_or_else(|| {
                        SyntaxError::bad(SYNTAX, format!("unknown match type '{word}'"))
                    })?;
                Ok(Term::AttributeMatch(attribute, match_type))
            }
            None => Err(SyntaxError::bad(SYNTAX, "unexpected end of criteria")),
        }
    }

    fn bareword(&mut self) -> &'a str {
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
                self.position += 1;
            } else {
                break;
            }
        }
        // `bytes` came from a `&str` and the loop only crosses ASCII.
        core::str::from_utf8(&self.bytes[start..self.position]).unwrap_or("")
    }
}

impl core::fmt::Display for Term {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Term::Not(term) => write!(f, "!{term}"),
            Term::AttributeMatch(attribute, match_type) => {
                write!(f, "{attribute}${}", match_type.as_str())
            }
            Term::Bool(true) => f.write_str("?true"),
            Term::Bool(false) => f.write_str("?false"),
            Term::Group(criteria) => write!(f, "({criteria})"),
        }
    }
}

impl core::fmt::Display for AndTerm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, term) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            term.fmt(f)?;
        }
        Ok(())
    }
}

impl core::fmt::Display for Criteria {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, and_term) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("|")?;
            }
            and_term.fmt(f)?;
        }
        Ok(())
    }
}

/// The search scope named by the Enhanced Guide subset component.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Subset {
    BaseObject = 0,
    OneLevel = 1,
    WholeSubtree = 2,
}

impl Subset {
    pub fn parse(token: &str) -> SyntaxResult<Self> {
        match token {
            "baseObject" => Ok(Subset::BaseObject),
            "oneLevel" => Ok(Subset::OneLevel),
            "wholeSubtree" => Ok(Subset::WholeSubtree),
            other => Err(SyntaxError::bad(
                "Enhanced Guide",
                format!("unknown subset '{other}'"),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Subset::BaseObject => "baseObject",
            Subset::OneLevel => "oneLevel",
            Subset::WholeSubtree => "wholeSubtree",
        }
    }
}

/// `object-class SHARP criteria SHARP subset`.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct EnhancedGuide {
    pub object_class: Oid,
    pub criteria: Criteria,
    pub subset: Subset,
}

impl EnhancedGuide {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const LABEL: &str = "Enhanced Guide";
        let fields: Vec<&str> = text.split('#').collect();
        let [object_class, criteria, subset] = fields.as_slice() else {
            return Err(SyntaxError::bad(
                LABEL,
                "expected object-class#criteria#subset",
            ));
        };
        Ok(Self {
            object_class: Oid::parse(object_class.trim())
                .map_err(|_| SyntaxError::bad(LABEL, "bad object class component"))?,
            criteria: Criteria::parse(criteria.trim())?,
            subset: Subset::parse(subset.trim())?,
        })
    }
}

impl core::fmt::Display for EnhancedGuide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}#", self.object_class)?;
        if self.criteria.is_group() {
            write!(f, "{}", self.criteria)?;
        } else {
            write!(f, "({})", self.criteria)?;
        }
        write!(f, "#{}", self.subset.as_str())
    }
}

impl TryFrom<&'_ str> for EnhancedGuide {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// The deprecated Guide form: criteria with an optional object-class
/// prefix.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Guide {
    pub object_class: Option<Oid>,
    pub criteria: Criteria,
}

impl Guide {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        match text.split_once('#') {
            Some((prefix, rest)) => {
                let object_class = Oid::parse(prefix.trim())
                    .map_err(|_| SyntaxError::bad(SYNTAX, "bad object class component"))?;
                Ok(Self {
                    object_class: Some(object_class),
                    criteria: Criteria::parse(rest.trim())?,
                })
            }
            None => Ok(Self {
                object_class: None,
                criteria: Criteria::parse(text.trim())?,
            }),
        }
    }
}

impl core::fmt::Display for Guide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(object_class) = &self.object_class {
            write!(f, "{object_class}#")?;
        }
        write!(f, "{}", self.criteria)
    }
}

pub(super) fn check_enhanced(input: Input<'_>) -> SyntaxResult<Value> {
    EnhancedGuide::parse(input.text("Enhanced Guide")?).map(Value::EnhancedGuide)
}

pub(super) fn check_guide(input: Input<'_>) -> SyntaxResult<Value> {
    Guide::parse(input.text(SYNTAX)?).map(Value::Guide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enhanced_guide_canonicalizes() {
        let guide = EnhancedGuide::parse("2.5.6.7 # cn$EQ # oneLevel").unwrap();
        assert_eq!(guide.subset, Subset::OneLevel);
        assert_eq!(guide.subset as i32, 1);
        assert_eq!(guide.to_string(), "2.5.6.7#(cn$EQ)#oneLevel");
    }

    #[test]
    fn parenthesized_criteria_is_not_double_wrapped() {
        let guide = EnhancedGuide::parse("person#(sn$EQ|cn$SUBSTR)#wholeSubtree").unwrap();
        assert_eq!(guide.to_string(), "person#(sn$EQ|cn$SUBSTR)#wholeSubtree");
    }

    #[test]
    fn criteria_precedence_and_negation() {
        let criteria = Criteria::parse("!a$EQ&b$GE|?false").unwrap();
        assert_eq!(criteria.0.len(), 2);
        assert_eq!(criteria.0[0].0.len(), 2);
        assert_eq!(criteria.to_string(), "!a$EQ&b$GE|?false");

        let grouped = Criteria::parse("(a$EQ|b$LE)&!(c$APPROX)").unwrap();
        assert_eq!(grouped.to_string(), "(a$EQ|b$LE)&!(c$APPROX)");
    }

    #[test]
    fn malformed_criteria() {
        for rejected in ["cn$", "cn$XX", "cn EQ", "(cn$EQ", "cn$EQ)", "?maybe", "", "&cn$EQ"] {
            assert!(Criteria::parse(rejected).is_err(), "{rejected:?} should fail");
        }
    }

    #[test]
    fn deprecated_guide_prefix_is_optional() {
        let with_prefix = Guide::parse("2.5.6.7#sn$SUBSTR").unwrap();
        assert!(with_prefix.object_class.is_some());
        assert_eq!(with_prefix.to_string(), "2.5.6.7#sn$SUBSTR");

        let bare = Guide::parse("sn$SUBSTR&cn$EQ").unwrap();
        assert!(bare.object_class.is_none());
    }

    #[test]
    fn enhanced_guide_component_count() {
        assert!(EnhancedGuide::parse("2.5.6.7#cn$EQ").is_err());
        assert!(EnhancedGuide::parse("2.5.6.7#cn$EQ#oneLevel#extra").is_err());
        assert!(EnhancedGuide::parse("2.5.6.7#cn$EQ#twoLevel").is_err());
    }
}
