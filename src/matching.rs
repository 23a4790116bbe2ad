//! # The matching-rule engine
//!
//! A table of well-known matching rules keyed by numeric OID, each holding
//! one assertion function of its kind. Dispatch checks the rule's derived
//! kind: asking an equality rule for an ordering decision is a caller
//! error, not an UNDEFINED result.

mod rules;

pub use rules::{MatchingRuleDef, all as all_rules};

use crate::error::{SchemaError, SyntaxResult};
use crate::syntax::SubstringAssertion;

/// The RFC 4511 three-valued match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ternary {
    True,
    False,
    Undefined,
}

impl Ternary {
    pub fn and(self, other: Ternary) -> Ternary {
        match (self, other) {
            (Ternary::False, _) | (_, Ternary::False) => Ternary::False,
            (Ternary::True, Ternary::True) => Ternary::True,
            _ => Ternary::Undefined,
        }
    }

    pub fn or(self, other: Ternary) -> Ternary {
        match (self, other) {
            (Ternary::True, _) | (_, Ternary::True) => Ternary::True,
            (Ternary::False, Ternary::False) => Ternary::False,
            _ => Ternary::Undefined,
        }
    }

    pub fn not(self) -> Ternary {
        match self {
            Ternary::True => Ternary::False,
            Ternary::False => Ternary::True,
            Ternary::Undefined => Ternary::Undefined,
        }
    }

    pub fn is_true(self) -> bool {
        self == Ternary::True
    }
}

impl From<bool> for Ternary {
    fn from(value: bool) -> Self {
        if value { Ternary::True } else { Ternary::False }
    }
}

/// The three assertion kinds, derived from the rule's primary name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Equality,
    Ordering,
    Substrings,
}

impl RuleKind {
    /// `…OrderingMatch` and `…SubstringsMatch` win over the bare `…Match`
    /// suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with("OrderingMatch") {
            Some(RuleKind::Ordering)
        } else if name.ends_with("SubstringsMatch") {
            Some(RuleKind::Substrings)
        } else if name.ends_with("Match") {
            Some(RuleKind::Equality)
        } else {
            None
        }
    }
}

/// The two operators an ordering assertion can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingOperator {
    GreaterOrEqual,
    LessOrEqual,
}

pub(crate) enum Assertion {
    Equality(fn(&[u8], &[u8]) -> SyntaxResult<bool>),
    Ordering(fn(&[u8], &[u8], OrderingOperator) -> SyntaxResult<bool>),
    Substrings(fn(&[u8], &SubstringAssertion) -> SyntaxResult<bool>),
}

/// Finds a rule by numeric OID or by any of its names, case-insensitively.
pub fn find(identifier: &str) -> Option<&'static MatchingRuleDef> {
    rules::all().iter().find(|rule| {
        rule.oid == identifier
            || rule
                .names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(identifier))
    })
}

/// Evaluates an equality rule. Unknown rules and undecodable values yield
/// `Undefined`; calling a non-equality rule is a `ConsistencyViolation`.
pub fn equality(
    identifier: &str,
    actual: &[u8],
    assertion: &[u8],
) -> Result<Ternary, SchemaError> {
    let Some(rule) = find(identifier) else {
        return Ok(Ternary::Undefined);
    };
    match &rule.assertion {
        Assertion::Equality(function) => Ok(function(actual, assertion)
            .map(Ternary::from)
            .unwrap_or(Ternary::Undefined)),
        _ => Err(SchemaError::ConsistencyViolation {
            detail: format!("'{}' is not an equality rule", rule.primary_name()),
        }),
    }
}

/// Evaluates an ordering rule with the given operator.
pub fn ordering(
    identifier: &str,
    actual: &[u8],
    assertion: &[u8],
    operator: OrderingOperator,
) -> Result<Ternary, SchemaError> {
    let Some(rule) = find(identifier) else {
        return Ok(Ternary::Undefined);
    };
    match &rule.assertion {
        Assertion::Ordering(function) => Ok(function(actual, assertion, operator)
            .map(Ternary::from)
            .unwrap_or(Ternary::Undefined)),
        _ => Err(SchemaError::ConsistencyViolation {
            detail: format!("'{}' is not an ordering rule", rule.primary_name()),
        }),
    }
}

/// Evaluates a substrings rule against a parsed assertion pattern.
pub fn substrings(
    identifier: &str,
    actual: &[u8],
    assertion: &SubstringAssertion,
) -> Result<Ternary, SchemaError> {
    let Some(rule) = find(identifier) else {
        return Ok(Ternary::Undefined);
    };
    match &rule.assertion {
        Assertion::Substrings(function) => Ok(function(actual, assertion)
            .map(Ternary::from)
            .unwrap_or(Ternary::Undefined)),
        _ => Err(SchemaError::ConsistencyViolation {
            detail: format!("'{}' is not a substrings rule", rule.primary_name()),
        }),
    }
}

/// Lower-cases and collapses internal whitespace, the preparation applied
/// by the caseIgnore equality and ordering rules.
pub fn normalize_case_ignore(text: &str) -> String {
    crate::chars::collapse_whitespace(&text.to_lowercase())
}

/// Collapses whitespace without folding case (caseExact preparation).
pub(crate) fn normalize_case_exact(text: &str) -> String {
    crate::chars::collapse_whitespace(text)
}

/// Substring comparison discards insignificant spaces entirely.
pub(crate) fn strip_whitespace(text: &str) -> String {
    text.chars()
        .filter(|ch| !crate::chars::is_ldap_space(*ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ternary_connectives() {
        use Ternary::*;
        assert_eq!(True.and(Undefined), Undefined);
        assert_eq!(False.and(Undefined), False);
        assert_eq!(True.or(Undefined), True);
        assert_eq!(False.or(Undefined), Undefined);
        assert_eq!(Undefined.not(), Undefined);
    }

    #[test]
    fn kind_is_derived_from_suffix() {
        assert_eq!(RuleKind::from_name("caseIgnoreMatch"), Some(RuleKind::Equality));
        assert_eq!(
            RuleKind::from_name("caseIgnoreOrderingMatch"),
            Some(RuleKind::Ordering)
        );
        assert_eq!(
            RuleKind::from_name("caseIgnoreSubstringsMatch"),
            Some(RuleKind::Substrings)
        );
        assert_eq!(RuleKind::from_name("somethingElse"), None);
    }

    #[test]
    fn lookup_by_oid_or_name() {
        assert!(find("2.5.13.2").is_some());
        assert!(find("caseignorematch").is_some());
        assert!(find("no-such-rule").is_none());
    }

    #[test]
    fn unknown_rule_is_undefined() {
        assert_eq!(
            equality("1.2.3.4", b"a", b"a").unwrap(),
            Ternary::Undefined
        );
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        assert!(matches!(
            ordering("caseIgnoreMatch", b"a", b"b", OrderingOperator::LessOrEqual),
            Err(SchemaError::ConsistencyViolation { .. })
        ));
        assert!(matches!(
            equality("caseIgnoreOrderingMatch", b"a", b"b"),
            Err(SchemaError::ConsistencyViolation { .. })
        ));
    }

    #[test]
    fn equality_is_symmetric_and_reflexive() {
        for (left, right) in [("Foo Bar", "foo   bar"), ("a", "b"), ("x", "x")] {
            let forward = equality("caseIgnoreMatch", left.as_bytes(), right.as_bytes()).unwrap();
            let backward = equality("caseIgnoreMatch", right.as_bytes(), left.as_bytes()).unwrap();
            assert_eq!(forward, backward);
        }
        assert_eq!(
            equality("caseIgnoreMatch", b"same", b"same").unwrap(),
            Ternary::True
        );
    }
}
