//! The well-known rule table: RFC 4517 §4.2, the IA5 rules of RFC 2252,
//! and the RFC 4530 UUID rules.

use once_cell::sync::Lazy;

use super::{normalize_case_exact, normalize_case_ignore, strip_whitespace};
use super::{Assertion, OrderingOperator, RuleKind};
use crate::error::{SyntaxError, SyntaxResult};
use crate::syntax::{self, oids, SubstringAssertion};

/// One registered matching rule: identity, referenced syntax, derived
/// kind, and its assertion function.
pub struct MatchingRuleDef {
    pub oid: &'static str,
    pub names: &'static [&'static str],
    pub syntax: &'static str,
    pub kind: RuleKind,
    pub(crate) assertion: Assertion,
}

impl MatchingRuleDef {
    pub fn primary_name(&self) -> &'static str {
        self.names.first().copied().unwrap_or(self.oid)
    }
}

fn text<'a>(input: &'a [u8], rule: &'static str) -> SyntaxResult<&'a str> {
    core::str::from_utf8(input)
        .map_err(|_| SyntaxError::bad(rule, "assertion subject is not UTF-8"))
}

fn case_ignore_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(normalize_case_ignore(text(actual, "caseIgnoreMatch")?)
        == normalize_case_ignore(text(assertion, "caseIgnoreMatch")?))
}

fn case_ignore_cmp(
    actual: &[u8],
    assertion: &[u8],
    operator: OrderingOperator,
) -> SyntaxResult<bool> {
    let actual = normalize_case_ignore(text(actual, "caseIgnoreOrderingMatch")?);
    let assertion = normalize_case_ignore(text(assertion, "caseIgnoreOrderingMatch")?);
    Ok(apply(operator, actual.cmp(&assertion)))
}

fn case_ignore_substr(actual: &[u8], assertion: &SubstringAssertion) -> SyntaxResult<bool> {
    let subject = strip_whitespace(&text(actual, "caseIgnoreSubstringsMatch")?.to_lowercase());
    let pattern = assertion.map(|component| strip_whitespace(&component.to_lowercase()));
    Ok(pattern.matches(&subject))
}

fn case_exact_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(normalize_case_exact(text(actual, "caseExactMatch")?)
        == normalize_case_exact(text(assertion, "caseExactMatch")?))
}

fn case_exact_cmp(
    actual: &[u8],
    assertion: &[u8],
    operator: OrderingOperator,
) -> SyntaxResult<bool> {
    let actual = normalize_case_exact(text(actual, "caseExactOrderingMatch")?);
    let assertion = normalize_case_exact(text(assertion, "caseExactOrderingMatch")?);
    Ok(apply(operator, actual.cmp(&assertion)))
}

fn case_exact_substr(actual: &[u8], assertion: &SubstringAssertion) -> SyntaxResult<bool> {
    let subject = strip_whitespace(text(actual, "caseExactSubstringsMatch")?);
    let pattern = assertion.map(|component| strip_whitespace(component));
    Ok(pattern.matches(&subject))
}

fn apply(operator: OrderingOperator, ordering: core::cmp::Ordering) -> bool {
    match operator {
        OrderingOperator::GreaterOrEqual => ordering.is_ge(),
        OrderingOperator::LessOrEqual => ordering.is_le(),
    }
}

fn object_identifier_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let actual = syntax::Oid::parse(text(actual, "objectIdentifierMatch")?.trim())?;
    let assertion = syntax::Oid::parse(text(assertion, "objectIdentifierMatch")?.trim())?;
    Ok(match (&actual, &assertion) {
        (syntax::Oid::Numeric(left), syntax::Oid::Numeric(right)) => left == right,
        (syntax::Oid::Descr(left), syntax::Oid::Descr(right)) => {
            left.as_str().eq_ignore_ascii_case(right.as_str())
        }
        // Resolving a descriptor against a numeric OID needs a schema;
        // without one the forms are incomparable.
        _ => false,
    })
}

fn distinguished_name_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let actual = syntax::DistinguishedName::parse(text(actual, "distinguishedNameMatch")?)?;
    let assertion = syntax::DistinguishedName::parse(text(assertion, "distinguishedNameMatch")?)?;
    Ok(actual.matches(&assertion))
}

fn unique_member_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let actual = syntax::NameAndOptionalUid::parse(text(actual, "uniqueMemberMatch")?)?;
    let assertion = syntax::NameAndOptionalUid::parse(text(assertion, "uniqueMemberMatch")?)?;
    if !actual.name.matches(&assertion.name) {
        return Ok(false);
    }
    // An assertion without a uid matches any uid (X.520 §...the uid is a
    // discriminator, not a requirement).
    Ok(match (&actual.uid, &assertion.uid) {
        (_, None) => true,
        (Some(left), Some(right)) => left == right,
        (None, Some(_)) => false,
    })
}

fn boolean_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(syntax::boolean(text(actual, "booleanMatch")?)?
        == syntax::boolean(text(assertion, "booleanMatch")?)?)
}

fn integer_values(actual: &[u8], assertion: &[u8]) -> SyntaxResult<(num_bigint::BigInt, num_bigint::BigInt)> {
    let parse = |input: &[u8]| -> SyntaxResult<num_bigint::BigInt> {
        text(input, "integerMatch")?
            .trim()
            .parse::<num_bigint::BigInt>()
            .map_err(|_| SyntaxError::bad("integerMatch", "not an integer"))
    };
    Ok((parse(actual)?, parse(assertion)?))
}

fn integer_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let (actual, assertion) = integer_values(actual, assertion)?;
    Ok(actual == assertion)
}

fn integer_cmp(
    actual: &[u8],
    assertion: &[u8],
    operator: OrderingOperator,
) -> SyntaxResult<bool> {
    let (actual, assertion) = integer_values(actual, assertion)?;
    Ok(apply(operator, actual.cmp(&assertion)))
}

fn bit_string_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(syntax::BitString::parse(text(actual, "bitStringMatch")?)?
        == syntax::BitString::parse(text(assertion, "bitStringMatch")?)?)
}

fn octet_string_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(actual == assertion)
}

fn octet_string_cmp(
    actual: &[u8],
    assertion: &[u8],
    operator: OrderingOperator,
) -> SyntaxResult<bool> {
    Ok(apply(operator, actual.cmp(assertion)))
}

fn numeric_normalize(input: &[u8], rule: &'static str) -> SyntaxResult<String> {
    Ok(text(input, rule)?.replace(' ', ""))
}

fn numeric_string_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(numeric_normalize(actual, "numericStringMatch")?
        == numeric_normalize(assertion, "numericStringMatch")?)
}

fn numeric_string_cmp(
    actual: &[u8],
    assertion: &[u8],
    operator: OrderingOperator,
) -> SyntaxResult<bool> {
    let actual = numeric_normalize(actual, "numericStringOrderingMatch")?;
    let assertion = numeric_normalize(assertion, "numericStringOrderingMatch")?;
    Ok(apply(operator, actual.cmp(&assertion)))
}

fn numeric_string_substr(actual: &[u8], assertion: &SubstringAssertion) -> SyntaxResult<bool> {
    let subject = numeric_normalize(actual, "numericStringSubstringsMatch")?;
    let pattern = assertion.map(|component| component.replace(' ', ""));
    Ok(pattern.matches(&subject))
}

fn telephone_normalize(input: &[u8]) -> SyntaxResult<String> {
    Ok(text(input, "telephoneNumberMatch")?
        .chars()
        .filter(|ch| *ch != ' ' && *ch != '-')
        .collect())
}

fn telephone_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(telephone_normalize(actual)? == telephone_normalize(assertion)?)
}

fn telephone_substr(actual: &[u8], assertion: &SubstringAssertion) -> SyntaxResult<bool> {
    let subject = telephone_normalize(actual)?;
    let pattern = assertion.map(|component| {
        component
            .chars()
            .filter(|ch| *ch != ' ' && *ch != '-')
            .collect()
    });
    Ok(pattern.matches(&subject))
}

fn list_lines(input: &[u8], rule: &'static str) -> SyntaxResult<Vec<String>> {
    let address = syntax::PostalAddress::parse(text(input, rule)?)
        .map_err(|_| SyntaxError::bad(rule, "subject is not a postal address"))?;
    Ok(address.decoded_lines())
}

fn case_ignore_list_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let actual = list_lines(actual, "caseIgnoreListMatch")?;
    let assertion = list_lines(assertion, "caseIgnoreListMatch")?;
    Ok(actual.len() == assertion.len()
        && actual
            .iter()
            .zip(assertion.iter())
            .all(|(left, right)| normalize_case_ignore(left) == normalize_case_ignore(right)))
}

fn case_ignore_list_substr(actual: &[u8], assertion: &SubstringAssertion) -> SyntaxResult<bool> {
    let lines = list_lines(actual, "caseIgnoreListSubstringsMatch")?;
    let subject = strip_whitespace(&lines.join("$").to_lowercase());
    let pattern = assertion.map(|component| strip_whitespace(&component.to_lowercase()));
    Ok(pattern.matches(&subject))
}

fn generalized_time_values(
    actual: &[u8],
    assertion: &[u8],
) -> SyntaxResult<(syntax::GeneralizedTime, syntax::GeneralizedTime)> {
    Ok((
        syntax::GeneralizedTime::parse(text(actual, "generalizedTimeMatch")?)?,
        syntax::GeneralizedTime::parse(text(assertion, "generalizedTimeMatch")?)?,
    ))
}

fn generalized_time_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let (actual, assertion) = generalized_time_values(actual, assertion)?;
    Ok(actual.stamp() == assertion.stamp())
}

fn generalized_time_cmp(
    actual: &[u8],
    assertion: &[u8],
    operator: OrderingOperator,
) -> SyntaxResult<bool> {
    let (actual, assertion) = generalized_time_values(actual, assertion)?;
    Ok(apply(operator, actual.stamp().cmp(&assertion.stamp())))
}

/// The first component of a parenthesized SEQUENCE rendering, e.g. the
/// numeric OID of a description value.
fn first_component(input: &[u8], rule: &'static str) -> SyntaxResult<String> {
    let text = text(input, rule)?.trim();
    let inner = text
        .strip_prefix('(')
        .ok_or_else(|| SyntaxError::bad(rule, "subject is not a parenthesized sequence"))?;
    let word = inner
        .split_whitespace()
        .next()
        .ok_or_else(|| SyntaxError::bad(rule, "empty sequence"))?;
    Ok(word.to_owned())
}

fn integer_first_component_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let first = first_component(actual, "integerFirstComponentMatch")?;
    let assertion = text(assertion, "integerFirstComponentMatch")?.trim();
    let left = first
        .parse::<num_bigint::BigInt>()
        .map_err(|_| SyntaxError::bad("integerFirstComponentMatch", "not an integer"))?;
    let right = assertion
        .parse::<num_bigint::BigInt>()
        .map_err(|_| SyntaxError::bad("integerFirstComponentMatch", "not an integer"))?;
    Ok(left == right)
}

fn object_identifier_first_component_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let first = first_component(actual, "objectIdentifierFirstComponentMatch")?;
    object_identifier_eq(first.as_bytes(), assertion)
}

fn directory_string_first_component_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let first = first_component(actual, "directoryStringFirstComponentMatch")?;
    case_ignore_eq(first.as_bytes(), assertion)
}

fn words_of(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

fn word_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let subject = text(actual, "wordMatch")?;
    let word = normalize_case_ignore(text(assertion, "wordMatch")?);
    Ok(words_of(subject).any(|candidate| candidate.to_lowercase() == word))
}

fn keyword_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let subject = text(actual, "keywordMatch")?;
    let keyword = normalize_case_ignore(text(assertion, "keywordMatch")?);
    Ok(words_of(subject).any(|candidate| candidate.to_lowercase() == keyword))
}

fn ia5_text(input: &[u8], rule: &'static str) -> SyntaxResult<String> {
    let text = text(input, rule)?;
    syntax::Ia5String::parse(text)
        .map(|value| value.as_str().to_owned())
        .map_err(|_| SyntaxError::bad(rule, "subject is not IA5"))
}

fn case_exact_ia5_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(normalize_case_exact(&ia5_text(actual, "caseExactIA5Match")?)
        == normalize_case_exact(&ia5_text(assertion, "caseExactIA5Match")?))
}

fn case_ignore_ia5_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    Ok(normalize_case_ignore(&ia5_text(actual, "caseIgnoreIA5Match")?)
        == normalize_case_ignore(&ia5_text(assertion, "caseIgnoreIA5Match")?))
}

fn case_ignore_ia5_substr(actual: &[u8], assertion: &SubstringAssertion) -> SyntaxResult<bool> {
    let subject = strip_whitespace(&ia5_text(actual, "caseIgnoreIA5SubstringsMatch")?.to_lowercase());
    let pattern = assertion.map(|component| strip_whitespace(&component.to_lowercase()));
    Ok(pattern.matches(&subject))
}

fn uuid_values(actual: &[u8], assertion: &[u8]) -> SyntaxResult<(::uuid::Uuid, ::uuid::Uuid)> {
    Ok((
        crate::syntax::uuid_value(text(actual, "uuidMatch")?)?,
        crate::syntax::uuid_value(text(assertion, "uuidMatch")?)?,
    ))
}

fn uuid_eq(actual: &[u8], assertion: &[u8]) -> SyntaxResult<bool> {
    let (actual, assertion) = uuid_values(actual, assertion)?;
    Ok(actual == assertion)
}

fn uuid_cmp(actual: &[u8], assertion: &[u8], operator: OrderingOperator) -> SyntaxResult<bool> {
    let (actual, assertion) = uuid_values(actual, assertion)?;
    Ok(apply(operator, actual.cmp(&assertion)))
}

macro_rules! rule {
    ($oid:literal, [$($name:literal),+], $syntax:expr, eq $function:path) => {
        MatchingRuleDef {
            oid: $oid,
            names: &[$($name),+],
            syntax: $syntax,
            kind: RuleKind::Equality,
            assertion: Assertion::Equality($function),
        }
    };
    ($oid:literal, [$($name:literal),+], $syntax:expr, ord $function:path) => {
        MatchingRuleDef {
            oid: $oid,
            names: &[$($name),+],
            syntax: $syntax,
            kind: RuleKind::Ordering,
            assertion: Assertion::Ordering($function),
        }
    };
    ($oid:literal, [$($name:literal),+], $syntax:expr, sub $function:path) => {
        MatchingRuleDef {
            oid: $oid,
            names: &[$($name),+],
            syntax: $syntax,
            kind: RuleKind::Substrings,
            assertion: Assertion::Substrings($function),
        }
    };
}

static RULES: Lazy<Vec<MatchingRuleDef>> = Lazy::new(|| {
    vec![
        rule!("2.5.13.0", ["objectIdentifierMatch"], oids::OID, eq object_identifier_eq),
        rule!("2.5.13.1", ["distinguishedNameMatch"], oids::DN, eq distinguished_name_eq),
        rule!("2.5.13.2", ["caseIgnoreMatch"], oids::DIRECTORY_STRING, eq case_ignore_eq),
        rule!("2.5.13.3", ["caseIgnoreOrderingMatch"], oids::DIRECTORY_STRING, ord case_ignore_cmp),
        rule!("2.5.13.4", ["caseIgnoreSubstringsMatch"], oids::SUBSTRING_ASSERTION, sub case_ignore_substr),
        rule!("2.5.13.5", ["caseExactMatch"], oids::DIRECTORY_STRING, eq case_exact_eq),
        rule!("2.5.13.6", ["caseExactOrderingMatch"], oids::DIRECTORY_STRING, ord case_exact_cmp),
        rule!("2.5.13.7", ["caseExactSubstringsMatch"], oids::SUBSTRING_ASSERTION, sub case_exact_substr),
        rule!("2.5.13.8", ["numericStringMatch"], oids::NUMERIC_STRING, eq numeric_string_eq),
        rule!("2.5.13.9", ["numericStringOrderingMatch"], oids::NUMERIC_STRING, ord numeric_string_cmp),
        rule!("2.5.13.10", ["numericStringSubstringsMatch"], oids::SUBSTRING_ASSERTION, sub numeric_string_substr),
        rule!("2.5.13.11", ["caseIgnoreListMatch"], oids::POSTAL_ADDRESS, eq case_ignore_list_eq),
        rule!("2.5.13.12", ["caseIgnoreListSubstringsMatch"], oids::SUBSTRING_ASSERTION, sub case_ignore_list_substr),
        rule!("2.5.13.13", ["booleanMatch"], oids::BOOLEAN, eq boolean_eq),
        rule!("2.5.13.14", ["integerMatch"], oids::INTEGER, eq integer_eq),
        rule!("2.5.13.15", ["integerOrderingMatch"], oids::INTEGER, ord integer_cmp),
        rule!("2.5.13.16", ["bitStringMatch"], oids::BIT_STRING, eq bit_string_eq),
        rule!("2.5.13.17", ["octetStringMatch"], oids::OCTET_STRING, eq octet_string_eq),
        rule!("2.5.13.18", ["octetStringOrderingMatch"], oids::OCTET_STRING, ord octet_string_cmp),
        rule!("2.5.13.20", ["telephoneNumberMatch"], oids::TELEPHONE_NUMBER, eq telephone_eq),
        rule!("2.5.13.21", ["telephoneNumberSubstringsMatch"], oids::SUBSTRING_ASSERTION, sub telephone_substr),
        rule!("2.5.13.23", ["uniqueMemberMatch"], oids::NAME_AND_OPTIONAL_UID, eq unique_member_eq),
        rule!("2.5.13.27", ["generalizedTimeMatch"], oids::GENERALIZED_TIME, eq generalized_time_eq),
        rule!("2.5.13.28", ["generalizedTimeOrderingMatch"], oids::GENERALIZED_TIME, ord generalized_time_cmp),
        rule!("2.5.13.29", ["integerFirstComponentMatch"], oids::INTEGER, eq integer_first_component_eq),
        rule!("2.5.13.30", ["objectIdentifierFirstComponentMatch"], oids::OID, eq object_identifier_first_component_eq),
        rule!("2.5.13.31", ["directoryStringFirstComponentMatch"], oids::DIRECTORY_STRING, eq directory_string_first_component_eq),
        rule!("2.5.13.32", ["wordMatch"], oids::DIRECTORY_STRING, eq word_eq),
        rule!("2.5.13.33", ["keywordMatch"], oids::DIRECTORY_STRING, eq keyword_eq),
        rule!("1.3.6.1.4.1.1466.109.114.1", ["caseExactIA5Match"], oids::IA5_STRING, eq case_exact_ia5_eq),
        rule!("1.3.6.1.4.1.1466.109.114.2", ["caseIgnoreIA5Match"], oids::IA5_STRING, eq case_ignore_ia5_eq),
        rule!("1.3.6.1.4.1.1466.109.114.3", ["caseIgnoreIA5SubstringsMatch"], oids::SUBSTRING_ASSERTION, sub case_ignore_ia5_substr),
        rule!("1.3.6.1.1.16.2", ["uuidMatch"], oids::UUID, eq uuid_eq),
        rule!("1.3.6.1.1.16.3", ["uuidOrderingMatch"], oids::UUID, ord uuid_cmp),
    ]
});

/// Every built-in rule, in OID order.
pub fn all() -> &'static [MatchingRuleDef] {
    &RULES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{equality, ordering, substrings, Ternary};
    use pretty_assertions::assert_eq;

    #[test]
    fn declared_kinds_agree_with_name_suffixes() {
        for rule in all() {
            assert_eq!(
                RuleKind::from_name(rule.primary_name()),
                Some(rule.kind),
                "{}",
                rule.primary_name()
            );
        }
    }

    #[test]
    fn substring_seed_scenario() {
        let pattern = SubstringAssertion::parse("this*isa*substring").unwrap();
        assert_eq!(
            substrings("caseIgnoreSubstringsMatch", b"This is a substring", &pattern).unwrap(),
            Ternary::True
        );

        let exact = SubstringAssertion::parse("This*isa*Substring").unwrap();
        assert_eq!(
            substrings("caseExactSubstringsMatch", b"This is a substring", &exact).unwrap(),
            Ternary::False
        );
    }

    #[test]
    fn integer_ordering_totality() {
        let pairs = [("-5", "3"), ("3", "3"), ("12", "3")];
        for (left, right) in pairs {
            let le = ordering(
                "integerOrderingMatch",
                left.as_bytes(),
                right.as_bytes(),
                OrderingOperator::LessOrEqual,
            )
            .unwrap();
            let ge = ordering(
                "integerOrderingMatch",
                left.as_bytes(),
                right.as_bytes(),
                OrderingOperator::GreaterOrEqual,
            )
            .unwrap();
            // At least one direction holds; both hold only at equality.
            assert!(le.is_true() || ge.is_true());
            assert_eq!(le.is_true() && ge.is_true(), left == right);
        }
    }

    #[test]
    fn telephone_strips_separators() {
        assert_eq!(
            equality("telephoneNumberMatch", b"+1 512 305 0280", b"+15123050280").unwrap(),
            Ternary::True
        );
    }

    #[test]
    fn numeric_string_strips_space() {
        assert_eq!(
            equality("numericStringMatch", b"1 234 567", b"1234567").unwrap(),
            Ternary::True
        );
    }

    #[test]
    fn generalized_time_across_zones() {
        assert_eq!(
            equality(
                "generalizedTimeMatch",
                b"20090617150045Z",
                b"20090617203045+0530"
            )
            .unwrap(),
            Ternary::True
        );
        assert_eq!(
            ordering(
                "generalizedTimeOrderingMatch",
                b"20090617150044Z",
                b"20090617150045Z",
                OrderingOperator::LessOrEqual,
            )
            .unwrap(),
            Ternary::True
        );
    }

    #[test]
    fn first_component_rules() {
        let definition = b"( 2 NAME 'testRule' FORM nF )";
        assert_eq!(
            equality("integerFirstComponentMatch", definition, b"2").unwrap(),
            Ternary::True
        );
        let class = b"( 2.5.6.6 NAME 'person' SUP top STRUCTURAL )";
        assert_eq!(
            equality("objectIdentifierFirstComponentMatch", class, b"2.5.6.6").unwrap(),
            Ternary::True
        );
    }

    #[test]
    fn unique_member_uid_discrimination() {
        let actual = b"cn=Jane,dc=example#'0101'B";
        assert_eq!(
            equality("uniqueMemberMatch", actual, b"cn=jane,dc=EXAMPLE").unwrap(),
            Ternary::True
        );
        assert_eq!(
            equality("uniqueMemberMatch", actual, b"cn=jane,dc=example#'0111'B").unwrap(),
            Ternary::False
        );
    }

    #[test]
    fn undecodable_subject_is_undefined() {
        assert_eq!(
            equality("integerMatch", b"twelve", b"12").unwrap(),
            Ternary::Undefined
        );
        assert_eq!(
            equality("booleanMatch", b"yes", b"TRUE").unwrap(),
            Ternary::Undefined
        );
    }

    #[test]
    fn word_and_keyword() {
        assert_eq!(
            equality("wordMatch", b"The Quick Brown Fox", b"quick").unwrap(),
            Ternary::True
        );
        assert_eq!(
            equality("keywordMatch", b"alpha,beta;gamma", b"BETA").unwrap(),
            Ternary::True
        );
        assert_eq!(
            equality("wordMatch", b"The Quick Brown Fox", b"qui").unwrap(),
            Ternary::False
        );
    }
}
