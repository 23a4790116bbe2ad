//! End-to-end scenarios over the primed subschema subentry.

use dirsyntax::error::SchemaError;
use dirsyntax::filter::{self, AttributeProvider};
use dirsyntax::matching::Ternary;
use dirsyntax::schema::SubschemaSubentry;
use dirsyntax::syntax::{self, DistinguishedName, Input};
use pretty_assertions::assert_eq;

const NAME: &str = "( 2.5.4.41 NAME 'name' EQUALITY caseIgnoreMatch \
                    SUBSTR caseIgnoreSubstringsMatch \
                    SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )";
const CN: &str = "( 2.5.4.3 NAME 'cn' SUP name )";

#[test]
fn register_unregister_with_dependents() {
    let subentry = SubschemaSubentry::new(true);
    let before = subentry.counters();

    subentry.register_attribute_type(NAME).unwrap();
    subentry.register_attribute_type(CN).unwrap();

    let after = subentry.counters();
    assert_eq!(after.total, before.total + 2);

    // The projection picked the new attribute type up under its name.
    let uses = subentry.matching_rule_use("caseIgnoreMatch").unwrap();
    assert!(uses.applies.iter().any(|applied| applied == "name"));

    // `cn` depends on `name`, so `name` must refuse to go first.
    assert!(matches!(
        subentry.unregister_attribute_type("name"),
        Err(SchemaError::DependentExists { .. })
    ));
    assert_eq!(subentry.counters(), after);

    subentry.unregister_attribute_type("cn").unwrap();
    subentry.unregister_attribute_type("name").unwrap();
    assert_eq!(subentry.counters(), before);

    // The projection was pruned along the way.
    let uses = subentry.matching_rule_use("caseIgnoreMatch").unwrap();
    assert!(uses.applies.is_empty());
}

#[test]
fn counters_total_is_the_sum_of_the_parts() {
    let subentry = SubschemaSubentry::new(true);
    subentry.register_attribute_type(NAME).unwrap();
    let counters = subentry.counters();
    let sum: usize = (0..8).map(|index| counters[index]).sum();
    assert_eq!(counters.total, sum);
}

#[test]
fn duplicate_registration_rejected() {
    let subentry = SubschemaSubentry::new(true);
    subentry.register_attribute_type(NAME).unwrap();
    assert!(matches!(
        subentry.register_attribute_type(NAME),
        Err(SchemaError::DuplicateRegistration { .. })
    ));
}

#[test]
fn unknown_references_rejected() {
    let subentry = SubschemaSubentry::new(true);
    assert!(matches!(
        subentry.register_attribute_type("( 2.5.4.3 NAME 'cn' SUP name )"),
        Err(SchemaError::UnknownReference { .. })
    ));
    assert!(matches!(
        subentry.register_attribute_type(
            "( 2.5.4.3 NAME 'cn' SYNTAX 9.9.9.9 )"
        ),
        Err(SchemaError::UnknownReference { .. })
    ));
    assert!(matches!(
        subentry
            .register_matching_rule("( 9.9.1 NAME 'bogusMatch' SYNTAX 9.9.9.9 )"),
        Err(SchemaError::UnknownReference { .. })
    ));
}

#[test]
fn single_value_collective_exclusion() {
    let subentry = SubschemaSubentry::new(true);
    assert!(matches!(
        subentry.register_attribute_type(
            "( 9.9.2 NAME 'contradiction' SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 \
             SINGLE-VALUE COLLECTIVE )"
        ),
        Err(SchemaError::ConsistencyViolation { .. })
    ));
}

fn structural_fixture(subentry: &SubschemaSubentry) {
    subentry.register_attribute_type(NAME).unwrap();
    subentry.register_attribute_type(CN).unwrap();
    subentry
        .register_object_class("( 2.5.6.0 NAME 'top' ABSTRACT MUST cn )")
        .unwrap();
    subentry
        .register_object_class(
            "( 2.5.6.6 NAME 'person' SUP top STRUCTURAL MUST cn MAY name )",
        )
        .unwrap();
    subentry
        .register_object_class("( 9.9.3 NAME 'auxThing' AUXILIARY MAY name )")
        .unwrap();
}

#[test]
fn content_rules_name_forms_structure_rules() {
    let subentry = SubschemaSubentry::new(true);
    structural_fixture(&subentry);

    // The content rule's OID must be the STRUCTURAL class's numeric OID.
    assert!(matches!(
        subentry.register_dit_content_rule("( 9.9.3 AUX auxThing )"),
        Err(SchemaError::ConsistencyViolation { .. })
    ));
    subentry
        .register_dit_content_rule("( 2.5.6.6 NAME 'personContent' AUX auxThing NOT name )")
        .unwrap();

    // AUX must name AUXILIARY classes.
    assert!(matches!(
        subentry.register_dit_content_rule("( 2.5.6.0 AUX person )"),
        Err(SchemaError::UnknownReference { .. })
            | Err(SchemaError::ConsistencyViolation { .. })
    ));

    subentry
        .register_name_form("( 9.9.4 NAME 'personNameForm' OC person MUST cn )")
        .unwrap();
    // A name form must govern a STRUCTURAL class.
    assert!(matches!(
        subentry.register_name_form("( 9.9.5 NAME 'badForm' OC auxThing MUST cn )"),
        Err(SchemaError::ConsistencyViolation { .. })
    ));

    subentry
        .register_dit_structure_rule("( 1 NAME 'personStructure' FORM personNameForm )")
        .unwrap();
    // Self-reference in SUP is a recursive rule and is allowed.
    subentry
        .register_dit_structure_rule(
            "( 2 NAME 'nestedPersonStructure' FORM personNameForm SUP ( 1 2 ) )",
        )
        .unwrap();
    assert!(matches!(
        subentry.register_dit_structure_rule("( 3 FORM personNameForm SUP 9 )"),
        Err(SchemaError::UnknownReference { .. })
    ));

    // Dependency scans across the graph.
    assert!(matches!(
        subentry.unregister_name_form("personNameForm"),
        Err(SchemaError::DependentExists { .. })
    ));
    assert!(matches!(
        subentry.unregister_object_class("person"),
        Err(SchemaError::DependentExists { .. })
    ));
    assert!(matches!(
        subentry.unregister_dit_structure_rule("1"),
        Err(SchemaError::DependentExists { .. })
    ));

    // Tear down in reverse dependency order.
    subentry.unregister_dit_structure_rule("2").unwrap();
    subentry.unregister_dit_structure_rule("1").unwrap();
    subentry.unregister_name_form("personNameForm").unwrap();
    subentry.unregister_dit_content_rule("personContent").unwrap();
    subentry.unregister_object_class("auxThing").unwrap();
    subentry.unregister_object_class("person").unwrap();
    subentry.unregister_object_class("top").unwrap();
}

#[test]
fn unregister_is_atomic() {
    let subentry = SubschemaSubentry::new(true);
    structural_fixture(&subentry);
    let counters = subentry.counters();
    let rendered = subentry.to_string();

    for target in ["name", "top", "person"] {
        assert!(subentry.unregister_attribute_type(target).is_err()
            || subentry.unregister_object_class(target).is_err());
    }
    assert_eq!(subentry.counters(), counters);
    assert_eq!(subentry.to_string(), rendered);
}

#[test]
fn referential_integrity_holds_after_churn() {
    let subentry = SubschemaSubentry::new(true);
    structural_fixture(&subentry);
    subentry
        .register_name_form("( 9.9.4 NAME 'personNameForm' OC person MUST cn )")
        .unwrap();
    subentry.unregister_name_form("personNameForm").unwrap();

    for attribute in subentry.attribute_types().to_vec() {
        if let Some(super_type) = &attribute.super_type {
            assert!(subentry.attribute_type(super_type).is_some());
        }
        for rule in [&attribute.equality, &attribute.ordering, &attribute.substr]
            .into_iter()
            .flatten()
        {
            assert!(subentry.matching_rule(rule).is_some());
        }
        if let Some(syntax_oid) = &attribute.syntax_oid {
            assert!(subentry.ldap_syntax(syntax_oid).is_some());
        }
    }
    for class in subentry.object_classes().to_vec() {
        for reference in class.must.iter().chain(&class.may) {
            assert!(subentry.attribute_type(reference).is_some());
        }
    }
}

#[test]
fn matching_rule_use_projection_is_exact() {
    let subentry = SubschemaSubentry::new(true);
    structural_fixture(&subentry);

    for rule in subentry.matching_rules().to_vec() {
        let projection = subentry.matching_rule_use(&rule.numeric_oid).unwrap();
        let expected: Vec<String> = subentry
            .attribute_types()
            .to_vec()
            .into_iter()
            .filter(|attribute| {
                [&attribute.equality, &attribute.ordering, &attribute.substr]
                    .into_iter()
                    .flatten()
                    .any(|reference| rule.matches(reference))
            })
            .map(|attribute| attribute.name().to_owned())
            .collect();
        assert_eq!(projection.applies, expected, "rule {}", rule.name());
    }
}

struct Entry {
    name: DistinguishedName,
    attributes: Vec<(&'static str, Vec<&'static [u8]>)>,
}

impl AttributeProvider for Entry {
    fn values(&self, attribute: &str) -> Vec<Vec<u8>> {
        self.attributes
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(attribute))
            .flat_map(|(_, values)| values.iter().map(|value| value.to_vec()))
            .collect()
    }

    fn attributes(&self) -> Vec<String> {
        self.attributes.iter().map(|(name, _)| (*name).to_owned()).collect()
    }

    fn distinguished_name(&self) -> Option<&DistinguishedName> {
        Some(&self.name)
    }
}

fn jane() -> Entry {
    Entry {
        name: DistinguishedName::parse("cn=Jane Doe,ou=People,dc=example,dc=com").unwrap(),
        attributes: vec![
            ("cn", vec![&b"Jane Doe"[..]]),
            ("name", vec![&b"Jane Doe"[..], &b"J. Doe"[..]]),
        ],
    }
}

#[test]
fn filter_evaluation_with_schema_rules() {
    let subentry = SubschemaSubentry::new(true);
    subentry.register_attribute_type(NAME).unwrap();
    subentry.register_attribute_type(CN).unwrap();
    subentry
        .register_attribute_type("( 2.5.4.11 NAME 'ou' SUP name )")
        .unwrap();

    let entry = jane();
    let check = |text: &str| {
        let parsed = filter::parse(text).unwrap();
        subentry.evaluate_filter(&parsed, &entry)
    };

    assert_eq!(check("(cn=JANE DOE)"), Ternary::True);
    assert_eq!(check("(cn=jane*doe)"), Ternary::True);
    assert_eq!(check("(cn=john*)"), Ternary::False);
    assert_eq!(check("(cn=*)"), Ternary::True);
    assert_eq!(check("(&(cn=jane doe)(!(name=john)))"), Ternary::True);
    // `sn` is not a registered attribute type, so the comparison is
    // UNDEFINED; under `|` the TRUE branch still wins.
    assert_eq!(check("(sn=doe)"), Ternary::Undefined);
    assert_eq!(check("(|(sn=doe)(cn=jane doe))"), Ternary::True);
    assert_eq!(check("(&(sn=doe)(cn=jane doe))"), Ternary::Undefined);
    // Approximation falls back to caseIgnoreMatch.
    assert_eq!(check("(cn~=JANE  DOE)"), Ternary::True);
    // Extensible with an explicit rule, and with the DN join.
    assert_eq!(check("(cn:caseExactMatch:=Jane Doe)"), Ternary::True);
    assert_eq!(check("(cn:caseExactMatch:=jane doe)"), Ternary::False);
    assert_eq!(check("(ou:dn:=people)"), Ternary::True);
}

#[test]
fn x_pattern_overrides_builtin_checker() {
    let subentry = SubschemaSubentry::new(false);
    subentry
        .register_ldap_syntax(
            "( 9.9.9.1 DESC 'US Zip Code' X-PATTERN '^[0-9]{5}(-[0-9]{4})?$' )",
        )
        .unwrap();

    assert!(subentry.validate_value("9.9.9.1", Input::Text("78750")).is_ok());
    assert!(subentry.validate_value("9.9.9.1", Input::Text("78750-1234")).is_ok());
    assert!(subentry.validate_value("9.9.9.1", Input::Text("787")).is_err());

    // Description lookup folds case and whitespace.
    assert!(subentry.validate_value("us  zip  code", Input::Text("78750")).is_ok());
}

#[test]
fn schema_description_syntaxes_round_trip() {
    let parsed = syntax::validate(syntax::oids::ATTRIBUTE_TYPE_DESCRIPTION, Input::Text(NAME))
        .unwrap();
    let rendered = parsed.to_string();
    let reparsed =
        syntax::validate(syntax::oids::ATTRIBUTE_TYPE_DESCRIPTION, Input::Text(&rendered))
            .unwrap();
    assert_eq!(parsed, reparsed);
}
