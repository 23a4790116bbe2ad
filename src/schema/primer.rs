//! The standard syntax and matching-rule sets used to prime a fresh
//! subentry: RFC 4517, the certificate syntaxes of RFC 4523, the UUID
//! syntax of RFC 4530, and the NIS syntaxes of RFC 2307.

use super::registry::SubschemaSubentry;
use crate::error::SchemaResult;

/// `(numeric OID, DESC, human-readable)` for every primed syntax.
const SYNTAXES: &[(&str, &str, bool)] = &[
    ("1.3.6.1.4.1.1466.115.121.1.3", "Attribute Type Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.6", "Bit String", true),
    ("1.3.6.1.4.1.1466.115.121.1.7", "Boolean", true),
    ("1.3.6.1.4.1.1466.115.121.1.8", "Certificate", false),
    ("1.3.6.1.4.1.1466.115.121.1.9", "Certificate List", false),
    ("1.3.6.1.4.1.1466.115.121.1.10", "Certificate Pair", false),
    ("1.3.6.1.4.1.1466.115.121.1.11", "Country String", true),
    ("1.3.6.1.4.1.1466.115.121.1.12", "DN", true),
    ("1.3.6.1.4.1.1466.115.121.1.14", "Delivery Method", true),
    ("1.3.6.1.4.1.1466.115.121.1.15", "Directory String", true),
    ("1.3.6.1.4.1.1466.115.121.1.16", "DIT Content Rule Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.17", "DIT Structure Rule Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.21", "Enhanced Guide", true),
    ("1.3.6.1.4.1.1466.115.121.1.22", "Facsimile Telephone Number", true),
    ("1.3.6.1.4.1.1466.115.121.1.23", "Fax", false),
    ("1.3.6.1.4.1.1466.115.121.1.24", "Generalized Time", true),
    ("1.3.6.1.4.1.1466.115.121.1.25", "Guide", true),
    ("1.3.6.1.4.1.1466.115.121.1.26", "IA5 String", true),
    ("1.3.6.1.4.1.1466.115.121.1.27", "INTEGER", true),
    ("1.3.6.1.4.1.1466.115.121.1.28", "JPEG", false),
    ("1.3.6.1.4.1.1466.115.121.1.30", "Matching Rule Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.31", "Matching Rule Use Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.34", "Name And Optional UID", true),
    ("1.3.6.1.4.1.1466.115.121.1.35", "Name Form Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.36", "Numeric String", true),
    ("1.3.6.1.4.1.1466.115.121.1.37", "Object Class Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.38", "OID", true),
    ("1.3.6.1.4.1.1466.115.121.1.39", "Other Mailbox", true),
    ("1.3.6.1.4.1.1466.115.121.1.40", "Octet String", true),
    ("1.3.6.1.4.1.1466.115.121.1.41", "Postal Address", true),
    ("1.3.6.1.4.1.1466.115.121.1.44", "Printable String", true),
    ("1.3.6.1.4.1.1466.115.121.1.45", "SubtreeSpecification", true),
    ("1.3.6.1.4.1.1466.115.121.1.50", "Telephone Number", true),
    ("1.3.6.1.4.1.1466.115.121.1.51", "Teletex Terminal Identifier", true),
    ("1.3.6.1.4.1.1466.115.121.1.52", "Telex Number", true),
    ("1.3.6.1.4.1.1466.115.121.1.53", "UTC Time", true),
    ("1.3.6.1.4.1.1466.115.121.1.54", "LDAP Syntax Description", true),
    ("1.3.6.1.4.1.1466.115.121.1.58", "Substring Assertion", true),
    ("1.3.6.1.1.16.1", "UUID", true),
    ("1.3.6.1.1.1.0.0", "NIS Netgroup Triple", true),
    ("1.3.6.1.1.1.0.1", "NIS Boot Parameter", true),
];

/// Registers the standard syntaxes, then a matching-rule definition for
/// every rule the engine implements, so the two stay in lock step.
pub(super) fn prime(subentry: &SubschemaSubentry) -> SchemaResult<()> {
    for (oid, description, human_readable) in SYNTAXES {
        let mut definition = format!("( {oid} DESC '{description}'");
        if !human_readable {
            definition.push_str(" X-NOT-HUMAN-READABLE 'TRUE'");
        }
        definition.push_str(" )");
        subentry.register_ldap_syntax(&definition)?;
    }

    for rule in crate::matching::all_rules() {
        let definition = format!(
            "( {} NAME '{}' SYNTAX {} )",
            rule.oid,
            rule.primary_name(),
            rule.syntax
        );
        subentry.register_matching_rule(&definition)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primer_loads_cleanly() {
        let subentry = SubschemaSubentry::new(true);
        let counters = subentry.counters();
        assert_eq!(counters[0], SYNTAXES.len());
        assert_eq!(counters[1], crate::matching::all_rules().len());
        // Every primed rule gets an empty matchingRuleUse seed.
        assert_eq!(counters[2], counters[1]);
    }

    #[test]
    fn primed_rules_resolve_their_syntaxes() {
        let subentry = SubschemaSubentry::new(true);
        for rule in subentry.matching_rules().to_vec() {
            assert!(
                subentry.ldap_syntaxes().contains(&rule.syntax_oid),
                "{} dangles",
                rule.name()
            );
        }
    }
}
