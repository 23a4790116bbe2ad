//! # Value syntaxes
//!
//! One checker per named directory syntax. Each checker accepts the input
//! kinds the syntax permits, and produces the canonical typed form or a
//! categorized [`SyntaxError`].
//!
//! The typed forms also implement `TryFrom<&str>` / `TryFrom<&[u8]>`
//! directly; [`validate`] is the dynamic entry point keyed by the RFC 4517
//! numeric OID, used by the matching layer and by registered syntaxes that
//! do not carry an `X-PATTERN` override.

mod bit_string;
mod boolean;
mod dn;
mod guide;
mod integer;
mod nis;
mod oid;
mod postal;
mod strings;
mod substring;
mod subtree;
mod telephone;
mod time;
mod uuid;

pub use self::{
    bit_string::BitString,
    boolean::boolean,
    dn::{Ava, AvaValue, DistinguishedName, NameAndOptionalUid, Rdn},
    guide::{Criteria, EnhancedGuide, Guide, MatchType, Subset, Term},
    nis::{BootParameter, NetgroupTriple},
    oid::{Descriptor, NumericOid, Oid},
    postal::{DeliveryMethod, DeliveryMode, PostalAddress},
    strings::{
        BmpString, CountryString, DirectoryString, Ia5String, NumericString, OctetString,
        PrintableString, TeletexString, UniversalString,
    },
    substring::SubstringAssertion,
    subtree::{Refinement, SpecificExclusion, SubtreeSpecification},
    telephone::{FacsimileTelephoneNumber, FaxParameter, TelephoneNumber, TelexNumber},
    time::{GeneralizedTime, UtcTime},
};
pub use self::uuid::parse as uuid_value;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{SyntaxError, SyntaxResult};

/// The input shapes a checker accepts.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Input<'a> {
    /// Resolves the input to text, validating byte inputs as RFC 4512
    /// UTF-8 first.
    pub(crate) fn text(self, syntax: &'static str) -> SyntaxResult<&'a str> {
        match self {
            Input::Text(text) => Ok(text),
            Input::Bytes(bytes) => crate::chars::utf8_str(bytes).ok_or_else(|| {
                SyntaxError::bad(syntax, "byte input is not well-formed UTF-8")
            }),
        }
    }

    pub(crate) fn bytes(self) -> &'a [u8] {
        match self {
            Input::Text(text) => text.as_bytes(),
            Input::Bytes(bytes) => bytes,
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(value: &'a str) -> Self {
        Input::Text(value)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(value: &'a [u8]) -> Self {
        Input::Bytes(value)
    }
}

/// A validated value, tagged by the syntax that admitted it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    BitString(BitString),
    Boolean(bool),
    CountryString(CountryString),
    DeliveryMethod(DeliveryMethod),
    DirectoryString(DirectoryString),
    DistinguishedName(DistinguishedName),
    EnhancedGuide(EnhancedGuide),
    FacsimileTelephoneNumber(FacsimileTelephoneNumber),
    GeneralizedTime(GeneralizedTime),
    Guide(Guide),
    Ia5String(Ia5String),
    Integer(num_bigint::BigInt),
    NameAndOptionalUid(NameAndOptionalUid),
    NetgroupTriple(NetgroupTriple),
    BootParameter(BootParameter),
    NumericString(NumericString),
    OctetString(OctetString),
    Oid(Oid),
    PostalAddress(PostalAddress),
    PrintableString(PrintableString),
    SubstringAssertion(SubstringAssertion),
    SubtreeSpecification(SubtreeSpecification),
    TelephoneNumber(TelephoneNumber),
    TelexNumber(TelexNumber),
    UtcTime(UtcTime),
    Uuid(::uuid::Uuid),
    AttributeType(Box<crate::schema::AttributeType>),
    ObjectClass(Box<crate::schema::ObjectClass>),
    LdapSyntax(Box<crate::schema::LdapSyntax>),
    MatchingRule(Box<crate::schema::MatchingRule>),
    MatchingRuleUse(Box<crate::schema::MatchingRuleUse>),
    DitContentRule(Box<crate::schema::DitContentRule>),
    DitStructureRule(Box<crate::schema::DitStructureRule>),
    NameForm(Box<crate::schema::NameForm>),
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::BitString(value) => value.fmt(f),
            Value::Boolean(value) => f.write_str(if *value { "TRUE" } else { "FALSE" }),
            Value::CountryString(value) => value.fmt(f),
            Value::DeliveryMethod(value) => value.fmt(f),
            Value::DirectoryString(value) => value.fmt(f),
            Value::DistinguishedName(value) => value.fmt(f),
            Value::EnhancedGuide(value) => value.fmt(f),
            Value::FacsimileTelephoneNumber(value) => value.fmt(f),
            Value::GeneralizedTime(value) => value.fmt(f),
            Value::Guide(value) => value.fmt(f),
            Value::Ia5String(value) => value.fmt(f),
            Value::Integer(value) => value.fmt(f),
            Value::NameAndOptionalUid(value) => value.fmt(f),
            Value::NetgroupTriple(value) => value.fmt(f),
            Value::BootParameter(value) => value.fmt(f),
            Value::NumericString(value) => value.fmt(f),
            Value::OctetString(value) => value.fmt(f),
            Value::Oid(value) => value.fmt(f),
            Value::PostalAddress(value) => value.fmt(f),
            Value::PrintableString(value) => value.fmt(f),
            Value::SubstringAssertion(value) => value.fmt(f),
            Value::SubtreeSpecification(value) => value.fmt(f),
            Value::TelephoneNumber(value) => value.fmt(f),
            Value::TelexNumber(value) => value.fmt(f),
            Value::UtcTime(value) => value.fmt(f),
            Value::Uuid(value) => value.fmt(f),
            Value::AttributeType(value) => value.fmt(f),
            Value::ObjectClass(value) => value.fmt(f),
            Value::LdapSyntax(value) => value.fmt(f),
            Value::MatchingRule(value) => value.fmt(f),
            Value::MatchingRuleUse(value) => value.fmt(f),
            Value::DitContentRule(value) => value.fmt(f),
            Value::DitStructureRule(value) => value.fmt(f),
            Value::NameForm(value) => value.fmt(f),
        }
    }
}

type Checker = fn(Input<'_>) -> SyntaxResult<Value>;

macro_rules! description_checker {
    ($name:ident, $parse:path, $variant:ident, $label:literal) => {
        fn $name(input: Input<'_>) -> SyntaxResult<Value> {
            let text = input.text($label)?;
            $parse(text)
                .map(|description| Value::$variant(Box::new(description)))
                .map_err(|error| SyntaxError::bad($label, error.to_string()))
        }
    };
}

description_checker!(
    attribute_type_description,
    crate::schema::parse::attribute_type,
    AttributeType,
    "Attribute Type Description"
);
description_checker!(
    object_class_description,
    crate::schema::parse::object_class,
    ObjectClass,
    "Object Class Description"
);
description_checker!(
    ldap_syntax_description,
    crate::schema::parse::ldap_syntax,
    LdapSyntax,
    "LDAP Syntax Description"
);
description_checker!(
    matching_rule_description,
    crate::schema::parse::matching_rule,
    MatchingRule,
    "Matching Rule Description"
);
description_checker!(
    matching_rule_use_description,
    crate::schema::parse::matching_rule_use,
    MatchingRuleUse,
    "Matching Rule Use Description"
);
description_checker!(
    dit_content_rule_description,
    crate::schema::parse::dit_content_rule,
    DitContentRule,
    "DIT Content Rule Description"
);
description_checker!(
    dit_structure_rule_description,
    crate::schema::parse::dit_structure_rule,
    DitStructureRule,
    "DIT Structure Rule Description"
);
description_checker!(
    name_form_description,
    crate::schema::parse::name_form,
    NameForm,
    "Name Form Description"
);

/// RFC 4517 §3.3 numeric OIDs for the syntaxes this crate checks.
pub mod oids {
    pub const ATTRIBUTE_TYPE_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.3";
    pub const BIT_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.6";
    pub const BOOLEAN: &str = "1.3.6.1.4.1.1466.115.121.1.7";
    pub const COUNTRY_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.11";
    pub const DN: &str = "1.3.6.1.4.1.1466.115.121.1.12";
    pub const DELIVERY_METHOD: &str = "1.3.6.1.4.1.1466.115.121.1.14";
    pub const DIRECTORY_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.15";
    pub const DIT_CONTENT_RULE_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.16";
    pub const DIT_STRUCTURE_RULE_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.17";
    pub const ENHANCED_GUIDE: &str = "1.3.6.1.4.1.1466.115.121.1.21";
    pub const FACSIMILE_TELEPHONE_NUMBER: &str = "1.3.6.1.4.1.1466.115.121.1.22";
    pub const GENERALIZED_TIME: &str = "1.3.6.1.4.1.1466.115.121.1.24";
    pub const GUIDE: &str = "1.3.6.1.4.1.1466.115.121.1.25";
    pub const IA5_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.26";
    pub const INTEGER: &str = "1.3.6.1.4.1.1466.115.121.1.27";
    pub const MATCHING_RULE_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.30";
    pub const MATCHING_RULE_USE_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.31";
    pub const NAME_AND_OPTIONAL_UID: &str = "1.3.6.1.4.1.1466.115.121.1.34";
    pub const NAME_FORM_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.35";
    pub const NUMERIC_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.36";
    pub const OBJECT_CLASS_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.37";
    pub const OID: &str = "1.3.6.1.4.1.1466.115.121.1.38";
    pub const OCTET_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.40";
    pub const POSTAL_ADDRESS: &str = "1.3.6.1.4.1.1466.115.121.1.41";
    pub const PRINTABLE_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.44";
    pub const SUBTREE_SPECIFICATION: &str = "1.3.6.1.4.1.1466.115.121.1.45";
    pub const TELEPHONE_NUMBER: &str = "1.3.6.1.4.1.1466.115.121.1.50";
    pub const TELEX_NUMBER: &str = "1.3.6.1.4.1.1466.115.121.1.52";
    pub const UTC_TIME: &str = "1.3.6.1.4.1.1466.115.121.1.53";
    pub const LDAP_SYNTAX_DESCRIPTION: &str = "1.3.6.1.4.1.1466.115.121.1.54";
    pub const SUBSTRING_ASSERTION: &str = "1.3.6.1.4.1.1466.115.121.1.58";
    pub const UUID: &str = "1.3.6.1.1.16.1";
    pub const NIS_NETGROUP_TRIPLE: &str = "1.3.6.1.1.1.0.0";
    pub const NIS_BOOT_PARAMETER: &str = "1.3.6.1.1.1.0.1";
}

static CHECKERS: Lazy<HashMap<&'static str, Checker>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Checker> = HashMap::new();
    table.insert(oids::ATTRIBUTE_TYPE_DESCRIPTION, attribute_type_description);
    table.insert(oids::BIT_STRING, bit_string::check);
    table.insert(oids::BOOLEAN, boolean::check);
    table.insert(oids::COUNTRY_STRING, strings::check_country);
    table.insert(oids::DN, dn::check);
    table.insert(oids::DELIVERY_METHOD, postal::check_delivery_method);
    table.insert(oids::DIRECTORY_STRING, strings::check_directory);
    table.insert(oids::DIT_CONTENT_RULE_DESCRIPTION, dit_content_rule_description);
    table.insert(oids::DIT_STRUCTURE_RULE_DESCRIPTION, dit_structure_rule_description);
    table.insert(oids::ENHANCED_GUIDE, guide::check_enhanced);
    table.insert(oids::FACSIMILE_TELEPHONE_NUMBER, telephone::check_facsimile);
    table.insert(oids::GENERALIZED_TIME, time::check_generalized);
    table.insert(oids::GUIDE, guide::check_guide);
    table.insert(oids::IA5_STRING, strings::check_ia5);
    table.insert(oids::INTEGER, integer::check);
    table.insert(oids::MATCHING_RULE_DESCRIPTION, matching_rule_description);
    table.insert(oids::MATCHING_RULE_USE_DESCRIPTION, matching_rule_use_description);
    table.insert(oids::NAME_AND_OPTIONAL_UID, dn::check_name_and_optional_uid);
    table.insert(oids::NAME_FORM_DESCRIPTION, name_form_description);
    table.insert(oids::NUMERIC_STRING, strings::check_numeric);
    table.insert(oids::OBJECT_CLASS_DESCRIPTION, object_class_description);
    table.insert(oids::OID, oid::check);
    table.insert(oids::OCTET_STRING, strings::check_octet);
    table.insert(oids::POSTAL_ADDRESS, postal::check_postal_address);
    table.insert(oids::PRINTABLE_STRING, strings::check_printable);
    table.insert(oids::SUBTREE_SPECIFICATION, subtree::check);
    table.insert(oids::TELEPHONE_NUMBER, telephone::check_telephone);
    table.insert(oids::TELEX_NUMBER, telephone::check_telex);
    table.insert(oids::UTC_TIME, time::check_utc);
    table.insert(oids::LDAP_SYNTAX_DESCRIPTION, ldap_syntax_description);
    table.insert(oids::SUBSTRING_ASSERTION, substring::check);
    table.insert(oids::UUID, uuid::check);
    table.insert(oids::NIS_NETGROUP_TRIPLE, nis::check_netgroup_triple);
    table.insert(oids::NIS_BOOT_PARAMETER, nis::check_boot_parameter);
    table
});

/// Whether `oid` names a syntax with a built-in checker.
pub fn is_known(oid: &str) -> bool {
    CHECKERS.contains_key(oid)
}

/// Validates `input` against the syntax registered under the numeric
/// `oid`, returning the canonical typed form.
pub fn validate(oid: &str, input: Input<'_>) -> SyntaxResult<Value> {
    let checker = CHECKERS.get(oid).ok_or(SyntaxError::BadType {
        syntax: "syntax dispatch",
        kind: "unknown syntax OID",
    })?;
    checker(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dispatch_by_numeric_oid() {
        let value = validate(oids::BOOLEAN, Input::Text("TRUE")).unwrap();
        assert_eq!(value, Value::Boolean(true));

        let value = validate(oids::BIT_STRING, Input::Text("'101'B")).unwrap();
        assert_eq!(value.to_string(), "'101'B");
    }

    #[test]
    fn unknown_oid_is_bad_type() {
        assert!(matches!(
            validate("9.9.9", Input::Text("x")),
            Err(SyntaxError::BadType { .. })
        ));
    }

    #[test]
    fn validation_is_idempotent() {
        let first = validate(oids::DN, Input::Text("cn=Jane Doe,dc=example,dc=com")).unwrap();
        let rendered = first.to_string();
        let second = validate(oids::DN, Input::Text(&rendered)).unwrap();
        assert_eq!(first, second);
    }
}
