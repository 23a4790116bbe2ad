//! # The subschema subentry
//!
//! The eight RFC 4512 description forms, their parsers, and the
//! cross-referenced registry that keeps them consistent: registrations
//! must name already-registered dependencies, unregistrations refuse to
//! orphan a dependent, and the derived matchingRuleUse projection tracks
//! which attribute types apply each rule.

mod ingest;
pub mod parse;
mod primer;
mod records;
mod registry;
mod token;

pub use self::records::{
    AttributeType, AttributeUsage, DitContentRule, DitStructureRule, Extensions, LdapSyntax,
    MatchingRule, MatchingRuleUse, NameForm, ObjectClass, ObjectClassKind,
};
pub use self::registry::{Collection, Counters, Definition, SubschemaSubentry};
