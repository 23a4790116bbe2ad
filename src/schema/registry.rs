//! The thread-safe registry behind the subschema subentry.

use std::sync::RwLock;

use super::records::*;
use crate::error::{SchemaError, SchemaResult, SyntaxError, SyntaxResult};
use crate::matching::RuleKind;
use crate::syntax::{self, Input, Value};

/// The operations a collection needs from its record type.
pub trait Definition: Clone + core::fmt::Display {
    /// The subschema attribute keyword used in the LDIF-like rendering.
    const KEYWORD: &'static str;

    /// The unique identity: numeric OID, or decimal rule ID.
    fn identifier(&self) -> String;

    /// Case-insensitive identifier/name lookup.
    fn matches(&self, identifier: &str) -> bool;

    /// The names shown in [`Collection::table`].
    fn table_entry(&self) -> Vec<String>;
}

macro_rules! definition {
    ($type:ty, $keyword:literal, |$record:ident| $identifier:expr, $table:expr) => {
        impl Definition for $type {
            const KEYWORD: &'static str = $keyword;

            fn identifier(&self) -> String {
                let $record = self;
                $identifier
            }

            fn matches(&self, identifier: &str) -> bool {
                <$type>::matches(self, identifier)
            }

            fn table_entry(&self) -> Vec<String> {
                let $record = self;
                $table
            }
        }
    };
}

definition!(LdapSyntax, "ldapSyntaxes", |record| record.numeric_oid.clone(),
    record.description.iter().cloned().collect());
definition!(MatchingRule, "matchingRules", |record| record.numeric_oid.clone(),
    record.names.clone());
definition!(MatchingRuleUse, "matchingRuleUse", |record| record.numeric_oid.clone(),
    record.names.clone());
definition!(AttributeType, "attributeTypes", |record| record.numeric_oid.clone(),
    record.names.clone());
definition!(ObjectClass, "objectClasses", |record| record.numeric_oid.clone(),
    record.names.clone());
definition!(DitContentRule, "dITContentRules", |record| record.numeric_oid.clone(),
    record.names.clone());
definition!(NameForm, "nameForms", |record| record.numeric_oid.clone(),
    record.names.clone());
definition!(DitStructureRule, "dITStructureRules", |record| record.rule_id.to_string(),
    record.names.clone());

/// An insertion-ordered, identifier-indexed collection of definitions.
///
/// Readers take the shared lock and copy out; the exclusive lock is held
/// only across a push or removal.
#[derive(Debug, Default)]
pub struct Collection<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Definition> Collection<T> {
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<T>> {
        self.records.read().unwrap_or_else(|poison| poison.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<T>> {
        self.records.write().unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// The record at insertion position `index`.
    pub fn index(&self, index: usize) -> Option<T> {
        self.read().get(index).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.read().iter().any(|record| record.matches(identifier))
    }

    /// The record matching `identifier` together with its position, if
    /// present.
    pub fn get(&self, identifier: &str) -> Option<(T, usize)> {
        self.read()
            .iter()
            .enumerate()
            .find(|(_, record)| record.matches(identifier))
            .map(|(position, record)| (record.clone(), position))
    }

    /// Appends `record`, silently skipping a duplicate identifier.
    pub fn push(&self, record: T) {
        let mut records = self.write();
        let identifier = record.identifier();
        if records.iter().any(|existing| existing.identifier() == identifier) {
            return;
        }
        records.push(record);
    }

    fn remove(&self, identifier: &str) -> Option<T> {
        let mut records = self.write();
        let position = records.iter().position(|record| record.matches(identifier))?;
        Some(records.remove(position))
    }

    fn update<R>(&self, function: impl FnOnce(&mut Vec<T>) -> R) -> R {
        function(&mut self.write())
    }

    /// A snapshot of every record in insertion order.
    pub fn to_vec(&self) -> Vec<T> {
        self.read().clone()
    }

    /// Identifier → names (description, for syntaxes).
    pub fn table(&self) -> Vec<(String, Vec<String>)> {
        self.read()
            .iter()
            .map(|record| (record.identifier(), record.table_entry()))
            .collect()
    }
}

impl<T: Definition> core::fmt::Display for Collection<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for record in self.read().iter() {
            writeln!(f, "{}: {record}", T::KEYWORD)?;
        }
        Ok(())
    }
}

/// Lengths of the eight collections, indexable in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub counts: [usize; 8],
    pub total: usize,
}

impl core::ops::Index<usize> for Counters {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.counts[index]
    }
}

/// The subschema subentry: eight cross-referenced collections.
#[derive(Debug, Default)]
pub struct SubschemaSubentry {
    ldap_syntaxes: Collection<LdapSyntax>,
    matching_rules: Collection<MatchingRule>,
    matching_rule_uses: Collection<MatchingRuleUse>,
    attribute_types: Collection<AttributeType>,
    object_classes: Collection<ObjectClass>,
    dit_content_rules: Collection<DitContentRule>,
    name_forms: Collection<NameForm>,
    dit_structure_rules: Collection<DitStructureRule>,
}

impl SubschemaSubentry {
    /// An empty subentry; with `prime`, pre-loads the standard LDAPSyntax
    /// and MatchingRule sets of RFC 4512/4517/4523/4530/2307.
    ///
    /// # Panics
    /// If a built-in primer definition fails to register, which is a
    /// programming error.
    pub fn new(prime: bool) -> Self {
        let subentry = Self::default();
        if prime {
            super::primer::prime(&subentry).expect("the built-in primer must register");
        }
        subentry
    }

    pub fn ldap_syntaxes(&self) -> &Collection<LdapSyntax> {
        &self.ldap_syntaxes
    }

    pub fn matching_rules(&self) -> &Collection<MatchingRule> {
        &self.matching_rules
    }

    pub fn matching_rule_uses(&self) -> &Collection<MatchingRuleUse> {
        &self.matching_rule_uses
    }

    pub fn attribute_types(&self) -> &Collection<AttributeType> {
        &self.attribute_types
    }

    pub fn object_classes(&self) -> &Collection<ObjectClass> {
        &self.object_classes
    }

    pub fn dit_content_rules(&self) -> &Collection<DitContentRule> {
        &self.dit_content_rules
    }

    pub fn name_forms(&self) -> &Collection<NameForm> {
        &self.name_forms
    }

    pub fn dit_structure_rules(&self) -> &Collection<DitStructureRule> {
        &self.dit_structure_rules
    }

    /// Collection lengths in registration order, plus the grand total.
    pub fn counters(&self) -> Counters {
        let counts = [
            self.ldap_syntaxes.len(),
            self.matching_rules.len(),
            self.matching_rule_uses.len(),
            self.attribute_types.len(),
            self.object_classes.len(),
            self.dit_content_rules.len(),
            self.name_forms.len(),
            self.dit_structure_rules.len(),
        ];
        Counters {
            counts,
            total: counts.iter().sum(),
        }
    }

    // -- lookups ---------------------------------------------------------

    pub fn ldap_syntax(&self, identifier: &str) -> Option<LdapSyntax> {
        self.ldap_syntaxes.get(identifier).map(|(record, _)| record)
    }

    pub fn matching_rule(&self, identifier: &str) -> Option<MatchingRule> {
        self.matching_rules.get(identifier).map(|(record, _)| record)
    }

    pub fn matching_rule_use(&self, identifier: &str) -> Option<MatchingRuleUse> {
        self.matching_rule_uses.get(identifier).map(|(record, _)| record)
    }

    pub fn attribute_type(&self, identifier: &str) -> Option<AttributeType> {
        self.attribute_types.get(identifier).map(|(record, _)| record)
    }

    pub fn object_class(&self, identifier: &str) -> Option<ObjectClass> {
        self.object_classes.get(identifier).map(|(record, _)| record)
    }

    pub fn dit_content_rule(&self, identifier: &str) -> Option<DitContentRule> {
        self.dit_content_rules.get(identifier).map(|(record, _)| record)
    }

    pub fn name_form(&self, identifier: &str) -> Option<NameForm> {
        self.name_forms.get(identifier).map(|(record, _)| record)
    }

    pub fn dit_structure_rule(&self, identifier: &str) -> Option<DitStructureRule> {
        self.dit_structure_rules.get(identifier).map(|(record, _)| record)
    }

    // -- registration ----------------------------------------------------

    fn reject_duplicate<T: Definition>(
        collection: &Collection<T>,
        kind: &'static str,
        identifier: &str,
    ) -> SchemaResult<()> {
        if collection.contains(identifier) {
            Err(SchemaError::DuplicateRegistration {
                kind,
                identifier: identifier.to_owned(),
            })
        } else {
            Ok(())
        }
    }

    pub fn register_ldap_syntax(&self, definition: &str) -> SchemaResult<()> {
        self.register_ldap_syntax_record(super::parse::ldap_syntax(definition)?)
    }

    pub fn register_ldap_syntax_record(&self, mut record: LdapSyntax) -> SchemaResult<()> {
        Self::reject_duplicate(&self.ldap_syntaxes, "ldapSyntax", &record.numeric_oid)?;
        if let Some([pattern]) = record.extensions.get("X-PATTERN") {
            let compiled = regex::Regex::new(pattern).map_err(|error| {
                SchemaError::InvalidDefinition {
                    kind: "ldapSyntax",
                    detail: format!("bad X-PATTERN: {error}"),
                }
            })?;
            record.pattern = Some(compiled);
        }
        self.ldap_syntaxes.push(record);
        Ok(())
    }

    pub fn register_matching_rule(&self, definition: &str) -> SchemaResult<()> {
        self.register_matching_rule_record(super::parse::matching_rule(definition)?)
    }

    pub fn register_matching_rule_record(&self, record: MatchingRule) -> SchemaResult<()> {
        Self::reject_duplicate(&self.matching_rules, "matchingRule", &record.numeric_oid)?;
        if !self.ldap_syntaxes.contains(&record.syntax_oid) {
            return Err(SchemaError::UnknownReference {
                kind: "ldapSyntax",
                identifier: record.syntax_oid.clone(),
            });
        }
        let projection = MatchingRuleUse {
            numeric_oid: record.numeric_oid.clone(),
            names: record.names.clone(),
            ..MatchingRuleUse::default()
        };
        self.matching_rules.push(record);
        self.matching_rule_uses.push(projection);
        Ok(())
    }

    fn check_rule_reference(
        &self,
        reference: &str,
        expected: RuleKind,
    ) -> SchemaResult<()> {
        let Some(rule) = self.matching_rule(reference) else {
            return Err(SchemaError::UnknownReference {
                kind: "matchingRule",
                identifier: reference.to_owned(),
            });
        };
        if rule.kind() != Some(expected) {
            return Err(SchemaError::ConsistencyViolation {
                detail: format!("'{}' is not a {expected:?} rule", rule.name()),
            });
        }
        Ok(())
    }

    pub fn register_attribute_type(&self, definition: &str) -> SchemaResult<()> {
        self.register_attribute_type_record(super::parse::attribute_type(definition)?)
    }

    pub fn register_attribute_type_record(&self, record: AttributeType) -> SchemaResult<()> {
        Self::reject_duplicate(&self.attribute_types, "attributeType", &record.numeric_oid)?;
        if record.single_value && record.collective {
            return Err(SchemaError::ConsistencyViolation {
                detail: "SINGLE-VALUE and COLLECTIVE are mutually exclusive".into(),
            });
        }
        if let Some(super_type) = &record.super_type {
            if !self.attribute_types.contains(super_type) {
                return Err(SchemaError::UnknownReference {
                    kind: "attributeType",
                    identifier: super_type.clone(),
                });
            }
        } else if record.syntax_oid.is_none() {
            return Err(SchemaError::ConsistencyViolation {
                detail: format!(
                    "attribute type '{}' needs a SUP or a SYNTAX",
                    record.name()
                ),
            });
        }
        if let Some(reference) = &record.equality {
            self.check_rule_reference(reference, RuleKind::Equality)?;
        }
        if let Some(reference) = &record.ordering {
            self.check_rule_reference(reference, RuleKind::Ordering)?;
        }
        if let Some(reference) = &record.substr {
            self.check_rule_reference(reference, RuleKind::Substrings)?;
        }
        if let Some(syntax_oid) = &record.syntax_oid {
            if !self.ldap_syntaxes.contains(syntax_oid) {
                return Err(SchemaError::UnknownReference {
                    kind: "ldapSyntax",
                    identifier: syntax_oid.clone(),
                });
            }
        }

        let applied_rules: Vec<String> = [&record.equality, &record.ordering, &record.substr]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        let applies_as = record.name().to_owned();
        self.attribute_types.push(record);

        for reference in applied_rules {
            if let Some((rule, _)) = self.matching_rules.get(&reference) {
                self.matching_rule_uses.update(|records| {
                    if let Some(projection) = records
                        .iter_mut()
                        .find(|projection| projection.numeric_oid == rule.numeric_oid)
                    {
                        if !projection.applies.iter().any(|existing| existing == &applies_as) {
                            projection.applies.push(applies_as.clone());
                        }
                    }
                });
            }
        }
        Ok(())
    }

    pub fn register_object_class(&self, definition: &str) -> SchemaResult<()> {
        self.register_object_class_record(super::parse::object_class(definition)?)
    }

    pub fn register_object_class_record(&self, record: ObjectClass) -> SchemaResult<()> {
        Self::reject_duplicate(&self.object_classes, "objectClass", &record.numeric_oid)?;
        for super_class in &record.super_classes {
            if !self.object_classes.contains(super_class) {
                return Err(SchemaError::UnknownReference {
                    kind: "objectClass",
                    identifier: super_class.clone(),
                });
            }
        }
        for attribute in record.must.iter().chain(&record.may) {
            if !self.attribute_types.contains(attribute) {
                return Err(SchemaError::UnknownReference {
                    kind: "attributeType",
                    identifier: attribute.clone(),
                });
            }
        }
        self.object_classes.push(record);
        Ok(())
    }

    pub fn register_dit_content_rule(&self, definition: &str) -> SchemaResult<()> {
        self.register_dit_content_rule_record(super::parse::dit_content_rule(definition)?)
    }

    pub fn register_dit_content_rule_record(&self, record: DitContentRule) -> SchemaResult<()> {
        Self::reject_duplicate(&self.dit_content_rules, "dITContentRule", &record.numeric_oid)?;
        let Some(governed) = self.object_class(&record.numeric_oid) else {
            return Err(SchemaError::UnknownReference {
                kind: "objectClass",
                identifier: record.numeric_oid.clone(),
            });
        };
        if governed.kind != ObjectClassKind::Structural
            || governed.numeric_oid != record.numeric_oid
        {
            return Err(SchemaError::ConsistencyViolation {
                detail: format!(
                    "content rule OID must name a STRUCTURAL class by numeric OID, got '{}'",
                    record.numeric_oid
                ),
            });
        }
        for auxiliary in &record.aux {
            let Some(class) = self.object_class(auxiliary) else {
                return Err(SchemaError::UnknownReference {
                    kind: "objectClass",
                    identifier: auxiliary.clone(),
                });
            };
            if class.kind != ObjectClassKind::Auxiliary {
                return Err(SchemaError::ConsistencyViolation {
                    detail: format!("AUX class '{}' is not AUXILIARY", class.name()),
                });
            }
        }
        for attribute in record.must.iter().chain(&record.may).chain(&record.not) {
            if !self.attribute_types.contains(attribute) {
                return Err(SchemaError::UnknownReference {
                    kind: "attributeType",
                    identifier: attribute.clone(),
                });
            }
        }
        self.dit_content_rules.push(record);
        Ok(())
    }

    pub fn register_name_form(&self, definition: &str) -> SchemaResult<()> {
        self.register_name_form_record(super::parse::name_form(definition)?)
    }

    pub fn register_name_form_record(&self, record: NameForm) -> SchemaResult<()> {
        Self::reject_duplicate(&self.name_forms, "nameForm", &record.numeric_oid)?;
        let Some(class) = self.object_class(&record.object_class) else {
            return Err(SchemaError::UnknownReference {
                kind: "objectClass",
                identifier: record.object_class.clone(),
            });
        };
        if class.kind != ObjectClassKind::Structural {
            return Err(SchemaError::ConsistencyViolation {
                detail: format!("name form OC '{}' is not STRUCTURAL", class.name()),
            });
        }
        for attribute in record.must.iter().chain(&record.may) {
            if !self.attribute_types.contains(attribute) {
                return Err(SchemaError::UnknownReference {
                    kind: "attributeType",
                    identifier: attribute.clone(),
                });
            }
        }
        self.name_forms.push(record);
        Ok(())
    }

    pub fn register_dit_structure_rule(&self, definition: &str) -> SchemaResult<()> {
        self.register_dit_structure_rule_record(super::parse::dit_structure_rule(definition)?)
    }

    pub fn register_dit_structure_rule_record(
        &self,
        record: DitStructureRule,
    ) -> SchemaResult<()> {
        let identifier = record.rule_id.to_string();
        Self::reject_duplicate(&self.dit_structure_rules, "dITStructureRule", &identifier)?;
        if !self.name_forms.contains(&record.form) {
            return Err(SchemaError::UnknownReference {
                kind: "nameForm",
                identifier: record.form.clone(),
            });
        }
        for super_rule in &record.super_rules {
            // A rule may name itself as superior (recursive rule).
            if *super_rule != record.rule_id
                && !self.dit_structure_rules.contains(&super_rule.to_string())
            {
                return Err(SchemaError::UnknownReference {
                    kind: "dITStructureRule",
                    identifier: super_rule.to_string(),
                });
            }
        }
        self.dit_structure_rules.push(record);
        Ok(())
    }

    // -- unregistration --------------------------------------------------

    fn dependent_exists(
        kind: &'static str,
        identifier: &str,
        dependent: impl Into<String>,
    ) -> SchemaError {
        SchemaError::DependentExists {
            kind,
            identifier: identifier.to_owned(),
            dependent: dependent.into(),
        }
    }

    pub fn unregister_ldap_syntax(&self, identifier: &str) -> SchemaResult<()> {
        let Some((record, _)) = self.ldap_syntaxes.get(identifier) else {
            return Err(SchemaError::UnknownReference {
                kind: "ldapSyntax",
                identifier: identifier.to_owned(),
            });
        };
        for rule in self.matching_rules.to_vec() {
            if record.matches(&rule.syntax_oid) {
                return Err(Self::dependent_exists(
                    "ldapSyntax",
                    identifier,
                    format!("matching rule '{}'", rule.name()),
                ));
            }
        }
        for attribute in self.attribute_types.to_vec() {
            if attribute
                .syntax_oid
                .as_deref()
                .map(|reference| record.matches(reference))
                .unwrap_or(false)
            {
                return Err(Self::dependent_exists(
                    "ldapSyntax",
                    identifier,
                    format!("attribute type '{}'", attribute.name()),
                ));
            }
        }
        self.ldap_syntaxes.remove(identifier);
        Ok(())
    }

    pub fn unregister_matching_rule(&self, identifier: &str) -> SchemaResult<()> {
        let Some((record, _)) = self.matching_rules.get(identifier) else {
            return Err(SchemaError::UnknownReference {
                kind: "matchingRule",
                identifier: identifier.to_owned(),
            });
        };
        for attribute in self.attribute_types.to_vec() {
            let references = [&attribute.equality, &attribute.ordering, &attribute.substr];
            if references
                .into_iter()
                .flatten()
                .any(|reference| record.matches(reference))
            {
                return Err(Self::dependent_exists(
                    "matchingRule",
                    identifier,
                    format!("attribute type '{}'", attribute.name()),
                ));
            }
        }
        if let Some(projection) = self.matching_rule_use(&record.numeric_oid) {
            if !projection.applies.is_empty() {
                return Err(Self::dependent_exists(
                    "matchingRule",
                    identifier,
                    "a non-empty matchingRuleUse",
                ));
            }
        }
        self.matching_rules.remove(identifier);
        self.matching_rule_uses.remove(&record.numeric_oid);
        Ok(())
    }

    pub fn unregister_attribute_type(&self, identifier: &str) -> SchemaResult<()> {
        let Some((record, _)) = self.attribute_types.get(identifier) else {
            return Err(SchemaError::UnknownReference {
                kind: "attributeType",
                identifier: identifier.to_owned(),
            });
        };
        for candidate in self.attribute_types.to_vec() {
            if candidate
                .super_type
                .as_deref()
                .map(|reference| record.matches(reference) && candidate.numeric_oid != record.numeric_oid)
                .unwrap_or(false)
            {
                return Err(Self::dependent_exists(
                    "attributeType",
                    identifier,
                    format!("subordinate attribute type '{}'", candidate.name()),
                ));
            }
        }
        for class in self.object_classes.to_vec() {
            if class
                .must
                .iter()
                .chain(&class.may)
                .any(|reference| record.matches(reference))
            {
                return Err(Self::dependent_exists(
                    "attributeType",
                    identifier,
                    format!("object class '{}'", class.name()),
                ));
            }
        }
        for rule in self.dit_content_rules.to_vec() {
            if rule
                .must
                .iter()
                .chain(&rule.may)
                .chain(&rule.not)
                .any(|reference| record.matches(reference))
            {
                return Err(Self::dependent_exists(
                    "attributeType",
                    identifier,
                    format!("content rule '{}'", rule.name()),
                ));
            }
        }
        for form in self.name_forms.to_vec() {
            if form
                .must
                .iter()
                .chain(&form.may)
                .any(|reference| record.matches(reference))
            {
                return Err(Self::dependent_exists(
                    "attributeType",
                    identifier,
                    format!("name form '{}'", form.name()),
                ));
            }
        }
        self.attribute_types.remove(identifier);
        self.matching_rule_uses.update(|records| {
            for projection in records.iter_mut() {
                projection.applies.retain(|applied| !record.matches(applied));
            }
        });
        Ok(())
    }

    pub fn unregister_object_class(&self, identifier: &str) -> SchemaResult<()> {
        let Some((record, _)) = self.object_classes.get(identifier) else {
            return Err(SchemaError::UnknownReference {
                kind: "objectClass",
                identifier: identifier.to_owned(),
            });
        };
        for candidate in self.object_classes.to_vec() {
            if candidate.numeric_oid != record.numeric_oid
                && candidate
                    .super_classes
                    .iter()
                    .any(|reference| record.matches(reference))
            {
                return Err(Self::dependent_exists(
                    "objectClass",
                    identifier,
                    format!("subordinate class '{}'", candidate.name()),
                ));
            }
        }
        if record.kind == ObjectClassKind::Structural {
            for form in self.name_forms.to_vec() {
                if record.matches(&form.object_class) {
                    return Err(Self::dependent_exists(
                        "objectClass",
                        identifier,
                        format!("name form '{}'", form.name()),
                    ));
                }
            }
            if self.dit_content_rules.contains(&record.numeric_oid) {
                return Err(Self::dependent_exists(
                    "objectClass",
                    identifier,
                    "a content rule governing the class",
                ));
            }
        }
        if record.kind == ObjectClassKind::Auxiliary {
            for rule in self.dit_content_rules.to_vec() {
                if rule.aux.iter().any(|reference| record.matches(reference)) {
                    return Err(Self::dependent_exists(
                        "objectClass",
                        identifier,
                        format!("content rule '{}'", rule.name()),
                    ));
                }
            }
        }
        self.object_classes.remove(identifier);
        Ok(())
    }

    pub fn unregister_name_form(&self, identifier: &str) -> SchemaResult<()> {
        let Some((record, _)) = self.name_forms.get(identifier) else {
            return Err(SchemaError::UnknownReference {
                kind: "nameForm",
                identifier: identifier.to_owned(),
            });
        };
        for rule in self.dit_structure_rules.to_vec() {
            if record.matches(&rule.form) {
                return Err(Self::dependent_exists(
                    "nameForm",
                    identifier,
                    format!("structure rule {}", rule.rule_id),
                ));
            }
        }
        self.name_forms.remove(identifier);
        Ok(())
    }

    pub fn unregister_dit_structure_rule(&self, identifier: &str) -> SchemaResult<()> {
        let Some((record, _)) = self.dit_structure_rules.get(identifier) else {
            return Err(SchemaError::UnknownReference {
                kind: "dITStructureRule",
                identifier: identifier.to_owned(),
            });
        };
        for candidate in self.dit_structure_rules.to_vec() {
            if candidate.rule_id != record.rule_id
                && candidate.super_rules.contains(&record.rule_id)
            {
                return Err(Self::dependent_exists(
                    "dITStructureRule",
                    identifier,
                    format!("subordinate structure rule {}", candidate.rule_id),
                ));
            }
        }
        self.dit_structure_rules.remove(identifier);
        Ok(())
    }

    pub fn unregister_dit_content_rule(&self, identifier: &str) -> SchemaResult<()> {
        if self.dit_content_rules.remove(identifier).is_none() {
            return Err(SchemaError::UnknownReference {
                kind: "dITContentRule",
                identifier: identifier.to_owned(),
            });
        }
        Ok(())
    }

    // -- navigation ------------------------------------------------------

    /// Attribute types whose SUP names `identifier`.
    pub fn sub_types(&self, identifier: &str) -> Vec<AttributeType> {
        let Some(record) = self.attribute_type(identifier) else {
            return Vec::new();
        };
        self.attribute_types
            .to_vec()
            .into_iter()
            .filter(|candidate| {
                candidate.numeric_oid != record.numeric_oid
                    && candidate
                        .super_type
                        .as_deref()
                        .map(|reference| record.matches(reference))
                        .unwrap_or(false)
            })
            .collect()
    }

    /// Object classes whose SUP includes `identifier`.
    pub fn sub_classes(&self, identifier: &str) -> Vec<ObjectClass> {
        let Some(record) = self.object_class(identifier) else {
            return Vec::new();
        };
        self.object_classes
            .to_vec()
            .into_iter()
            .filter(|candidate| {
                candidate.numeric_oid != record.numeric_oid
                    && candidate
                        .super_classes
                        .iter()
                        .any(|reference| record.matches(reference))
            })
            .collect()
    }

    /// The transitive SUP closure of an object class, nearest first.
    pub fn super_classes(&self, identifier: &str) -> Vec<ObjectClass> {
        let mut closure: Vec<ObjectClass> = Vec::new();
        let mut frontier = vec![identifier.to_owned()];
        while let Some(next) = frontier.pop() {
            let Some(record) = self.object_class(&next) else {
                continue;
            };
            for super_class in &record.super_classes {
                if let Some(resolved) = self.object_class(super_class) {
                    if !closure
                        .iter()
                        .any(|seen| seen.numeric_oid == resolved.numeric_oid)
                    {
                        frontier.push(resolved.numeric_oid.clone());
                        closure.push(resolved);
                    }
                }
            }
        }
        closure
    }

    /// MUST attributes of a class and all of its superiors.
    pub fn all_must(&self, identifier: &str) -> Vec<String> {
        self.collected_class_attributes(identifier, |class| class.must.clone())
    }

    /// MAY attributes of a class and all of its superiors.
    pub fn all_may(&self, identifier: &str) -> Vec<String> {
        self.collected_class_attributes(identifier, |class| class.may.clone())
    }

    fn collected_class_attributes(
        &self,
        identifier: &str,
        select: impl Fn(&ObjectClass) -> Vec<String>,
    ) -> Vec<String> {
        let mut attributes = Vec::new();
        let mut push_all = |class: &ObjectClass| {
            for attribute in select(class) {
                if !attributes
                    .iter()
                    .any(|existing: &String| existing.eq_ignore_ascii_case(&attribute))
                {
                    attributes.push(attribute);
                }
            }
        };
        if let Some(class) = self.object_class(identifier) {
            push_all(&class);
        }
        for class in self.super_classes(identifier) {
            push_all(&class);
        }
        attributes
    }

    /// Structure rules whose SUP includes `rule_id`.
    pub fn sub_rules(&self, rule_id: u32) -> Vec<DitStructureRule> {
        self.dit_structure_rules
            .to_vec()
            .into_iter()
            .filter(|candidate| {
                candidate.rule_id != rule_id && candidate.super_rules.contains(&rule_id)
            })
            .collect()
    }

    /// The superior rules named by `rule_id`, self-references excluded.
    pub fn super_rules(&self, rule_id: u32) -> Vec<DitStructureRule> {
        let Some(record) = self.dit_structure_rule(&rule_id.to_string()) else {
            return Vec::new();
        };
        record
            .super_rules
            .iter()
            .filter(|superior| **superior != rule_id)
            .filter_map(|superior| self.dit_structure_rule(&superior.to_string()))
            .collect()
    }

    // -- effective rule/syntax resolution --------------------------------

    fn effective<F>(&self, identifier: &str, select: F) -> Option<String>
    where
        F: Fn(&AttributeType) -> Option<String>,
    {
        let mut current = self.attribute_type(identifier)?;
        // SUP chains are acyclic by construction; the fuel is a guard
        // against hand-built records.
        for _ in 0..64 {
            if let Some(found) = select(&current) {
                return Some(found);
            }
            current = self.attribute_type(current.super_type.as_deref()?)?;
        }
        None
    }

    /// The EQUALITY rule of an attribute type, inherited through SUP.
    pub fn effective_equality(&self, identifier: &str) -> Option<String> {
        self.effective(identifier, |record| record.equality.clone())
    }

    /// The ORDERING rule of an attribute type, inherited through SUP.
    pub fn effective_ordering(&self, identifier: &str) -> Option<String> {
        self.effective(identifier, |record| record.ordering.clone())
    }

    /// The SUBSTR rule of an attribute type, inherited through SUP.
    pub fn effective_substr(&self, identifier: &str) -> Option<String> {
        self.effective(identifier, |record| record.substr.clone())
    }

    /// The SYNTAX of an attribute type, inherited through SUP.
    pub fn effective_syntax(&self, identifier: &str) -> Option<String> {
        self.effective(identifier, |record| record.syntax_oid.clone())
    }

    // -- value checking and filters --------------------------------------

    /// Validates `input` against a registered syntax. An `X-PATTERN`
    /// override replaces the built-in checker and returns the verified
    /// text as a UTF-8 directory string; syntaxes marked
    /// `X-NOT-HUMAN-READABLE` without a checker admit raw octets.
    pub fn validate_value(&self, identifier: &str, input: Input<'_>) -> SyntaxResult<Value> {
        let Some(record) = self.ldap_syntax(identifier) else {
            return Err(SyntaxError::BadType {
                syntax: "syntax dispatch",
                kind: "unregistered syntax",
            });
        };
        if let Some(pattern) = &record.pattern {
            let text = input.text("X-PATTERN syntax")?;
            return if pattern.is_match(text) {
                Ok(Value::DirectoryString(syntax::DirectoryString::Utf8(
                    text.to_owned(),
                )))
            } else {
                Err(SyntaxError::BadSyntax {
                    syntax: "X-PATTERN syntax",
                    detail: format!("value does not match pattern for {}", record.numeric_oid),
                })
            };
        }
        if syntax::is_known(&record.numeric_oid) {
            return syntax::validate(&record.numeric_oid, input);
        }
        if !record.is_human_readable() {
            return syntax::OctetString::new(input.bytes()).map(Value::OctetString);
        }
        Err(SyntaxError::BadType {
            syntax: "syntax dispatch",
            kind: "no checker for syntax",
        })
    }

    /// Evaluates a parsed filter against `entry`, resolving matching
    /// rules through this subentry.
    pub fn evaluate_filter(
        &self,
        filter: &crate::filter::Filter,
        entry: &dyn crate::filter::AttributeProvider,
    ) -> crate::matching::Ternary {
        crate::filter::evaluate(filter, entry, self)
    }
}

impl core::fmt::Display for SubschemaSubentry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.ldap_syntaxes.fmt(f)?;
        self.matching_rules.fmt(f)?;
        self.attribute_types.fmt(f)?;
        self.matching_rule_uses.fmt(f)?;
        self.object_classes.fmt(f)?;
        self.dit_content_rules.fmt(f)?;
        self.name_forms.fmt(f)?;
        self.dit_structure_rules.fmt(f)
    }
}
