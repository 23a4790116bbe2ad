//! The description records produced by the RFC 4512 parsers.

use crate::matching::RuleKind;

/// The ordered `X-<NAME>` extension clauses of a definition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extensions(Vec<(String, Vec<String>)>);

impl Extensions {
    pub fn push(&mut self, name: String, values: Vec<String>) {
        self.0.push((name, values));
    }

    /// The values of the first extension named `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for Extensions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (name, values) in &self.0 {
            match values.as_slice() {
                [single] => write!(f, " {name} '{}'", escape_qdstring(single))?,
                values => {
                    write!(f, " {name} (")?;
                    for value in values {
                        write!(f, " '{}'", escape_qdstring(value))?;
                    }
                    write!(f, " )")?;
                }
            }
        }
        Ok(())
    }
}

fn escape_qdstring(value: &str) -> String {
    value.replace('\\', "\\5C").replace('\'', "\\27")
}

fn fmt_names(f: &mut core::fmt::Formatter<'_>, names: &[String]) -> core::fmt::Result {
    match names {
        [] => Ok(()),
        [single] => write!(f, " NAME '{single}'"),
        names => {
            f.write_str(" NAME (")?;
            for name in names {
                write!(f, " '{name}'")?;
            }
            f.write_str(" )")
        }
    }
}

fn fmt_desc(f: &mut core::fmt::Formatter<'_>, description: &Option<String>) -> core::fmt::Result {
    match description {
        Some(description) => write!(f, " DESC '{}'", escape_qdstring(description)),
        None => Ok(()),
    }
}

fn fmt_oids(
    f: &mut core::fmt::Formatter<'_>,
    keyword: &str,
    oids: &[String],
) -> core::fmt::Result {
    match oids {
        [] => Ok(()),
        [single] => write!(f, " {keyword} {single}"),
        oids => {
            write!(f, " {keyword} (")?;
            for (index, oid) in oids.iter().enumerate() {
                if index > 0 {
                    f.write_str(" $")?;
                }
                write!(f, " {oid}")?;
            }
            f.write_str(" )")
        }
    }
}

fn has_name(names: &[String], identifier: &str) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(identifier))
}

/// An `ldapSyntaxes` value. Identity is the numeric OID; the description
/// is matched with whitespace collapsed and case folded.
#[derive(Debug, Default, Clone)]
pub struct LdapSyntax {
    pub numeric_oid: String,
    pub description: Option<String>,
    pub extensions: Extensions,
    /// Compiled `X-PATTERN` override, built at registration.
    pub(crate) pattern: Option<regex::Regex>,
}

impl LdapSyntax {
    /// `X-NOT-HUMAN-READABLE 'TRUE'` marks a binary syntax.
    pub fn is_human_readable(&self) -> bool {
        self.extensions
            .get("X-NOT-HUMAN-READABLE")
            .map(|values| values.iter().all(|value| value != "TRUE"))
            .unwrap_or(true)
    }

    pub fn matches(&self, identifier: &str) -> bool {
        if self.numeric_oid == identifier {
            return true;
        }
        match &self.description {
            Some(description) => {
                crate::chars::collapse_whitespace(description)
                    .eq_ignore_ascii_case(&crate::chars::collapse_whitespace(identifier))
            }
            None => false,
        }
    }
}

impl PartialEq for LdapSyntax {
    fn eq(&self, other: &Self) -> bool {
        self.numeric_oid == other.numeric_oid
            && self.description == other.description
            && self.extensions == other.extensions
    }
}

impl core::fmt::Display for LdapSyntax {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.numeric_oid)?;
        fmt_desc(f, &self.description)?;
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

/// A `matchingRules` value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MatchingRule {
    pub numeric_oid: String,
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    pub syntax_oid: String,
    pub extensions: Extensions,
}

impl MatchingRule {
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.numeric_oid)
    }

    /// Equality, ordering, or substrings, read off the primary name.
    pub fn kind(&self) -> Option<RuleKind> {
        RuleKind::from_name(self.name())
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.numeric_oid == identifier || has_name(&self.names, identifier)
    }
}

impl core::fmt::Display for MatchingRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.numeric_oid)?;
        fmt_names(f, &self.names)?;
        fmt_desc(f, &self.description)?;
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        write!(f, " SYNTAX {}", self.syntax_oid)?;
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

/// The four attribute usages of RFC 4512 §4.1.2.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AttributeUsage {
    #[default]
    UserApplications,
    DirectoryOperation,
    DistributedOperation,
    DsaOperation,
}

impl AttributeUsage {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "userApplications" => Some(AttributeUsage::UserApplications),
            "directoryOperation" => Some(AttributeUsage::DirectoryOperation),
            "distributedOperation" => Some(AttributeUsage::DistributedOperation),
            "dSAOperation" => Some(AttributeUsage::DsaOperation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeUsage::UserApplications => "userApplications",
            AttributeUsage::DirectoryOperation => "directoryOperation",
            AttributeUsage::DistributedOperation => "distributedOperation",
            AttributeUsage::DsaOperation => "dSAOperation",
        }
    }
}

/// An `attributeTypes` value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttributeType {
    pub numeric_oid: String,
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    pub super_type: Option<String>,
    pub equality: Option<String>,
    pub ordering: Option<String>,
    pub substr: Option<String>,
    pub syntax_oid: Option<String>,
    /// The `{n}` minimum upper bound on the SYNTAX clause.
    pub min_upper_bound: Option<u32>,
    pub single_value: bool,
    pub collective: bool,
    pub no_user_modification: bool,
    pub usage: AttributeUsage,
    pub extensions: Extensions,
}

impl AttributeType {
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.numeric_oid)
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.numeric_oid == identifier || has_name(&self.names, identifier)
    }
}

impl core::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.numeric_oid)?;
        fmt_names(f, &self.names)?;
        fmt_desc(f, &self.description)?;
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        if let Some(super_type) = &self.super_type {
            write!(f, " SUP {super_type}")?;
        }
        if let Some(equality) = &self.equality {
            write!(f, " EQUALITY {equality}")?;
        }
        if let Some(ordering) = &self.ordering {
            write!(f, " ORDERING {ordering}")?;
        }
        if let Some(substr) = &self.substr {
            write!(f, " SUBSTR {substr}")?;
        }
        if let Some(syntax_oid) = &self.syntax_oid {
            write!(f, " SYNTAX {syntax_oid}")?;
            if let Some(bound) = self.min_upper_bound {
                write!(f, "{{{bound}}}")?;
            }
        }
        if self.single_value {
            f.write_str(" SINGLE-VALUE")?;
        }
        if self.collective {
            f.write_str(" COLLECTIVE")?;
        }
        if self.no_user_modification {
            f.write_str(" NO-USER-MODIFICATION")?;
        }
        if self.usage != AttributeUsage::UserApplications {
            write!(f, " USAGE {}", self.usage.as_str())?;
        }
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

/// STRUCTURAL, AUXILIARY, or ABSTRACT.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClassKind {
    #[default]
    Structural = 0,
    Auxiliary = 1,
    Abstract = 2,
}

impl ObjectClassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectClassKind::Structural => "STRUCTURAL",
            ObjectClassKind::Auxiliary => "AUXILIARY",
            ObjectClassKind::Abstract => "ABSTRACT",
        }
    }
}

/// An `objectClasses` value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObjectClass {
    pub numeric_oid: String,
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    pub super_classes: Vec<String>,
    pub kind: ObjectClassKind,
    pub must: Vec<String>,
    pub may: Vec<String>,
    pub extensions: Extensions,
}

impl ObjectClass {
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.numeric_oid)
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.numeric_oid == identifier || has_name(&self.names, identifier)
    }
}

impl core::fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.numeric_oid)?;
        fmt_names(f, &self.names)?;
        fmt_desc(f, &self.description)?;
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        fmt_oids(f, "SUP", &self.super_classes)?;
        write!(f, " {}", self.kind.as_str())?;
        fmt_oids(f, "MUST", &self.must)?;
        fmt_oids(f, "MAY", &self.may)?;
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

/// A `dITContentRules` value; the numeric OID is that of the governed
/// STRUCTURAL class.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DitContentRule {
    pub numeric_oid: String,
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    pub aux: Vec<String>,
    pub must: Vec<String>,
    pub may: Vec<String>,
    pub not: Vec<String>,
    pub extensions: Extensions,
}

impl DitContentRule {
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.numeric_oid)
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.numeric_oid == identifier || has_name(&self.names, identifier)
    }
}

impl core::fmt::Display for DitContentRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.numeric_oid)?;
        fmt_names(f, &self.names)?;
        fmt_desc(f, &self.description)?;
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        fmt_oids(f, "AUX", &self.aux)?;
        fmt_oids(f, "MUST", &self.must)?;
        fmt_oids(f, "MAY", &self.may)?;
        fmt_oids(f, "NOT", &self.not)?;
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

/// A `nameForms` value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NameForm {
    pub numeric_oid: String,
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    pub object_class: String,
    pub must: Vec<String>,
    pub may: Vec<String>,
    pub extensions: Extensions,
}

impl NameForm {
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.numeric_oid)
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.numeric_oid == identifier || has_name(&self.names, identifier)
    }
}

impl core::fmt::Display for NameForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.numeric_oid)?;
        fmt_names(f, &self.names)?;
        fmt_desc(f, &self.description)?;
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        write!(f, " OC {}", self.object_class)?;
        fmt_oids(f, "MUST", &self.must)?;
        fmt_oids(f, "MAY", &self.may)?;
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

/// A `dITStructureRules` value, identified by integer rule ID.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DitStructureRule {
    pub rule_id: u32,
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    pub form: String,
    pub super_rules: Vec<u32>,
    pub extensions: Extensions,
}

impl DitStructureRule {
    pub fn name(&self) -> String {
        self.names
            .first()
            .cloned()
            .unwrap_or_else(|| self.rule_id.to_string())
    }

    pub fn matches(&self, identifier: &str) -> bool {
        identifier.parse::<u32>().map(|id| id == self.rule_id).unwrap_or(false)
            || has_name(&self.names, identifier)
    }
}

impl core::fmt::Display for DitStructureRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.rule_id)?;
        fmt_names(f, &self.names)?;
        fmt_desc(f, &self.description)?;
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        write!(f, " FORM {}", self.form)?;
        match self.super_rules.as_slice() {
            [] => {}
            [single] => write!(f, " SUP {single}")?,
            rules => {
                f.write_str(" SUP (")?;
                for rule in rules {
                    write!(f, " {rule}")?;
                }
                f.write_str(" )")?;
            }
        }
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

/// A `matchingRuleUse` value: derived, never user-registered.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MatchingRuleUse {
    pub numeric_oid: String,
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    /// Identifiers of the attribute types applying the rule, in
    /// registration order.
    pub applies: Vec<String>,
    pub extensions: Extensions,
}

impl MatchingRuleUse {
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.numeric_oid)
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.numeric_oid == identifier || has_name(&self.names, identifier)
    }
}

impl core::fmt::Display for MatchingRuleUse {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "( {}", self.numeric_oid)?;
        fmt_names(f, &self.names)?;
        fmt_desc(f, &self.description)?;
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        fmt_oids(f, "APPLIES", &self.applies)?;
        self.extensions.fmt(f)?;
        f.write_str(" )")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attribute_type_renders_rfc_form() {
        let record = AttributeType {
            numeric_oid: "2.5.4.3".into(),
            names: vec!["cn".into(), "commonName".into()],
            super_type: Some("name".into()),
            ..AttributeType::default()
        };
        assert_eq!(
            record.to_string(),
            "( 2.5.4.3 NAME ( 'cn' 'commonName' ) SUP name )"
        );
    }

    #[test]
    fn object_class_renders_kind_and_lists() {
        let record = ObjectClass {
            numeric_oid: "2.5.6.6".into(),
            names: vec!["person".into()],
            super_classes: vec!["top".into()],
            must: vec!["sn".into(), "cn".into()],
            may: vec!["userPassword".into()],
            ..ObjectClass::default()
        };
        assert_eq!(
            record.to_string(),
            "( 2.5.6.6 NAME 'person' SUP top STRUCTURAL MUST ( sn $ cn ) MAY userPassword )"
        );
    }

    #[test]
    fn syntax_description_matching_folds_whitespace() {
        let record = LdapSyntax {
            numeric_oid: "1.3.6.1.4.1.1466.115.121.1.15".into(),
            description: Some("Directory String".into()),
            ..LdapSyntax::default()
        };
        assert!(record.matches("1.3.6.1.4.1.1466.115.121.1.15"));
        assert!(record.matches("directory   string"));
        assert!(!record.matches("Printable String"));
    }

    #[test]
    fn extensions_round_trip_quotes() {
        let mut extensions = Extensions::default();
        extensions.push("X-ORIGIN".into(), vec!["RFC 4519".into()]);
        extensions.push("X-ALLOWED".into(), vec!["a".into(), "b".into()]);
        assert_eq!(
            extensions.to_string(),
            " X-ORIGIN 'RFC 4519' X-ALLOWED ( 'a' 'b' )"
        );
        assert_eq!(extensions.get("x-origin").unwrap(), ["RFC 4519".to_owned()]);
    }
}
