//! The eight RFC 4512 definition parsers.
//!
//! Each parser consumes an optional leading `(`, the numeric OID (or
//! integer rule ID), then loops over clause keywords. Unrecognized
//! keywords starting with `X-` become extensions; anything else is a
//! parse error.

use super::records::*;
use super::token::{Token, Tokenizer};
use crate::error::{SchemaError, SchemaResult};

fn invalid(kind: &'static str, detail: impl Into<String>) -> SchemaError {
    SchemaError::InvalidDefinition {
        kind,
        detail: detail.into(),
    }
}

struct Parser<'a> {
    tokens: Tokenizer<'a>,
    kind: &'static str,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, kind: &'static str) -> Self {
        Self {
            tokens: Tokenizer::new(input),
            kind,
        }
    }

    /// Consumes the optional opening parenthesis and returns the leading
    /// OID / rule-ID token.
    fn leading_identifier(&mut self) -> SchemaResult<String> {
        if matches!(self.tokens.peek(), Some(Token::LParen)) {
            self.tokens.next();
        }
        match self.tokens.next() {
            Some(Token::Word(word)) => Ok(word),
            Some(Token::Quoted(_)) => Err(invalid(self.kind, "identifier must not be quoted")),
            _ => Err(invalid(self.kind, "missing leading identifier")),
        }
    }

    /// The next clause keyword, or `None` at the closing parenthesis /
    /// end of input.
    fn keyword(&mut self) -> SchemaResult<Option<String>> {
        match self.tokens.next() {
            None | Some(Token::RParen) => Ok(None),
            Some(Token::Word(word)) => Ok(Some(word)),
            Some(other) => Err(invalid(self.kind, format!("unexpected token {other:?}"))),
        }
    }

    /// `NAME` payload: one qdescr or a parenthesized qdescr list.
    fn qdescrs(&mut self) -> SchemaResult<Vec<String>> {
        match self.tokens.next() {
            Some(Token::Quoted(single)) => Ok(vec![single]),
            Some(Token::LParen) => {
                let mut names = Vec::new();
                loop {
                    match self.tokens.next() {
                        Some(Token::Quoted(name)) => names.push(name),
                        Some(Token::RParen) => break,
                        _ => return Err(invalid(self.kind, "malformed name list")),
                    }
                }
                Ok(names)
            }
            _ => Err(invalid(self.kind, "expected quoted name")),
        }
    }

    /// `DESC` payload.
    fn qdstring(&mut self) -> SchemaResult<String> {
        match self.tokens.next() {
            Some(Token::Quoted(value)) => Ok(value),
            _ => Err(invalid(self.kind, "expected quoted string")),
        }
    }

    /// One OID, or a `$`-separated parenthesized list.
    fn oids(&mut self) -> SchemaResult<Vec<String>> {
        match self.tokens.next() {
            Some(Token::Word(single)) => Ok(vec![single]),
            Some(Token::Quoted(single)) => Ok(vec![single]),
            Some(Token::LParen) => {
                let mut oids = Vec::new();
                loop {
                    match self.tokens.next() {
                        Some(Token::Word(oid)) | Some(Token::Quoted(oid)) => oids.push(oid),
                        Some(Token::Dollar) => {}
                        Some(Token::RParen) => break,
                        _ => return Err(invalid(self.kind, "malformed oid list")),
                    }
                }
                Ok(oids)
            }
            _ => Err(invalid(self.kind, "expected oid")),
        }
    }

    fn single_oid(&mut self) -> SchemaResult<String> {
        match self.tokens.next() {
            Some(Token::Word(word)) => Ok(word),
            Some(Token::Quoted(word)) => Ok(word),
            _ => Err(invalid(self.kind, "expected oid")),
        }
    }

    /// `X-…` payload: one quoted value or a parenthesized quoted list.
    fn extension_values(&mut self) -> SchemaResult<Vec<String>> {
        match self.tokens.next() {
            Some(Token::Quoted(value)) => Ok(vec![value]),
            Some(Token::Word(value)) => Ok(vec![value]),
            Some(Token::LParen) => {
                let mut values = Vec::new();
                loop {
                    match self.tokens.next() {
                        Some(Token::Quoted(value)) | Some(Token::Word(value)) => {
                            values.push(value)
                        }
                        Some(Token::Dollar) => {}
                        Some(Token::RParen) => break,
                        _ => return Err(invalid(self.kind, "malformed extension list")),
                    }
                }
                Ok(values)
            }
            _ => Err(invalid(self.kind, "expected extension value")),
        }
    }

    fn extension(
        &mut self,
        keyword: &str,
        extensions: &mut Extensions,
    ) -> SchemaResult<bool> {
        if keyword.starts_with("X-") {
            extensions.push(keyword.to_owned(), self.extension_values()?);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn finish(&mut self) -> SchemaResult<()> {
        if self.tokens.at_final() {
            Ok(())
        } else {
            Err(invalid(self.kind, "trailing tokens after definition"))
        }
    }
}

/// Parses an `ldapSyntaxes` definition.
pub fn ldap_syntax(input: &str) -> SchemaResult<LdapSyntax> {
    const KIND: &str = "ldapSyntax";
    let mut parser = Parser::new(input, KIND);
    let mut record = LdapSyntax {
        numeric_oid: parser.leading_identifier()?,
        ..LdapSyntax::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "DESC" => record.description = Some(parser.qdstring()?),
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    Ok(record)
}

/// Parses a `matchingRules` definition. `SYNTAX` is required.
pub fn matching_rule(input: &str) -> SchemaResult<MatchingRule> {
    const KIND: &str = "matchingRule";
    let mut parser = Parser::new(input, KIND);
    let mut record = MatchingRule {
        numeric_oid: parser.leading_identifier()?,
        ..MatchingRule::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "NAME" => record.names = parser.qdescrs()?,
            "DESC" => record.description = Some(parser.qdstring()?),
            "OBSOLETE" => record.obsolete = true,
            "SYNTAX" => record.syntax_oid = parser.single_oid()?,
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    if record.syntax_oid.is_empty() {
        return Err(invalid(KIND, "SYNTAX clause is required"));
    }
    Ok(record)
}

/// Parses a `matchingRuleUse` definition.
pub fn matching_rule_use(input: &str) -> SchemaResult<MatchingRuleUse> {
    const KIND: &str = "matchingRuleUse";
    let mut parser = Parser::new(input, KIND);
    let mut record = MatchingRuleUse {
        numeric_oid: parser.leading_identifier()?,
        ..MatchingRuleUse::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "NAME" => record.names = parser.qdescrs()?,
            "DESC" => record.description = Some(parser.qdstring()?),
            "OBSOLETE" => record.obsolete = true,
            "APPLIES" => record.applies = parser.oids()?,
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    Ok(record)
}

/// Parses an `attributeTypes` definition, including the `{n}` bound on
/// `SYNTAX`.
pub fn attribute_type(input: &str) -> SchemaResult<AttributeType> {
    const KIND: &str = "attributeType";
    let mut parser = Parser::new(input, KIND);
    let mut record = AttributeType {
        numeric_oid: parser.leading_identifier()?,
        ..AttributeType::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "NAME" => record.names = parser.qdescrs()?,
            "DESC" => record.description = Some(parser.qdstring()?),
            "OBSOLETE" => record.obsolete = true,
            "SUP" => record.super_type = Some(parser.single_oid()?),
            "EQUALITY" => record.equality = Some(parser.single_oid()?),
            "ORDERING" => record.ordering = Some(parser.single_oid()?),
            "SUBSTR" | "SUBSTRING" => record.substr = Some(parser.single_oid()?),
            "SYNTAX" => {
                let raw = parser.single_oid()?;
                let (oid, bound) = split_bound(&raw, KIND)?;
                record.syntax_oid = Some(oid);
                record.min_upper_bound = bound;
            }
            "SINGLE-VALUE" => record.single_value = true,
            "COLLECTIVE" => record.collective = true,
            "NO-USER-MODIFICATION" => record.no_user_modification = true,
            "USAGE" => {
                let word = parser.single_oid()?;
                record.usage = AttributeUsage::parse(&word)
                    .ok_or_else(|| invalid(KIND, format!("unknown usage '{word}'")))?;
            }
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    Ok(record)
}

fn split_bound(raw: &str, kind: &'static str) -> SchemaResult<(String, Option<u32>)> {
    match raw.split_once('{') {
        None => Ok((raw.to_owned(), None)),
        Some((oid, rest)) => {
            let digits = rest
                .strip_suffix('}')
                .ok_or_else(|| invalid(kind, "unterminated syntax bound"))?;
            let bound = digits
                .parse::<u32>()
                .map_err(|_| invalid(kind, "bad syntax bound"))?;
            Ok((oid.to_owned(), Some(bound)))
        }
    }
}

/// Parses an `objectClasses` definition.
pub fn object_class(input: &str) -> SchemaResult<ObjectClass> {
    const KIND: &str = "objectClass";
    let mut parser = Parser::new(input, KIND);
    let mut record = ObjectClass {
        numeric_oid: parser.leading_identifier()?,
        ..ObjectClass::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "NAME" => record.names = parser.qdescrs()?,
            "DESC" => record.description = Some(parser.qdstring()?),
            "OBSOLETE" => record.obsolete = true,
            "SUP" => record.super_classes = parser.oids()?,
            "STRUCTURAL" => record.kind = ObjectClassKind::Structural,
            "AUXILIARY" => record.kind = ObjectClassKind::Auxiliary,
            "ABSTRACT" => record.kind = ObjectClassKind::Abstract,
            "MUST" => record.must = parser.oids()?,
            "MAY" => record.may = parser.oids()?,
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    Ok(record)
}

/// Parses a `dITContentRules` definition.
pub fn dit_content_rule(input: &str) -> SchemaResult<DitContentRule> {
    const KIND: &str = "dITContentRule";
    let mut parser = Parser::new(input, KIND);
    let mut record = DitContentRule {
        numeric_oid: parser.leading_identifier()?,
        ..DitContentRule::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "NAME" => record.names = parser.qdescrs()?,
            "DESC" => record.description = Some(parser.qdstring()?),
            "OBSOLETE" => record.obsolete = true,
            "AUX" => record.aux = parser.oids()?,
            "MUST" => record.must = parser.oids()?,
            "MAY" => record.may = parser.oids()?,
            "NOT" => record.not = parser.oids()?,
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    Ok(record)
}

/// Parses a `nameForms` definition. `OC` and a non-empty `MUST` are
/// required.
pub fn name_form(input: &str) -> SchemaResult<NameForm> {
    const KIND: &str = "nameForm";
    let mut parser = Parser::new(input, KIND);
    let mut record = NameForm {
        numeric_oid: parser.leading_identifier()?,
        ..NameForm::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "NAME" => record.names = parser.qdescrs()?,
            "DESC" => record.description = Some(parser.qdstring()?),
            "OBSOLETE" => record.obsolete = true,
            "OC" => record.object_class = parser.single_oid()?,
            "MUST" => record.must = parser.oids()?,
            "MAY" => record.may = parser.oids()?,
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    if record.object_class.is_empty() {
        return Err(invalid(KIND, "OC clause is required"));
    }
    if record.must.is_empty() {
        return Err(invalid(KIND, "MUST clause is required and non-empty"));
    }
    Ok(record)
}

/// Parses a `dITStructureRules` definition. The identifier is an integer
/// rule ID and `FORM` is required.
pub fn dit_structure_rule(input: &str) -> SchemaResult<DitStructureRule> {
    const KIND: &str = "dITStructureRule";
    let mut parser = Parser::new(input, KIND);
    let identifier = parser.leading_identifier()?;
    let rule_id = identifier
        .parse::<u32>()
        .map_err(|_| invalid(KIND, format!("bad rule ID '{identifier}'")))?;
    let mut record = DitStructureRule {
        rule_id,
        ..DitStructureRule::default()
    };
    while let Some(keyword) = parser.keyword()? {
        match keyword.as_str() {
            "NAME" => record.names = parser.qdescrs()?,
            "DESC" => record.description = Some(parser.qdstring()?),
            "OBSOLETE" => record.obsolete = true,
            "FORM" => record.form = parser.single_oid()?,
            "SUP" => {
                let mut rules = Vec::new();
                for word in parser.oids()? {
                    rules.push(
                        word.parse::<u32>()
                            .map_err(|_| invalid(KIND, format!("bad rule ID '{word}'")))?,
                    );
                }
                record.super_rules = rules;
            }
            other if parser.extension(other, &mut record.extensions)? => {}
            other => return Err(invalid(KIND, format!("unknown keyword '{other}'"))),
        }
    }
    parser.finish()?;
    if record.form.is_empty() {
        return Err(invalid(KIND, "FORM clause is required"));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attribute_type_full_clause_set() {
        let record = attribute_type(
            "( 2.5.4.3 NAME ( 'cn' 'commonName' ) DESC 'RFC4519: common name' \
             SUP name EQUALITY caseIgnoreMatch SUBSTR caseIgnoreSubstringsMatch \
             SYNTAX 1.3.6.1.4.1.1466.115.121.1.15{32768} SINGLE-VALUE \
             USAGE userApplications X-ORIGIN 'RFC 4519' )",
        )
        .unwrap();
        assert_eq!(record.numeric_oid, "2.5.4.3");
        assert_eq!(record.names, vec!["cn", "commonName"]);
        assert_eq!(record.super_type.as_deref(), Some("name"));
        assert_eq!(record.min_upper_bound, Some(32768));
        assert!(record.single_value);
        assert_eq!(record.extensions.get("X-ORIGIN").unwrap(), ["RFC 4519".to_owned()]);
    }

    #[test]
    fn definition_round_trips_through_render() {
        let text = "( 2.5.6.6 NAME 'person' SUP top STRUCTURAL MUST ( sn $ cn ) MAY ( userPassword $ telephoneNumber ) )";
        let record = object_class(text).unwrap();
        assert_eq!(record.to_string(), text);
        assert_eq!(object_class(&record.to_string()).unwrap(), record);
    }

    #[test]
    fn unknown_keyword_is_invalid_definition() {
        assert!(matches!(
            object_class("( 2.5.6.6 NAME 'person' FLAVOUR vanilla )"),
            Err(SchemaError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn x_extensions_are_collected_in_order() {
        let record = ldap_syntax(
            "( 1.3.6.1.4.1.1466.115.121.1.44 DESC 'Printable String' \
             X-PATTERN '^[A-Za-z0-9]+$' X-NOT-HUMAN-READABLE 'FALSE' )",
        )
        .unwrap();
        let collected: Vec<&str> = record.extensions.iter().map(|(name, _)| name).collect();
        assert_eq!(collected, vec!["X-PATTERN", "X-NOT-HUMAN-READABLE"]);
    }

    #[test]
    fn structure_rule_ids_are_integers() {
        let record = dit_structure_rule("( 2 NAME 'uddiBusinessEntityStructureRule' FORM uddiBusinessEntityNameForm SUP ( 1 2 ) )").unwrap();
        assert_eq!(record.rule_id, 2);
        assert_eq!(record.super_rules, vec![1, 2]);
        assert!(dit_structure_rule("( two FORM nf )").is_err());
    }

    #[test]
    fn required_clauses_enforced() {
        assert!(matching_rule("( 2.5.13.2 NAME 'caseIgnoreMatch' )").is_err());
        assert!(name_form("( 1.2.3 NAME 'nf' OC person )").is_err());
        assert!(name_form("( 1.2.3 NAME 'nf' MUST cn )").is_err());
        assert!(dit_structure_rule("( 1 NAME 'r' )").is_err());
    }
}
