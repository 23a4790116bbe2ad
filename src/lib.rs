#![doc = include_str!("../README.md")]

pub mod chars;
pub mod der;
pub mod error;
pub mod filter;
pub mod matching;
pub mod schema;
pub mod syntax;
pub mod tag;

#[doc(inline)]
pub use self::{
    error::{Asn1Error, SchemaError, SyntaxError},
    matching::Ternary,
    schema::SubschemaSubentry,
    syntax::{Input, Value},
};

/// A prelude with the registry, the value types, and the error types.
pub mod prelude {
    pub use crate::error::{Asn1Error, SchemaError, SyntaxError};
    pub use crate::filter::{AttributeProvider, Filter};
    pub use crate::matching::{OrderingOperator, RuleKind, Ternary};
    pub use crate::schema::*;
    pub use crate::syntax::*;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::syntax;
    use pretty_assertions::assert_eq;

    #[track_caller]
    fn render_stable(oid: &str, input: &str) {
        let first = syntax::validate(oid, Input::Text(input)).unwrap();
        let rendered = first.to_string();
        let second = syntax::validate(oid, Input::Text(&rendered)).unwrap();
        assert_eq!(first, second, "{oid}: {input}");
        assert_eq!(rendered, second.to_string(), "{oid}: {input}");
    }

    #[test]
    fn validate_render_validate_is_stable() {
        render_stable(syntax::oids::BIT_STRING, "'10100101'B");
        render_stable(syntax::oids::BOOLEAN, "TRUE");
        render_stable(syntax::oids::COUNTRY_STRING, "US");
        render_stable(syntax::oids::DN, r"cn=Doe\, Jane,ou=People,dc=example,dc=com");
        render_stable(syntax::oids::DELIVERY_METHOD, "mhs $ telephone");
        render_stable(syntax::oids::DIRECTORY_STRING, "smörgåsbord");
        render_stable(syntax::oids::ENHANCED_GUIDE, "person#(sn$EQ&cn$SUBSTR)#wholeSubtree");
        render_stable(syntax::oids::GENERALIZED_TIME, "20240229120000.5Z");
        render_stable(syntax::oids::INTEGER, "-31415926535897932384626433");
        render_stable(syntax::oids::NUMERIC_STRING, "15 079 672 281");
        render_stable(syntax::oids::OID, "1.3.6.1.4.1.1466.115.121.1.15");
        render_stable(syntax::oids::POSTAL_ADDRESS, r"\241 Fifth Ave.$Anytown, CA 12345$USA");
        render_stable(syntax::oids::PRINTABLE_STRING, "Jane Doe");
        render_stable(syntax::oids::SUBSTRING_ASSERTION, r"ab\2a*c*d");
        render_stable(syntax::oids::TELEPHONE_NUMBER, "+1 512 305 0280");
        render_stable(syntax::oids::UUID, "f81d4fae-7dec-11d0-a765-00a0c91e6bf6");
        render_stable(syntax::oids::UTC_TIME, "9901021205Z");
    }

    #[test]
    fn prelude_is_self_sufficient() {
        let subentry = SubschemaSubentry::new(true);
        assert!(subentry.counters().total > 0);
        let _: Ternary = Ternary::True.and(Ternary::Undefined);
    }
}
