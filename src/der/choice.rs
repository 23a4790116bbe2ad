//! A runtime CHOICE registry.
//!
//! Directory structures such as the subtree-specification refinement carry
//! context-tagged alternatives whose set is fixed by the caller, not by
//! this crate. [`Choices`] holds that set and resolves an incoming TLV to
//! the alternative whose tag accepts it.

use super::de::parse_value;
use crate::error::{Asn1Error, Asn1Result};
use crate::tag::Tag;

/// One pre-registered CHOICE alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    pub name: &'static str,
    pub tag: Tag,
}

impl Alternative {
    pub const fn new(name: &'static str, tag: Tag) -> Self {
        Self { name, tag }
    }
}

/// The alternative selected by [`Choices::unmarshal`], with its raw
/// contents octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selected<'input> {
    pub name: &'static str,
    pub tag: Tag,
    pub constructed: bool,
    pub contents: &'input [u8],
}

/// An ordered set of CHOICE alternatives keyed by tag.
#[derive(Debug, Clone, Default)]
pub struct Choices {
    alternatives: Vec<Alternative>,
}

impl Choices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a fixed alternative list.
    pub fn from_alternatives(alternatives: impl IntoIterator<Item = Alternative>) -> Self {
        Self {
            alternatives: alternatives.into_iter().collect(),
        }
    }

    /// Registers `name` under `tag`. Later registrations of the same tag
    /// are shadowed by earlier ones during dispatch.
    pub fn register(&mut self, name: &'static str, tag: Tag) {
        self.alternatives.push(Alternative::new(name, tag));
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Parses one TLV and selects the alternative registered for its tag.
    ///
    /// All alternatives are tried; a value whose tag none of them accepts
    /// yields a single [`Asn1Error::NoMatchingAlternative`]. Trailing bytes
    /// after the value are an error.
    pub fn unmarshal<'input>(&self, input: &'input [u8]) -> Asn1Result<Selected<'input>> {
        let (rest, (identifier, contents)) = parse_value(input).map_err(|_| Asn1Error::Parser)?;
        if !rest.is_empty() {
            return Err(Asn1Error::TrailingBytes { count: rest.len() });
        }

        self.alternatives
            .iter()
            .find(|alternative| alternative.tag == identifier.tag)
            .map(|alternative| Selected {
                name: alternative.name,
                tag: identifier.tag,
                constructed: identifier.constructed,
                contents,
            })
            .ok_or(Asn1Error::NoMatchingAlternative {
                found: identifier.tag,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::der::enc::encode_tlv;
    use pretty_assertions::assert_eq;

    fn refinement_choices() -> Choices {
        Choices::from_alternatives([
            Alternative::new("item", Tag::context(0)),
            Alternative::new("and", Tag::context(1)),
            Alternative::new("or", Tag::context(2)),
            Alternative::new("not", Tag::context(3)),
        ])
    }

    #[test]
    fn selects_by_tag() {
        let choices = refinement_choices();
        let encoded = encode_tlv(Tag::context(2), true, &[0x05, 0x00]);
        let selected = choices.unmarshal(&encoded).unwrap();
        assert_eq!(selected.name, "or");
        assert_eq!(selected.contents, &[0x05, 0x00]);
        assert!(selected.constructed);
    }

    #[test]
    fn unknown_tag_is_one_error() {
        let choices = refinement_choices();
        let encoded = encode_tlv(Tag::context(9), false, &[]);
        assert_eq!(
            choices.unmarshal(&encoded),
            Err(Asn1Error::NoMatchingAlternative {
                found: Tag::context(9)
            })
        );
    }

    #[test]
    fn trailing_bytes_rejected() {
        let choices = refinement_choices();
        let mut encoded = encode_tlv(Tag::context(0), false, &[0x01]);
        encoded.push(0xFF);
        assert_eq!(
            choices.unmarshal(&encoded),
            Err(Asn1Error::TrailingBytes { count: 1 })
        );
    }
}
