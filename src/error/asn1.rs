use snafu::Snafu;

use crate::tag::Tag;

/// DER encode/decode failures.
#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum Asn1Error {
    /// The TLV framing could not be parsed.
    #[snafu(display("malformed DER framing"))]
    Parser,

    /// Bytes remained after the complete value was consumed.
    #[snafu(display("{count} trailing bytes after DER value"))]
    TrailingBytes { count: usize },

    /// The decoded identifier octets did not carry the expected tag.
    #[snafu(display("expected {expected:?}, found {found:?}"))]
    InvalidTag { expected: Tag, found: Tag },

    /// A length octet sequence violated the DER minimal-length rule.
    #[snafu(display("non-minimal or oversized DER length"))]
    InvalidLength,

    /// No registered CHOICE alternative accepted the incoming tag.
    #[snafu(display("no matching alternative for tag {found:?}"))]
    NoMatchingAlternative { found: Tag },

    /// An ENUMERATED value was outside the caller-supplied allowed set.
    #[snafu(display("enumerated value {value} not among the permitted values"))]
    ValueOutOfRange { value: i128 },

    /// A time value did not parse as a calendar date.
    #[snafu(display("invalid encoded date"))]
    InvalidDate,

    /// String contents were not valid UTF-8.
    #[snafu(display("invalid UTF-8 in string contents"))]
    InvalidUtf8,

    /// BIT STRING carried an impossible unused-bit count.
    #[snafu(display("invalid bit string: {bits} unused bits"))]
    InvalidBitString { bits: u8 },
}
