//! Decoding strict DER.

use nom::IResult;

use super::{Bits, Identifier};
use crate::error::{Asn1Error, Asn1Result};
use crate::tag::{Class, Tag};

pub(crate) fn parse_value(input: &[u8]) -> IResult<&[u8], (Identifier, &[u8])> {
    let (input, identifier) = parse_identifier_octet(input)?;
    let (input, contents) = parse_contents(input)?;

    Ok((input, (identifier, contents)))
}

pub(crate) fn parse_identifier_octet(input: &[u8]) -> IResult<&[u8], Identifier> {
    let (input, octet) = nom::bytes::complete::take(1usize)(input)?;
    let initial_octet = octet[0];

    let class = Class::from_u8((initial_octet & 0xC0) >> 6);
    let constructed = (initial_octet & 0x20) != 0;
    let number = u32::from(initial_octet & 0x1F);

    let (input, number) = if number >= 0x1F {
        parse_base128(input)?
    } else {
        (input, number)
    };

    Ok((input, Identifier::new(Tag::new(class, number), constructed)))
}

/// A big-endian run of 7-bit groups, all but the last flagged in the
/// eighth bit.
fn parse_base128(input: &[u8]) -> IResult<&[u8], u32> {
    let (input, body) = nom::bytes::complete::take_while(|i| i & 0x80 != 0)(input)?;
    let (input, end) = nom::bytes::complete::take(1usize)(input)?;

    let mut number = 0u32;
    for byte in body.iter().chain(end) {
        number = (number << 7) | u32::from(byte & 0x7F);
    }

    Ok((input, number))
}

fn parse_contents(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, length) = nom::bytes::complete::take(1usize)(input)?;
    let length = length[0];

    if length < 0x80 {
        nom::bytes::complete::take(length)(input)
    } else {
        // 0x80 (indefinite) and 0xFF are not DER; the caller turns the nom
        // failure into `Asn1Error::Parser`.
        let count = length & 0x7F;
        if count == 0 || count > 8 {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::LengthValue,
            )));
        }
        let (input, length_slice) = nom::bytes::complete::take(count)(input)?;
        let mut length: usize = 0;
        for byte in length_slice {
            length = (length << 8) | usize::from(*byte);
        }
        // Minimal form: the long form must have been necessary.
        if length < 0x80 || length_slice[0] == 0 {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::LengthValue,
            )));
        }
        nom::bytes::complete::take(length)(input)
    }
}

/// Parses one complete TLV and requires the input to end with it.
pub(crate) fn parse_single(input: &[u8], expected: Tag) -> Asn1Result<(Identifier, &[u8])> {
    let (rest, (identifier, contents)) = parse_value(input).map_err(|_| Asn1Error::Parser)?;
    if !rest.is_empty() {
        return Err(Asn1Error::TrailingBytes { count: rest.len() });
    }
    if identifier.tag != expected {
        return Err(Asn1Error::InvalidTag {
            expected,
            found: identifier.tag,
        });
    }
    Ok((identifier, contents))
}

fn integer_from_contents(contents: &[u8]) -> Asn1Result<num_bigint::BigInt> {
    if contents.is_empty() {
        return Err(Asn1Error::Parser);
    }
    // DER forbids redundant leading octets in either sign.
    if contents.len() > 1 {
        let redundant = (contents[0] == 0x00 && contents[1] & 0x80 == 0)
            || (contents[0] == 0xFF && contents[1] & 0x80 != 0);
        if redundant {
            return Err(Asn1Error::InvalidLength);
        }
    }
    Ok(num_bigint::BigInt::from_signed_bytes_be(contents))
}

/// Decodes a DER INTEGER.
pub fn decode_integer(input: &[u8]) -> Asn1Result<num_bigint::BigInt> {
    let (identifier, contents) = parse_single(input, Tag::INTEGER)?;
    if !identifier.is_primitive() {
        return Err(Asn1Error::Parser);
    }
    integer_from_contents(contents)
}

/// Decodes a DER BOOLEAN. DER restricts TRUE to the single octet `0xFF`.
pub fn decode_boolean(input: &[u8]) -> Asn1Result<bool> {
    let (identifier, contents) = parse_single(input, Tag::BOOL)?;
    if !identifier.is_primitive() || contents.len() != 1 {
        return Err(Asn1Error::Parser);
    }
    match contents[0] {
        0x00 => Ok(false),
        0xFF => Ok(true),
        _ => Err(Asn1Error::Parser),
    }
}

/// Decodes a DER ENUMERATED and verifies membership in `allowed`,
/// returning the matched `(value, label)` pair.
pub fn decode_enumerated<'a>(
    input: &[u8],
    allowed: &[(i128, &'a str)],
) -> Asn1Result<(i128, &'a str)> {
    let (identifier, contents) = parse_single(input, Tag::ENUMERATED)?;
    if !identifier.is_primitive() {
        return Err(Asn1Error::Parser);
    }
    let value = integer_from_contents(contents)?;
    let value = num_traits::ToPrimitive::to_i128(&value).ok_or(Asn1Error::Parser)?;
    allowed
        .iter()
        .find(|(candidate, _)| *candidate == value)
        .map(|(candidate, label)| (*candidate, *label))
        .ok_or(Asn1Error::ValueOutOfRange { value })
}

/// Decodes a DER OBJECT IDENTIFIER into its arc sequence.
pub fn decode_object_identifier(input: &[u8]) -> Asn1Result<Vec<u32>> {
    let (identifier, contents) = parse_single(input, Tag::OBJECT_IDENTIFIER)?;
    if !identifier.is_primitive() || contents.is_empty() {
        return Err(Asn1Error::Parser);
    }

    let mut arcs = Vec::new();
    let mut rest = contents;
    let mut first = true;
    while !rest.is_empty() {
        let (next, sub_identifier) = parse_base128(rest).map_err(|_| Asn1Error::Parser)?;
        rest = next;
        if first {
            // X.690 8.19.4: the leading subidentifier folds the first two
            // arcs as `X*40 + Y`.
            let (x, y) = if sub_identifier < 40 {
                (0, sub_identifier)
            } else if sub_identifier < 80 {
                (1, sub_identifier - 40)
            } else {
                (2, sub_identifier - 80)
            };
            arcs.push(x);
            arcs.push(y);
            first = false;
        } else {
            arcs.push(sub_identifier);
        }
    }
    Ok(arcs)
}

/// Decodes a primitive DER BIT STRING into its bit sequence.
pub fn decode_bit_string(input: &[u8]) -> Asn1Result<Bits> {
    let (identifier, contents) = parse_single(input, Tag::BIT_STRING)?;
    if !identifier.is_primitive() || contents.is_empty() {
        return Err(Asn1Error::Parser);
    }

    let unused_bits = contents[0];
    if unused_bits > 7 || (unused_bits > 0 && contents.len() == 1) {
        return Err(Asn1Error::InvalidBitString { bits: unused_bits });
    }

    let mut bits = Bits::from_slice(&contents[1..]);
    for _ in 0..unused_bits {
        bits.pop();
    }
    Ok(bits)
}

/// Decodes a primitive DER OCTET STRING.
pub fn decode_octet_string(input: &[u8]) -> Asn1Result<bytes::Bytes> {
    let (identifier, contents) = parse_single(input, Tag::OCTET_STRING)?;
    if !identifier.is_primitive() {
        return Err(Asn1Error::Parser);
    }
    Ok(bytes::Bytes::copy_from_slice(contents))
}

fn utf8_contents(contents: &[u8]) -> Asn1Result<&str> {
    core::str::from_utf8(contents).map_err(|_| Asn1Error::InvalidUtf8)
}

/// Decodes a DER GeneralizedTime (`YYYYMMDDHHMMSS[.f+]Z`).
pub fn decode_generalized_time(
    input: &[u8],
) -> Asn1Result<chrono::DateTime<chrono::FixedOffset>> {
    let (identifier, contents) = parse_single(input, Tag::GENERALIZED_TIME)?;
    if !identifier.is_primitive() {
        return Err(Asn1Error::Parser);
    }
    let text = utf8_contents(contents)?;
    // DER restricts the time to UTC with a literal `Z`.
    let format = if text.contains('.') {
        "%Y%m%d%H%M%S%.fZ"
    } else {
        "%Y%m%d%H%M%SZ"
    };
    chrono::NaiveDateTime::parse_from_str(text, format)
        .map_err(|_| Asn1Error::InvalidDate)
        .map(|date| date.and_utc().fixed_offset())
}

/// Decodes a DER UTCTime (`YYMMDDHHMMSSZ`).
pub fn decode_utc_time(input: &[u8]) -> Asn1Result<chrono::DateTime<chrono::Utc>> {
    let (identifier, contents) = parse_single(input, Tag::UTC_TIME)?;
    if !identifier.is_primitive() {
        return Err(Asn1Error::Parser);
    }
    let text = utf8_contents(contents)?;
    chrono::NaiveDateTime::parse_from_str(text, "%y%m%d%H%M%SZ")
        .map_err(|_| Asn1Error::InvalidDate)
        .map(|date| date.and_utc())
}

/// Decodes the RFC 4530 16-octet UUID form.
pub fn decode_uuid(input: &[u8]) -> Asn1Result<uuid::Uuid> {
    let (identifier, contents) = parse_single(input, Tag::OCTET_STRING)?;
    if !identifier.is_primitive() {
        return Err(Asn1Error::Parser);
    }
    let octets: [u8; 16] = contents.try_into().map_err(|_| Asn1Error::Parser)?;
    Ok(uuid::Uuid::from_bytes(octets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn long_length_form() {
        let mut value = vec![0x04, 0x81, 0x80];
        value.extend_from_slice(&[0xAB; 0x80]);
        let decoded = decode_octet_string(&value).unwrap();
        assert_eq!(&*decoded, &[0xAB; 0x80][..]);
    }

    #[test]
    fn non_minimal_length_rejected() {
        // 0x81 0x05 says "long form" for a length that fits short form.
        assert!(decode_octet_string(&[0x04, 0x81, 0x05, 1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn non_minimal_integer_rejected() {
        assert!(decode_integer(&[0x02, 0x02, 0x00, 0x7F]).is_err());
        assert!(decode_integer(&[0x02, 0x02, 0xFF, 0x80]).is_err());
    }

    #[test]
    fn bit_string_unused_bits() {
        let bits = decode_bit_string(&[0x03, 0x02, 0x04, 0xB0]).unwrap();
        assert_eq!(bits.len(), 4);
        assert!(decode_bit_string(&[0x03, 0x02, 0x08, 0xB0]).is_err());
    }

    #[test]
    fn generalized_time_with_fraction() {
        let input = b"\x18\x131994(621'06:49:45Z";
        assert!(decode_generalized_time(input).is_err());

        let mut input = vec![0x18, 0x13];
        input.extend_from_slice(b"19851106210627.333Z");
        let decoded = decode_generalized_time(&input).unwrap();
        assert_eq!(
            decoded,
            chrono::NaiveDate::from_ymd_opt(1985, 11, 6)
                .unwrap()
                .and_hms_milli_opt(21, 6, 27, 333)
                .unwrap()
                .and_utc()
                .fixed_offset()
        );
    }
}
