//! Encoding strict DER.

use super::{Bits, Identifier};
use crate::tag::Tag;

/// Assembles TLVs into an owned buffer.
struct Encoder {
    output: Vec<u8>,
}

impl Encoder {
    fn new() -> Self {
        Self { output: Vec::new() }
    }

    fn encode_base128(&self, number: u32, buffer: &mut Vec<u8>) {
        const SEVEN_BITS: u8 = 0x7F;
        const EIGHTH_BIT: u8 = 0x80;

        if number < u32::from(EIGHTH_BIT) {
            buffer.push(number as u8);
        } else {
            let mut groups = [0u8; 5];
            let mut count = 0;
            let mut value = number;
            while value > 0 {
                groups[count] = (value as u8) & SEVEN_BITS;
                value >>= 7;
                count += 1;
            }
            for index in (0..count).rev() {
                let continuation = if index > 0 { EIGHTH_BIT } else { 0 };
                buffer.push(continuation | groups[index]);
            }
        }
    }

    /// Encodes the identifier octets. Tag numbers above 30 spill into a
    /// base-128 run marked by the `0x1F` escape.
    fn encode_identifier(&mut self, identifier: Identifier) {
        let class = (identifier.tag.class as u8) << 6;
        let constructed = if identifier.constructed { 0x20 } else { 0 };

        if identifier.tag.value > 0x1E {
            self.output.push(class | constructed | 0x1F);
            let mut encoded = Vec::new();
            self.encode_base128(identifier.tag.value, &mut encoded);
            self.output.extend_from_slice(&encoded);
        } else {
            self.output
                .push(class | constructed | identifier.tag.value as u8);
        }
    }

    /// Definite length only, minimal octets.
    fn encode_length(&mut self, length: usize) {
        if length < 0x80 {
            self.output.push(length as u8);
        } else {
            let octets = length.to_be_bytes();
            let skip = octets.iter().take_while(|&&byte| byte == 0).count();
            let significant = &octets[skip..];
            self.output.push(0x80 | significant.len() as u8);
            self.output.extend_from_slice(significant);
        }
    }

    fn encode_primitive(mut self, tag: Tag, contents: &[u8]) -> Vec<u8> {
        self.encode_identifier(Identifier::primitive(tag));
        self.encode_length(contents.len());
        self.output.extend_from_slice(contents);
        self.output
    }
}

fn integer_contents(value: &num_bigint::BigInt) -> Vec<u8> {
    value.to_signed_bytes_be()
}

/// Encodes a DER INTEGER.
pub fn encode_integer(value: &num_bigint::BigInt) -> Vec<u8> {
    Encoder::new().encode_primitive(Tag::INTEGER, &integer_contents(value))
}

/// Encodes a DER BOOLEAN (`0xFF` for TRUE per DER).
pub fn encode_boolean(value: bool) -> Vec<u8> {
    Encoder::new().encode_primitive(Tag::BOOL, &[if value { 0xFF } else { 0x00 }])
}

/// Encodes a DER ENUMERATED: INTEGER content octets under tag `0x0A`.
pub fn encode_enumerated(value: i128) -> Vec<u8> {
    let contents = integer_contents(&num_bigint::BigInt::from(value));
    Encoder::new().encode_primitive(Tag::ENUMERATED, &contents)
}

/// Encodes a DER OBJECT IDENTIFIER from its arc sequence.
///
/// # Panics
/// If `arcs` has fewer than two components, or the leading pair violates
/// the X.660 root constraints (first arc ≤ 2, second arc ≤ 39 under roots
/// 0 and 1).
pub fn encode_object_identifier(arcs: &[u32]) -> Vec<u8> {
    assert!(arcs.len() >= 2, "OBJECT IDENTIFIER requires two arcs");
    assert!(arcs[0] <= 2, "first arc must be 0, 1, or 2");
    assert!(
        arcs[0] == 2 || arcs[1] <= 39,
        "second arc must be 39 or less under roots 0 and 1"
    );

    let mut encoder = Encoder::new();
    let mut contents = Vec::new();
    encoder.encode_base128(arcs[0] * 40 + arcs[1], &mut contents);
    for arc in &arcs[2..] {
        encoder.encode_base128(*arc, &mut contents);
    }
    encoder.encode_primitive(Tag::OBJECT_IDENTIFIER, &contents)
}

/// Encodes a primitive DER BIT STRING with its unused-bit count octet.
pub fn encode_bit_string(bits: &Bits) -> Vec<u8> {
    let unused = (8 - bits.len() % 8) % 8;
    let mut contents = Vec::with_capacity(1 + bits.len().div_ceil(8));
    contents.push(unused as u8);

    let mut padded = bits.clone();
    for _ in 0..unused {
        padded.push(false);
    }
    contents.extend_from_slice(padded.as_raw_slice());
    Encoder::new().encode_primitive(Tag::BIT_STRING, &contents)
}

/// Encodes a primitive DER OCTET STRING.
pub fn encode_octet_string(contents: &[u8]) -> Vec<u8> {
    Encoder::new().encode_primitive(Tag::OCTET_STRING, contents)
}

/// Encodes a DER GeneralizedTime in its canonical `...Z` form. Fractional
/// seconds are emitted with trailing zeros removed.
pub fn encode_generalized_time(stamp: &chrono::DateTime<chrono::FixedOffset>) -> Vec<u8> {
    let utc = stamp.with_timezone(&chrono::Utc);
    let mut text = utc.format("%Y%m%d%H%M%S%.f").to_string();
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text.push('Z');
    Encoder::new().encode_primitive(Tag::GENERALIZED_TIME, text.as_bytes())
}

/// Encodes a DER UTCTime (`YYMMDDHHMMSSZ`).
pub fn encode_utc_time(stamp: &chrono::DateTime<chrono::Utc>) -> Vec<u8> {
    let text = stamp.format("%y%m%d%H%M%SZ").to_string();
    Encoder::new().encode_primitive(Tag::UTC_TIME, text.as_bytes())
}

/// Encodes the RFC 4530 16-octet UUID form.
pub fn encode_uuid(value: &uuid::Uuid) -> Vec<u8> {
    Encoder::new().encode_primitive(Tag::OCTET_STRING, value.as_bytes())
}

/// Encodes an identifier/length prefix for caller-supplied contents, used
/// by the choice registry tests and the octet-string admission check.
pub(crate) fn encode_tlv(tag: Tag, constructed: bool, contents: &[u8]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    encoder.encode_identifier(Identifier::new(tag, constructed));
    encoder.encode_length(contents.len());
    encoder.output.extend_from_slice(contents);
    encoder.output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Class;
    use pretty_assertions::assert_eq;

    #[test]
    fn high_tag_numbers_use_base128() {
        let encoded = encode_tlv(Tag::new(Class::Context, 73), false, &[0x00]);
        assert_eq!(encoded, vec![0x9F, 0x49, 0x01, 0x00]);
    }

    #[test]
    fn long_lengths_are_minimal() {
        let contents = vec![0u8; 0x1234];
        let encoded = encode_octet_string(&contents);
        assert_eq!(&encoded[..4], &[0x04, 0x82, 0x12, 0x34]);
    }

    #[test]
    fn bit_string_pads_final_octet() {
        let mut bits = Bits::new();
        for bit in [true, false, true, true] {
            bits.push(bit);
        }
        assert_eq!(encode_bit_string(&bits), vec![0x03, 0x02, 0x04, 0xB0]);
    }

    #[test]
    fn generalized_time_strips_zero_fraction() {
        let stamp = chrono::NaiveDate::from_ymd_opt(2009, 8, 17)
            .unwrap()
            .and_hms_opt(19, 30, 4)
            .unwrap()
            .and_utc()
            .fixed_offset();
        let encoded = encode_generalized_time(&stamp);
        assert_eq!(&encoded[2..], b"20090817193004Z");
    }
}
