//! # The DER bridge
//!
//! Distinguished Encoding Rules marshal/unmarshal for the handful of
//! universal types the directory layer exchanges in binary form: INTEGER,
//! OBJECT IDENTIFIER, BOOLEAN, BIT STRING, OCTET STRING, ENUMERATED,
//! GeneralizedTime, UTCTime, and the 16-octet UUID form, together with a
//! runtime [`choice::Choices`] registry for tag-dispatched alternatives.
//!
//! Only strict DER is accepted: definite, minimally-encoded lengths,
//! primitive string encodings, and no bytes past the end of the value.

pub mod choice;
mod de;
mod enc;

pub use self::{
    de::{
        decode_bit_string, decode_boolean, decode_enumerated, decode_generalized_time,
        decode_integer, decode_object_identifier, decode_octet_string, decode_utc_time,
        decode_uuid,
    },
    enc::{
        encode_bit_string, encode_boolean, encode_enumerated, encode_generalized_time,
        encode_integer, encode_object_identifier, encode_octet_string, encode_utc_time,
        encode_uuid,
    },
};

use crate::tag::Tag;

/// The identifier octets of a TLV: its tag plus the constructed bit.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Identifier {
    pub tag: Tag,
    pub constructed: bool,
}

impl Identifier {
    pub const fn new(tag: Tag, constructed: bool) -> Self {
        Self { tag, constructed }
    }

    pub const fn primitive(tag: Tag) -> Self {
        Self::new(tag, false)
    }

    pub const fn is_primitive(&self) -> bool {
        !self.constructed
    }
}

/// The raw bit payload of a BIT STRING value.
pub type Bits = bitvec::vec::BitVec<u8, bitvec::order::Msb0>;

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use pretty_assertions::assert_eq;

    #[test]
    fn integer_round_trip() {
        for value in [0i64, 1, -1, 127, 128, -128, -129, 255, 256, 65535, -65536] {
            let value = BigInt::from(value);
            let encoded = encode_integer(&value);
            assert_eq!(decode_integer(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn integer_wire_form() {
        assert_eq!(encode_integer(&BigInt::from(0)), &[0x02, 0x01, 0x00]);
        assert_eq!(encode_integer(&BigInt::from(127)), &[0x02, 0x01, 0x7F]);
        assert_eq!(encode_integer(&BigInt::from(128)), &[0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encode_integer(&BigInt::from(-128)), &[0x02, 0x01, 0x80]);
    }

    #[test]
    fn boolean_wire_form() {
        assert_eq!(encode_boolean(true), &[0x01, 0x01, 0xFF]);
        assert_eq!(encode_boolean(false), &[0x01, 0x01, 0x00]);
        assert!(decode_boolean(&[0x01, 0x01, 0xFF]).unwrap());
        // DER requires TRUE to be exactly 0xFF.
        assert!(decode_boolean(&[0x01, 0x01, 0x01]).is_err());
    }

    #[test]
    fn oid_round_trip() {
        let arcs = [2u32, 5, 4, 3];
        let encoded = encode_object_identifier(&arcs);
        assert_eq!(encoded, &[0x06, 0x03, 0x55, 0x04, 0x03]);
        assert_eq!(decode_object_identifier(&encoded).unwrap(), arcs);

        let arcs = [1u32, 3, 6, 1, 4, 1, 1466, 115, 121, 1, 15];
        let encoded = encode_object_identifier(&arcs);
        assert_eq!(decode_object_identifier(&encoded).unwrap(), arcs);
    }

    #[test]
    fn enumerated_substitutes_tag() {
        let allowed = [(0i128, "baseObject"), (1, "oneLevel"), (2, "wholeSubtree")];
        let encoded = encode_enumerated(1);
        assert_eq!(encoded, &[0x0A, 0x01, 0x01]);
        assert_eq!(decode_enumerated(&encoded, &allowed).unwrap(), (1, "oneLevel"));
        assert!(decode_enumerated(&[0x0A, 0x01, 0x05], &allowed).is_err());
    }

    #[test]
    fn trailing_bytes_rejected() {
        assert!(decode_boolean(&[0x01, 0x01, 0x00, 0x00]).is_err());
        assert!(decode_integer(&[0x02, 0x01, 0x00, 0xFF]).is_err());
    }

    #[test]
    fn indefinite_length_rejected() {
        assert!(decode_octet_string(&[0x04, 0x80, 0xAB, 0x00, 0x00]).is_err());
    }
}
