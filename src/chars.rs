//! Character classes and small codec helpers shared by the syntax checkers.
//!
//! The multibyte routines implement the `UTFMB` production of RFC 4512
//! §1.4 directly over bytes, rather than trusting the platform decoder, so
//! byte-sequence inputs are held to exactly the ranges the grammar names.

/// `ALPHA = %x41-5A / %x61-7A`
pub const fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// `DIGIT = %x30-39`
pub const fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// `UAlpha`: the uppercase half of `ALPHA`.
pub const fn is_ualpha(ch: char) -> bool {
    ch.is_ascii_uppercase()
}

/// The X.680 PrintableString character set:
/// letters, digits, `'()+,-./:=?` and SPACE.
pub const fn is_printable_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '=' | '/' | ':' | '?' | ' '
        )
}

/// IA5 covers the full ISO 646 range, `%x00-7F`.
pub const fn is_ia5(ch: char) -> bool {
    (ch as u32) <= 0x7F
}

/// The T.61 byte repertoire: a handful of control functions, the ASCII
/// graphic range, and the right-hand graphic set.
pub const fn is_teletex_byte(byte: u8) -> bool {
    matches!(
        byte,
        0x08 | 0x0A | 0x0C | 0x0D | 0x0E | 0x0F | 0x19 | 0x1A | 0x1B | 0x1D
            | 0x20..=0x7E
            | 0xA1..=0xFF
    )
}

/// RFC 4512 whitespace: SPACE, TAB, CR, LF.
pub const fn is_ldap_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Whether `ch` would be emitted as a `UTFMB` multibyte sequence.
pub const fn is_utfmb(ch: char) -> bool {
    (ch as u32) >= 0x80
}

/// Decodes one scalar value from the head of `bytes`, accepting exactly the
/// `UTF1` / `UTF2` / `UTF3` / `UTF4` shapes of RFC 4512 §1.4. Returns the
/// scalar and the number of bytes consumed, or `None` on any sequence the
/// grammar excludes (overlong forms, surrogates, the out-of-range UTF-4
/// tail).
pub fn utf8_char(bytes: &[u8]) -> Option<(char, usize)> {
    let utf0 = |b: u8| (0x80..=0xBF).contains(&b);
    let first = *bytes.first()?;

    match first {
        0x00..=0x7F => Some((first as char, 1)),
        0xC2..=0xDF => {
            let b1 = *bytes.get(1)?;
            if !utf0(b1) {
                return None;
            }
            let value = (u32::from(first & 0x1F) << 6) | u32::from(b1 & 0x3F);
            Some((char::from_u32(value)?, 2))
        }
        0xE0..=0xEF => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            let head_ok = match first {
                0xE0 => (0xA0..=0xBF).contains(&b1),
                // 0xED with a tail above 0x9F would land in the surrogate
                // range U+D800..U+DFFF.
                0xED => (0x80..=0x9F).contains(&b1),
                _ => utf0(b1),
            };
            if !(head_ok && utf0(b2)) {
                return None;
            }
            let value = (u32::from(first & 0x0F) << 12)
                | (u32::from(b1 & 0x3F) << 6)
                | u32::from(b2 & 0x3F);
            Some((char::from_u32(value)?, 3))
        }
        0xF0..=0xF4 => {
            let b1 = *bytes.get(1)?;
            let b2 = *bytes.get(2)?;
            let b3 = *bytes.get(3)?;
            let head_ok = match first {
                0xF0 => (0x90..=0xBF).contains(&b1),
                // 0xF4 tails above 0x8F exceed U+10FFFF.
                0xF4 => (0x80..=0x8F).contains(&b1),
                _ => utf0(b1),
            };
            if !(head_ok && utf0(b2) && utf0(b3)) {
                return None;
            }
            let value = (u32::from(first & 0x07) << 18)
                | (u32::from(b1 & 0x3F) << 12)
                | (u32::from(b2 & 0x3F) << 6)
                | u32::from(b3 & 0x3F);
            Some((char::from_u32(value)?, 4))
        }
        _ => None,
    }
}

/// Validates that `bytes` is a well-formed sequence of RFC 4512 UTF-8
/// scalars and returns it as `&str`.
pub fn utf8_str(bytes: &[u8]) -> Option<&str> {
    let mut rest = bytes;
    while !rest.is_empty() {
        let (_, used) = utf8_char(rest)?;
        rest = &rest[used..];
    }
    // All shapes above are a subset of standard UTF-8.
    core::str::from_utf8(bytes).ok()
}

/// Splits `input` on `sep`, treating `esc` as an escape that strips the
/// following byte of its separator role. Escapes are preserved in the
/// output fields.
pub fn split_unescaped(input: &str, sep: u8, esc: u8) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut fields = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == esc {
            index += 2;
        } else if bytes[index] == sep {
            fields.push(&input[start..index]);
            start = index + 1;
            index += 1;
        } else {
            index += 1;
        }
    }
    fields.push(&input[start.min(input.len())..]);
    fields
}

/// Strips a shell-style `#` comment, honouring single quotes so that a
/// quoted `#` inside a definition survives.
pub fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '\'' => quoted = !quoted,
            '#' if !quoted => return &line[..index],
            _ => {}
        }
    }
    line
}

/// Folds every run of RFC 4512 whitespace to a single SPACE and trims the
/// ends. Used when comparing syntax descriptions.
pub fn collapse_whitespace(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_gap = true;
    for ch in input.chars() {
        if is_ldap_space(ch) {
            if !in_gap {
                output.push(' ');
                in_gap = true;
            }
        } else {
            output.push(ch);
            in_gap = false;
        }
    }
    while output.ends_with(' ') {
        output.pop();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn printable_set() {
        for ch in "AZaz09'()+,-.=/:? ".chars() {
            assert!(is_printable_char(ch), "{ch:?} should be printable");
        }
        for ch in "\"@;<>[]{}*#_!&%$^~`|\\".chars() {
            assert!(!is_printable_char(ch), "{ch:?} should not be printable");
        }
    }

    #[test]
    fn multibyte_accepts_each_arm() {
        assert_eq!(utf8_char("é".as_bytes()), Some(('é', 2)));
        assert_eq!(utf8_char("ࠀ".as_bytes()), Some(('ࠀ', 3)));
        assert_eq!(utf8_char("\u{FFFD}".as_bytes()), Some(('\u{FFFD}', 3)));
        assert_eq!(utf8_char("𐀀".as_bytes()), Some(('𐀀', 4)));
        assert_eq!(utf8_char("\u{10FFFF}".as_bytes()), Some(('\u{10FFFF}', 4)));
    }

    #[test]
    fn multibyte_rejects_excluded_ranges() {
        // Overlong two-byte form of '/'.
        assert_eq!(utf8_char(&[0xC0, 0xAF]), None);
        // Encoded surrogate U+D800.
        assert_eq!(utf8_char(&[0xED, 0xA0, 0x80]), None);
        // One past U+10FFFF.
        assert_eq!(utf8_char(&[0xF4, 0x90, 0x80, 0x80]), None);
        // Truncated tail.
        assert_eq!(utf8_char(&[0xE2, 0x82]), None);
    }

    #[test]
    fn split_honours_escapes() {
        assert_eq!(split_unescaped("a$b$c", b'$', b'\\'), vec!["a", "b", "c"]);
        assert_eq!(split_unescaped(r"a\$b$c", b'$', b'\\'), vec![r"a\$b", "c"]);
        assert_eq!(split_unescaped("", b'$', b'\\'), vec![""]);
        assert_eq!(split_unescaped("a$", b'$', b'\\'), vec!["a", ""]);
    }

    #[test]
    fn comments_and_whitespace() {
        assert_eq!(strip_comment("abc # def"), "abc ");
        assert_eq!(strip_comment("DESC '#1' # tail"), "DESC '#1' ");
        assert_eq!(collapse_whitespace("  a\t\tb \r\n c  "), "a b c");
    }
}
