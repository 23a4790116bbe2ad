//! Generalized Time and UTC Time.
//!
//! RFC 4517 permits minutes and seconds to be omitted and allows the
//! fraction to qualify the smallest unit actually present, so `2009061211.5Z`
//! reads as half past eleven. Values are carried at nanosecond resolution
//! with their canonical re-rendering fixed at parse time.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

/// A Generalized Time value with its canonical `...Z` rendering.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeneralizedTime {
    stamp: DateTime<FixedOffset>,
    canonical: String,
}

impl GeneralizedTime {
    pub fn stamp(&self) -> DateTime<FixedOffset> {
        self.stamp
    }

    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "Generalized Time";
        let mut reader = Reader::new(text, SYNTAX);

        let year = reader.digits(4)?;
        let month = reader.digits(2)?;
        let day = reader.digits(2)?;
        let hour = reader.digits(2)?;
        let minute = reader.optional_digits(2)?;
        let second = match minute {
            Some(_) => reader.optional_digits(2)?,
            None => None,
        };
        let fraction = reader.fraction()?;
        let offset = reader.time_zone(false)?.ok_or_else(|| {
            SyntaxError::bad(SYNTAX, "time zone designator is required")
        })?;
        reader.finish()?;

        // The fraction qualifies the smallest unit present.
        let unit_seconds: u64 = match (minute, second) {
            (None, _) => 3600,
            (Some(_), None) => 60,
            (Some(_), Some(_)) => 1,
        };
        let extra_nanos = fraction.map_or(0, |f| f.nanos(unit_seconds));
        let whole_seconds = u64::from(hour) * 3600
            + u64::from(minute.unwrap_or(0)) * 60
            + u64::from(second.unwrap_or(0));
        let nanos_of_day = whole_seconds * 1_000_000_000 + extra_nanos;

        if hour > 23 || minute.unwrap_or(0) > 59 || second.unwrap_or(0) > 59 {
            return Err(SyntaxError::bad(SYNTAX, "time component out of range"));
        }
        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "no such calendar date"))?;
        let naive = date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| {
                midnight.checked_add_signed(chrono::Duration::nanoseconds(nanos_of_day as i64))
            })
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "time out of range"))?;

        let stamp = offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "unrepresentable local time"))?;

        let utc = stamp.with_timezone(&Utc);
        let mut canonical = utc.format("%Y%m%d%H%M%S%.f").to_string();
        trim_fraction(&mut canonical);
        canonical.push('Z');

        Ok(Self { stamp, canonical })
    }

    pub fn to_der(&self) -> Vec<u8> {
        crate::der::encode_generalized_time(&self.stamp)
    }

    pub fn from_der(input: &[u8]) -> SyntaxResult<Self> {
        let stamp = crate::der::decode_generalized_time(input)
            .map_err(|error| SyntaxError::bad("Generalized Time", error.to_string()))?;
        let mut canonical = stamp
            .with_timezone(&Utc)
            .format("%Y%m%d%H%M%S%.f")
            .to_string();
        trim_fraction(&mut canonical);
        canonical.push('Z');
        Ok(Self { stamp, canonical })
    }
}

impl core::fmt::Display for GeneralizedTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl TryFrom<&'_ str> for GeneralizedTime {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// A UTC Time value, normalized to UTC.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTime {
    stamp: DateTime<Utc>,
    canonical: String,
}

impl UtcTime {
    pub fn stamp(&self) -> DateTime<Utc> {
        self.stamp
    }

    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "UTC Time";
        let mut reader = Reader::new(text, SYNTAX);

        let year = reader.digits(2)?;
        let month = reader.digits(2)?;
        let day = reader.digits(2)?;
        let hour = reader.digits(2)?;
        let minute = reader.digits(2)?;
        let second = reader.optional_digits(2)?;
        let offset = reader
            .time_zone(true)?
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        reader.finish()?;

        if hour > 23 || minute > 59 || second.unwrap_or(0) > 59 {
            return Err(SyntaxError::bad(SYNTAX, "time component out of range"));
        }
        // X.680 sliding window: 00-49 means 20xx, 50-99 means 19xx.
        let full_year = if year < 50 { 2000 + year } else { 1900 + year };
        let date = NaiveDate::from_ymd_opt(full_year as i32, month, day)
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "no such calendar date"))?;
        let naive = date
            .and_hms_opt(hour, minute, second.unwrap_or(0))
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "time out of range"))?;
        let stamp = offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "unrepresentable local time"))?
            .with_timezone(&Utc);

        let canonical = stamp.format("%y%m%d%H%M%SZ").to_string();
        Ok(Self { stamp, canonical })
    }

    pub fn to_der(&self) -> Vec<u8> {
        crate::der::encode_utc_time(&self.stamp)
    }

    pub fn from_der(input: &[u8]) -> SyntaxResult<Self> {
        let stamp = crate::der::decode_utc_time(input)
            .map_err(|error| SyntaxError::bad("UTC Time", error.to_string()))?;
        let canonical = stamp.format("%y%m%d%H%M%SZ").to_string();
        Ok(Self { stamp, canonical })
    }
}

impl core::fmt::Display for UtcTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl TryFrom<&'_ str> for UtcTime {
    type Error = SyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

fn trim_fraction(text: &mut String) {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
}

/// A parsed `1*DIGIT` fraction.
#[derive(Clone, Copy)]
struct Fraction {
    value: u64,
    digits: u32,
}

impl Fraction {
    fn nanos(self, unit_seconds: u64) -> u64 {
        let unit_nanos = u128::from(unit_seconds) * 1_000_000_000;
        let scale = 10u128.pow(self.digits);
        (u128::from(self.value) * unit_nanos / scale) as u64
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
    syntax: &'static str,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str, syntax: &'static str) -> Self {
        Self {
            bytes: text.as_bytes(),
            position: 0,
            syntax,
        }
    }

    fn digits(&mut self, count: usize) -> SyntaxResult<u32> {
        let end = self.position + count;
        let slice = self
            .bytes
            .get(self.position..end)
            .ok_or(SyntaxError::BadLength {
                syntax: self.syntax,
                length: self.bytes.len(),
            })?;
        if !slice.iter().all(u8::is_ascii_digit) {
            return Err(SyntaxError::bad(self.syntax, "expected digits"));
        }
        self.position = end;
        let mut value = 0u32;
        for byte in slice {
            value = value * 10 + u32::from(byte - b'0');
        }
        Ok(value)
    }

    /// Reads `count` digits if the next byte is a digit.
    fn optional_digits(&mut self, count: usize) -> SyntaxResult<Option<u32>> {
        match self.bytes.get(self.position) {
            Some(byte) if byte.is_ascii_digit() => self.digits(count).map(Some),
            _ => Ok(None),
        }
    }

    fn fraction(&mut self) -> SyntaxResult<Option<Fraction>> {
        match self.bytes.get(self.position) {
            Some(b'.') | Some(b',') => {
                self.position += 1;
                let start = self.position;
                while matches!(self.bytes.get(self.position), Some(byte) if byte.is_ascii_digit())
                {
                    self.position += 1;
                }
                if self.position == start {
                    return Err(SyntaxError::bad(self.syntax, "empty fraction"));
                }
                // Cap stored precision at nanoseconds.
                let digits = &self.bytes[start..self.position.min(start + 9)];
                let mut value = 0u64;
                for byte in digits {
                    value = value * 10 + u64::from(byte - b'0');
                }
                Ok(Some(Fraction {
                    value,
                    digits: digits.len() as u32,
                }))
            }
            _ => Ok(None),
        }
    }

    fn time_zone(&mut self, optional: bool) -> SyntaxResult<Option<FixedOffset>> {
        match self.bytes.get(self.position) {
            Some(b'Z') => {
                self.position += 1;
                Ok(FixedOffset::east_opt(0))
            }
            Some(sign @ (b'+' | b'-')) => {
                let sign = if *sign == b'+' { 1i32 } else { -1i32 };
                self.position += 1;
                let hour = self.digits(2)?;
                let minute = self.optional_digits(2)?.unwrap_or(0);
                if hour > 23 || minute > 59 {
                    return Err(SyntaxError::bad(self.syntax, "offset out of range"));
                }
                let seconds = sign * (hour as i32 * 3600 + minute as i32 * 60);
                FixedOffset::east_opt(seconds)
                    .map(Some)
                    .ok_or_else(|| SyntaxError::bad(self.syntax, "offset out of range"))
            }
            _ if optional => Ok(None),
            _ => Err(SyntaxError::bad(self.syntax, "expected Z or differential")),
        }
    }

    fn finish(&self) -> SyntaxResult<()> {
        if self.position == self.bytes.len() {
            Ok(())
        } else {
            Err(SyntaxError::bad(self.syntax, "trailing characters"))
        }
    }
}

pub(super) fn check_generalized(input: Input<'_>) -> SyntaxResult<Value> {
    GeneralizedTime::parse(input.text("Generalized Time")?).map(Value::GeneralizedTime)
}

pub(super) fn check_utc(input: Input<'_>) -> SyntaxResult<Value> {
    UtcTime::parse(input.text("UTC Time")?).map(Value::UtcTime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_form() {
        let time = GeneralizedTime::parse("199412161032Z").unwrap();
        assert_eq!(time.to_string(), "19941216103200Z");

        let time = GeneralizedTime::parse("20090817193004Z").unwrap();
        assert_eq!(time.to_string(), "20090817193004Z");
    }

    #[test]
    fn fraction_scales_to_smallest_unit() {
        let half_hour = GeneralizedTime::parse("2009061211.5Z").unwrap();
        assert_eq!(half_hour.to_string(), "20090612113000Z");

        let quarter_minute = GeneralizedTime::parse("200906121130.25Z").unwrap();
        assert_eq!(quarter_minute.to_string(), "20090612113015Z");

        let millis = GeneralizedTime::parse("20090612113055.750Z").unwrap();
        assert_eq!(millis.to_string(), "20090612113055.75Z");
    }

    #[test]
    fn comma_is_a_decimal_sign() {
        let time = GeneralizedTime::parse("20090612113055,5Z").unwrap();
        assert_eq!(time.to_string(), "20090612113055.5Z");
    }

    #[test]
    fn differential_normalizes_to_utc() {
        let time = GeneralizedTime::parse("20090617203045+0530").unwrap();
        assert_eq!(time.to_string(), "20090617150045Z");
    }

    #[test]
    fn missing_zone_fails() {
        assert!(GeneralizedTime::parse("20090617203045").is_err());
    }

    #[test]
    fn range_checks() {
        assert!(GeneralizedTime::parse("20090632120000Z").is_err());
        assert!(GeneralizedTime::parse("20090617250000Z").is_err());
        assert!(GeneralizedTime::parse("2009061720Z").is_ok());
    }

    #[test]
    fn utc_time_window() {
        let modern = UtcTime::parse("9901021200Z").unwrap();
        assert_eq!(modern.stamp().format("%Y").to_string(), "1999");

        let recent = UtcTime::parse("120102120034Z").unwrap();
        assert_eq!(recent.stamp().format("%Y").to_string(), "2012");
        assert_eq!(recent.to_string(), "120102120034Z");
    }

    #[test]
    fn utc_time_differential() {
        let time = UtcTime::parse("120102120034+0100").unwrap();
        assert_eq!(time.to_string(), "120102110034Z");
    }

    #[test]
    fn stability_under_re_render() {
        let first = GeneralizedTime::parse("2009061211.5Z").unwrap();
        let second = GeneralizedTime::parse(&first.to_string()).unwrap();
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first.stamp(), second.stamp());
    }
}
