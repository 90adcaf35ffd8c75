pub mod jalali;

use std::fmt;

use chrono::{
    Datelike, Duration, FixedOffset, NaiveDateTime, NaiveTime, Offset, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use crate::app::{GleanerError, Result};

pub use jalali::JalaliDate;

/// Marker of a "N hours ago" phrase.
pub const HOURS_AGO: &str = "ساعت پیش";
/// Marker of a "N minutes ago" phrase.
pub const MINUTES_AGO: &str = "دقیقه پیش";

/// Solar Hijri month names in calendar order.
pub const PERSIAN_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Tehran wall clock, which has had no daylight saving since 2022.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 3 * 60 + 30;

/// A `YYYY-MM-DD HH:MM` timestamp in the Solar Hijri calendar.
///
/// Every field is zero-padded, so comparing two values as strings gives
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalTimestamp(String);

impl CanonicalTimestamp {
    pub fn new(date: JalaliDate, time: NaiveTime) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            date.year,
            date.month,
            date.day,
            time.hour(),
            time.minute()
        ))
    }

    /// Parses an already-canonical string, e.g. a `min_date` threshold.
    pub fn parse(raw: &str) -> Result<Self> {
        let ascii = to_ascii_digits(raw.trim());
        let (date_part, time_part) = ascii
            .split_once(' ')
            .ok_or_else(|| GleanerError::Parse(format!("expected 'YYYY-MM-DD HH:MM', got '{}'", raw)))?;

        let mut fields = date_part.split('-');
        let (Some(y), Some(m), Some(d), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(GleanerError::Parse(format!("malformed date '{}'", date_part)));
        };

        let date = JalaliDate::new(parse_number(y)?, parse_number(m)?, parse_number(d)?)?;
        let time = parse_clock(time_part.trim())?;
        Ok(Self::new(date, time))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn date(&self) -> Result<JalaliDate> {
        let (date_part, _) = self.parts();
        let mut fields = date_part.splitn(3, '-');
        let year = parse_number(fields.next().unwrap_or_default())?;
        let month = parse_number(fields.next().unwrap_or_default())?;
        let day = parse_number(fields.next().unwrap_or_default())?;
        JalaliDate::new(year, month, day)
    }

    /// Converts to a Gregorian `YYYY-M-D HH:MM` string (date fields unpadded).
    pub fn to_gregorian(&self) -> Result<String> {
        let greg = self.date()?.to_gregorian()?;
        let (_, clock) = self.parts();
        Ok(format!(
            "{}-{}-{} {}",
            greg.year(),
            greg.month(),
            greg.day(),
            clock
        ))
    }

    fn parts(&self) -> (&str, &str) {
        self.0.split_once(' ').unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for CanonicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CanonicalTimestamp {
    type Error = GleanerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CanonicalTimestamp> for String {
    fn from(value: CanonicalTimestamp) -> Self {
        value.0
    }
}

/// Turns source-native timestamps into [`CanonicalTimestamp`]s.
#[derive(Debug, Clone)]
pub struct Normalizer {
    offset: FixedOffset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::with_utc_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES)
    }

    /// Offsets outside +-24h fall back to UTC.
    pub fn with_utc_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    /// Current wall-clock time of the source, used as the reference for
    /// relative phrases.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }

    /// Normalizes `raw` against `reference` (Gregorian local date-time).
    pub fn normalize(&self, raw: &str, reference: NaiveDateTime) -> Result<CanonicalTimestamp> {
        let text = collapse_whitespace(&to_ascii_digits(raw));

        if text.contains(HOURS_AGO) {
            let hours = relative_count(&text)?;
            return relative(reference, Duration::try_hours(hours), &text);
        }
        if text.contains(MINUTES_AGO) {
            let minutes = relative_count(&text)?;
            return relative(reference, Duration::try_minutes(minutes), &text);
        }
        absolute(&text)
    }
}

/// Non-negative count in front of a relative phrase.
fn relative_count(text: &str) -> Result<i64> {
    let count: i64 = parse_number(leading_token(text)?)?;
    if count < 0 {
        return Err(GleanerError::Parse(format!("negative count in '{}'", text)));
    }
    Ok(count)
}

fn relative(
    reference: NaiveDateTime,
    offset: Option<Duration>,
    text: &str,
) -> Result<CanonicalTimestamp> {
    let instant = offset
        .and_then(|offset| reference.checked_sub_signed(offset))
        .ok_or_else(|| GleanerError::Parse(format!("'{}' is out of range", text)))?;
    let date = JalaliDate::from_gregorian(instant.date())?;
    Ok(CanonicalTimestamp::new(date, instant.time()))
}

/// `<day> <month-name> <year> <filler> <time>`
fn absolute(text: &str) -> Result<CanonicalTimestamp> {
    let tokens: Vec<&str> = text.split(' ').collect();
    if tokens.len() < 5 {
        return Err(GleanerError::Parse(format!(
            "expected 5 tokens in absolute timestamp, got {}: '{}'",
            tokens.len(),
            text
        )));
    }

    let day = parse_number(tokens[0])?;
    let month = month_number(tokens[1])?;
    let year = parse_number(tokens[2])?;
    let time = parse_clock(tokens[4])?;

    Ok(CanonicalTimestamp::new(JalaliDate::new(year, month, day)?, time))
}

pub fn month_number(name: &str) -> Result<u32> {
    PERSIAN_MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| GleanerError::Parse(format!("unknown month name '{}'", name)))
}

fn parse_clock(raw: &str) -> Result<NaiveTime> {
    let (h, m) = raw
        .split_once(':')
        .ok_or_else(|| GleanerError::Parse(format!("malformed time '{}'", raw)))?;
    NaiveTime::from_hms_opt(parse_number(h)?, parse_number(m)?, 0)
        .ok_or_else(|| GleanerError::Parse(format!("time '{}' out of range", raw)))
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| GleanerError::Parse(format!("'{}' is not a number", raw)))
}

fn leading_token(text: &str) -> Result<&str> {
    text.split(' ')
        .next()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GleanerError::Parse(format!("missing count in '{}'", text)))
}

/// Maps Persian and Arabic-Indic digits to ASCII.
pub fn to_ascii_digits(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            _ => c,
        })
        .collect()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_absolute_timestamp() {
        let n = Normalizer::new();
        let ts = n
            .normalize("24 بهمن 1404 - 10:30", reference(2026, 2, 20, 0, 0))
            .unwrap();
        assert_eq!(ts.as_str(), "1404-11-24 10:30");
    }

    #[test]
    fn test_absolute_pads_day_and_hour() {
        let n = Normalizer::new();
        let ts = n
            .normalize("۵ فروردین ۱۴۰۳ - ۹:۰۵", reference(2026, 1, 1, 0, 0))
            .unwrap();
        assert_eq!(ts.as_str(), "1403-01-05 09:05");
    }

    #[test]
    fn test_absolute_tolerates_extra_whitespace() {
        let n = Normalizer::new();
        let ts = n
            .normalize("  12   مهر 1402  شنبه   08:15 ", reference(2026, 1, 1, 0, 0))
            .unwrap();
        assert_eq!(ts.as_str(), "1402-07-12 08:15");
    }

    #[test]
    fn test_unknown_month_is_parse_error() {
        let n = Normalizer::new();
        let err = n
            .normalize("24 January 1404 - 10:30", reference(2026, 1, 1, 0, 0))
            .unwrap_err();
        assert!(matches!(err, GleanerError::Parse(_)));
    }

    #[test]
    fn test_malformed_absolute_is_parse_error() {
        let n = Normalizer::new();
        let r = reference(2026, 1, 1, 0, 0);
        assert!(n.normalize("24 بهمن 1404", r).is_err());
        assert!(n.normalize("xx بهمن 1404 - 10:30", r).is_err());
        assert!(n.normalize("24 بهمن 1404 - 1030", r).is_err());
        assert!(n.normalize("31 بهمن 1404 - 10:30", r).is_err());
        assert!(n.normalize("", r).is_err());
    }

    #[test]
    fn test_relative_hours() {
        let n = Normalizer::new();
        let ts = n
            .normalize("2 ساعت پیش", reference(2026, 2, 13, 10, 30))
            .unwrap();
        assert_eq!(ts.as_str(), "1404-11-24 08:30");
    }

    #[test]
    fn test_relative_minutes_with_persian_digits() {
        let n = Normalizer::new();
        let ts = n
            .normalize("۴۵ دقیقه پیش", reference(2026, 2, 13, 10, 30))
            .unwrap();
        assert_eq!(ts.as_str(), "1404-11-24 09:45");
    }

    #[test]
    fn test_relative_offset_crosses_midnight() {
        let n = Normalizer::new();
        let ts = n
            .normalize("3 ساعت پیش", reference(2026, 2, 13, 1, 0))
            .unwrap();
        assert_eq!(ts.as_str(), "1404-11-23 22:00");
    }

    #[test]
    fn test_relative_ordering() {
        let n = Normalizer::new();
        let r = reference(2026, 2, 13, 10, 30);
        let hours = n.normalize("2 ساعت پیش", r).unwrap();
        let minutes = n.normalize("10 دقیقه پیش", r).unwrap();
        assert!(hours < minutes);
        assert!(hours.as_str() < minutes.as_str());
    }

    #[test]
    fn test_relative_without_count_is_parse_error() {
        let n = Normalizer::new();
        assert!(n.normalize("چند ساعت پیش", reference(2026, 1, 1, 0, 0)).is_err());
    }

    #[test]
    fn test_huge_relative_count_is_parse_error() {
        let n = Normalizer::new();
        let r = reference(2026, 1, 1, 0, 0);
        for raw in [
            "9999999999999999 ساعت پیش",
            "9223372036854775807 دقیقه پیش",
            "99999999 ساعت پیش",
        ] {
            let err = n.normalize(raw, r).unwrap_err();
            assert!(matches!(err, GleanerError::Parse(_)), "{}", raw);
        }
    }

    #[test]
    fn test_negative_relative_count_is_parse_error() {
        let n = Normalizer::new();
        let err = n
            .normalize("-3 ساعت پیش", reference(2026, 1, 1, 0, 0))
            .unwrap_err();
        assert!(matches!(err, GleanerError::Parse(_)));
    }

    #[test]
    fn test_round_trip_to_gregorian() {
        let n = Normalizer::new();
        let ts = n
            .normalize("24 بهمن 1404 - 10:30", reference(2026, 2, 20, 0, 0))
            .unwrap();
        assert_eq!(ts.to_gregorian().unwrap(), "2026-2-13 10:30");

        let nowruz = CanonicalTimestamp::parse("1403-01-01 00:00").unwrap();
        assert_eq!(nowruz.to_gregorian().unwrap(), "2024-3-20 00:00");
    }

    #[test]
    fn test_parse_canonical_normalizes_padding() {
        let ts = CanonicalTimestamp::parse("1404-6-1 0:01").unwrap();
        assert_eq!(ts.as_str(), "1404-06-01 00:01");
        assert!(CanonicalTimestamp::parse("1404-06-01").is_err());
        assert!(CanonicalTimestamp::parse("1404-06 00:00").is_err());
        assert!(CanonicalTimestamp::parse("1404-13-01 00:00").is_err());
    }

    #[test]
    fn test_canonical_ordering_is_chronological() {
        let a = CanonicalTimestamp::parse("1403-12-30 23:59").unwrap();
        let b = CanonicalTimestamp::parse("1404-01-01 00:00").unwrap();
        let c = CanonicalTimestamp::parse("1404-01-01 00:01").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_month_table() {
        assert_eq!(month_number("فروردین").unwrap(), 1);
        assert_eq!(month_number("اسفند").unwrap(), 12);
        assert!(month_number("Farvardin").is_err());
    }

    #[test]
    fn test_utc_offset() {
        let tehran = Normalizer::new();
        let utc = Normalizer::with_utc_offset_minutes(0);
        let diff = tehran.now() - utc.now();
        assert!((diff.num_minutes() - 210).abs() <= 1);
    }
}
