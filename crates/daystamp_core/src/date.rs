//! Conversion between epoch seconds, instants and `YYYY-MM-DD` labels.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::{DateParseError, FormatError, MAX_EPOCH_MILLIS};
use crate::reference::TimeReference;

/// What the permissive formatter returns when the input is not a usable number.
pub const INVALID_DATE_LABEL: &str = "NaN-NaN-NaN";

/// A `YEAR-MM-DD` label.
///
/// Month and day are always two digits. The year is its plain decimal value,
/// so it is four digits for 1000..=9999, shorter before that and signed
/// before year 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FormattedDate(String);

impl FormattedDate {
    /// Label a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{}-{:02}-{:02}", date.year(), date.month(), date.day()))
    }

    /// Parse a label back into the calendar date it names.
    pub fn parse(label: &str) -> Result<NaiveDate, DateParseError> {
        let invalid = || DateParseError::InvalidFormat(label.to_string());

        // A leading '-' belongs to the year, not a separator.
        let (sign, unsigned) = match label.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, label),
        };
        let mut parts = unsigned.splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if month.len() != 2 || day.len() != 2 || year.is_empty() {
            return Err(invalid());
        }
        if ![year, month, day]
            .iter()
            .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(sign * year, month, day).ok_or_else(invalid)
    }

    /// Borrow the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the label.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FormattedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FormattedDate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<FormattedDate> for String {
    fn from(value: FormattedDate) -> Self {
        value.0
    }
}

/// Convert epoch seconds to a UTC instant.
///
/// Seconds are scaled to milliseconds and truncated toward zero, so
/// fractional input keeps its sub-second part only down to the millisecond
/// and `-0.5` lands half a second before the epoch.
///
/// The accepted range is narrower than a browser date's ±8.64e15 ms: chrono
/// stops near year ±262143 (about ±8.2e12 seconds), and anything past that is
/// [`FormatError::OutOfRange`] even though a browser would still label it.
pub fn instant_from_seconds(value: f64) -> Result<DateTime<Utc>, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NonFinite(value));
    }

    let millis = (value * 1000.0).trunc();
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return Err(FormatError::OutOfRange(value));
    }

    DateTime::from_timestamp_millis(millis as i64).ok_or(FormatError::OutOfRange(value))
}

/// Format epoch seconds as `YEAR-MM-DD` in the given time reference.
pub fn format_seconds(value: f64, reference: TimeReference) -> Result<FormattedDate, FormatError> {
    let instant = instant_from_seconds(value)?;
    Ok(FormattedDate::from_date(reference.date_of(instant)))
}

/// Format epoch seconds, degrading to [`INVALID_DATE_LABEL`] on bad input.
///
/// This is the shape the tooltip transform expects: it always gets a string
/// back and never an error.
pub fn seconds_to_ymd(value: f64, reference: TimeReference) -> String {
    match format_seconds(value, reference) {
        Ok(date) => date.into_string(),
        Err(e) => {
            log::debug!("secondsToYMD fallback for {}: {}", value, e);
            INVALID_DATE_LABEL.to_string()
        }
    }
}

/// Coerce raw text to a number of seconds the way the dashboard does.
///
/// Surrounding whitespace is ignored and blank input is `0`. Decimal and
/// exponent forms parse as floats, `Infinity` and `-Infinity` are infinite,
/// and unsigned `0x`/`0b`/`0o` integers are read in their radix. Anything
/// else (`inf`, `-0x10`, `12px`) becomes NaN.
pub fn coerce_seconds(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(value) = parse_radix_integer(trimmed) {
        return value;
    }

    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')) =>
        {
            trimmed.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// `0x1F`, `0b101`, `0o17`. `Some(NaN)` for a prefix with bad or no digits.
fn parse_radix_integer(text: &str) -> Option<f64> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0b" => 2,
        "0o" => 8,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    });
    Some(value.unwrap_or(f64::NAN))
}

/// Epoch seconds of midnight at the start of `date` in the given reference.
///
/// Returns `None` if midnight does not exist there (a DST jump at 00:00).
pub fn date_to_seconds(date: NaiveDate, reference: TimeReference) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    reference.resolve(midnight).map(|dt| dt.timestamp())
}

/// Parse a date or timestamp into a UTC instant.
///
/// Supports:
/// - RFC 3339 (`2024-01-15T08:30:00Z`, `2024-01-15T08:30:00+02:00`)
/// - `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`, read in `reference`
/// - `YYYY-MM-DD`, midnight in `reference`
pub fn parse_instant(
    input: &str,
    reference: TimeReference,
) -> Result<DateTime<Utc>, DateParseError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateParseError::InvalidFormat(input.to_string()))?;

    reference
        .resolve(naive)
        .ok_or_else(|| DateParseError::Unmappable(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(value: f64) -> String {
        format_seconds(value, TimeReference::Utc).unwrap().into_string()
    }

    #[test]
    fn test_format_epoch() {
        assert_eq!(utc(0.0), "1970-01-01");
    }

    #[test]
    fn test_format_known_date() {
        // 2023-11-14 22:13:20 UTC
        assert_eq!(utc(1_700_000_000.0), "2023-11-14");
    }

    #[test]
    fn test_format_pads_month_and_day() {
        // 2024-03-05 12:00:00 UTC
        assert_eq!(utc(1_709_640_000.0), "2024-03-05");
        // 2024-12-25 00:00:00 UTC
        assert_eq!(utc(1_735_084_800.0), "2024-12-25");
    }

    #[test]
    fn test_format_leap_day() {
        // 2000-02-29 is day 11016 from epoch
        assert_eq!(utc(11016.0 * 86400.0), "2000-02-29");
    }

    #[test]
    fn test_format_pre_epoch() {
        assert_eq!(utc(-1.0), "1969-12-31");
        assert_eq!(utc(-86400.0), "1969-12-31");
        assert_eq!(utc(-86401.0), "1969-12-30");
    }

    #[test]
    fn test_format_fractional_seconds() {
        // Truncation happens on the millisecond value, not the second.
        assert_eq!(utc(-0.5), "1969-12-31");
        assert_eq!(utc(-0.0004), "1970-01-01");
        assert_eq!(utc(86_399.999), "1970-01-01");
        assert_eq!(utc(86_399.9999), "1970-01-01");
        assert_eq!(utc(86_400.0), "1970-01-02");
    }

    #[test]
    fn test_format_short_and_negative_years() {
        // 0005-01-01 00:00:00 UTC
        let year_five =
            date_to_seconds(NaiveDate::from_ymd_opt(5, 1, 1).unwrap(), TimeReference::Utc)
                .unwrap();
        assert_eq!(utc(year_five as f64), "5-01-01");

        let before_zero =
            date_to_seconds(NaiveDate::from_ymd_opt(-1, 6, 30).unwrap(), TimeReference::Utc)
                .unwrap();
        assert_eq!(utc(before_zero as f64), "-1-06-30");
    }

    #[test]
    fn test_format_rejects_non_finite() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = format_seconds(value, TimeReference::Utc).unwrap_err();
            assert!(matches!(err, FormatError::NonFinite(_)));
        }
    }

    #[test]
    fn test_format_rejects_out_of_range() {
        assert_eq!(
            format_seconds(1e16, TimeReference::Utc),
            Err(FormatError::OutOfRange(1e16))
        );
        assert_eq!(
            format_seconds(-1e16, TimeReference::Local),
            Err(FormatError::OutOfRange(-1e16))
        );
        assert_eq!(
            format_seconds(f64::MAX, TimeReference::Utc),
            Err(FormatError::OutOfRange(f64::MAX))
        );
    }

    #[test]
    fn test_format_stops_at_chrono_calendar_limit() {
        assert_eq!(utc(8.0e12), "255479-11-28");
        for value in [8.5e12, 8.64e12, -8.64e12] {
            assert_eq!(
                format_seconds(value, TimeReference::Utc),
                Err(FormatError::OutOfRange(value))
            );
            assert_eq!(seconds_to_ymd(value, TimeReference::Utc), INVALID_DATE_LABEL);
        }
    }

    #[test]
    fn test_format_offset_crosses_day_boundary() {
        let tokyo = TimeReference::Offset(FixedOffset::east_opt(9 * 3600).unwrap());
        let new_york = TimeReference::Offset(FixedOffset::west_opt(5 * 3600).unwrap());

        // 2023-11-14 22:13:20 UTC
        assert_eq!(
            format_seconds(1_700_000_000.0, tokyo).unwrap().as_str(),
            "2023-11-15"
        );
        // 2023-11-15 00:53:20 UTC
        assert_eq!(
            format_seconds(1_700_009_600.0, new_york).unwrap().as_str(),
            "2023-11-14"
        );
    }

    #[test]
    fn test_seconds_to_ymd_is_permissive() {
        assert_eq!(seconds_to_ymd(f64::NAN, TimeReference::Utc), INVALID_DATE_LABEL);
        assert_eq!(seconds_to_ymd(f64::INFINITY, TimeReference::Local), INVALID_DATE_LABEL);
        assert_eq!(seconds_to_ymd(1e16, TimeReference::Utc), INVALID_DATE_LABEL);
        assert_eq!(seconds_to_ymd(0.0, TimeReference::Utc), "1970-01-01");
    }

    #[test]
    fn test_coerce_seconds() {
        assert_eq!(coerce_seconds("1700000000"), 1_700_000_000.0);
        assert_eq!(coerce_seconds("  42.5 \n"), 42.5);
        assert_eq!(coerce_seconds("-1"), -1.0);
        assert_eq!(coerce_seconds("1e3"), 1000.0);
        assert_eq!(coerce_seconds(""), 0.0);
        assert_eq!(coerce_seconds("   "), 0.0);
        assert_eq!(coerce_seconds("Infinity"), f64::INFINITY);
        assert_eq!(coerce_seconds("-Infinity"), f64::NEG_INFINITY);
        assert!(coerce_seconds("NaN").is_nan());
        assert!(coerce_seconds("abc").is_nan());
        assert!(coerce_seconds("inf").is_nan());
        assert!(coerce_seconds("12abc").is_nan());
        assert!(coerce_seconds("1-2").is_nan());
    }

    #[test]
    fn test_coerce_seconds_radix_prefixes() {
        assert_eq!(coerce_seconds("0x10"), 16.0);
        assert_eq!(coerce_seconds(" 0XfF "), 255.0);
        assert_eq!(coerce_seconds("0b11"), 3.0);
        assert_eq!(coerce_seconds("0o7"), 7.0);
        assert!(coerce_seconds("0x").is_nan());
        assert!(coerce_seconds("0b12").is_nan());
        assert!(coerce_seconds("-0x10").is_nan());
        assert!(coerce_seconds("+0x10").is_nan());
        assert_eq!(
            seconds_to_ymd(coerce_seconds("0x6553F100"), TimeReference::Utc),
            "2023-11-14"
        );
    }

    #[test]
    fn test_date_to_seconds() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 15).unwrap();
        assert_eq!(date_to_seconds(date, TimeReference::Utc), Some(1_700_006_400));

        let tokyo = TimeReference::Offset(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(date_to_seconds(date, tokyo), Some(1_700_006_400 - 9 * 3600));
    }

    #[test]
    fn test_parse_instant() {
        let expected = DateTime::from_timestamp(1_705_276_800, 0).unwrap(); // 2024-01-15
        assert_eq!(parse_instant("2024-01-15", TimeReference::Utc).unwrap(), expected);
        assert_eq!(
            parse_instant("2024-01-15T00:00:00Z", TimeReference::Local).unwrap(),
            expected
        );
        assert_eq!(
            parse_instant("2024-01-15T02:00:00+02:00", TimeReference::Utc).unwrap(),
            expected
        );
        assert_eq!(
            parse_instant("2024-01-15 00:00:00", TimeReference::Utc).unwrap(),
            expected
        );

        let tokyo = TimeReference::Offset(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(parse_instant("2024-01-15T09:00:00", tokyo).unwrap(), expected);

        assert!(matches!(
            parse_instant("15/01/2024", TimeReference::Utc),
            Err(DateParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_formatted_date_parse() {
        assert_eq!(
            FormattedDate::parse("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            FormattedDate::parse("5-01-01").unwrap(),
            NaiveDate::from_ymd_opt(5, 1, 1).unwrap()
        );
        assert_eq!(
            FormattedDate::parse("-1-06-30").unwrap(),
            NaiveDate::from_ymd_opt(-1, 6, 30).unwrap()
        );

        assert!(FormattedDate::parse(INVALID_DATE_LABEL).is_err());
        assert!(FormattedDate::parse("2024-1-15").is_err());
        assert!(FormattedDate::parse("2024-02-30").is_err());
        assert!(FormattedDate::parse("2024-01-15-extra").is_err());
    }
}
