//! Which clock the calendar fields of an instant are read from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time reference used to derive year, month and day from an instant.
///
/// The same instant can fall on different calendar days depending on the
/// reference; near midnight, `Utc` and `Local` routinely disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeReference {
    /// Coordinated Universal Time.
    #[default]
    Utc,
    /// The execution environment's configured zone (honours `TZ`).
    Local,
    /// A pinned UTC offset, e.g. `+09:00`.
    Offset(FixedOffset),
}

/// Returned when a string names no known time reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time reference '{0}': expected 'utc', 'local' or an offset like '+09:00'")]
pub struct InvalidTimeReference(pub String);

impl TimeReference {
    /// Calendar date of `instant` in this reference.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            TimeReference::Utc => instant.date_naive(),
            TimeReference::Local => instant.with_timezone(&Local).date_naive(),
            TimeReference::Offset(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// Resolve a wall-clock time in this reference to a UTC instant.
    ///
    /// Returns `None` when the wall-clock time is skipped by a DST change.
    /// Ambiguous times (clocks turned back) resolve to the earlier instant.
    pub fn resolve(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            TimeReference::Utc => Some(naive.and_utc()),
            TimeReference::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            TimeReference::Offset(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for TimeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeReference::Utc => f.write_str("utc"),
            TimeReference::Local => f.write_str("local"),
            TimeReference::Offset(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for TimeReference {
    type Err = InvalidTimeReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "utc" | "z" => Ok(TimeReference::Utc),
            "local" => Ok(TimeReference::Local),
            _ => parse_offset(trimmed)
                .map(TimeReference::Offset)
                .ok_or_else(|| InvalidTimeReference(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeReference {
    type Error = InvalidTimeReference;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeReference> for String {
    fn from(value: TimeReference) -> Self {
        value.to_string()
    }
}

/// Parse `+HH`, `+HHMM` or `+HH:MM` (sign required) into a fixed offset.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // Only one separator, and only between hours and minutes.
    if rest.matches(':').count() > 1 || (rest.contains(':') && rest.find(':') != Some(2)) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
