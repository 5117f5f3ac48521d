//! Error types shared by the formatting and parsing functions.

use thiserror::Error;

/// Largest instant, in milliseconds from the epoch, a dashboard date accepts.
///
/// Values beyond ±8.64e15 ms (±100,000,000 days) are invalid dates in the
/// browser, so they are rejected here as well.
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Reasons a number of seconds cannot be turned into a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FormatError {
    /// The input was NaN or infinite.
    #[error("'{0}' is not a finite number of seconds")]
    NonFinite(f64),

    /// The input is finite but falls outside the representable date range.
    #[error("{0} seconds is outside the supported date range")]
    OutOfRange(f64),
}

/// A date or timestamp string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// Not `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339.
    #[error("Invalid date format: '{0}'. Use 'YYYY-MM-DD' or an RFC 3339 timestamp")]
    InvalidFormat(String),

    /// A naive date or time does not exist (or is ambiguous) in the chosen time reference.
    #[error("'{0}' does not map to a single instant in the chosen time reference")]
    Unmappable(String),
}
