//! # `daystamp_core`
//!
//! Shared code for turning Unix epoch seconds into `YYYY-MM-DD` labels.
//!
//! The dashboard's date slider stores its positions as seconds since the
//! epoch. Its tooltip looks up a named transform (`secondsToYMD`) and shows
//! whatever string that transform returns. This crate provides the
//! transform, the registry it lives in, and the helpers that build the
//! slider's range, marks and tooltip configuration.
//!
//! ```
//! use daystamp_core::{TimeReference, format_seconds};
//!
//! let date = format_seconds(1_700_000_000.0, TimeReference::Utc).unwrap();
//! assert_eq!(date.as_str(), "2023-11-14");
//! ```

#![warn(missing_docs)]

/// Config docs
pub mod config;

/// Date docs
pub mod date;

/// Error docs
pub mod error;

/// Time reference docs
pub mod reference;

pub mod registry;
pub mod slider;

pub use date::{FormattedDate, coerce_seconds, date_to_seconds, format_seconds, seconds_to_ymd};
pub use error::{DateParseError, FormatError};
pub use reference::{InvalidTimeReference, TimeReference};
pub use registry::{SECONDS_TO_YMD, TransformRegistry};
