//! `daystamp format`: epoch seconds to `YYYY-MM-DD`.

use std::io::{self, Write};

use daystamp_core::date::INVALID_DATE_LABEL;
use daystamp_core::{TimeReference, coerce_seconds, format_seconds};
use serde::Serialize;

use super::OutputFormat;

#[derive(Debug, Serialize)]
struct FormattedValue<'a> {
    input: &'a str,
    date: String,
}

/// Handle the format command
pub fn handle_format(
    values: &[String],
    reference: TimeReference,
    strict: bool,
    format: OutputFormat,
) -> Result<(), String> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_formatted(values, reference, strict, format, &mut out)
}

fn write_formatted(
    values: &[String],
    reference: TimeReference,
    strict: bool,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut rows = Vec::with_capacity(values.len());
    for raw in values {
        let seconds = coerce_seconds(raw);
        let date = match format_seconds(seconds, reference) {
            Ok(date) => date.into_string(),
            Err(e) if strict => return Err(format!("{}: {}", raw, e)),
            Err(e) => {
                tracing::debug!(input = %raw, error = %e, "formatting as invalid date");
                INVALID_DATE_LABEL.to_string()
            }
        };
        rows.push(FormattedValue { input: raw, date });
    }

    match format {
        OutputFormat::Text => {
            for row in &rows {
                writeln!(out, "{}", row.date).map_err(|e| e.to_string())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &rows).map_err(|e| e.to_string())?;
            writeln!(out).map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}
