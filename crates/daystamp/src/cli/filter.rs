//! `daystamp filter`: keep stdin dates inside a slider selection.

use std::io::{self, Write};

use daystamp_core::TimeReference;
use daystamp_core::date::parse_instant;
use daystamp_core::slider::filter_by_date_range;

/// Handle the filter command
pub fn handle_filter(
    lines: Vec<String>,
    range: [i64; 2],
    reference: TimeReference,
    strict: bool,
) -> Result<(), String> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_filtered(lines, range, reference, strict, &mut out)
}

fn write_filtered(
    lines: Vec<String>,
    range: [i64; 2],
    reference: TimeReference,
    strict: bool,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut dated = Vec::with_capacity(lines.len());
    for line in lines {
        match parse_instant(&line, reference) {
            Ok(instant) => dated.push((line, instant)),
            Err(e) if strict => return Err(e.to_string()),
            Err(e) => tracing::warn!("skipping line: {}", e),
        }
    }

    for (line, _) in filter_by_date_range(dated, Some(range), |(_, instant)| *instant) {
        writeln!(out, "{}", line).map_err(|e| e.to_string())?;
    }
    Ok(())
}
