//! CLI handlers for the date slider and its tooltip.

use std::io::{self, Write};

use daystamp_core::config::Config;
use daystamp_core::slider::{Placement, SliderRange, TooltipConfig};
use daystamp_core::{TimeReference, TransformRegistry};

use super::OutputFormat;

/// Handle the slider command
pub fn handle_slider(
    dates: &[String],
    reference: TimeReference,
    config: &Config,
    format: OutputFormat,
) -> Result<(), String> {
    let slider = SliderRange::from_dates(dates, reference).map_err(|e| e.to_string())?;
    tracing::info!(min = slider.min, max = slider.max, "slider range computed");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => write_json(&slider, &mut out),
        OutputFormat::Text => write_summary(&slider, reference, config, &mut out),
    }
}

/// Handle the tooltip command
pub fn handle_tooltip(
    min: i64,
    max: i64,
    value: [i64; 2],
    placement: Placement,
    config: &Config,
) -> Result<(), String> {
    if min > max {
        return Err(format!("--min ({}) is greater than --max ({})", min, max));
    }

    let tooltip = TooltipConfig::for_selection(min, max, value, config.tooltip.style())
        .with_placement(placement);

    let stdout = io::stdout();
    write_json(&tooltip, &mut stdout.lock())
}

fn write_json<T: serde::Serialize>(value: &T, out: &mut dyn Write) -> Result<(), String> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(|e| e.to_string())?;
    writeln!(out).map_err(|e| e.to_string())
}

/// Human-readable slider summary, labelled the way the tooltip would show it.
fn write_summary(
    slider: &SliderRange,
    reference: TimeReference,
    config: &Config,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut namespace = None;
    let registry: &TransformRegistry = TransformRegistry::load(&mut namespace, reference);
    let tooltip = slider.tooltip(slider.value, config.tooltip.style());

    let label = |seconds: i64| {
        tooltip
            .display(registry, seconds as f64)
            .ok_or_else(|| format!("no transform registered as '{}'", tooltip.transform))
    };

    writeln!(out, "min:\t{}\t{}", label(slider.min)?, slider.min).map_err(|e| e.to_string())?;
    writeln!(out, "max:\t{}\t{}", label(slider.max)?, slider.max).map_err(|e| e.to_string())?;
    writeln!(out, "marks:\t{}", slider.marks.len()).map_err(|e| e.to_string())?;
    Ok(())
}
