//! Date slider helpers for the summary page.
//!
//! The slider works in epoch seconds. Its bounds come from the earliest and
//! latest dates in the data, both ends get a (hidden) labelled mark, and the
//! tooltip shows the handles' positions through the [`SECONDS_TO_YMD`]
//! transform. The tooltip stays visible only while the whole range is
//! selected.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date::{FormattedDate, format_seconds, parse_instant};
use crate::error::{DateParseError, FormatError};
use crate::reference::TimeReference;
use crate::registry::{SECONDS_TO_YMD, TransformRegistry};

/// Reasons a slider range cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SliderError {
    /// No dates were given.
    #[error("cannot build a date slider from an empty list of dates")]
    Empty,

    /// One of the inputs is not a date.
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),

    /// A bound is outside the range a date label can represent.
    #[error(transparent)]
    Unrepresentable(#[from] FormatError),
}

/// Font style of a slider mark. Marks are labelled but drawn at size 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStyle {
    /// CSS font size.
    pub font_size: u32,
}

/// A labelled slider tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    /// `YYYY-MM-DD` label of the tick.
    pub label: String,
    /// Rendering style.
    pub style: MarkStyle,
}

impl Mark {
    fn hidden(label: FormattedDate) -> Self {
        Self {
            label: label.into_string(),
            style: MarkStyle { font_size: 0 },
        }
    }
}

/// Bounds, initial selection and marks of the date slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderRange {
    /// Earliest date, epoch seconds.
    pub min: i64,
    /// Latest date, epoch seconds.
    pub max: i64,
    /// Initially selected `[start, end]`; the full range.
    pub value: [i64; 2],
    /// Marks keyed by position in epoch seconds.
    pub marks: BTreeMap<i64, Mark>,
}

impl SliderRange {
    /// Build the slider range spanning `instants`.
    ///
    /// Mark labels are the UTC dates of the bounds, whatever time reference
    /// the tooltip later formats with.
    pub fn from_instants<I>(instants: I) -> Result<Self, SliderError>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut bounds: Option<(i64, i64)> = None;
        for instant in instants {
            let seconds = instant.timestamp();
            bounds = Some(match bounds {
                None => (seconds, seconds),
                Some((lo, hi)) => (lo.min(seconds), hi.max(seconds)),
            });
        }
        let (min, max) = bounds.ok_or(SliderError::Empty)?;

        let mut marks = BTreeMap::new();
        for position in [min, max] {
            let label = format_seconds(position as f64, TimeReference::Utc)?;
            marks.insert(position, Mark::hidden(label));
        }

        Ok(Self {
            min,
            max,
            value: [min, max],
            marks,
        })
    }

    /// Build the slider range from date strings (see [`parse_instant`]).
    ///
    /// `reference` only decides how dates without an offset are read.
    pub fn from_dates<S: AsRef<str>>(
        dates: &[S],
        reference: TimeReference,
    ) -> Result<Self, SliderError> {
        let instants = dates
            .iter()
            .map(|d| parse_instant(d.as_ref(), reference))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_instants(instants)
    }

    /// Tooltip for the current selection `value` on this slider.
    pub fn tooltip(&self, value: [i64; 2], style: TooltipStyle) -> TooltipConfig {
        TooltipConfig::for_selection(self.min, self.max, value, style)
    }
}

/// Where the tooltip is drawn relative to the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Above the handle.
    Top,
    /// Below the handle.
    #[default]
    Bottom,
    /// Left of the handle.
    Left,
    /// Right of the handle.
    Right,
}

/// CSS applied to the tooltip bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    /// Background colour.
    pub background: String,
    /// Text colour.
    pub color: String,
    /// Font size.
    pub font_size: String,
    /// Left padding.
    pub padding_left: String,
    /// Right padding.
    pub padding_right: String,
    /// Corner radius.
    pub border_radius: String,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            background: "#304FFE".to_string(),
            color: "#FFFFFF".to_string(),
            font_size: "16px".to_string(),
            padding_left: "4px".to_string(),
            padding_right: "4px".to_string(),
            border_radius: "10px".to_string(),
        }
    }
}

/// Tooltip configuration handed to the slider component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipConfig {
    /// Where the tooltip is drawn.
    pub placement: Placement,
    /// Whether the tooltip shows without hovering.
    pub always_visible: bool,
    /// Registry name of the transform applied to handle values.
    pub transform: String,
    /// Bubble style.
    pub style: TooltipStyle,
}

impl TooltipConfig {
    /// Tooltip for a slider spanning `min..=max` with `value` selected.
    ///
    /// The tooltip is pinned open exactly when the full range is selected.
    pub fn for_selection(min: i64, max: i64, value: [i64; 2], style: TooltipStyle) -> Self {
        Self {
            placement: Placement::default(),
            always_visible: value == [min, max],
            transform: SECONDS_TO_YMD.to_string(),
            style,
        }
    }

    /// Set the placement.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Text shown for a handle at `value`, resolved through `registry`.
    ///
    /// Returns `None` if the registry has no transform under this tooltip's
    /// transform name.
    pub fn display(&self, registry: &TransformRegistry, value: f64) -> Option<String> {
        registry.apply(&self.transform, value)
    }
}

/// Keep the items whose instant lies within `range` (inclusive, epoch seconds).
///
/// With no range everything is kept.
pub fn filter_by_date_range<T, F>(items: Vec<T>, range: Option<[i64; 2]>, instant_of: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let Some([start, end]) = range else {
        return items;
    };

    items
        .into_iter()
        .filter(|item| {
            let seconds = instant_of(item).timestamp();
            seconds >= start && seconds <= end
        })
        .collect()
}
