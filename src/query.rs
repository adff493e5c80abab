//! Grid state <-> URL query string.
//!
//! Both axes travel as JSON arrays of `{"name"?, "color"}` objects. The y
//! axis is left out whenever it equals the x axis.

use crate::models::{clamp_contrast, Axis, ColorEntry, GridState};
use crate::parsers::color_utils;
use serde::Deserialize;
use tracing::warn;

pub const X_AXIS_PARAM: &str = "xAxisData";
pub const Y_AXIS_PARAM: &str = "yAxisData";
pub const CONTRAST_PARAM: &str = "contrast";
pub const HIDE_BELOW_PARAM: &str = "hideBelow";

/// Raw query parameters, before any validation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct GridQuery {
    #[serde(rename = "xAxisData")]
    pub x_axis_data: Option<String>,
    #[serde(rename = "yAxisData")]
    pub y_axis_data: Option<String>,
    pub contrast: Option<String>,
    #[serde(rename = "hideBelow")]
    pub hide_below: Option<String>,
}

/// Build the query string (without `?`) for a grid.
///
/// Returns `None` for an empty x axis: there is nothing worth a URL.
pub fn encode(state: &GridState, default_contrast: f64) -> Option<String> {
    if state.x_axis.is_empty() {
        return None;
    }

    let mut params = vec![(X_AXIS_PARAM, encode_axis(&state.x_axis))];
    if !state.is_symmetric() {
        params.push((Y_AXIS_PARAM, encode_axis(&state.y_axis)));
    }
    if state.contrast_threshold != default_contrast {
        params.push((CONTRAST_PARAM, state.contrast_threshold.to_string()));
    }
    if state.hide_below_threshold {
        params.push((HIDE_BELOW_PARAM, "true".to_string()));
    }

    Some(
        params
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&"),
    )
}

/// Full path for a grid, `/` when there is nothing to store.
pub fn grid_location(state: &GridState, default_contrast: f64) -> String {
    match encode(state, default_contrast) {
        Some(query) => format!("/?{}", query),
        None => "/".to_string(),
    }
}

fn encode_axis(axis: &Axis) -> String {
    // Serializing plain strings cannot fail
    serde_json::to_string(axis).unwrap_or_else(|_| "[]".to_string())
}

/// Rebuild grid state from query parameters.
///
/// Missing or malformed axes come back empty; a missing y axis mirrors x.
pub fn decode(query: &GridQuery, default_contrast: f64) -> GridState {
    let x_axis = query
        .x_axis_data
        .as_deref()
        .and_then(|raw| decode_axis(X_AXIS_PARAM, raw))
        .unwrap_or_default();
    let y_axis = query
        .y_axis_data
        .as_deref()
        .and_then(|raw| decode_axis(Y_AXIS_PARAM, raw))
        .unwrap_or_else(|| x_axis.clone());

    let contrast_threshold = query
        .contrast
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .map(|value| clamp_contrast(value, default_contrast))
        .unwrap_or(default_contrast);

    GridState {
        x_axis,
        y_axis,
        contrast_threshold,
        hide_below_threshold: query.hide_below.as_deref().is_some_and(is_truthy),
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "true" | "on" | "1")
}

fn decode_axis(param: &str, raw: &str) -> Option<Axis> {
    let entries = serde_json::from_str::<Vec<ColorEntry>>(raw)
        .ok()
        // Older links percent-encode the JSON once more before the query
        // layer encodes it again.
        .or_else(|| {
            let decoded = urlencoding::decode(raw).ok()?;
            serde_json::from_str::<Vec<ColorEntry>>(&decoded).ok()
        });

    let Some(entries) = entries else {
        warn!("Ignoring malformed {} parameter", param);
        return None;
    };

    Some(entries.into_iter().filter_map(normalize_entry).collect())
}

fn normalize_entry(entry: ColorEntry) -> Option<ColorEntry> {
    let color = color_utils::to_hex(&entry.color)?;
    let name = entry
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    Some(ColorEntry { name, color })
}
