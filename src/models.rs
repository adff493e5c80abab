use serde::{Deserialize, Serialize};

/// Threshold used when nothing else was asked for (WCAG AAA).
pub const DEFAULT_CONTRAST: f64 = 7.0;
pub const MIN_CONTRAST: f64 = 1.0;
pub const MAX_CONTRAST: f64 = 21.0;

/// Threshold shortcuts offered next to the slider.
pub const CONTRAST_PRESETS: [(&str, f64); 3] = [("AA Large", 3.0), ("AA", 4.5), ("AAA", 7.0)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub color: String,
}

#[cfg(test)]
impl ColorEntry {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            name: None,
            color: color.into(),
        }
    }

    pub fn named(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            color: color.into(),
        }
    }
}

pub type Axis = Vec<ColorEntry>;

/// Everything needed to draw one grid. Lives only in the URL.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub contrast_threshold: f64,
    pub hide_below_threshold: bool,
}

impl GridState {
    #[cfg(test)]
    pub fn new(x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            x_axis,
            y_axis,
            contrast_threshold: DEFAULT_CONTRAST,
            hide_below_threshold: false,
        }
    }

    /// Same colors on both axes, so the y axis need not be stored.
    pub fn is_symmetric(&self) -> bool {
        self.x_axis == self.y_axis
    }

    pub fn is_empty(&self) -> bool {
        self.x_axis.is_empty()
    }
}

/// Clamp a requested threshold into the range a contrast ratio can take.
/// Non-finite values fall back to `fallback`.
pub fn clamp_contrast(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_CONTRAST, MAX_CONTRAST)
    } else {
        fallback
    }
}
