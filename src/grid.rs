//! Contrast table view-model.
//!
//! Cells carry everything markup needs, so the table can be checked (and
//! served as JSON) without going through HTML.

use crate::models::{Axis, ColorEntry, GridState};
use crate::parsers::color_utils::{readability, text_color_for};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub column: usize,
    pub name: Option<String>,
    pub color: String,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub column: usize,
    pub ratio: f64,
    pub label: String,
    pub column_color: String,
    pub row_color: String,
    pub hover_text_color: String,
    pub meets: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub header: HeaderCell,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub columns: Vec<HeaderCell>,
    pub rows: Vec<Row>,
    pub contrast_threshold: f64,
    pub hide_below_threshold: bool,
}

impl GridView {
    pub fn from_state(state: &GridState) -> Self {
        build(
            &state.x_axis,
            &state.y_axis,
            state.contrast_threshold,
            state.hide_below_threshold,
        )
    }

    /// Table width including the row-header column.
    pub fn column_count(&self) -> usize {
        self.columns.len() + 1
    }
}

/// Build the grid: columns from `x_axis`, rows from `y_axis`.
///
/// With `hide_below` set, cells under `threshold` are flagged rather than
/// removed.
pub fn build(x_axis: &Axis, y_axis: &Axis, threshold: f64, hide_below: bool) -> GridView {
    let columns: Vec<HeaderCell> = x_axis
        .iter()
        .enumerate()
        .map(|(idx, entry)| header_cell(idx + 1, entry))
        .collect();

    let rows = y_axis
        .iter()
        .map(|row_entry| Row {
            header: header_cell(0, row_entry),
            cells: columns
                .iter()
                .map(|column| cell(column, &row_entry.color, threshold, hide_below))
                .collect(),
        })
        .collect();

    GridView {
        columns,
        rows,
        contrast_threshold: threshold,
        hide_below_threshold: hide_below,
    }
}

fn header_cell(column: usize, entry: &ColorEntry) -> HeaderCell {
    HeaderCell {
        column,
        name: entry.name.clone(),
        color: entry.color.clone(),
        text_color: text_color_for(&entry.color),
    }
}

fn cell(column: &HeaderCell, row_color: &str, threshold: f64, hide_below: bool) -> Cell {
    let ratio = readability(&column.color, row_color);
    Cell {
        column: column.column,
        ratio,
        label: format!("{:.2}", ratio),
        column_color: column.color.clone(),
        row_color: row_color.to_string(),
        hover_text_color: column.text_color.clone(),
        meets: !hide_below || ratio >= threshold,
    }
}

/// CSS that highlights a whole column while any of its cells is hovered.
pub fn highlight_rules(column_count: usize) -> String {
    (0..column_count)
        .map(|column| {
            format!(
                ".contrast-grid:has([data-column=\"{c}\"]:hover) [data-column=\"{c}\"]{{outline:2px solid currentColor;outline-offset:-2px}}",
                c = column
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
