//! HTML for the page and the contrast table.

use crate::grid::{highlight_rules, Cell, GridView, HeaderCell};
use crate::models::{GridState, CONTRAST_PRESETS, MAX_CONTRAST, MIN_CONTRAST};
use crate::parsers::format_axis;
use std::fmt::Write;

/// Values shown in the input form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    pub x_text: String,
    pub y_text: String,
    pub contrast: f64,
    pub hide_below: bool,
}

impl FormFields {
    /// Fill the form from a stored grid. A symmetric grid leaves the y field
    /// blank.
    pub fn hydrate(state: &GridState) -> Self {
        Self {
            x_text: format_axis(&state.x_axis),
            y_text: if state.is_symmetric() {
                String::new()
            } else {
                format_axis(&state.y_axis)
            },
            contrast: state.contrast_threshold,
            hide_below: state.hide_below_threshold,
        }
    }
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn header_label(out: &mut String, header: &HeaderCell) {
    out.push_str("<span>");
    if let Some(name) = &header.name {
        let _ = write!(out, "<div class=\"color-name\">{}</div>", escape(name));
    }
    out.push_str(&escape(&header.color));
    out.push_str("</span>");
}

fn header_style(header: &HeaderCell) -> String {
    format!(
        "--color: {}; --text-color: {};",
        header.color, header.text_color
    )
}

fn column_header(out: &mut String, header: &HeaderCell) {
    let _ = write!(
        out,
        "<th scope=\"col\" data-column=\"{}\" style=\"{}\">",
        header.column,
        header_style(header)
    );
    header_label(out, header);
    out.push_str("</th>");
}

fn row_header(out: &mut String, header: &HeaderCell) {
    let _ = write!(
        out,
        "<th scope=\"row\" data-column=\"{}\" style=\"{}\">",
        header.column,
        header_style(header)
    );
    header_label(out, header);
    out.push_str("</th>");
}

fn data_cell(out: &mut String, cell: &Cell) {
    let class = if cell.meets { "" } else { "doesNotMeet" };
    let _ = write!(
        out,
        "<td class=\"{}\" data-column=\"{}\" style=\"--color-1: {}; --color-2: {}; --hover-text-color: {};\">{}</td>",
        class, cell.column, cell.column_color, cell.row_color, cell.hover_text_color, cell.label
    );
}

/// Markup for the `<table>` element.
pub fn render_table(grid: &GridView) -> String {
    let mut out = String::from("<table class=\"contrast-grid\">\n<tr><td data-column=\"0\"></td>");
    for header in &grid.columns {
        column_header(&mut out, header);
    }
    out.push_str("</tr>\n");

    for row in &grid.rows {
        out.push_str("<tr>");
        row_header(&mut out, &row.header);
        for cell in &row.cells {
            data_cell(&mut out, cell);
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</table>");
    out
}

fn format_contrast(value: f64) -> String {
    // 4.5 stays 4.5, 7 stays 7
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn render_form(fields: &FormFields) -> String {
    let contrast = format_contrast(fields.contrast);
    let mut presets = String::new();
    for (label, value) in CONTRAST_PRESETS {
        let _ = write!(
            presets,
            "<button type=\"submit\" name=\"preset\" value=\"{v}\" title=\"{label}\">{v}</button>",
            v = format_contrast(value),
            label = label
        );
    }

    format!(
        r#"<form class="color-input-form" method="post" action="/">
  <label for="xAxis">Colors (x axis)</label>
  <textarea id="xAxis" class="color-input-x" name="xAxis" rows="10">{x}</textarea>
  <label for="yAxis">Colors (y axis, optional)</label>
  <textarea id="yAxis" class="color-input-y" name="yAxis" rows="10">{y}</textarea>
  <fieldset class="contrast-controls">
    <label for="contrast">Contrast</label>
    <input type="range" id="contrast" name="contrast" min="{min}" max="{max}" step="0.1" value="{contrast}">
    <output name="contrastValue" for="contrast">{contrast}</output>
    <div class="datalist-buttons">{presets}</div>
    <label><input type="checkbox" id="hideBelow" name="hideBelow" value="true"{checked}> Hide colors below <span class="contrast-below">{contrast}</span></label>
  </fieldset>
  <button type="submit" name="action" value="submit">Build grid</button>
  <button type="submit" name="action" value="reverse" class="button-reverse">Reverse axes</button>
</form>"#,
        x = escape(&fields.x_text),
        y = escape(&fields.y_text),
        min = format_contrast(MIN_CONTRAST),
        max = format_contrast(MAX_CONTRAST),
        contrast = contrast,
        presets = presets,
        checked = if fields.hide_below { " checked" } else { "" },
    )
}

/// Whole page: form, plus the table when there is a grid to show.
pub fn render_page(fields: &FormFields, grid: Option<&GridView>) -> String {
    let (table, rules) = match grid {
        Some(grid) => (render_table(grid), highlight_rules(grid.column_count())),
        None => (String::new(), String::new()),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Color contrast grid</title>
<link rel="stylesheet" href="/assets/styles.css">
<style>
{rules}
</style>
</head>
<body>
<main>
<h1>Color contrast grid</h1>
{form}
<div class="table-container">
{table}
</div>
</main>
</body>
</html>
"#,
        rules = rules,
        form = render_form(fields),
        table = table,
    )
}
