pub mod color_utils;

use crate::models::{Axis, ColorEntry};
use tracing::debug;

/// Segments past this index on a `name: color` line are ignored.
const MAX_SEGMENTS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Color(String),
    Name,
    Empty,
}

/// Parse newline-delimited color text into an axis.
///
/// Each line may be `color`, `name: color` or `color: name`. Sass-style
/// decoration (`$name: #000;`, `name: #000,`) is stripped. Lines without a
/// valid color are dropped.
pub fn parse_axis(input: &str) -> Axis {
    let axis: Axis = input.lines().filter_map(parse_line).collect();
    debug!(
        "Parsed {} colors from {} lines",
        axis.len(),
        input.lines().count()
    );
    axis
}

fn parse_line(line: &str) -> Option<ColorEntry> {
    let segments: Vec<(String, Segment)> = tokenize(line)
        .map(strip_decoration)
        .map(|text| {
            let segment = classify_segment(&text);
            (text, segment)
        })
        .collect();

    // Labels like `Black` or `Red` are colors too, so the last color on the
    // line is the value and anything before it is the name.
    let color_idx = segments
        .iter()
        .rposition(|(_, segment)| matches!(segment, Segment::Color(_)))?;

    let mut name = None;
    let mut color = None;
    for (idx, (text, segment)) in segments.into_iter().enumerate() {
        match segment {
            Segment::Color(hex) if idx == color_idx => color = Some(hex),
            Segment::Empty => {}
            _ if name.is_none() => name = Some(text),
            _ => {}
        }
    }

    color.map(|color| ColorEntry { name, color })
}

fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(':').take(MAX_SEGMENTS)
}

fn strip_decoration(segment: &str) -> String {
    let segment = match segment.find(';') {
        Some(pos) => &segment[..pos],
        None => segment,
    };
    let segment = segment.trim();
    segment.strip_suffix(',').unwrap_or(segment).trim().to_string()
}

fn classify_segment(segment: &str) -> Segment {
    if segment.is_empty() {
        return Segment::Empty;
    }
    match color_utils::to_hex(segment) {
        Some(hex) => Segment::Color(hex),
        None => Segment::Name,
    }
}

/// Render an axis back into the text the parser reads.
///
/// Names holding a `:` go after the color so the color stays within the
/// first two segments; the name is then cut at its first `:`.
pub fn format_axis(axis: &Axis) -> String {
    axis.iter()
        .map(|entry| match &entry.name {
            Some(name) if name.contains(':') => format!("{}: {}", entry.color, name),
            Some(name) => format!("{}: {}", name, entry.color),
            None => entry.color.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
