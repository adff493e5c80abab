/// Text colors tried when picking a legible foreground for a swatch.
pub const TEXT_CANDIDATES: [&str; 2] = ["#fff", "#000"];

fn parse_rgb(input: &str) -> Option<[u8; 3]> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let [r, g, b, _] = csscolorparser::parse(input).ok()?.to_rgba8();
    Some([r, g, b])
}

/// Whether the string is any color the CSS color parser understands
pub fn is_valid(input: &str) -> bool {
    parse_rgb(input).is_some()
}

/// Normalize a color to lowercase `#rrggbb`. Alpha is dropped.
pub fn to_hex(input: &str) -> Option<String> {
    parse_rgb(input).map(|[r, g, b]| format!("#{:02x}{:02x}{:02x}", r, g, b))
}

fn channel(value: u8) -> f64 {
    let c = value as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Calculate relative luminance of a color
fn relative_luminance([r, g, b]: [u8; 3]) -> f64 {
    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Calculate contrast ratio between two colors.
///
/// Unparseable input is treated as black, so callers should only pass
/// colors that already went through [`is_valid`].
pub fn readability(color1: &str, color2: &str) -> f64 {
    let l1 = relative_luminance(parse_rgb(color1).unwrap_or_default());
    let l2 = relative_luminance(parse_rgb(color2).unwrap_or_default());

    let lighter = l1.max(l2);
    let darker = l1.min(l2);

    (lighter + 0.05) / (darker + 0.05)
}

/// Pick the candidate with the highest contrast against `color`, normalized
/// to hex. Ties keep the earlier candidate.
pub fn most_readable(color: &str, candidates: &[&str]) -> String {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates.iter().copied().filter(|c| is_valid(c)) {
        let score = readability(color, candidate);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    best.and_then(|(candidate, _)| to_hex(candidate))
        .unwrap_or_else(|| "#000000".to_string())
}

/// Most readable of black or white
pub fn text_color_for(color: &str) -> String {
    most_readable(color, &TEXT_CANDIDATES)
}
