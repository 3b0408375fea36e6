//! Text measurement and word wrapping for the built-in PDF fonts.
//!
//! Widths are the Helvetica AFM advance widths in 1/1000 em. Characters
//! outside printable ASCII are measured as an average-width glyph.

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

const FALLBACK_WIDTH: u16 = 556;

/// Advance widths for ASCII 32 (space) through 126 (`~`).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015,                                             // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333,                                                   // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n' .. 'z'
    334, 260, 334, 584,                                                             // '{' .. '~'
];

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_WIDTHS[c as usize - 32],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in millimetres when set at `font_size` points.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * font_size * MM_PER_PT
}

/// Greedily wraps `text` so that no line is wider than `max_width` mm.
///
/// Explicit newlines start a new line. Runs of whitespace collapse to one
/// space. A single word wider than the limit is broken between characters.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, font_size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, max_width, font_size);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits a single overlong word into pieces that each fit `max_width`.
fn break_word(word: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if text_width(&current, font_size) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}

/// Shortens `text` with a trailing `...` until it fits `max_width` mm.
pub fn truncate_to_width(text: &str, max_width: f32, font_size: f32) -> String {
    if text_width(text, font_size) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if text_width(&candidate, font_size) <= max_width {
            return candidate;
        }
    }
    "...".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_known_glyphs() {
        // "i" is 222 units, "W" is 944.
        let narrow = text_width("iiii", 10.0);
        let wide = text_width("WWWW", 10.0);
        assert!(wide > narrow * 4.0);
        assert!((text_width(" ", 1000.0) - 278.0 * MM_PER_PT).abs() < 0.01);
    }

    #[test]
    fn wraps_long_text_within_width() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(10);
        let lines = wrap_text(&text, 60.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 60.0, "line too wide: {line:?}");
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn keeps_explicit_paragraphs() {
        let lines = wrap_text("first\nsecond", 100.0, 10.0);
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn breaks_words_longer_than_the_line() {
        let word = "x".repeat(200);
        let lines = wrap_text(&word, 20.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 20.0);
        }
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_text("", 50.0, 10.0), vec![String::new()]);
    }

    #[test]
    fn truncation_appends_ellipsis() {
        let short = truncate_to_width("abcdefghijklmnopqrstuvwxyz", 15.0, 10.0);
        assert!(short.ends_with("..."));
        assert!(text_width(&short, 10.0) <= 15.0);
        assert_eq!(truncate_to_width("ok", 15.0, 10.0), "ok");
    }
}
