//! Helvetica text metrics.
//!
//! Label text is set in the PDF base-14 Helvetica, so widths come from its
//! standard advance table rather than from a loaded font file.

/// Advance width for characters outside the table, in 1/1000 em.
const DEFAULT_ADVANCE: u16 = 556;

const ELLIPSIS: &str = "...";

/// Advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

fn advance(ch: char) -> u16 {
    match ch {
        ' '..='~' => HELVETICA[ch as usize - 0x20],
        _ => DEFAULT_ADVANCE,
    }
}

/// Width of `text` set at `size` points, in points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| advance(c) as u32).sum();
    units as f32 * size / 1000.0
}

/// Fit `text` into `max_width` points: the text itself when it fits,
/// otherwise the longest prefix that fits with `"..."` appended.
///
/// When not even the ellipsis fits, returns `"..."` alone.
pub fn truncate_text(text: &str, max_width: f32, size: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    loop {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + ELLIPSIS;
        if chars.is_empty() || text_width(&candidate, size) <= max_width {
            return candidate;
        }
    }
}

/// Cut `text` to `limit` characters with `"..."` appended, when longer.
pub fn clip_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        text.chars().take(limit).collect::<String>() + ELLIPSIS
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_spot_checks() {
        assert_eq!(advance(' '), 278);
        assert_eq!(advance('0'), 556);
        assert_eq!(advance('@'), 1015);
        assert_eq!(advance('W'), 944);
        assert_eq!(advance('i'), 222);
        assert_eq!(advance('~'), 584);
        assert_eq!(advance('é'), DEFAULT_ADVANCE);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        assert!((text_width("Hi", 10.0) - 9.44).abs() < 1e-4);
        assert_eq!(text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_truncate_fits_unchanged() {
        assert_eq!(truncate_text("Widget", 100.0, 7.0), "Widget");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let text = "An extremely long article name that overflows";
        let out = truncate_text(text, 60.0, 7.0);
        assert!(out.ends_with("..."));
        assert!(text.starts_with(out.trim_end_matches("...")));
        assert!(text_width(&out, 7.0) <= 60.0);
        // One more character would not have fit
        let longer = format!("{}{}...", out.trim_end_matches("..."), &text[out.len() - 3..out.len() - 2]);
        assert!(text_width(&longer, 7.0) > 60.0);
    }

    #[test]
    fn test_truncate_property() {
        let samples = ["", "a", "WWWWWWWWWWWWWWWW", "Shelf A-01 / Zone 3", "ümlaut ünïcode"];
        for text in samples {
            for max in [0.0, 5.0, 20.0, 50.0, 200.0] {
                let out = truncate_text(text, max, 6.0);
                if out == text {
                    assert!(text_width(text, 6.0) <= max);
                } else {
                    let prefix = out.strip_suffix("...").unwrap();
                    assert!(text.starts_with(prefix));
                    assert!(prefix.is_empty() || text_width(&out, 6.0) <= max);
                }
            }
        }
    }

    #[test]
    fn test_clip_chars() {
        assert_eq!(clip_chars("short", 20), "short");
        assert_eq!(clip_chars("abcdefghijklmnopqrstuvwxyz", 20), "abcdefghijklmnopqrst...");
    }
}
