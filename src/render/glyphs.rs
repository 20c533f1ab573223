//! Bitmap glyphs for text drawn onto a [`Canvas`](super::canvas::Canvas).
//!
//! Uses the Spleen bitmap font family. Each face is parsed once on first use
//! and cached as a printable-ASCII atlas; characters outside the atlas draw
//! as a box.

use spleen_font::{FONT_6X12, FONT_8X16, PSF2Font};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Available bitmap faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitmapFont {
    /// 6×12, used for the hand-drawn fallback caption.
    Small,
    /// 8×16, used for the human-readable line under library barcodes.
    Medium,
}

impl BitmapFont {
    pub fn char_width(self) -> usize {
        match self {
            BitmapFont::Small => 6,
            BitmapFont::Medium => 8,
        }
    }

    pub fn char_height(self) -> usize {
        match self {
            BitmapFont::Small => 12,
            BitmapFont::Medium => 16,
        }
    }

    fn data(self) -> &'static [u8] {
        match self {
            BitmapFont::Small => FONT_6X12,
            BitmapFont::Medium => FONT_8X16,
        }
    }
}

/// Pre-rasterized glyphs for one face. Each glyph is `char_width * char_height`
/// booleans, row-major, true = ink.
struct GlyphAtlas {
    width: usize,
    height: usize,
    glyphs: HashMap<char, Vec<bool>>,
}

static SMALL: OnceLock<GlyphAtlas> = OnceLock::new();
static MEDIUM: OnceLock<GlyphAtlas> = OnceLock::new();

fn atlas(font: BitmapFont) -> &'static GlyphAtlas {
    let cell = match font {
        BitmapFont::Small => &SMALL,
        BitmapFont::Medium => &MEDIUM,
    };
    cell.get_or_init(|| load_atlas(font))
}

fn load_atlas(font: BitmapFont) -> GlyphAtlas {
    let width = font.char_width();
    let height = font.char_height();
    let mut glyphs = HashMap::new();

    // A face that fails to parse leaves the atlas empty; every char then
    // draws as a box.
    if let Ok(mut spleen) = PSF2Font::new(font.data()) {
        for ch in (0x20u8..0x7f).map(char::from) {
            let utf8 = ch.to_string();
            if let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
                let mut bitmap = vec![false; width * height];
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if row_y < height && col_x < width {
                            bitmap[row_y * width + col_x] = on;
                        }
                    }
                }
                glyphs.insert(ch, bitmap);
            }
        }
    }

    GlyphAtlas {
        width,
        height,
        glyphs,
    }
}

/// Glyph bitmap for `ch`, or a box outline for unknown characters.
pub fn glyph(font: BitmapFont, ch: char) -> Vec<bool> {
    let atlas = atlas(font);
    match atlas.glyphs.get(&ch) {
        Some(bitmap) => bitmap.clone(),
        None => box_glyph(atlas.width, atlas.height),
    }
}

/// Width in pixels of `text` at integer `scale`.
pub fn text_width(font: BitmapFont, text: &str, scale: u32) -> usize {
    text.chars().count() * font.char_width() * scale.max(1) as usize
}

fn box_glyph(width: usize, height: usize) -> Vec<bool> {
    let mut bitmap = vec![false; width * height];
    for x in 0..width {
        bitmap[x] = true;
        bitmap[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        bitmap[y * width] = true;
        bitmap[y * width + width - 1] = true;
    }
    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_has_ink() {
        let g = glyph(BitmapFont::Medium, 'A');
        assert_eq!(g.len(), 8 * 16);
        assert!(g.iter().any(|&on| on));
    }

    #[test]
    fn test_space_is_blank() {
        let g = glyph(BitmapFont::Small, ' ');
        assert_eq!(g.len(), 6 * 12);
        assert!(g.iter().all(|&on| !on));
    }

    #[test]
    fn test_unknown_char_is_box() {
        let g = glyph(BitmapFont::Small, '€');
        assert!(g[0] && g[5] && g[6 * 11]);
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(BitmapFont::Small, "abc", 1), 18);
        assert_eq!(text_width(BitmapFont::Medium, "abc", 2), 48);
    }
}
