//! Grayscale drawing surface.
//!
//! The in-memory stand-in for an HTML canvas: a white `GrayImage` with
//! rectangle fills and bitmap text. Render tiers draw on it; the composer
//! embeds the resulting image in the PDF.

use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;

use super::glyphs::{self, BitmapFont};
use crate::error::LabelError;

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 255;

/// A white-initialized grayscale bitmap.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: GrayImage,
}

impl Canvas {
    /// Create a white canvas. Zero dimensions are bumped to 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(width.max(1), height.max(1), Luma([WHITE])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, luma: u8) {
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        let x1 = ((x + w as i64).max(0) as u32).min(self.width());
        let y1 = ((y + h as i64).max(0) as u32).min(self.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, Luma([luma]));
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y)[0]
    }

    /// Draw `text` with its top-left corner at (x, y), each glyph pixel
    /// expanded to `scale`×`scale`. Pixels off the canvas are dropped.
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, font: BitmapFont, scale: u32) {
        let scale = scale.max(1) as i64;
        let cw = font.char_width();
        let ch = font.char_height();

        for (i, c) in text.chars().enumerate() {
            let bitmap = glyphs::glyph(font, c);
            let origin_x = x + (i * cw) as i64 * scale;
            for gy in 0..ch {
                for gx in 0..cw {
                    if !bitmap[gy * cw + gx] {
                        continue;
                    }
                    self.fill_rect(
                        origin_x + gx as i64 * scale,
                        y + gy as i64 * scale,
                        scale as u32,
                        scale as u32,
                        BLACK,
                    );
                }
            }
        }
    }

    /// Draw `text` horizontally centered on the canvas, top at `y`.
    /// Text wider than the canvas starts at `min_x` instead.
    pub fn draw_text_centered(&mut self, y: i64, min_x: i64, text: &str, font: BitmapFont, scale: u32) {
        let width = glyphs::text_width(font, text, scale) as i64;
        let x = ((self.width() as i64 - width) / 2).max(min_x);
        self.draw_text(x, y, text, font, scale);
    }

    /// True if no pixel is darker than white.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p[0] == WHITE)
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// PNG-encode the canvas (the `toDataURL` equivalent).
    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        encode_png(&self.image)
    }
}

impl From<GrayImage> for Canvas {
    fn from(image: GrayImage) -> Self {
        Self { image }
    }
}

/// PNG-encode a grayscale image.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, LabelError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| LabelError::LibraryRender(format!("PNG encoding failed: {}", e)))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_white() {
        let canvas = Canvas::new(10, 5);
        assert!(canvas.is_blank());
        assert_eq!((canvas.width(), canvas.height()), (10, 5));
    }

    #[test]
    fn test_zero_size_is_bumped() {
        let canvas = Canvas::new(0, 0);
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(-5, 8, 20, 20, BLACK);
        assert_eq!(canvas.pixel(0, 8), BLACK);
        assert_eq!(canvas.pixel(9, 9), BLACK);
        assert_eq!(canvas.pixel(0, 7), WHITE);
    }

    #[test]
    fn test_draw_text_inks() {
        let mut canvas = Canvas::new(40, 20);
        canvas.draw_text(1, 1, "Hi", BitmapFont::Small, 1);
        assert!(!canvas.is_blank());
    }

    #[test]
    fn test_png_signature() {
        let png = Canvas::new(4, 4).to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
