//! Hand-drawn fallback tier.
//!
//! Not a scannable symbology: a deterministic bar pattern derived from the
//! code's characters, with the code printed underneath so a human can still
//! read the label. Only needs a surface, so it succeeds whenever the library
//! tier can't encode the payload.
//!
//! ```text
//! position i → x = 10 + 3i, (char mod 3) + 1 bars of width 2
//! ┃┃ ┃┃┃ ┃ ┃┃ ...
//! WID-001
//! ```

use async_trait::async_trait;

use super::canvas::{BLACK, Canvas};
use super::glyphs::{self, BitmapFont};
use super::{RenderContext, RenderRequest, RenderStrategy, RenderedCode};
use crate::error::LabelError;

const BAR_WIDTH: u32 = 2;
const BAR_SPACING: u32 = 1;
const START_X: u32 = 10;
const START_Y: u32 = 5;
const MIN_BAR_HEIGHT: u32 = 30;
/// Baseline offset of the caption below the bars.
const CAPTION_OFFSET: u32 = 15;
/// Character positions drawn at most.
const MAX_POSITIONS: usize = 20;

/// Draws pseudo-bars directly on the canvas.
pub struct HandDrawn;

#[async_trait]
impl RenderStrategy for HandDrawn {
    fn name(&self) -> &'static str {
        "hand-drawn"
    }

    fn needs_surface(&self) -> bool {
        true
    }

    async fn try_render(
        &self,
        request: &RenderRequest,
        ctx: &RenderContext,
    ) -> Result<RenderedCode, LabelError> {
        request.slot.wait_attached(ctx.poll).await?;

        let canvas = draw(&request.payload, request.width, request.height, request.scale);
        Ok(RenderedCode::Bitmap(canvas.into_image()))
    }
}

/// Bars per character position: `(code mod 3) + 1`, first 20 positions.
pub fn bar_counts(code: &str) -> Vec<u32> {
    code.chars()
        .take(MAX_POSITIONS)
        .map(|c| (c as u32 % 3) + 1)
        .collect()
}

/// Draw the pseudo-barcode for `code` on a `width`×`height` canvas.
/// Layout constants are in layout units, multiplied by `scale`.
pub fn draw(code: &str, width: u32, height: u32, scale: u32) -> Canvas {
    let scale = scale.max(1);
    let mut canvas = Canvas::new(width, height);

    let bar_width = BAR_WIDTH * scale;
    let start_x = START_X * scale;
    let start_y = START_Y * scale;
    let bar_height = MIN_BAR_HEIGHT.max((height / scale).saturating_sub(30)) * scale;
    let right_limit = width.saturating_sub(10 * scale);

    for (i, count) in bar_counts(code).into_iter().enumerate() {
        let x = start_x + i as u32 * (bar_width + BAR_SPACING * scale);
        for j in 0..count {
            let bx = x + j * bar_width;
            if bx < right_limit {
                canvas.fill_rect(bx as i64, start_y as i64, bar_width, bar_height, BLACK);
            }
        }
    }

    // Caption centered under the bars, never left of the bars' start
    let font = BitmapFont::Small;
    let baseline = start_y + bar_height + CAPTION_OFFSET * scale;
    let ascent = (font.char_height() as u32 - 2) * scale;
    let text_width = glyphs::text_width(font, code, scale) as i64;
    let x = ((width as i64 - text_width) / 2).max(start_x as i64);
    canvas.draw_text(x, baseline as i64 - ascent as i64, code, font, scale);

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::WHITE;

    #[test]
    fn test_bar_counts() {
        // '0' = 48 → 1, '1' = 49 → 2, '2' = 50 → 3
        assert_eq!(bar_counts("012"), vec![1, 2, 3]);
        assert_eq!(bar_counts("A"), vec![(65 % 3) + 1]);
        assert_eq!(bar_counts(&"9".repeat(40)).len(), 20);
    }

    #[test]
    fn test_draw_is_deterministic() {
        let a = draw("WID-001", 200, 80, 1);
        let b = draw("WID-001", 200, 80, 1);
        assert_eq!(a.as_image().as_raw(), b.as_image().as_raw());
    }

    #[test]
    fn test_first_bar_position() {
        let canvas = draw("0", 200, 80, 1);
        // '0' → one bar at x 10..12, y 5..55
        assert_eq!(canvas.pixel(10, 5), BLACK);
        assert_eq!(canvas.pixel(11, 54), BLACK);
        assert_eq!(canvas.pixel(12, 5), WHITE);
        assert_eq!(canvas.pixel(9, 5), WHITE);
    }

    #[test]
    fn test_bars_clip_at_right_edge() {
        let canvas = draw(&"2".repeat(20), 40, 80, 1);
        // Bars start before the 10 px right margin; the last one may spill a pixel
        for x in 31..40 {
            assert_eq!(canvas.pixel(x, 10), WHITE);
        }
    }

    #[test]
    fn test_scaled_draw() {
        let canvas = draw("0", 800, 320, 4);
        assert_eq!(canvas.pixel(40, 20), BLACK);
        assert_eq!(canvas.pixel(48, 20), WHITE);
    }
}
