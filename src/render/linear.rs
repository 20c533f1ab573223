//! 1D barcode library tier.
//!
//! Uses the barcoders crate for Code 128 and EAN-13 encoding, then draws the
//! modules as bars across the canvas with the human-readable value beneath.

use async_trait::async_trait;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean13::EAN13;

use super::canvas::{BLACK, Canvas};
use super::glyphs::BitmapFont;
use super::{RenderContext, RenderMode, RenderRequest, RenderStrategy, RenderedCode};
use crate::ean13;
use crate::error::LabelError;
use crate::model::Symbology;

/// Horizontal margin on each side of the bars, in layout units.
const MARGIN: u32 = 10;
/// Gap between bars and the value text, in layout units.
const TEXT_MARGIN: u32 = 5;

/// Draws Code 128 / EAN-13 with the embedded encoder.
pub struct LinearLibrary;

#[async_trait]
impl RenderStrategy for LinearLibrary {
    fn name(&self) -> &'static str {
        "linear-library"
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

        let modules = encode(&request.payload, request.symbology)?;
        let (width, height) = canvas_size(request);
        let canvas = draw_bars(&modules, &request.payload, width, height, request.scale)?;
        Ok(RenderedCode::Bitmap(canvas.into_image()))
    }
}

/// Canvas size for a request. On screen the canvas is sized generously so the
/// symbol stays scannable; embedded images use the exact size they'll occupy.
pub fn canvas_size(request: &RenderRequest) -> (u32, u32) {
    match (request.mode, request.symbology) {
        (RenderMode::Embed, _) => (request.width, request.height),
        (RenderMode::Display, Symbology::Ean13) => (request.width.max(240), request.height.max(100)),
        (RenderMode::Display, _) => (request.width.max(200), request.height.max(80)),
    }
}

/// Encode a payload into modules (1 = bar, 0 = space).
pub fn encode(payload: &str, symbology: Symbology) -> Result<Vec<u8>, LabelError> {
    match symbology {
        Symbology::Code128 => encode_code128(payload),
        Symbology::Ean13 => encode_ean13(payload),
        Symbology::Qr => Err(LabelError::LibraryRender(
            "QR is not a linear symbology".into(),
        )),
    }
}

/// Encode data as Code 128 modules.
pub fn encode_code128(data: &str) -> Result<Vec<u8>, LabelError> {
    // Code128 requires a character set prefix:
    // - Character Set A (Ā): uppercase, control chars, digits
    // - Character Set B (Ɓ): uppercase, lowercase, digits, special chars
    // - Character Set C (Ć): digit pairs only (high density)
    // We use Set B as it supports the widest range of printable characters.
    if data.is_empty() {
        return Err(LabelError::LibraryRender("Code 128 needs at least one character".into()));
    }
    let prefixed = format!("\u{0181}{}", data);
    let barcode = Code128::new(&prefixed)
        .map_err(|e| LabelError::LibraryRender(format!("Code 128 rejected '{}': {}", data, e)))?;
    Ok(barcode.encode())
}

/// Encode a synthesized EAN-13 code. The encoder recomputes the check digit
/// from the 12 data digits.
pub fn encode_ean13(code: &str) -> Result<Vec<u8>, LabelError> {
    if !ean13::is_valid(code) {
        return Err(LabelError::LibraryRender(format!("'{}' is not a valid EAN-13 code", code)));
    }
    let barcode = EAN13::new(ean13::data_part(code))
        .map_err(|e| LabelError::LibraryRender(format!("EAN-13 rejected '{}': {}", code, e)))?;
    Ok(barcode.encode())
}

/// Draw modules as bars on a `width`×`height` canvas, with `text` beneath
/// when there is room for it.
pub fn draw_bars(
    modules: &[u8],
    text: &str,
    width: u32,
    height: u32,
    scale: u32,
) -> Result<Canvas, LabelError> {
    let scale = scale.max(1);
    let margin = MARGIN * scale;
    let usable = width.saturating_sub(2 * margin);
    let module_px = usable / modules.len().max(1) as u32;
    if module_px == 0 {
        return Err(LabelError::LibraryRender(format!(
            "{} modules do not fit in {} px",
            modules.len(),
            usable
        )));
    }

    let font = BitmapFont::Medium;
    let text_scale = value_text_scale(height, scale, font);
    let text_block = match text_scale {
        Some(s) => font.char_height() as u32 * s + TEXT_MARGIN * scale,
        None => 0,
    };
    let bar_height = height.saturating_sub(text_block);
    if bar_height == 0 {
        return Err(LabelError::LibraryRender(format!("{} px is too short for bars", height)));
    }

    let mut canvas = Canvas::new(width, height);
    let bars_width = module_px * modules.len() as u32;
    let start_x = (width - bars_width) / 2;

    for (i, &module) in modules.iter().enumerate() {
        if module == 1 {
            canvas.fill_rect(
                (start_x + i as u32 * module_px) as i64,
                0,
                module_px,
                bar_height,
                BLACK,
            );
        }
    }

    if let Some(s) = text_scale {
        let y = (bar_height + TEXT_MARGIN * scale) as i64;
        canvas.draw_text_centered(y, 0, text, font, s);
    }

    Ok(canvas)
}

/// Glyph scale for the value line: as large as the layout scale allows while
/// keeping the text under a third of the canvas; `None` drops the text.
fn value_text_scale(height: u32, scale: u32, font: BitmapFont) -> Option<u32> {
    let glyph = font.char_height() as u32;
    let budget = height / 3;
    let fit = budget / glyph;
    match fit.min(scale) {
        0 => None,
        s => Some(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::WHITE;
    use crate::render::{SurfaceSlot, TargetSurface};

    #[test]
    fn test_code128_encoding() {
        let modules = encode_code128("Hello").unwrap();
        assert!(!modules.is_empty());
        assert!(modules.iter().any(|&m| m == 1));
    }

    #[test]
    fn test_code128_empty_fails() {
        assert!(encode_code128("").is_err());
    }

    #[test]
    fn test_ean13_encoding() {
        // 3 guard + 6*7 + 5 guard + 6*7 + 3 guard
        assert_eq!(encode_ean13("5901234123457").unwrap().len(), 95);
        assert!(encode_ean13("5901234123458").is_err());
        assert!(encode(&ean13::synthesize_str("ABC123"), Symbology::Ean13).is_ok());
    }

    #[test]
    fn test_qr_is_not_linear() {
        assert!(encode("x", Symbology::Qr).is_err());
    }

    #[test]
    fn test_draw_bars_layout() {
        let modules = encode_code128("WID-001").unwrap();
        let canvas = draw_bars(&modules, "WID-001", 300, 100, 1).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (300, 100));
        // Code 128 starts with a bar; the left margin stays white
        assert_eq!(canvas.pixel(0, 10), WHITE);
        let start_x = (300 - (280 / modules.len() as u32) * modules.len() as u32) / 2;
        assert_eq!(canvas.pixel(start_x, 10), BLACK);
    }

    #[test]
    fn test_draw_bars_too_narrow() {
        let modules = encode_code128("A-VERY-LONG-CODE-THAT-WILL-NOT-FIT").unwrap();
        assert!(draw_bars(&modules, "x", 60, 80, 1).is_err());
    }

    #[test]
    fn test_text_dropped_on_short_canvas() {
        assert_eq!(value_text_scale(30, 1, BitmapFont::Medium), None);
        assert_eq!(value_text_scale(80, 1, BitmapFont::Medium), Some(1));
        assert_eq!(value_text_scale(200, 4, BitmapFont::Medium), Some(4));
        assert_eq!(value_text_scale(200, 8, BitmapFont::Medium), Some(4));
    }

    #[test]
    fn test_display_canvas_is_generous() {
        let slot = SurfaceSlot::attached();
        let code128 = RenderRequest::new("x", Symbology::Code128, &TargetSurface::display(slot.clone(), 120, 40));
        assert_eq!(canvas_size(&code128), (200, 80));
        let ean = RenderRequest::new("x", Symbology::Ean13, &TargetSurface::display(slot, 120, 40));
        assert_eq!(canvas_size(&ean), (240, 100));
        let embed = RenderRequest::new("x", Symbology::Ean13, &TargetSurface::offscreen(120, 40, 4));
        assert_eq!(canvas_size(&embed), (120, 40));
    }
}
