//! QR library tier.
//!
//! Encodes with the `qrcode` crate at error-correction level M and draws the
//! modules onto a square canvas of `min(width, height)` pixels with a
//! 2-module quiet zone. When the canvas is smaller than one pixel per module,
//! the symbol is drawn at 1 px/module and scaled down to fit, matching what a
//! browser does when a QR image is drawn into a smaller canvas.

use async_trait::async_trait;
use image::imageops::{self, FilterType};
use qrcode::{Color, EcLevel, QrCode};

use super::canvas::{BLACK, Canvas};
use super::{RenderContext, RenderRequest, RenderStrategy, RenderedCode};
use crate::error::LabelError;

/// Quiet zone around the symbol, in modules.
pub const QUIET_ZONE: usize = 2;

/// Draws QR codes with the embedded encoder.
pub struct QrLibrary;

#[async_trait]
impl RenderStrategy for QrLibrary {
    fn name(&self) -> &'static str {
        "qr-library"
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

        let size = request.width.min(request.height).max(1);
        let canvas = draw_qr(&request.payload, size)?;
        Ok(RenderedCode::Bitmap(canvas.into_image()))
    }
}

/// Draw `data` as a QR code on a `size`×`size` canvas.
pub fn draw_qr(data: &str, size: u32) -> Result<Canvas, LabelError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| LabelError::LibraryRender(format!("QR code generation failed: {}", e)))?;

    let modules = code.width();
    let total = modules + 2 * QUIET_ZONE;
    let size = size as usize;

    // Pixels per module; zero means the symbol doesn't fit at 1:1
    let cell = size / total;
    let render_cell = cell.max(1);
    let render_size = if cell == 0 { total } else { size };

    let mut canvas = Canvas::new(render_size as u32, render_size as u32);
    let offset = (render_size - render_cell * total) / 2 + QUIET_ZONE * render_cell;

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx, qy)] == Color::Dark {
                canvas.fill_rect(
                    (offset + qx * render_cell) as i64,
                    (offset + qy * render_cell) as i64,
                    render_cell as u32,
                    render_cell as u32,
                    BLACK,
                );
            }
        }
    }

    if cell == 0 {
        let scaled = imageops::resize(
            canvas.as_image(),
            size as u32,
            size as u32,
            FilterType::Triangle,
        );
        return Ok(Canvas::from(scaled));
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::WHITE;
    use crate::render::{SurfaceSlot, TargetSurface};
    use crate::model::Symbology;
    use std::time::Duration;

    #[test]
    fn test_draw_qr_size_and_quiet_zone() {
        let canvas = draw_qr("https://example.com", 200).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (200, 200));
        // Corners are inside the quiet zone
        assert_eq!(canvas.pixel(0, 0), WHITE);
        assert_eq!(canvas.pixel(199, 199), WHITE);
        assert!(!canvas.is_blank());
    }

    #[test]
    fn test_draw_qr_finder_pattern() {
        // Version 1 (21 modules) + 4 quiet modules = 25 → 4 px/module at 100 px
        let canvas = draw_qr("A", 100).unwrap();
        // First dark module of the top-left finder sits at the quiet-zone edge
        assert_eq!(canvas.pixel(8, 8), BLACK);
        assert_eq!(canvas.pixel(7, 7), WHITE);
    }

    #[test]
    fn test_draw_qr_tiny_canvas_scales_down() {
        let canvas = draw_qr("WID-001", 12).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (12, 12));
    }

    #[tokio::test]
    async fn test_detached_surface_fails() {
        let ctx = RenderContext {
            poll: crate::render::PollBudget {
                attempts: 2,
                interval: Duration::from_millis(1),
            },
            ..RenderContext::with_defaults().unwrap()
        };
        let target = TargetSurface::display(SurfaceSlot::detached(), 120, 120);
        let request = RenderRequest::new("X", Symbology::Qr, &target);
        let err = QrLibrary.try_render(&request, &ctx).await.unwrap_err();
        assert!(matches!(err, LabelError::CanvasUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_uses_smaller_side() {
        let ctx = RenderContext::with_defaults().unwrap();
        let request = RenderRequest::new(
            "X",
            Symbology::Qr,
            &TargetSurface::offscreen(300, 90, 1),
        );
        let code = QrLibrary.try_render(&request, &ctx).await.unwrap();
        assert_eq!(code.image().map(|i| i.dimensions()), Some((90, 90)));
    }
}
