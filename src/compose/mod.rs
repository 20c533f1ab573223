//! # Label Composition
//!
//! Lays out items as printable PDF pages, one label per page:
//!
//! ```text
//! ┌──────────────────────────┐
//! │         eSTOCK           │  company line (optional)
//! │        ▛▀▀▀▀▀▜           │
//! │        ▌ QR  ▐           │  code image, or a placeholder box
//! │        ▙▄▄▄▄▄▟           │
//! │         Widget           │  name (optional)
//! │       Blue widget        │  description (optional, space permitting)
//! │         WID-001          │  code text (space permitting)
//! └──────────────────────────┘
//! ```
//!
//! Items are rendered strictly one after another. A code that no tier can
//! render becomes a placeholder; only a failure to produce the document
//! itself is returned as an error.
//!
//! - [`metrics`]: Helvetica widths and truncation
//! - [`layout`]: per-page element planning
//! - [`pdf`]: printpdf backend
//! - [`sheet`]: dense A4 text grid

pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod sheet;

pub use layout::{Element, LabelPlan};

use chrono::NaiveDate;
use image::GrayImage;

use crate::error::LabelError;
use crate::model::{BarcodeItem, RenderOptions};
use crate::output::{ItemFailure, LabelDocument};
use crate::render::{Renderer, TargetSurface};

/// Title written into label PDFs.
pub const DOCUMENT_TITLE: &str = "eSTOCK labels";

/// Composes label documents from items, rendering codes through a [`Renderer`].
pub struct LabelComposer {
    renderer: Renderer,
}

impl LabelComposer {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// One label page per item.
    pub async fn compose(
        &self,
        items: &[BarcodeItem],
        options: &RenderOptions,
    ) -> Result<LabelDocument, LabelError> {
        if items.is_empty() {
            return Err(LabelError::Document("no items to generate labels for".into()));
        }

        let dims = options.label_size.dimensions();
        let image_box = layout::image_box(options, dims);
        let scale = self.renderer.context().config.raster_scale;
        let target = TargetSurface::offscreen(
            pixels(image_box.w, scale),
            pixels(image_box.h, scale),
            scale,
        );

        let mut plans = Vec::with_capacity(items.len());
        let mut bitmaps: Vec<Option<GrayImage>> = Vec::with_capacity(items.len());
        let mut failures = Vec::new();

        for item in items {
            let bitmap = match self.render_item(item, options, &target).await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(item = %item.id, code = %item.code, error = %e, "drawing placeholder");
                    failures.push(ItemFailure {
                        item_id: item.id.clone(),
                        message: e.to_string(),
                    });
                    None
                }
            };
            plans.push(layout::plan_label(item, options, dims, bitmap.is_some()));
            bitmaps.push(bitmap);
        }

        let pages: Vec<pdf::PageContent<'_>> = plans
            .iter()
            .zip(&bitmaps)
            .map(|(plan, image)| pdf::PageContent {
                plan,
                image: image.as_ref(),
            })
            .collect();
        let bytes = pdf::write_pdf(DOCUMENT_TITLE, &pages)?;

        tracing::info!(
            labels = items.len(),
            placeholders = failures.len(),
            size = %options.label_size,
            symbology = %options.code_type,
            "composed label document"
        );

        Ok(LabelDocument {
            bytes,
            page_count: plans.len(),
            plans,
            failures,
            message: None,
        })
    }

    /// Render one item's code to the pixels its image box needs.
    async fn render_item(
        &self,
        item: &BarcodeItem,
        options: &RenderOptions,
        target: &TargetSurface,
    ) -> Result<GrayImage, LabelError> {
        let outcome = self.renderer.render(item, options.code_type, target).await?;
        match outcome.code.image() {
            Some(image) => Ok(image.clone()),
            None => Err(LabelError::Composition(format!(
                "tier '{}' produced no pixels for '{}'",
                outcome.tier, item.code
            ))),
        }
    }
}

/// Text-only A4 grid export.
pub fn compose_sheet(
    items: &[BarcodeItem],
    options: &RenderOptions,
    date: NaiveDate,
) -> Result<LabelDocument, LabelError> {
    let plans = sheet::plan_sheet(items, options, date);
    let pages: Vec<pdf::PageContent<'_>> = plans
        .iter()
        .map(|plan| pdf::PageContent { plan, image: None })
        .collect();
    let bytes = pdf::write_pdf(DOCUMENT_TITLE, &pages)?;

    Ok(LabelDocument {
        bytes,
        page_count: plans.len(),
        plans,
        failures: Vec::new(),
        message: Some(format!("PDF generated with {} labels", items.len())),
    })
}

/// Pixel count for a length in points at `scale` px/pt.
fn pixels(points: f32, scale: u32) -> u32 {
    ((points * scale as f32).round() as u32).max(1)
}
