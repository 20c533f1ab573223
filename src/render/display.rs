//! Single-code display state.
//!
//! Models what an on-screen code widget shows: a loading flag, an error
//! banner, either a locally drawn image or a remote fallback URL, and the
//! code text beneath. State is an explicit value owned by the caller.

use image::GrayImage;

use super::remote;
use super::{RenderContext, RenderedCode, Renderer, TargetSurface};
use super::surface::SurfaceSlot;
use crate::model::{BarcodeItem, Symbology};

/// Items shown in a batch preview.
pub const PREVIEW_LIMIT: usize = 4;

/// Banner shown when a remote fallback image can't be loaded.
pub const IMAGE_LOAD_ERROR: &str = "Error loading barcode image";

/// Default widget size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (200, 60);

/// What a display widget currently shows.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub loading: bool,
    pub error: Option<String>,
    /// True when `image` was drawn locally and should be shown.
    pub show_canvas: bool,
    pub display_code: String,
    /// Remote image URL when the chain fell through to the service tier.
    pub fallback_url: Option<String>,
    pub image: Option<GrayImage>,
}

impl DisplayState {
    /// A fresh widget, loading until the first `generate`.
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    /// Render `code` for display on `surface`, replacing any previous state.
    pub async fn generate(
        &mut self,
        renderer: &Renderer,
        code: &str,
        symbology: Symbology,
        size: (u32, u32),
        surface: &SurfaceSlot,
    ) {
        *self = Self::new();

        let target = TargetSurface::display(surface.clone(), size.0, size.1);
        match renderer.render_code(code, symbology, &target).await {
            Ok(outcome) => {
                self.display_code = outcome.display_code;
                match outcome.code {
                    RenderedCode::Bitmap(image) => {
                        self.image = Some(image);
                        self.show_canvas = true;
                    }
                    RenderedCode::Remote { url, image } => {
                        self.fallback_url = Some(url);
                        self.image = image;
                    }
                }
                tracing::debug!(code, tier = outcome.tier, "display code ready");
            }
            Err(e) => {
                tracing::warn!(code, error = %e, "display code generation failed");
                self.error = Some(format!("Generation error: {}", e));
            }
        }
        self.loading = false;
    }

    /// The remote fallback image failed to load in the viewer.
    pub fn on_image_error(&mut self) {
        self.error = Some(IMAGE_LOAD_ERROR.to_string());
        self.loading = false;
    }

    /// Download the remote fallback image, if there is one and it isn't
    /// loaded yet. A failed download sets the image-load banner.
    pub async fn load_remote(&mut self, ctx: &RenderContext) {
        if self.image.is_some() {
            return;
        }
        let Some(url) = self.fallback_url.clone() else {
            return;
        };
        match remote::fetch_image(&url, ctx).await {
            Ok(image) => self.image = Some(image),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "remote fallback image failed to load");
                self.on_image_error();
            }
        }
    }
}

/// The first few items of a batch, for a preview strip.
pub fn preview_items(items: &[BarcodeItem]) -> &[BarcodeItem] {
    &items[..items.len().min(PREVIEW_LIMIT)]
}
