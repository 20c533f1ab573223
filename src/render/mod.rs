//! # Rendering Module
//!
//! Turns a code plus a symbology into an image, degrading through an ordered
//! chain of tiers until one succeeds:
//!
//! ```text
//! QR            : QrLibrary ───────────────────────► RemoteService
//! Code128/EAN13 : LinearLibrary ──► HandDrawn ─────► RemoteService
//! ```
//!
//! Each tier implements [`RenderStrategy`]. A tier failure is logged at
//! `debug` and the next tier runs; only when the whole chain fails does the
//! caller see an error ([`LabelError::Exhausted`]).
//!
//! ## Modules
//!
//! - [`canvas`]: grayscale drawing surface
//! - [`surface`]: surface attachment and polling
//! - [`glyphs`]: lazily loaded bitmap font
//! - [`qr`], [`linear`], [`handdrawn`], [`remote`]: the tiers
//! - [`context`]: HTTP client, image cache and settings shared by tiers
//! - [`display`]: single-code display state
//!
//! ## Example
//!
//! ```no_run
//! use estock_labels::model::{BarcodeItem, ItemKind, Symbology};
//! use estock_labels::render::{RenderContext, Renderer, TargetSurface};
//!
//! # async fn example() -> Result<(), estock_labels::LabelError> {
//! let renderer = Renderer::new(RenderContext::with_defaults()?);
//! let item = BarcodeItem::new("sku-1", "WID-001", "Widget", ItemKind::Sku);
//! let target = TargetSurface::offscreen(400, 160, 1);
//! let outcome = renderer.render(&item, Symbology::Code128, &target).await?;
//! println!("rendered by {}", outcome.tier);
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod context;
pub mod display;
pub mod glyphs;
pub mod handdrawn;
pub mod linear;
pub mod qr;
pub mod remote;
pub mod surface;

pub use canvas::Canvas;
pub use context::RenderContext;
pub use surface::{PollBudget, SurfaceSlot};

use async_trait::async_trait;
use image::GrayImage;

use crate::ean13;
use crate::error::LabelError;
use crate::model::{BarcodeItem, Symbology};

/// What the rendered code is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// On-screen display: a remote URL is an acceptable result.
    Display,
    /// PDF embedding: remote images must be downloaded.
    Embed,
}

/// Where a code is drawn: the surface handle, its pixel size, and the mode.
#[derive(Debug, Clone)]
pub struct TargetSurface {
    pub slot: SurfaceSlot,
    pub width: u32,
    pub height: u32,
    pub mode: RenderMode,
    /// Pixels per layout unit (1 on screen, raster scale when embedding).
    pub scale: u32,
}

impl TargetSurface {
    /// A display surface that may attach later.
    pub fn display(slot: SurfaceSlot, width: u32, height: u32) -> Self {
        Self {
            slot,
            width,
            height,
            mode: RenderMode::Display,
            scale: 1,
        }
    }

    /// An always-available offscreen surface for embedding.
    pub fn offscreen(width: u32, height: u32, scale: u32) -> Self {
        Self {
            slot: SurfaceSlot::attached(),
            width,
            height,
            mode: RenderMode::Embed,
            scale: scale.max(1),
        }
    }
}

/// Everything a tier needs to draw one code.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Code to encode, already normalized (EAN-13 synthesized when needed).
    pub payload: String,
    pub symbology: Symbology,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub mode: RenderMode,
    pub slot: SurfaceSlot,
}

impl RenderRequest {
    pub fn new(payload: impl Into<String>, symbology: Symbology, target: &TargetSurface) -> Self {
        Self {
            payload: payload.into(),
            symbology,
            width: target.width.max(1),
            height: target.height.max(1),
            scale: target.scale.max(1),
            mode: target.mode,
            slot: target.slot.clone(),
        }
    }
}

/// Result of a successful tier.
#[derive(Debug, Clone)]
pub enum RenderedCode {
    /// Pixels drawn locally.
    Bitmap(GrayImage),
    /// An external service image. `image` is set once downloaded.
    Remote {
        url: String,
        image: Option<GrayImage>,
    },
}

impl RenderedCode {
    /// Pixels, if any are available locally.
    pub fn image(&self) -> Option<&GrayImage> {
        match self {
            RenderedCode::Bitmap(img) => Some(img),
            RenderedCode::Remote { image, .. } => image.as_ref(),
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match self {
            RenderedCode::Remote { url, .. } => Some(url),
            RenderedCode::Bitmap(_) => None,
        }
    }
}

/// A rendered code plus which tier produced it.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub code: RenderedCode,
    pub tier: &'static str,
    /// The code text as it should be printed under the image.
    pub display_code: String,
}

/// One fallback tier.
#[async_trait]
pub trait RenderStrategy: Send + Sync {
    /// Tier name for logs and outcomes.
    fn name(&self) -> &'static str;

    /// True if the tier draws on the target surface. Once one such tier
    /// finds the surface missing, the rest of the chain skips them.
    fn needs_surface(&self) -> bool {
        false
    }

    /// Attempt to render. Any error hands over to the next tier.
    async fn try_render(
        &self,
        request: &RenderRequest,
        ctx: &RenderContext,
    ) -> Result<RenderedCode, LabelError>;
}

/// The code text for a symbology: EAN-13 payloads go through the synthesizer,
/// everything else is used as-is.
pub fn display_code(code: &str, symbology: Symbology) -> String {
    if symbology.needs_checksum() {
        ean13::synthesize_str(code)
    } else {
        code.to_string()
    }
}

/// Default tier chain for a symbology.
pub fn default_chain(symbology: Symbology) -> Vec<Box<dyn RenderStrategy>> {
    match symbology {
        Symbology::Qr => vec![Box::new(qr::QrLibrary), Box::new(remote::RemoteService)],
        Symbology::Code128 | Symbology::Ean13 => vec![
            Box::new(linear::LinearLibrary),
            Box::new(handdrawn::HandDrawn),
            Box::new(remote::RemoteService),
        ],
    }
}

/// Renders codes through per-symbology fallback chains.
pub struct Renderer {
    ctx: RenderContext,
    qr: Vec<Box<dyn RenderStrategy>>,
    code128: Vec<Box<dyn RenderStrategy>>,
    ean13: Vec<Box<dyn RenderStrategy>>,
}

impl Renderer {
    /// Renderer with the default chains.
    pub fn new(ctx: RenderContext) -> Self {
        Self {
            ctx,
            qr: default_chain(Symbology::Qr),
            code128: default_chain(Symbology::Code128),
            ean13: default_chain(Symbology::Ean13),
        }
    }

    /// Replace the chain used for one symbology.
    pub fn with_chain(mut self, symbology: Symbology, chain: Vec<Box<dyn RenderStrategy>>) -> Self {
        match symbology {
            Symbology::Qr => self.qr = chain,
            Symbology::Code128 => self.code128 = chain,
            Symbology::Ean13 => self.ean13 = chain,
        }
        self
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn chain(&self, symbology: Symbology) -> &[Box<dyn RenderStrategy>] {
        match symbology {
            Symbology::Qr => &self.qr,
            Symbology::Code128 => &self.code128,
            Symbology::Ean13 => &self.ean13,
        }
    }

    /// Render an item's code onto `target`.
    pub async fn render(
        &self,
        item: &BarcodeItem,
        symbology: Symbology,
        target: &TargetSurface,
    ) -> Result<RenderOutcome, LabelError> {
        self.render_code(&item.code, symbology, target).await
    }

    /// Render a raw code string onto `target`.
    pub async fn render_code(
        &self,
        code: &str,
        symbology: Symbology,
        target: &TargetSurface,
    ) -> Result<RenderOutcome, LabelError> {
        let payload = display_code(code, symbology);
        let request = RenderRequest::new(payload.clone(), symbology, target);

        let mut last = None;
        let mut surface_missing = false;
        for tier in self.chain(symbology) {
            if surface_missing && tier.needs_surface() {
                tracing::debug!(tier = tier.name(), "surface unavailable, skipping tier");
                continue;
            }
            match tier.try_render(&request, &self.ctx).await {
                Ok(code) => {
                    return Ok(RenderOutcome {
                        code,
                        tier: tier.name(),
                        display_code: payload,
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        tier = tier.name(),
                        symbology = %symbology,
                        error = %e,
                        "render tier failed, trying next"
                    );
                    if matches!(e, LabelError::CanvasUnavailable { .. }) {
                        surface_missing = true;
                    }
                    last = Some(e);
                }
            }
        }

        Err(LabelError::Exhausted {
            symbology,
            last: Box::new(
                last.unwrap_or_else(|| LabelError::LibraryRender("no render tiers configured".into())),
            ),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted tiers for exercising chain behaviour.

    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A tier that always fails, counting its calls.
    pub struct Failing {
        pub name: &'static str,
        pub calls: Arc<AtomicUsize>,
    }

    impl Failing {
        pub fn new(name: &'static str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl RenderStrategy for Failing {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn try_render(
            &self,
            _request: &RenderRequest,
            _ctx: &RenderContext,
        ) -> Result<RenderedCode, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LabelError::LibraryRender(format!("{} is scripted to fail", self.name)))
        }
    }

    /// A canvas tier whose surface never attaches.
    pub struct NoCanvas;

    #[async_trait]
    impl RenderStrategy for NoCanvas {
        fn name(&self) -> &'static str {
            "no-canvas"
        }

        fn needs_surface(&self) -> bool {
            true
        }

        async fn try_render(
            &self,
            _request: &RenderRequest,
            _ctx: &RenderContext,
        ) -> Result<RenderedCode, LabelError> {
            Err(LabelError::CanvasUnavailable { attempts: 10 })
        }
    }

    /// A canvas tier that counts its calls and always fails.
    pub struct NeedsCanvas {
        pub calls: Arc<AtomicUsize>,
    }

    impl NeedsCanvas {
        pub fn new() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (Self { calls: calls.clone() }, calls)
        }
    }

    #[async_trait]
    impl RenderStrategy for NeedsCanvas {
        fn name(&self) -> &'static str {
            "needs-canvas"
        }

        fn needs_surface(&self) -> bool {
            true
        }

        async fn try_render(
            &self,
            _request: &RenderRequest,
            _ctx: &RenderContext,
        ) -> Result<RenderedCode, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LabelError::LibraryRender("needs-canvas is scripted to fail".into()))
        }
    }

    /// A tier that always returns a black bitmap of the requested size.
    pub struct Solid;

    #[async_trait]
    impl RenderStrategy for Solid {
        fn name(&self) -> &'static str {
            "solid"
        }

        async fn try_render(
            &self,
            request: &RenderRequest,
            _ctx: &RenderContext,
        ) -> Result<RenderedCode, LabelError> {
            Ok(RenderedCode::Bitmap(GrayImage::new(request.width, request.height)))
        }
    }
}
