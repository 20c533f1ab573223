//! # eSTOCK Labels - Barcode Label Generation
//!
//! Turns warehouse items (articles, locations, tasks, lots, serials) into
//! printable barcode labels. It provides:
//!
//! - **Code synthesis**: deterministic EAN-13 payloads from arbitrary ids
//! - **Rendering**: QR, Code 128 and EAN-13 with an ordered fallback chain
//!   (embedded encoder → hand-drawn bars → remote image service)
//! - **Composition**: one-label-per-page PDFs in 4x2, 2x1 and 3x1 inch sizes,
//!   plus a dense A4 text grid
//! - **Output**: download filenames, saving, and print handoff
//!
//! ## Quick Start
//!
//! ```no_run
//! use estock_labels::{
//!     compose::LabelComposer,
//!     model::{adapters, RenderOptions},
//!     output,
//!     render::{RenderContext, Renderer},
//! };
//!
//! # async fn example() -> Result<(), estock_labels::LabelError> {
//! let articles: Vec<adapters::Article> = serde_json::from_str(r#"[{"id": 7, "sku": "WID-001", "name": "Widget"}]"#)?;
//! let items = adapters::from_articles(&articles);
//!
//! let composer = LabelComposer::new(Renderer::new(RenderContext::with_defaults()?));
//! let document = composer.compose(&items, &RenderOptions::default()).await?;
//! document.save(std::path::Path::new("."), output::today())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | Items, symbologies, label sizes, options, entity adapters |
//! | [`ean13`] | EAN-13 synthesis and check digits |
//! | [`render`] | Fallback render chain and display state |
//! | [`compose`] | Label layout and PDF writing |
//! | [`output`] | Finished documents, saving and printing |
//! | [`config`] | Service endpoints and timing |
//! | [`error`] | Error types |

pub mod compose;
pub mod config;
pub mod ean13;
pub mod error;
pub mod model;
pub mod output;
pub mod render;

// Re-exports for convenience
pub use compose::LabelComposer;
pub use config::LabelConfig;
pub use error::LabelError;
pub use model::{BarcodeItem, RenderOptions, Symbology};
pub use output::LabelDocument;
pub use render::Renderer;
