//! # Error Types
//!
//! This module defines error types used throughout the label pipeline.
//!
//! Render-tier errors (`CanvasUnavailable`, `LibraryRender`,
//! `ExternalServiceUnavailable`) are absorbed by the renderer's fallback
//! chain. `Exhausted` reaches the composer, which draws a placeholder.
//! `Document` is the only fatal one for a batch.

use thiserror::Error;

use crate::model::Symbology;

/// Main error type for label operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Drawing surface was never attached within the poll budget
    #[error("Canvas not available after {attempts} attempts")]
    CanvasUnavailable { attempts: u32 },

    /// Embedded encoder or drawing call failed
    #[error("Render library error: {0}")]
    LibraryRender(String),

    /// External image service could not produce an image
    #[error("External service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    /// Unexpected error while laying out a specific item
    #[error("Composition error: {0}")]
    Composition(String),

    /// Every fallback tier failed for a symbology
    #[error("All {symbology} render tiers failed: {last}")]
    Exhausted {
        symbology: Symbology,
        last: Box<LabelError>,
    },

    /// The document backend itself failed (no partial output is produced)
    #[error("Document error: {0}")]
    Document(String),

    /// Invalid configuration or input
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
