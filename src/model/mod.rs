//! # Label Data Model
//!
//! Value types flowing through the pipeline. Everything here is
//! serde-compatible with the JSON shape the warehouse front-end uses
//! (`codeType`, `labelSize`, lowercase tags), so a caller can hand the core a
//! [`GenerationRequest`] straight from JSON.
//!
//! ```
//! use estock_labels::model::{LabelSize, RenderOptions, Symbology};
//!
//! let options = RenderOptions {
//!     code_type: Symbology::Ean13,
//!     label_size: LabelSize::TwoByOne,
//!     ..Default::default()
//! };
//! let dims = options.label_size.dimensions();
//! assert_eq!((dims.width, dims.height), (144.0, 72.0));
//! assert!(dims.is_landscape());
//! ```

pub mod adapters;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ITEMS
// ============================================================================

/// What kind of domain entity a label was produced from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Sku,
    Location,
    Task,
}

/// One printable item. Built by the adapters, never mutated by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeItem {
    pub id: String,
    /// Raw code as stored on the entity (SKU, location code, task id...)
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    /// Opaque copy of the source entity's fields.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl BarcodeItem {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            description: None,
            kind,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Description, treating an empty string as absent.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

// ============================================================================
// SYMBOLOGY
// ============================================================================

/// Visual encoding for a code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    #[default]
    Qr,
    Code128,
    Ean13,
}

impl Symbology {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbology::Qr => "qr",
            Symbology::Code128 => "code128",
            Symbology::Ean13 => "ean13",
        }
    }

    /// Only EAN-13 payloads go through the checksum synthesizer.
    pub fn needs_checksum(self) -> bool {
        matches!(self, Symbology::Ean13)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qr" => Ok(Symbology::Qr),
            "code128" => Ok(Symbology::Code128),
            "ean13" => Ok(Symbology::Ean13),
            other => Err(format!(
                "unknown code type '{}' (expected qr, code128 or ean13)",
                other
            )),
        }
    }
}

// ============================================================================
// LABEL SIZES
// ============================================================================

/// Page size of a label in points (72 pt per inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelDimensions {
    pub width: f32,
    pub height: f32,
}

impl LabelDimensions {
    /// Landscape iff wider than tall.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Supported label stock. Unknown tags deserialize as 4x2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum LabelSize {
    #[default]
    #[serde(rename = "4x2")]
    FourByTwo,
    #[serde(rename = "2x1")]
    TwoByOne,
    #[serde(rename = "3x1")]
    ThreeByOne,
}

impl LabelSize {
    pub const ALL: [LabelSize; 3] = [
        LabelSize::FourByTwo,
        LabelSize::TwoByOne,
        LabelSize::ThreeByOne,
    ];

    pub fn dimensions(self) -> LabelDimensions {
        match self {
            LabelSize::FourByTwo => LabelDimensions {
                width: 288.0,
                height: 144.0,
            },
            LabelSize::TwoByOne => LabelDimensions {
                width: 144.0,
                height: 72.0,
            },
            LabelSize::ThreeByOne => LabelDimensions {
                width: 216.0,
                height: 72.0,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelSize::FourByTwo => "4x2",
            LabelSize::TwoByOne => "2x1",
            LabelSize::ThreeByOne => "3x1",
        }
    }

    /// Look up a size tag, falling back to 4x2 for anything unknown.
    pub fn from_tag_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl From<String> for LabelSize {
    fn from(tag: String) -> Self {
        LabelSize::from_tag_or_default(&tag)
    }
}

impl fmt::Display for LabelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4x2" => Ok(LabelSize::FourByTwo),
            "2x1" => Ok(LabelSize::TwoByOne),
            "3x1" => Ok(LabelSize::ThreeByOne),
            other => Err(format!(
                "unknown label size '{}' (expected 4x2, 2x1 or 3x1)",
                other
            )),
        }
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// What goes on each label. Every flag toggles one text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub code_type: Symbology,
    pub label_size: LabelSize,
    pub include_name: bool,
    pub include_description: bool,
    pub include_company_logo: bool,
    pub company_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            code_type: Symbology::Qr,
            label_size: LabelSize::FourByTwo,
            include_name: true,
            include_description: true,
            include_company_logo: true,
            company_name: "eSTOCK".to_string(),
        }
    }
}

impl RenderOptions {
    /// Company line text, if it should be drawn.
    pub fn company_line(&self) -> Option<&str> {
        if self.include_company_logo && !self.company_name.is_empty() {
            Some(&self.company_name)
        } else {
            None
        }
    }
}

/// A batch of items plus the options to render them with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub items: Vec<BarcodeItem>,
    #[serde(default)]
    pub options: RenderOptions,
}
