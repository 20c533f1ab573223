//! Per-label layout planning.
//!
//! Layout is computed before anything is drawn: [`image_box`] tells the
//! composer what size to render the code at, and [`plan_label`] produces the
//! full element list once it's known whether the render succeeded. Both work
//! in points with a top-left origin; text `y` is the baseline.

use super::metrics::{text_width, truncate_text};
use crate::model::{BarcodeItem, LabelDimensions, RenderOptions, Symbology};
use crate::render;

/// Inset of the content box from the page edge.
pub const PAGE_INSET: f32 = 10.0;
/// Cursor start below the content box top.
pub const TOP_PADDING: f32 = 5.0;
/// Height kept free for the text lines under the image.
pub const RESERVED_TEXT_HEIGHT: f32 = 30.0;
pub const QR_MAX_SIZE: f32 = 80.0;
pub const LINEAR_MAX_HEIGHT: f32 = 50.0;
pub const PLACEHOLDER_TEXT: &str = "Error generating barcode";

const COMPANY_SIZE: f32 = 8.0;
const NAME_SIZE: f32 = 7.0;
const DESCRIPTION_SIZE: f32 = 6.0;
const CODE_SIZE: f32 = 6.0;
const PLACEHOLDER_TEXT_SIZE: f32 = 6.0;

const BLACK: u8 = 0;
const DESCRIPTION_GRAY: u8 = 80;
/// Fill of the placeholder box.
pub const PLACEHOLDER_FILL: u8 = 240;
const PLACEHOLDER_TEXT_GRAY: u8 = 100;

/// One drawable thing on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        content: String,
        x: f32,
        /// Baseline
        y: f32,
        size: f32,
        /// 0 = black, 255 = white
        gray: u8,
        bold: bool,
        italic: bool,
    },
    /// Where the page's code image goes.
    Image { x: f32, y: f32, w: f32, h: f32 },
    /// Filled box shown instead of a code that couldn't be rendered.
    Placeholder { x: f32, y: f32, w: f32, h: f32 },
    /// Thin rectangle outline.
    Outline { x: f32, y: f32, w: f32, h: f32 },
}

impl Element {
    pub(crate) fn text(content: impl Into<String>, x: f32, y: f32, size: f32, gray: u8) -> Self {
        Element::Text {
            content: content.into(),
            x,
            y,
            size,
            gray,
            bold: false,
            italic: false,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Element::Text { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Everything drawn on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlan {
    pub width: f32,
    pub height: f32,
    pub elements: Vec<Element>,
}

impl LabelPlan {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// All text contents, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.elements.iter().filter_map(Element::text_content).collect()
    }

    pub fn image(&self) -> Option<&Element> {
        self.elements.iter().find(|e| matches!(e, Element::Image { .. }))
    }

    pub fn has_placeholder(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, Element::Placeholder { .. }))
    }
}

/// Size and position reserved for the code image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Content box of a page.
#[derive(Debug, Clone, Copy)]
struct ContentBox {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl ContentBox {
    fn of(dims: LabelDimensions) -> Self {
        Self {
            x: PAGE_INSET,
            y: PAGE_INSET,
            w: dims.width - 2.0 * PAGE_INSET,
            h: dims.height - 2.0 * PAGE_INSET,
        }
    }

    fn centered_x(&self, text: &str, size: f32) -> f32 {
        self.x + (self.w - text_width(text, size)) / 2.0
    }
}

/// Draws the company line when enabled and returns the cursor after it.
fn company_line(options: &RenderOptions, content: &ContentBox, elements: &mut Vec<Element>) -> f32 {
    let mut cursor = content.y + TOP_PADDING;
    if let Some(company) = options.company_line() {
        elements.push(Element::text(
            company,
            content.centered_x(company, COMPANY_SIZE),
            cursor,
            COMPANY_SIZE,
            BLACK,
        ));
        cursor += 12.0;
    }
    cursor
}

/// Where the code image goes on a page of `dims`.
pub fn image_box(options: &RenderOptions, dims: LabelDimensions) -> ImageBox {
    let content = ContentBox::of(dims);
    let cursor = company_line(options, &content, &mut Vec::new());

    let avail_h = (content.h - (cursor - content.y) - RESERVED_TEXT_HEIGHT).max(1.0);
    let avail_w = (content.w - 10.0).max(1.0);

    let (w, h) = match options.code_type {
        Symbology::Qr => {
            let side = avail_h.min(avail_w).min(QR_MAX_SIZE);
            (side, side)
        }
        Symbology::Code128 | Symbology::Ean13 => (avail_w, avail_h.min(LINEAR_MAX_HEIGHT)),
    };

    ImageBox {
        x: content.x + (content.w - w) / 2.0,
        y: cursor,
        w,
        h,
    }
}

/// Plan one label page. `rendered` says whether the code image is available;
/// without it a placeholder box takes its place.
pub fn plan_label(
    item: &BarcodeItem,
    options: &RenderOptions,
    dims: LabelDimensions,
    rendered: bool,
) -> LabelPlan {
    let content = ContentBox::of(dims);
    let mut plan = LabelPlan::new(dims.width, dims.height);
    let mut cursor = company_line(options, &content, &mut plan.elements);
    let max_width = content.w - 10.0;

    if rendered {
        let b = image_box(options, dims);
        plan.elements.push(Element::Image {
            x: b.x,
            y: b.y,
            w: b.w,
            h: b.h,
        });
        cursor += b.h + 5.0;
    } else {
        plan.elements.push(Element::Placeholder {
            x: content.x + 5.0,
            y: cursor,
            w: content.w - 10.0,
            h: 30.0,
        });
        plan.elements.push(Element::text(
            PLACEHOLDER_TEXT,
            content.x + 10.0,
            cursor + 15.0,
            PLACEHOLDER_TEXT_SIZE,
            PLACEHOLDER_TEXT_GRAY,
        ));
        cursor += 35.0;
    }

    if options.include_name && !item.name.is_empty() {
        let name = truncate_text(&item.name, max_width, NAME_SIZE);
        plan.elements.push(Element::text(
            name.clone(),
            content.centered_x(&name, NAME_SIZE),
            cursor,
            NAME_SIZE,
            BLACK,
        ));
        cursor += 8.0;
    }

    if options.include_description && cursor < content.y + content.h - 15.0 {
        if let Some(description) = item.description() {
            let text = truncate_text(description, max_width, DESCRIPTION_SIZE);
            plan.elements.push(Element::text(
                text.clone(),
                content.centered_x(&text, DESCRIPTION_SIZE),
                cursor,
                DESCRIPTION_SIZE,
                DESCRIPTION_GRAY,
            ));
            cursor += 8.0;
        }
    }

    if cursor < content.y + content.h - 8.0 {
        let code = render::display_code(&item.code, options.code_type);
        let text = truncate_text(&code, max_width, CODE_SIZE);
        plan.elements.push(Element::text(
            text.clone(),
            content.centered_x(&text, CODE_SIZE),
            cursor,
            CODE_SIZE,
            BLACK,
        ));
    }

    plan
}
