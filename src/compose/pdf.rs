//! PDF backend.
//!
//! Writes planned pages with printpdf. Plans use points from the top-left;
//! PDF places content from the bottom-left in millimetres, so every
//! coordinate is flipped and converted here.

use ::image::GrayImage;
use printpdf::*;
use printpdf::path::{PaintMode, WindingOrder};
use std::io::BufWriter;

use super::layout::{Element, LabelPlan, PLACEHOLDER_FILL};
use crate::error::LabelError;

/// One page to write: its plan and the bitmap for its image element.
#[derive(Debug, Clone, Copy)]
pub struct PageContent<'a> {
    pub plan: &'a LabelPlan,
    pub image: Option<&'a GrayImage>,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, LabelError> {
        let builtin = |font| {
            doc.add_builtin_font(font)
                .map_err(|e| LabelError::Document(e.to_string()))
        };
        Ok(Self {
            regular: builtin(BuiltinFont::Helvetica)?,
            bold: builtin(BuiltinFont::HelveticaBold)?,
            italic: builtin(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn pick(&self, bold: bool, italic: bool) -> &IndirectFontRef {
        match (bold, italic) {
            (true, _) => &self.bold,
            (false, true) => &self.italic,
            (false, false) => &self.regular,
        }
    }
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn gray(level: u8) -> Color {
    let v = level as f32 / 255.0;
    Color::Rgb(Rgb::new(v, v, v, None))
}

/// Write pages into a PDF document and return its bytes.
pub fn write_pdf(title: &str, pages: &[PageContent<'_>]) -> Result<Vec<u8>, LabelError> {
    let Some(first) = pages.first() else {
        return Err(LabelError::Document("a document needs at least one page".into()));
    };

    let (doc, page1, layer1) = PdfDocument::new(
        title,
        mm(first.plan.width),
        mm(first.plan.height),
        "Layer 1",
    );
    let fonts = Fonts::load(&doc)?;

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (p, l) = doc.add_page(mm(page.plan.width), mm(page.plan.height), "Layer 1");
            doc.get_page(p).get_layer(l)
        };
        draw_page(&layer, &fonts, page)?;
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| LabelError::Document(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| LabelError::Document(e.to_string()))
}

fn draw_page(layer: &PdfLayerReference, fonts: &Fonts, page: &PageContent<'_>) -> Result<(), LabelError> {
    let page_h = page.plan.height;

    for element in &page.plan.elements {
        match element {
            Element::Text {
                content,
                x,
                y,
                size,
                gray: level,
                bold,
                italic,
            } => {
                layer.set_fill_color(gray(*level));
                layer.use_text(
                    content.as_str(),
                    *size,
                    mm(*x),
                    mm(page_h - *y),
                    fonts.pick(*bold, *italic),
                );
            }
            Element::Image { x, y, w, h } => {
                let Some(bitmap) = page.image else {
                    return Err(LabelError::Document(
                        "page plan has an image but no bitmap was supplied".into(),
                    ));
                };
                embed_image(layer, bitmap, *x, page_h - (*y + *h), *w);
            }
            Element::Placeholder { x, y, w, h } => {
                layer.set_fill_color(gray(PLACEHOLDER_FILL));
                layer.add_polygon(Polygon {
                    rings: vec![rect_points(*x, page_h - (*y + *h), *w, *h)],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
            Element::Outline { x, y, w, h } => {
                layer.set_outline_color(gray(0));
                layer.set_outline_thickness(0.5);
                layer.add_line(Line {
                    points: rect_points(*x, page_h - (*y + *h), *w, *h),
                    is_closed: true,
                });
            }
        }
    }

    Ok(())
}

/// Corners of a rectangle given its bottom-left corner in points.
fn rect_points(x: f32, bottom: f32, w: f32, h: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(mm(x), mm(bottom)), false),
        (Point::new(mm(x + w), mm(bottom)), false),
        (Point::new(mm(x + w), mm(bottom + h)), false),
        (Point::new(mm(x), mm(bottom + h)), false),
    ]
}

/// Place a grayscale bitmap with its bottom-left at (`x`, `bottom`) points,
/// scaled to `width` points wide.
fn embed_image(layer: &PdfLayerReference, bitmap: &GrayImage, x: f32, bottom: f32, width: f32) {
    let (px_w, px_h) = bitmap.dimensions();

    let image = Image::from(ImageXObject {
        width: Px(px_w as usize),
        height: Px(px_h as usize),
        color_space: ColorSpace::Greyscale,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: bitmap.as_raw().clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI = pixels / inches
    let dpi = px_w as f32 * 72.0 / width.max(f32::EPSILON);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(x)),
            translate_y: Some(mm(bottom)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with(elements: Vec<Element>) -> LabelPlan {
        LabelPlan {
            width: 288.0,
            height: 144.0,
            elements,
        }
    }

    #[test]
    fn test_writes_pdf_header() {
        let plan = plan_with(vec![Element::text("Hello", 10.0, 20.0, 8.0, 0)]);
        let bytes = write_pdf("t", &[PageContent { plan: &plan, image: None }]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        assert!(matches!(write_pdf("t", &[]), Err(LabelError::Document(_))));
    }

    #[test]
    fn test_image_without_bitmap_is_an_error() {
        let plan = plan_with(vec![Element::Image { x: 0.0, y: 0.0, w: 10.0, h: 10.0 }]);
        let err = write_pdf("t", &[PageContent { plan: &plan, image: None }]).unwrap_err();
        assert!(matches!(err, LabelError::Document(_)));
    }

    #[test]
    fn test_all_element_kinds() {
        let bitmap = GrayImage::new(40, 40);
        let plan = plan_with(vec![
            Element::Image { x: 100.0, y: 27.0, w: 77.0, h: 77.0 },
            Element::Placeholder { x: 15.0, y: 27.0, w: 258.0, h: 30.0 },
            Element::Outline { x: 1.0, y: 1.0, w: 50.0, h: 20.0 },
            Element::Text {
                content: "Bold".into(),
                x: 10.0,
                y: 130.0,
                size: 6.0,
                gray: 80,
                bold: true,
                italic: false,
            },
        ]);
        let pages = [
            PageContent { plan: &plan, image: Some(&bitmap) },
            PageContent { plan: &plan, image: Some(&bitmap) },
        ];
        let bytes = write_pdf("labels", &pages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
