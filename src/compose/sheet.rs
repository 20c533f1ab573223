//! Dense text-only label grid on A4.
//!
//! Packs 80×40 mm labels row-major with 5 mm gaps inside a 10 mm margin.
//! Each label carries the code and item text but no code image, so this
//! export never touches the renderer.

use chrono::NaiveDate;

use super::layout::{Element, LabelPlan};
use super::metrics::clip_chars;
use crate::model::{BarcodeItem, RenderOptions};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
pub const LABEL_WIDTH_MM: f32 = 80.0;
pub const LABEL_HEIGHT_MM: f32 = 40.0;
pub const GAP_MM: f32 = 5.0;

const NAME_LIMIT: usize = 20;
const DESCRIPTION_LIMIT: usize = 25;

fn pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Labels per row.
pub fn per_row() -> usize {
    ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / (LABEL_WIDTH_MM + GAP_MM)).floor() as usize
}

/// Labels per page.
pub fn per_page() -> usize {
    let rows = ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / (LABEL_HEIGHT_MM + GAP_MM)).floor() as usize;
    rows * per_row()
}

/// Lay out `items` as a grid, one plan per A4 page.
pub fn plan_sheet(items: &[BarcodeItem], options: &RenderOptions, date: NaiveDate) -> Vec<LabelPlan> {
    let per_row = per_row();
    let generated = format!("Generated: {}", date.format("%d/%m/%Y"));
    let symbology = options.code_type.as_str().to_uppercase();

    items
        .chunks(per_page())
        .map(|chunk| {
            let mut plan = LabelPlan::new(pt(PAGE_WIDTH_MM), pt(PAGE_HEIGHT_MM));
            for (i, item) in chunk.iter().enumerate() {
                let x = MARGIN_MM + (i % per_row) as f32 * (LABEL_WIDTH_MM + GAP_MM);
                let y = MARGIN_MM + (i / per_row) as f32 * (LABEL_HEIGHT_MM + GAP_MM);
                push_label(&mut plan.elements, item, options, &symbology, &generated, x, y);
            }
            plan
        })
        .collect()
}

fn push_label(
    elements: &mut Vec<Element>,
    item: &BarcodeItem,
    options: &RenderOptions,
    symbology: &str,
    generated: &str,
    x: f32,
    y: f32,
) {
    let text = |content: String, dy: f32, size: f32, bold: bool, italic: bool| Element::Text {
        content,
        x: pt(x + 2.0),
        y: pt(y + dy),
        size,
        gray: 0,
        bold,
        italic,
    };

    elements.push(Element::Outline {
        x: pt(x),
        y: pt(y),
        w: pt(LABEL_WIDTH_MM),
        h: pt(LABEL_HEIGHT_MM),
    });

    if let Some(company) = options.company_line() {
        elements.push(text(company.to_string(), 4.0, 6.0, true, false));
    }
    elements.push(text(item.code.clone(), 12.0, 10.0, true, false));
    if options.include_name && !item.name.is_empty() {
        elements.push(text(clip_chars(&item.name, NAME_LIMIT), 18.0, 6.0, false, false));
    }
    if options.include_description {
        if let Some(description) = item.description() {
            elements.push(text(clip_chars(description, DESCRIPTION_LIMIT), 24.0, 5.0, false, false));
        }
    }
    elements.push(text(symbology.to_string(), 30.0, 6.0, false, true));
    elements.push(text(generated.to_string(), 35.0, 5.0, false, false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, Symbology};
    use pretty_assertions::assert_eq;

    fn items(n: usize) -> Vec<BarcodeItem> {
        (0..n)
            .map(|i| BarcodeItem::new(format!("sku-{i}"), format!("SKU-{i:03}"), format!("Item {i}"), ItemKind::Sku))
            .collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    #[test]
    fn test_grid_capacity() {
        // 190 / 85 → 2 per row; 277 / 45 → 6 rows
        assert_eq!(per_row(), 2);
        assert_eq!(per_page(), 12);
    }

    #[test]
    fn test_paginates_at_per_page() {
        assert_eq!(plan_sheet(&items(12), &RenderOptions::default(), date()).len(), 1);
        assert_eq!(plan_sheet(&items(13), &RenderOptions::default(), date()).len(), 2);
        assert!(plan_sheet(&[], &RenderOptions::default(), date()).is_empty());
    }

    #[test]
    fn test_label_texts() {
        let item = BarcodeItem::new("1", "WID-001", "A name that is definitely too long", ItemKind::Sku)
            .with_description("A description longer than twenty-five chars");
        let options = RenderOptions {
            code_type: Symbology::Code128,
            ..Default::default()
        };
        let plans = plan_sheet(&[item], &options, date());
        assert_eq!(
            plans[0].texts(),
            vec![
                "eSTOCK",
                "WID-001",
                "A name that is defin...",
                "A description longer than...",
                "CODE128",
                "Generated: 09/03/2026",
            ]
        );
    }

    #[test]
    fn test_second_label_is_beside_the_first() {
        let plans = plan_sheet(&items(3), &RenderOptions::default(), date());
        let outlines: Vec<_> = plans[0]
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Outline { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(outlines.len(), 3);
        assert_eq!(outlines[1], (pt(95.0), pt(10.0)));
        assert_eq!(outlines[2], (pt(10.0), pt(55.0)));
    }
}
