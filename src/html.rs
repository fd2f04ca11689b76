//! Print-ready HTML generation: one front page (questions) and one back
//! page (mirrored answers) per sheet, laid out with CSS grid so spans and
//! duplex alignment survive the browser's print path unchanged.

use crate::deck::Card;
use crate::fitter::{FitOptions, SheetGeometry, fit_font_size};
use crate::layout::{CellRef, CellSlot, GRID_COLS, LayoutPlan, Side, cell_map};
use crate::merge::strip_markup;

/// Escape text for safe embedding in HTML body content.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

fn side_text(card: &Card, side: Side) -> &str {
    match side {
        Side::Front => &card.question,
        Side::Back => &card.answer,
    }
}

fn page(
    out: &mut String,
    cards: &[Card],
    plan: &LayoutPlan,
    sheet_idx: usize,
    side: Side,
    geometry: SheetGeometry,
    opts: &FitOptions,
) {
    let sheet = &plan.sheets[sheet_idx];
    let label = match side {
        Side::Front => "front",
        Side::Back => "back",
    };
    out.push_str(&format!(
        "  <div class=\"page {label}\" data-sheet=\"{}\">\n    <div class=\"grid\" style=\"grid-template-rows: repeat({}, 1fr);\">\n",
        sheet_idx + 1,
        geometry.rows
    ));

    for placement in &sheet.placements {
        let placed = placement.for_side(side);
        let spanned = placed.span.is_spanned();
        let cell_box = match (placed.span.rows, placed.span.cols) {
            (2, _) => geometry.cell.spanned_down(),
            (_, 2) => geometry.cell.spanned_right(),
            _ => geometry.cell,
        };
        let text = side_text(&cards[placed.card], side);
        let fit = fit_font_size(text, cell_box, spanned, opts);
        // The cell shows the markup-stripped text the fitter measured, same
        // as the PNG painter; raw tags never reach the printed page.
        out.push_str(&format!(
            "      <div class=\"cell\" style=\"grid-row: {} / span {}; grid-column: {} / span {}; font-size: {}pt;\">{}</div>\n",
            placed.cell.row + 1,
            placed.span.rows,
            placed.cell.col + 1,
            placed.span.cols,
            fit.size_pt,
            escape_html(&strip_markup(text))
        ));
    }

    // Cells nobody occupies still get a bordered box on the printed page.
    for (idx, slot) in cell_map(sheet, side, plan.cells_per_sheet)
        .iter()
        .enumerate()
    {
        if *slot == CellSlot::Empty {
            let cell = CellRef {
                row: idx / GRID_COLS,
                col: idx % GRID_COLS,
            };
            out.push_str(&format!(
                "      <div class=\"cell empty\" style=\"grid-row: {}; grid-column: {};\"></div>\n",
                cell.row + 1,
                cell.col + 1
            ));
        }
    }

    out.push_str("    </div>\n  </div>\n");
}

/// Render the whole layout into a standalone printable HTML document.
pub fn render_document(cards: &[Card], plan: &LayoutPlan, opts: &FitOptions) -> String {
    let geometry = SheetGeometry::new(plan.cells_per_sheet);
    let mut out = String::new();
    out.push_str(concat!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>Flashcard sheets</title>\n<style>\n",
        "@page { size: A4 portrait; margin: 0; }\n",
        "* { box-sizing: border-box; }\n",
        "body { margin: 0; font-family: sans-serif; }\n",
        ".page { width: 210mm; height: 297mm; padding: 10mm; page-break-after: always; }\n",
        ".grid { display: grid; grid-template-columns: 1fr 1fr; gap: 3mm; width: 100%; height: 100%; }\n",
        ".cell { border: 1px dashed #999; padding: 2mm; overflow: hidden; ",
        "display: flex; align-items: center; justify-content: center; text-align: center; }\n",
        "</style>\n</head>\n<body>\n"
    ));
    for sheet_idx in 0..plan.sheets.len() {
        page(&mut out, cards, plan, sheet_idx, Side::Front, geometry, opts);
        page(&mut out, cards, plan, sheet_idx, Side::Back, geometry, opts);
    }
    out.push_str("</body>\n</html>\n");
    out
}
