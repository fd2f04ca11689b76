use anyhow::{Result, anyhow};
use image::{DynamicImage, ImageBuffer, Rgba};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::deck::Card;
use crate::fitter::{
    CELL_GAP_PT, CELL_PADDING_PT, FitOptions, PAGE_HEIGHT_PT, PAGE_MARGIN_PT, PAGE_WIDTH_PT,
    SheetGeometry, fit_font_size,
};
use crate::layout::{CellRef, CellSlot, GRID_COLS, LayoutPlan, Side, cell_map};
use crate::merge::strip_markup;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;

/// Visual styles for PNG page previews.
#[derive(Debug, Clone, Copy)]
pub enum SheetImageStyle {
    /// Cell borders only.
    Plain,
    /// Cell borders plus crop guides running through the gutters.
    Guides,
}

/// Options controlling PNG generation.
#[derive(Debug, Clone, Copy)]
pub struct ImageRenderOptions {
    pub style: SheetImageStyle,
    pub dpi: u32,
}

impl Default for ImageRenderOptions {
    fn default() -> Self {
        Self {
            style: SheetImageStyle::Plain,
            dpi: 150,
        }
    }
}

struct Palette {
    page_bg: Rgba<u8>,
    border: Rgba<u8>,
    guide: Rgba<u8>,
    text: Rgba<u8>,
}

fn palette() -> Palette {
    Palette {
        page_bg: rgba(0xff, 0xff, 0xff, 0xff),
        border: rgba(0x9a, 0x9a, 0x9a, 0xff),
        guide: rgba(0xd4, 0xd4, 0xd4, 0xff),
        text: rgba(0x20, 0x20, 0x20, 0xff),
    }
}

fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    Rgba([r, g, b, a])
}

/// Render one side of one sheet into a PNG page image.
pub fn render_page_image(
    cards: &[Card],
    plan: &LayoutPlan,
    sheet_idx: usize,
    side: Side,
    options: &ImageRenderOptions,
) -> Result<DynamicImage> {
    let sheet = plan
        .sheets
        .get(sheet_idx)
        .ok_or_else(|| anyhow!("sheet {} out of range 0..{}", sheet_idx, plan.sheets.len()))?;
    let dpi = options.dpi.clamp(72, 1200);
    let px_per_pt = dpi as f32 / 72.0;
    let geometry = SheetGeometry::new(plan.cells_per_sheet);
    let palette = palette();

    let page_w = (PAGE_WIDTH_PT * px_per_pt).round() as u32;
    let page_h = (PAGE_HEIGHT_PT * px_per_pt).round() as u32;
    let mut img = ImageBuffer::from_pixel(page_w, page_h, palette.page_bg);

    if matches!(options.style, SheetImageStyle::Guides) {
        draw_gutter_guides(&mut img, geometry, px_per_pt, page_w, page_h, palette.guide);
    }

    // Borders: one rect per base cell for empties, one merged rect per
    // spanned placement. Continuation cells get no border of their own.
    for (idx, slot) in cell_map(sheet, side, plan.cells_per_sheet).iter().enumerate() {
        if *slot == CellSlot::Empty {
            let cell = CellRef {
                row: idx / GRID_COLS,
                col: idx % GRID_COLS,
            };
            let rect = cell_rect(cell, 1, 1, geometry, px_per_pt);
            draw_hollow_rect_mut(&mut img, rect, palette.border);
        }
    }

    let fit_opts = FitOptions::default();
    for placement in &sheet.placements {
        let placed = placement.for_side(side);
        let rect = cell_rect(placed.cell, placed.span.rows, placed.span.cols, geometry, px_per_pt);
        draw_hollow_rect_mut(&mut img, rect, palette.border);

        let cell_box = match (placed.span.rows, placed.span.cols) {
            (2, _) => geometry.cell.spanned_down(),
            (_, 2) => geometry.cell.spanned_right(),
            _ => geometry.cell,
        };
        let text = match side {
            Side::Front => &cards[placed.card].question,
            Side::Back => &cards[placed.card].answer,
        };
        let fit = fit_font_size(text, cell_box, placed.span.is_spanned(), &fit_opts);
        draw_cell_text(
            &mut img,
            &strip_markup(text),
            rect,
            fit.size_pt,
            px_per_pt,
            palette.text,
        );
    }

    Ok(DynamicImage::ImageRgba8(img))
}

fn cell_rect(cell: CellRef, rows: usize, cols: usize, geometry: SheetGeometry, px_per_pt: f32) -> Rect {
    let x_pt = PAGE_MARGIN_PT + cell.col as f32 * (geometry.cell.width_pt + CELL_GAP_PT);
    let y_pt = PAGE_MARGIN_PT + cell.row as f32 * (geometry.cell.height_pt + CELL_GAP_PT);
    let w_pt = geometry.cell.width_pt * cols as f32 + CELL_GAP_PT * (cols as f32 - 1.0);
    let h_pt = geometry.cell.height_pt * rows as f32 + CELL_GAP_PT * (rows as f32 - 1.0);
    Rect::at((x_pt * px_per_pt).round() as i32, (y_pt * px_per_pt).round() as i32).of_size(
        (w_pt * px_per_pt).round().max(1.0) as u32,
        (h_pt * px_per_pt).round().max(1.0) as u32,
    )
}

fn draw_gutter_guides(
    img: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    geometry: SheetGeometry,
    px_per_pt: f32,
    page_w: u32,
    page_h: u32,
    color: Rgba<u8>,
) {
    let x_pt = PAGE_MARGIN_PT + geometry.cell.width_pt + CELL_GAP_PT / 2.0;
    let x = x_pt * px_per_pt;
    draw_line_segment_mut(img, (x, 0.0), (x, page_h as f32), color);
    for row in 1..geometry.rows {
        let y_pt =
            PAGE_MARGIN_PT + row as f32 * (geometry.cell.height_pt + CELL_GAP_PT) - CELL_GAP_PT / 2.0;
        let y = y_pt * px_per_pt;
        draw_line_segment_mut(img, (0.0, y), (page_w as f32, y), color);
    }
}

/// Draw wrapped text into a cell rect using the scaled bitmap glyph font.
///
/// The preview font is monospace, so wrapping here is by column count at
/// the fitted size rather than by the proportional metrics the fitter used.
fn draw_cell_text(
    img: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    text: &str,
    rect: Rect,
    size_pt: f32,
    px_per_pt: f32,
    color: Rgba<u8>,
) {
    let scale = ((size_pt * px_per_pt / GLYPH_HEIGHT as f32).round() as u32).max(1);
    let advance = (GLYPH_WIDTH as u32 + 1) * scale;
    let line_height = (GLYPH_HEIGHT as u32 + 3) * scale;
    let padding = (CELL_PADDING_PT * px_per_pt).round() as u32;
    let inner_w = rect.width().saturating_sub(2 * padding);
    let inner_h = rect.height().saturating_sub(2 * padding);
    let max_chars = (inner_w / advance).max(1) as usize;
    let max_lines = (inner_h / line_height).max(1) as usize;

    let lines = wrap_monospace(text, max_chars);
    for (line_idx, line) in lines.iter().take(max_lines).enumerate() {
        let line_w = line.chars().count() as u32 * advance;
        let x0 = rect.left() + padding as i32 + ((inner_w.saturating_sub(line_w)) / 2) as i32;
        let y0 = rect.top() + padding as i32 + (line_idx as u32 * line_height) as i32;
        for (char_idx, ch) in line.chars().enumerate() {
            let x = x0 + (char_idx as u32 * advance) as i32;
            draw_glyph(img, x, y0, ch, color, scale);
        }
    }
}

/// Greedy monospace word wrap; words longer than a line are hard-split.
fn wrap_monospace(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if word_len > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(max_chars) {
                    lines.push(chunk.iter().collect());
                }
                continue;
            }
            let needed = if current.is_empty() {
                word_len
            } else {
                current.chars().count() + 1 + word_len
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn draw_glyph(
    image: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    x: i32,
    y: i32,
    ch: char,
    color: Rgba<u8>,
    scale: u32,
) {
    let pattern = glyph_pattern(ch);
    for (row, bits) in pattern.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col as i32 * scale as i32);
                let py = y + (row as i32 * scale as i32);
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

#[rustfmt::skip]
fn glyph_pattern(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000, 0b00000],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        '\'' => [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '=' => [0b00000, 0b11111, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000],
        '"' => [0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '+' => [0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '%' => [0b11001, 0b11010, 0b00100, 0b01000, 0b10110, 0b00110, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111, 0b00000],
        ';' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        '*' => [0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000, 0b00000],
        '?' => [0b01110, 0b10001, 0b00010, 0b00100, 0b00100, 0b00000, 0b00100],
        ' ' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        _ => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::layout::compute_layout;
    use crate::merge::MergeChoice;
    use image::GenericImageView;

    #[test]
    fn page_dimensions_follow_dpi() {
        let mut deck = Deck::new();
        deck.add_card("q", "a", MergeChoice::Auto).unwrap();
        let plan = compute_layout(&deck.cards, 4).unwrap();
        let options = ImageRenderOptions { dpi: 72, ..Default::default() };
        let img = render_page_image(&deck.cards, &plan, 0, Side::Front, &options).unwrap();
        assert_eq!(img.dimensions(), (595, 842));
    }

    #[test]
    fn out_of_range_sheet_is_an_error() {
        let plan = compute_layout(&[], 4).unwrap();
        let options = ImageRenderOptions::default();
        assert!(render_page_image(&[], &plan, 3, Side::Front, &options).is_err());
    }

    #[test]
    fn wrap_monospace_breaks_on_width() {
        let lines = wrap_monospace("alpha beta gamma", 5);
        assert_eq!(lines, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn wrap_monospace_splits_overlong_words() {
        let lines = wrap_monospace("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_monospace_respects_newlines() {
        let lines = wrap_monospace("one\ntwo", 20);
        assert_eq!(lines, vec!["one", "two"]);
    }
}
