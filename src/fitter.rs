//! Font-size fitting: the largest point size at which a card's text stays
//! inside its cell, found by binary search over a deterministic
//! fits-predicate built on [`crate::metrics`].

use crate::deck::PLACEHOLDER_PREFIX;
use crate::merge::strip_markup;
use crate::metrics::{LINE_HEIGHT, card_face_metrics};

/// A4 portrait in points.
pub const PAGE_WIDTH_PT: f32 = 595.3;
pub const PAGE_HEIGHT_PT: f32 = 841.9;
pub const PAGE_MARGIN_PT: f32 = 28.0;
pub const CELL_GAP_PT: f32 = 8.0;
/// Inner padding on every cell edge.
pub const CELL_PADDING_PT: f32 = 6.0;

/// Size used for empty/placeholder cells, skipping the search.
pub const PLACEHOLDER_SIZE_PT: f32 = 16.0;
/// Fixed tier for block-structured content (lists, alignment blocks),
/// where per-character fitting is unreliable.
pub const BLOCK_SIZE_PT: f32 = 12.0;
pub const BLOCK_SIZE_SPANNED_PT: f32 = 14.0;

/// Box a card's text is fitted into, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl CellBox {
    /// The box obtained by merging with the cell below.
    pub fn spanned_down(self) -> Self {
        Self {
            width_pt: self.width_pt,
            height_pt: self.height_pt * 2.0 + CELL_GAP_PT,
        }
    }

    /// The box obtained by merging with the cell to the right.
    pub fn spanned_right(self) -> Self {
        Self {
            width_pt: self.width_pt * 2.0 + CELL_GAP_PT,
            height_pt: self.height_pt,
        }
    }
}

/// Cell grid dimensions for one printed side: 2 columns, `cells / 2` rows
/// on A4 portrait.
#[derive(Debug, Clone, Copy)]
pub struct SheetGeometry {
    pub cells_per_sheet: usize,
    pub rows: usize,
    pub cell: CellBox,
}

impl SheetGeometry {
    pub fn new(cells_per_sheet: usize) -> Self {
        let rows = (cells_per_sheet / 2).max(1);
        let cell = CellBox {
            width_pt: (PAGE_WIDTH_PT - 2.0 * PAGE_MARGIN_PT - CELL_GAP_PT) / 2.0,
            height_pt: (PAGE_HEIGHT_PT - 2.0 * PAGE_MARGIN_PT - (rows as f32 - 1.0) * CELL_GAP_PT)
                / rows as f32,
        };
        Self {
            cells_per_sheet,
            rows,
            cell,
        }
    }
}

/// Search bounds for the fitter.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub min_pt: u32,
    /// Spanned cells have roughly double the area, so they get a higher
    /// floor.
    pub min_pt_spanned: u32,
    pub max_pt: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_pt: 8,
            min_pt_spanned: 10,
            max_pt: 28,
        }
    }
}

/// Outcome of a fit: the chosen size and whether the text actually fits at
/// that size (long enough text may overflow even at the floor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub size_pt: f32,
    pub fits: bool,
}

/// Whether `text` rendered at `size_pt` stays inside `cell`.
///
/// Width is handled by greedy word wrap; the predicate fails only when an
/// unbreakable word is wider than the cell or the wrapped line stack is
/// taller than the cell. Monotonic: shrinking the size never turns a fit
/// into an overflow.
pub fn text_fits(text: &str, size_pt: f32, cell: CellBox) -> bool {
    let metrics = card_face_metrics();
    let avail_w = cell.width_pt - 2.0 * CELL_PADDING_PT;
    let avail_h = cell.height_pt - 2.0 * CELL_PADDING_PT;
    if avail_w <= 0.0 || avail_h <= 0.0 {
        return false;
    }
    if metrics.widest_word(text) * size_pt > avail_w {
        return false;
    }
    let lines = metrics.wrapped_lines(text, avail_w / size_pt);
    lines as f32 * size_pt * LINE_HEIGHT <= avail_h
}

/// Heuristic ceiling from text-length buckets: shorter text starts the
/// search higher, spanned cells a bucket above single cells.
fn ceiling_hint(len: usize, spanned: bool) -> u32 {
    if spanned {
        match len {
            0..=99 => 24,
            100..=299 => 18,
            _ => 14,
        }
    } else {
        match len {
            0..=49 => 20,
            50..=149 => 16,
            _ => 12,
        }
    }
}

fn has_block_markup(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    ["<ul", "<ol", "<li", "<div"]
        .iter()
        .any(|tag| lower.contains(tag))
}

/// Choose a font size for `text` inside `cell`.
///
/// Binary search over integer point sizes in `[floor, ceiling]`, recording
/// the best fitting size and probing larger; then a linear second pass that
/// steps down by 0.5pt while the chosen size still overflows, capped at 20
/// attempts.
pub fn fit_font_size(text: &str, cell: CellBox, spanned: bool, opts: &FitOptions) -> FitResult {
    let stripped = strip_markup(text);
    let visible = stripped.trim();

    if visible.is_empty() || visible.starts_with(PLACEHOLDER_PREFIX) {
        return FitResult {
            size_pt: PLACEHOLDER_SIZE_PT.min(opts.max_pt as f32),
            fits: true,
        };
    }
    if has_block_markup(text) {
        let size_pt = if spanned {
            BLOCK_SIZE_SPANNED_PT
        } else {
            BLOCK_SIZE_PT
        };
        return FitResult {
            size_pt,
            fits: text_fits(visible, size_pt, cell),
        };
    }

    let floor = if spanned {
        opts.min_pt_spanned
    } else {
        opts.min_pt
    };
    let len = visible.chars().count();
    let mut low = floor;
    let mut high = ceiling_hint(len, spanned).min(opts.max_pt).max(floor);
    let mut best = floor;

    while low <= high {
        let mid = (low + high) / 2;
        if text_fits(visible, mid as f32, cell) {
            best = mid;
            low = mid + 1;
        } else {
            if mid == 0 {
                break;
            }
            high = mid - 1;
        }
    }

    let mut size_pt = best as f32;
    let mut attempts = 0;
    while !text_fits(visible, size_pt, cell) && size_pt > floor as f32 && attempts < 20 {
        size_pt -= 0.5;
        attempts += 1;
    }

    FitResult {
        size_pt,
        fits: text_fits(visible, size_pt, cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell() -> CellBox {
        SheetGeometry::new(4).cell
    }

    #[test]
    fn geometry_rows_follow_cell_count() {
        assert_eq!(SheetGeometry::new(4).rows, 2);
        assert_eq!(SheetGeometry::new(6).rows, 3);
        assert_eq!(SheetGeometry::new(8).rows, 4);
    }

    #[test]
    fn smaller_grid_means_bigger_cells() {
        let four = SheetGeometry::new(4).cell;
        let eight = SheetGeometry::new(8).cell;
        assert!(four.height_pt > eight.height_pt);
        assert_eq!(four.width_pt, eight.width_pt);
    }

    #[test]
    fn empty_text_short_circuits() {
        let r = fit_font_size("", cell(), false, &FitOptions::default());
        assert_eq!(r.size_pt, PLACEHOLDER_SIZE_PT);
        assert!(r.fits);
    }

    #[test]
    fn placeholder_text_short_circuits() {
        let r = fit_font_size("(No question)", cell(), false, &FitOptions::default());
        assert_eq!(r.size_pt, PLACEHOLDER_SIZE_PT);
    }

    #[test]
    fn block_content_uses_fixed_tier() {
        let text = "<ul><li>first</li><li>second</li></ul>";
        let r = fit_font_size(text, cell(), false, &FitOptions::default());
        assert_eq!(r.size_pt, BLOCK_SIZE_PT);
        let r = fit_font_size(text, cell().spanned_down(), true, &FitOptions::default());
        assert_eq!(r.size_pt, BLOCK_SIZE_SPANNED_PT);
    }

    #[test]
    fn short_text_gets_a_large_size() {
        let r = fit_font_size("Hi", cell(), false, &FitOptions::default());
        assert!(r.fits);
        assert!(r.size_pt >= 18.0, "short text should fit large, got {}", r.size_pt);
    }

    #[test]
    fn longer_text_never_gets_a_larger_size() {
        let opts = FitOptions::default();
        let mut prev = f32::MAX;
        for words in [5usize, 20, 60, 150, 400] {
            let text = "word ".repeat(words);
            let r = fit_font_size(&text, cell(), false, &opts);
            assert!(
                r.size_pt <= prev,
                "size grew from {prev} to {} at {words} words",
                r.size_pt
            );
            prev = r.size_pt;
        }
    }

    #[test]
    fn size_is_monotonic_in_cell_area() {
        let opts = FitOptions::default();
        let text = "a moderately long piece of card text ".repeat(8);
        let small = fit_font_size(&text, SheetGeometry::new(8).cell, false, &opts);
        let large = fit_font_size(&text, SheetGeometry::new(4).cell, false, &opts);
        assert!(
            large.size_pt >= small.size_pt,
            "larger cell chose {} below {}",
            large.size_pt,
            small.size_pt
        );
    }

    #[test]
    fn spanned_floor_is_respected() {
        let opts = FitOptions::default();
        let text = "word ".repeat(500);
        let r = fit_font_size(&text, cell().spanned_down(), true, &opts);
        assert!(r.size_pt >= opts.min_pt_spanned as f32);
    }

    #[test]
    fn result_stays_within_bounds() {
        let opts = FitOptions::default();
        for words in [1usize, 10, 100, 1000] {
            let text = "word ".repeat(words);
            let r = fit_font_size(&text, cell(), false, &opts);
            assert!(r.size_pt >= opts.min_pt as f32);
            assert!(r.size_pt <= opts.max_pt as f32);
        }
    }

    #[test]
    fn absurd_text_reports_no_fit() {
        let opts = FitOptions::default();
        let text = "word ".repeat(3000);
        let r = fit_font_size(&text, cell(), false, &opts);
        assert!(!r.fits);
        assert_eq!(r.size_pt, opts.min_pt as f32);
    }

    #[test]
    fn stricter_max_caps_the_search() {
        let opts = FitOptions {
            max_pt: 22,
            ..FitOptions::default()
        };
        let r = fit_font_size("Hi", cell(), false, &opts);
        assert!(r.size_pt <= 22.0);
    }

    #[test]
    fn markup_is_invisible_to_the_fitter() {
        let opts = FitOptions::default();
        let plain = fit_font_size("short text", cell(), false, &opts);
        let marked = fit_font_size("<b>short text</b>", cell(), false, &opts);
        assert_eq!(plain, marked);
    }
}
