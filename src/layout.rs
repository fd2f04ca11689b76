//! Sheet layout: partitions cards across fixed-capacity sheets and assigns
//! each card an explicit `{row, col, span}` placement, including the
//! column-mirrored placement the back side needs for duplex printing.
//!
//! Packing is greedy and source-order: cards are never reordered and a
//! card's two cells are never split across sheets. A sheet closes as soon
//! as the next card would not fit, even if that leaves trailing empty
//! cells; predictable printed ordering wins over tight packing.

use anyhow::{Result, anyhow};

use crate::deck::{Card, MergeType};

/// Printed sheets always use two columns.
pub const GRID_COLS: usize = 2;

/// Which face of the physical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Questions.
    Front,
    /// Answers, column-mirrored so cells line up after the page is flipped.
    Back,
}

/// One grid slot, 0-based, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    /// Linear cell index within the sheet.
    pub fn index(&self) -> usize {
        self.row * GRID_COLS + self.col
    }
}

/// Cells covered by a placement: 1x1, 2x1 (down) or 1x2 (right).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub rows: usize,
    pub cols: usize,
}

impl Span {
    pub const SINGLE: Span = Span { rows: 1, cols: 1 };
    pub const DOWN: Span = Span { rows: 2, cols: 1 };
    pub const RIGHT: Span = Span { rows: 1, cols: 2 };

    pub fn is_spanned(&self) -> bool {
        self.rows > 1 || self.cols > 1
    }
}

/// A card's resolved position on one sheet. `card` indexes the input list
/// passed to [`compute_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub card: usize,
    pub cell: CellRef,
    pub span: Span,
}

impl Placement {
    /// Index of the continuation cell reserved by a spanned placement.
    pub fn continuation_index(&self) -> Option<usize> {
        if self.span.rows == 2 {
            Some(self.cell.index() + GRID_COLS)
        } else if self.span.cols == 2 {
            Some(self.cell.index() + 1)
        } else {
            None
        }
    }

    /// The same placement reflected across the sheet's vertical axis, which
    /// is where the cell lands on the back side after a duplex flip.
    pub fn mirrored(&self) -> Placement {
        let col = GRID_COLS - self.cell.col - self.span.cols;
        Placement {
            card: self.card,
            cell: CellRef {
                row: self.cell.row,
                col,
            },
            span: self.span,
        }
    }

    pub fn for_side(&self, side: Side) -> Placement {
        match side {
            Side::Front => *self,
            Side::Back => self.mirrored(),
        }
    }
}

/// Cards assigned to one physical double-sided page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetPlan {
    pub placements: Vec<Placement>,
}

impl SheetPlan {
    /// Total cells consumed on this sheet.
    pub fn cells_used(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.span.rows * p.span.cols)
            .sum()
    }
}

/// The full layout: one [`SheetPlan`] per physical page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub cells_per_sheet: usize,
    pub sheets: Vec<SheetPlan>,
}

impl LayoutPlan {
    pub fn total_sheets(&self) -> usize {
        self.sheets.len()
    }
}

/// What a rendered cell holds on one side of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSlot {
    Empty,
    /// Primary occupant; the value indexes the input card list.
    Primary(usize),
    /// Reserved by a spanned card whose content lives in its primary cell.
    Continuation(usize),
}

/// Partition `cards` across sheets and place each one.
///
/// `cells_per_sheet` must be an even positive integer. An empty card list
/// yields exactly one empty sheet so print paths render a page rather than
/// nothing.
pub fn compute_layout(cards: &[Card], cells_per_sheet: usize) -> Result<LayoutPlan> {
    if cells_per_sheet == 0 || cells_per_sheet % 2 != 0 {
        return Err(anyhow!(
            "cells per sheet must be an even positive integer (got {})",
            cells_per_sheet
        ));
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used = 0usize;
    for (idx, card) in cards.iter().enumerate() {
        let need = card.cells();
        if used + need > cells_per_sheet && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(idx);
        used += need;
    }
    if !current.is_empty() || groups.is_empty() {
        groups.push(current);
    }

    let sheets = groups
        .into_iter()
        .map(|group| place_sheet(cards, &group, cells_per_sheet))
        .collect();

    Ok(LayoutPlan {
        cells_per_sheet,
        sheets,
    })
}

/// Assign cells to one sheet's cards, walking a cursor over free cells.
///
/// Spanned cards reserve their continuation cell up front; later cards skip
/// reserved cells. When a requested span has no room its direction is
/// swapped (down <-> right) if the swapped continuation is free and in
/// bounds, and dropped entirely otherwise, so a sheet is never corrupted by
/// an out-of-bounds continuation.
fn place_sheet(cards: &[Card], group: &[usize], cells_per_sheet: usize) -> SheetPlan {
    let mut occupied = vec![false; cells_per_sheet];
    let mut cursor = 0usize;
    let mut placements = Vec::with_capacity(group.len());

    for &card_idx in group {
        while cursor < cells_per_sheet && occupied[cursor] {
            cursor += 1;
        }
        if cursor >= cells_per_sheet {
            break;
        }
        let cell = CellRef {
            row: cursor / GRID_COLS,
            col: cursor % GRID_COLS,
        };
        let span = resolve_span(cards[card_idx].merge, cursor, &occupied, cells_per_sheet);
        let placement = Placement {
            card: card_idx,
            cell,
            span,
        };
        occupied[cursor] = true;
        if let Some(cont) = placement.continuation_index() {
            occupied[cont] = true;
        }
        placements.push(placement);
    }

    SheetPlan { placements }
}

fn resolve_span(
    merge: Option<MergeType>,
    at: usize,
    occupied: &[bool],
    cells_per_sheet: usize,
) -> Span {
    let col = at % GRID_COLS;
    let down_free = at + GRID_COLS < cells_per_sheet && !occupied[at + GRID_COLS];
    let right_free = col + 1 < GRID_COLS && at + 1 < cells_per_sheet && !occupied[at + 1];
    match merge {
        None => Span::SINGLE,
        Some(MergeType::Down) if down_free => Span::DOWN,
        Some(MergeType::Down) if right_free => Span::RIGHT,
        Some(MergeType::Right) if right_free => Span::RIGHT,
        Some(MergeType::Right) if down_free => Span::DOWN,
        Some(_) => Span::SINGLE,
    }
}

/// Per-cell contents for one side of one sheet. Continuation cells are
/// reported explicitly so renderers can hide them.
pub fn cell_map(sheet: &SheetPlan, side: Side, cells_per_sheet: usize) -> Vec<CellSlot> {
    let mut slots = vec![CellSlot::Empty; cells_per_sheet];
    for placement in &sheet.placements {
        let placed = placement.for_side(side);
        let primary = placed.cell.index();
        if primary < cells_per_sheet {
            slots[primary] = CellSlot::Primary(placed.card);
        }
        if let Some(cont) = placed.continuation_index() {
            if cont < cells_per_sheet {
                slots[cont] = CellSlot::Continuation(placed.card);
            }
        }
    }
    slots
}
