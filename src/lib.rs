//! Core library for flashcard deck management and duplex print layout.

mod deck;
mod fitter;
mod graphics;
mod html;
mod import;
mod layout;
mod merge;
mod metrics;

pub use deck::{Card, Deck, MergeType, NO_ANSWER, NO_QUESTION, PLACEHOLDER_PREFIX};
pub use fitter::{
    CellBox, FitOptions, FitResult, PLACEHOLDER_SIZE_PT, SheetGeometry, fit_font_size, text_fits,
};
pub use graphics::{ImageRenderOptions, SheetImageStyle, render_page_image};
pub use html::render_document;
pub use import::{ImportError, ImportOutcome, parse_import};
pub use layout::{
    CellRef, CellSlot, GRID_COLS, LayoutPlan, Placement, SheetPlan, Side, Span, cell_map,
    compute_layout,
};
pub use merge::{MERGE_THRESHOLD, MergeChoice, effective_len, needs_merge, resolve_merge, strip_markup};
pub use metrics::{FontTable, LINE_HEIGHT, card_face_metrics};
