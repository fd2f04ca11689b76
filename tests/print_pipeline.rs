//! Integration tests for the full print pipeline.
//!
//! These tests exercise the path from card input to printable output:
//! - deck persistence round trips through the JSON file format
//! - the layout engine partitions cards onto sheets correctly
//! - merged cards span cells and mirror onto the back page
//! - HTML and PNG renderers agree on the sheet plan

use flashdeck::{
    CellSlot, Deck, FitOptions, ImageRenderOptions, LayoutPlan, MergeChoice, MergeType, Side,
    cell_map, compute_layout, fit_font_size, parse_import, render_document, render_page_image,
    CellBox,
};

use image::GenericImageView;
use tempfile::tempdir;

// ─── Helpers ────────────────────────────────────────────────────

fn deck_of(n: usize) -> Deck {
    let mut deck = Deck::new();
    for i in 0..n {
        deck.add_card(
            &format!("Question number {i}"),
            &format!("Answer number {i}"),
            MergeChoice::Auto,
        )
        .unwrap();
    }
    deck
}

fn layout(deck: &Deck, cells: usize) -> LayoutPlan {
    compute_layout(&deck.cards, cells).unwrap()
}

// ─── Persistence ────────────────────────────────────────────────

#[test]
fn deck_survives_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deck.json");

    let mut deck = deck_of(3);
    deck.add_card(&"long ".repeat(120), "short", MergeChoice::Auto)
        .unwrap();
    deck.save(&path).unwrap();

    let loaded = Deck::load(&path);
    assert_eq!(loaded.cards.len(), 4);
    assert_eq!(loaded.cards, deck.cards);
    assert_eq!(loaded.cards[3].merge, Some(MergeType::Down));
}

#[test]
fn save_writes_a_bare_json_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deck.json");

    let mut deck = deck_of(2);
    deck.save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.trim_start().starts_with('['));
    assert!(raw.contains("\"mergeType\""));
    assert!(raw.contains("\"createdAt\""));
    assert!(raw.ends_with('\n'));
}

#[test]
fn missing_deck_file_loads_empty() {
    let dir = tempdir().unwrap();
    let deck = Deck::load(&dir.path().join("absent.json"));
    assert!(deck.cards.is_empty());
}

// ─── Layout ─────────────────────────────────────────────────────

#[test]
fn five_singles_split_across_two_sheets() {
    let deck = deck_of(5);
    let plan = layout(&deck, 4);
    assert_eq!(plan.total_sheets(), 2);
    assert_eq!(plan.sheets[0].placements.len(), 4);
    assert_eq!(plan.sheets[1].placements.len(), 1);
}

#[test]
fn empty_deck_produces_one_blank_sheet() {
    let plan = compute_layout(&[], 6).unwrap();
    assert_eq!(plan.total_sheets(), 1);
    assert!(plan.sheets[0].placements.is_empty());
    let map = cell_map(&plan.sheets[0], Side::Front, 6);
    assert!(map.iter().all(|s| *s == CellSlot::Empty));
}

#[test]
fn merged_card_reserves_its_continuation_cell() {
    let mut deck = Deck::new();
    deck.add_card(&"q".repeat(500), "a", MergeChoice::Down).unwrap();
    deck.add_card("second", "b", MergeChoice::Auto).unwrap();

    let plan = layout(&deck, 4);
    let map = cell_map(&plan.sheets[0], Side::Front, 4);
    // Down span from cell 0 reserves cell 2; the second card skips to 1.
    assert_eq!(map[0], CellSlot::Primary(0));
    assert_eq!(map[1], CellSlot::Primary(1));
    assert_eq!(map[2], CellSlot::Continuation(0));
    assert_eq!(map[3], CellSlot::Empty);
}

#[test]
fn back_side_is_column_mirrored() {
    let deck = deck_of(2);
    let plan = layout(&deck, 4);
    let front = cell_map(&plan.sheets[0], Side::Front, 4);
    let back = cell_map(&plan.sheets[0], Side::Back, 4);
    assert_eq!(front[0], CellSlot::Primary(0));
    assert_eq!(front[1], CellSlot::Primary(1));
    assert_eq!(back[0], CellSlot::Primary(1));
    assert_eq!(back[1], CellSlot::Primary(0));
}

#[test]
fn odd_cell_count_is_rejected() {
    assert!(compute_layout(&[], 5).is_err());
    assert!(compute_layout(&[], 0).is_err());
}

// ─── Fitting ────────────────────────────────────────────────────

#[test]
fn longer_text_never_gets_a_larger_size() {
    let cell = CellBox {
        width_pt: 260.0,
        height_pt: 180.0,
    };
    let opts = FitOptions::default();
    let short = fit_font_size("One line.", cell, false, &opts);
    let long = fit_font_size(&"many words here ".repeat(30), cell, false, &opts);
    assert!(short.size_pt >= long.size_pt);
    assert!(short.fits);
}

// ─── Import ─────────────────────────────────────────────────────

#[test]
fn imported_cards_flow_into_the_layout() {
    let raw = r#"[
        {"question": "Capital of France?", "answer": "Paris"},
        {"question": "", "answer": ""},
        {"question": "2 + 2", "answer": "4", "mergeType": "right"}
    ]"#;
    let outcome = parse_import(raw).unwrap();
    assert_eq!(outcome.cards.len(), 2);
    assert_eq!(outcome.skipped, 1);

    let mut deck = Deck::new();
    deck.extend_imported(outcome.cards);
    // Explicit merge hints below the length threshold are dropped.
    assert_eq!(deck.cards[1].merge, None);

    let plan = layout(&deck, 4);
    assert_eq!(plan.total_sheets(), 1);
}

#[test]
fn import_rejects_non_array_documents() {
    assert!(parse_import(r#"{"question": "q"}"#).is_err());
    assert!(parse_import("[]").is_err());
    assert!(parse_import("not json").is_err());
}

// ─── Rendering ──────────────────────────────────────────────────

#[test]
fn html_emits_front_and_back_for_every_sheet() {
    let deck = deck_of(5);
    let plan = layout(&deck, 4);
    let html = render_document(&deck.cards, &plan, &FitOptions::default());
    assert_eq!(html.matches("class=\"page front\"").count(), 2);
    assert_eq!(html.matches("class=\"page back\"").count(), 2);
    assert!(html.contains("Question number 4"));
    assert!(html.contains("Answer number 4"));
}

#[test]
fn html_and_png_show_the_same_stripped_text() {
    // Both print surfaces display markup-stripped text, so the size the
    // fitter picked is measured against exactly what lands on the page.
    let mut deck = Deck::new();
    deck.add_card("<ul><li>alpha</li><li>beta</li></ul>", "plain", MergeChoice::Auto)
        .unwrap();
    let plan = layout(&deck, 4);
    let html = render_document(&deck.cards, &plan, &FitOptions::default());
    assert!(!html.contains("&lt;ul&gt;"));
    assert!(!html.contains("&lt;li&gt;"));
    assert!(html.contains("alphabeta"));
}

#[test]
fn png_page_has_a4_proportions() {
    let deck = deck_of(3);
    let plan = layout(&deck, 4);
    let options = ImageRenderOptions {
        dpi: 72,
        ..Default::default()
    };
    let front = render_page_image(&deck.cards, &plan, 0, Side::Front, &options).unwrap();
    let back = render_page_image(&deck.cards, &plan, 0, Side::Back, &options).unwrap();
    assert_eq!(front.dimensions(), (595, 842));
    assert_eq!(front.dimensions(), back.dimensions());
}

#[test]
fn png_rejects_out_of_range_sheet() {
    let deck = deck_of(1);
    let plan = layout(&deck, 4);
    let options = ImageRenderOptions::default();
    assert!(render_page_image(&deck.cards, &plan, 3, Side::Front, &options).is_err());
}
