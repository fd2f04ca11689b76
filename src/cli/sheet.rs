//! Layout inspection commands (`flashdeck sheet ...`).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use flashdeck::{
    CellSlot, FitOptions, SheetGeometry, Side, cell_map, compute_layout, fit_font_size,
};

use crate::cli::utils::{load_deck, parse_cells, preview};

/// Supported `flashdeck sheet` subcommands.
#[derive(Subcommand, Debug)]
pub enum SheetCommand {
    /// Show how cards are partitioned and placed across sheets.
    Plan(SheetPlanArgs),
    /// Show the font size chosen for each card at a given grid size.
    Fit(SheetFitArgs),
}

/// Arguments for `flashdeck sheet plan`.
#[derive(Args, Debug)]
pub struct SheetPlanArgs {
    /// Deck file to read.
    pub deck: PathBuf,
    /// Cells per sheet (even), e.g. 4, 6 or 8.
    #[arg(long, default_value = "4", value_parser = parse_cells)]
    pub cells: usize,
}

/// Arguments for `flashdeck sheet fit`.
#[derive(Args, Debug)]
pub struct SheetFitArgs {
    /// Deck file to read.
    pub deck: PathBuf,
    /// Cells per sheet (even), e.g. 4, 6 or 8.
    #[arg(long, default_value = "4", value_parser = parse_cells)]
    pub cells: usize,
    /// Cap the search at a stricter maximum point size.
    #[arg(long, default_value_t = 28)]
    pub max_pt: u32,
}

/// Execute a sheet command.
pub fn handle(command: SheetCommand) -> Result<()> {
    match command {
        SheetCommand::Plan(args) => plan(args),
        SheetCommand::Fit(args) => fit(args),
    }
}

fn plan(args: SheetPlanArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    let plan = compute_layout(&deck.cards, args.cells)?;
    println!(
        "{} card(s), {} sheet(s) at {} cells/sheet",
        deck.cards.len(),
        plan.total_sheets(),
        args.cells
    );
    for (sheet_idx, sheet) in plan.sheets.iter().enumerate() {
        println!(
            "\nSheet {} ({} of {} cells used)",
            sheet_idx + 1,
            sheet.cells_used(),
            args.cells
        );
        for side in [Side::Front, Side::Back] {
            let label = match side {
                Side::Front => "front",
                Side::Back => "back ",
            };
            for (idx, slot) in cell_map(sheet, side, args.cells).iter().enumerate() {
                let row = idx / 2 + 1;
                let col = idx % 2 + 1;
                let desc = match slot {
                    CellSlot::Empty => "(empty)".to_string(),
                    CellSlot::Continuation(card) => {
                        format!("continuation of card {}", deck.cards[*card].id)
                    }
                    CellSlot::Primary(card) => {
                        let card = &deck.cards[*card];
                        let text = match side {
                            Side::Front => &card.question,
                            Side::Back => &card.answer,
                        };
                        format!("card {} - {}", card.id, preview(text, 32))
                    }
                };
                println!("  {label} r{row}c{col}: {desc}");
            }
        }
    }
    Ok(())
}

fn fit(args: SheetFitArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    let plan = compute_layout(&deck.cards, args.cells)?;
    let geometry = SheetGeometry::new(args.cells);
    let opts = FitOptions {
        max_pt: args.max_pt,
        ..FitOptions::default()
    };
    println!(
        "Cell: {:.0}x{:.0}pt, {} cells/sheet",
        geometry.cell.width_pt, geometry.cell.height_pt, args.cells
    );
    for sheet in &plan.sheets {
        for placement in &sheet.placements {
            let card = &deck.cards[placement.card];
            let cell_box = match (placement.span.rows, placement.span.cols) {
                (2, _) => geometry.cell.spanned_down(),
                (_, 2) => geometry.cell.spanned_right(),
                _ => geometry.cell,
            };
            let spanned = placement.span.is_spanned();
            let q = fit_font_size(&card.question, cell_box, spanned, &opts);
            let a = fit_font_size(&card.answer, cell_box, spanned, &opts);
            let warn = if q.fits && a.fits { "" } else { "  (overflows)" };
            println!(
                "card {:>4}: question {:>5.1}pt, answer {:>5.1}pt{}",
                card.id, q.size_pt, a.size_pt, warn
            );
        }
    }
    Ok(())
}
