//! Print output commands (`flashdeck print ...`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use flashdeck::{
    FitOptions, ImageRenderOptions, Side, compute_layout, render_document, render_page_image,
};

use crate::cli::common::SheetStyleArg;
use crate::cli::utils::{load_deck, parse_cells, write_output};

/// Available print subcommands.
#[derive(Subcommand, Debug)]
pub enum PrintCommand {
    /// Emit a printable HTML document (one front + one back page per sheet).
    Html(PrintHtmlArgs),
    /// Render PNG previews of every page.
    Image(PrintImageArgs),
}

/// Args for `flashdeck print html`.
#[derive(Args, Debug)]
pub struct PrintHtmlArgs {
    /// Deck file to print.
    pub deck: PathBuf,
    /// Cells per sheet (even), e.g. 4, 6 or 8.
    #[arg(long, default_value = "4", value_parser = parse_cells)]
    pub cells: usize,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Cap the fitter at a stricter maximum point size.
    #[arg(long, default_value_t = 28)]
    pub max_pt: u32,
}

/// Args for `flashdeck print image`.
#[derive(Args, Debug)]
pub struct PrintImageArgs {
    /// Deck file to print.
    pub deck: PathBuf,
    /// Cells per sheet (even), e.g. 4, 6 or 8.
    #[arg(long, default_value = "4", value_parser = parse_cells)]
    pub cells: usize,
    /// Output directory for generated PNGs.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Visual style applied to the page.
    #[arg(long, default_value_t = SheetStyleArg::Plain, value_enum)]
    pub style: SheetStyleArg,
    /// Dots per inch used when rasterising.
    #[arg(long, default_value_t = 150)]
    pub dpi: u32,
}

/// Execute a print command.
pub fn handle(command: PrintCommand) -> Result<()> {
    match command {
        PrintCommand::Html(args) => html(args),
        PrintCommand::Image(args) => image(args),
    }
}

fn html(args: PrintHtmlArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    let plan = compute_layout(&deck.cards, args.cells)?;
    let opts = FitOptions {
        max_pt: args.max_pt,
        ..FitOptions::default()
    };
    let document = render_document(&deck.cards, &plan, &opts);
    write_output(&args.output, &document)?;
    if args.output.as_os_str() != "-" {
        println!(
            "Wrote {} sheet(s) ({} pages) to {}",
            plan.total_sheets(),
            plan.total_sheets() * 2,
            args.output.display()
        );
    }
    Ok(())
}

fn image(args: PrintImageArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    let plan = compute_layout(&deck.cards, args.cells)?;
    let options = ImageRenderOptions {
        style: args.style.into(),
        dpi: args.dpi.clamp(72, 1200),
    };

    if args
        .output
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
    {
        return Err(anyhow!(
            "output must be a directory; every sheet produces a front and a back page"
        ));
    }
    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create output directory {}", args.output.display()))?;

    for sheet_idx in 0..plan.total_sheets() {
        for side in [Side::Front, Side::Back] {
            let label = match side {
                Side::Front => "front",
                Side::Back => "back",
            };
            let target = args
                .output
                .join(format!("sheet_{:02}_{}.png", sheet_idx + 1, label));
            let page = render_page_image(&deck.cards, &plan, sheet_idx, side, &options)?;
            page.save(&target)
                .with_context(|| format!("failed to write {}", target.display()))?;
        }
    }
    println!(
        "Rendered {} page image(s) to {} at {} DPI",
        plan.total_sheets() * 2,
        args.output.display(),
        options.dpi
    );
    Ok(())
}
