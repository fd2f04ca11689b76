//! Deck lifecycle commands (`flashdeck deck ...`).

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand, ValueEnum};
use flashdeck::{Deck, compute_layout, parse_import};

use crate::cli::utils::{confirm, load_deck, parse_cells, read_text_arg, write_output};

/// Supported `flashdeck deck` subcommands.
#[derive(Subcommand, Debug)]
pub enum DeckCommand {
    /// Create a new empty deck file.
    Init(DeckInitArgs),
    /// Import cards from a JSON array file.
    Import(DeckImportArgs),
    /// Export deck contents to another format.
    Export(DeckExportArgs),
    /// Show deck summary: counts, cells, sheets, content hash.
    Info(DeckInfoArgs),
    /// Delete every card in the deck.
    Clear(DeckClearArgs),
}

/// Arguments for `flashdeck deck init`.
#[derive(Args, Debug)]
pub struct DeckInitArgs {
    /// Output deck path (JSON).
    pub path: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `flashdeck deck import`.
#[derive(Args, Debug)]
pub struct DeckImportArgs {
    /// Deck file to extend.
    pub deck: PathBuf,
    /// JSON file to import (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
}

/// Arguments for `flashdeck deck export`.
#[derive(Args, Debug)]
pub struct DeckExportArgs {
    /// Source deck file.
    pub deck: PathBuf,
    /// Output file path (`-` for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Export format.
    #[arg(long, default_value_t = DeckExportFormat::Json, value_enum)]
    pub format: DeckExportFormat,
}

/// Export format for deck content.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DeckExportFormat {
    /// The storage format: a JSON array of cards.
    Json,
    /// Tab-separated question/answer pairs, one card per line.
    Tsv,
}

impl fmt::Display for DeckExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckExportFormat::Json => write!(f, "json"),
            DeckExportFormat::Tsv => write!(f, "tsv"),
        }
    }
}

/// Arguments for `flashdeck deck info`.
#[derive(Args, Debug)]
pub struct DeckInfoArgs {
    /// Deck file to inspect.
    pub deck: PathBuf,
    /// Cells per sheet used for the sheet-count estimate.
    #[arg(long, default_value = "4", value_parser = parse_cells)]
    pub cells: usize,
}

/// Arguments for `flashdeck deck clear`.
#[derive(Args, Debug)]
pub struct DeckClearArgs {
    /// Deck file to clear.
    pub deck: PathBuf,
    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Execute a deck command.
pub fn handle(command: DeckCommand) -> Result<()> {
    match command {
        DeckCommand::Init(args) => init(args),
        DeckCommand::Import(args) => import(args),
        DeckCommand::Export(args) => export(args),
        DeckCommand::Info(args) => info(args),
        DeckCommand::Clear(args) => clear(args),
    }
}

fn init(args: DeckInitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists; pass --force to overwrite",
            args.path.display()
        ));
    }
    let mut deck = Deck::new();
    deck.save(&args.path)?;
    println!("Initialized empty deck at {}", args.path.display());
    Ok(())
}

fn import(args: DeckImportArgs) -> Result<()> {
    let raw = read_text_arg(None, args.from.clone())?;
    let outcome = parse_import(&raw).context("import failed")?;
    let mut deck = load_deck(&args.deck);
    let accepted = outcome.cards.len();
    deck.extend_imported(outcome.cards);
    deck.save(&args.deck)?;
    if outcome.skipped > 0 {
        println!(
            "Imported {} card(s) into {} ({} entr{} skipped)",
            accepted,
            args.deck.display(),
            outcome.skipped,
            if outcome.skipped == 1 { "y" } else { "ies" }
        );
    } else {
        println!("Imported {} card(s) into {}", accepted, args.deck.display());
    }
    Ok(())
}

fn export(args: DeckExportArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    let content = match args.format {
        DeckExportFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&deck.cards).context("failed to serialize deck")?;
            json.push('\n');
            json
        }
        DeckExportFormat::Tsv => {
            let mut out = String::new();
            for card in &deck.cards {
                out.push_str(&card.question.replace(['\t', '\n'], " "));
                out.push('\t');
                out.push_str(&card.answer.replace(['\t', '\n'], " "));
                out.push('\n');
            }
            out
        }
    };
    write_output(&args.output, &content)?;
    if args.output.as_os_str() != "-" {
        println!(
            "Exported {} card(s) to {} as {}",
            deck.cards.len(),
            args.output.display(),
            args.format
        );
    }
    Ok(())
}

fn info(args: DeckInfoArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    let plan = compute_layout(&deck.cards, args.cells)?;
    let merged = deck.cards.iter().filter(|c| c.merge.is_some()).count();
    let cells: usize = deck.cards.iter().map(|c| c.cells()).sum();
    println!("Deck: {}", args.deck.display());
    println!("Cards: {} ({} merged)", deck.cards.len(), merged);
    println!("Cells needed: {}", cells);
    println!(
        "Sheets at {} cells/sheet: {}",
        args.cells,
        plan.total_sheets()
    );
    if let Some(first) = deck.cards.first() {
        println!("Oldest card: {}", first.created_at.to_rfc3339());
    }
    println!("Content hash: {}", deck.hash()?);
    Ok(())
}

fn clear(args: DeckClearArgs) -> Result<()> {
    let mut deck = load_deck(&args.deck);
    if deck.cards.is_empty() {
        println!("No cards to clear in {}.", args.deck.display());
        return Ok(());
    }
    let prompt = format!(
        "Delete all {} card(s) in {}? This cannot be undone.",
        deck.cards.len(),
        args.deck.display()
    );
    if !confirm(&prompt, args.yes)? {
        println!("Aborted; deck unchanged.");
        return Ok(());
    }
    deck.clear();
    deck.save(&args.deck)?;
    println!("Cleared {}", args.deck.display());
    Ok(())
}
