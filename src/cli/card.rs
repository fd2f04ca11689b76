//! Card-level operations (`flashdeck card ...`).

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use flashdeck::MERGE_THRESHOLD;

use crate::cli::common::{MergeArg, merge_choice};
use crate::cli::utils::{confirm, load_deck, preview};

/// Supported `flashdeck card` subcommands.
#[derive(Subcommand, Debug)]
pub enum CardCommand {
    /// Append a new card with question/answer text.
    Add(CardAddArgs),
    /// Edit an existing card by id.
    Update(CardUpdateArgs),
    /// Remove a card by id.
    Delete(CardDeleteArgs),
    /// Show one card with metadata.
    Show(CardShowArgs),
    /// List all cards in display order.
    List(CardListArgs),
}

/// Arguments for `flashdeck card add`.
#[derive(Args, Debug)]
pub struct CardAddArgs {
    /// Deck file to modify.
    pub deck: PathBuf,
    /// Question text (front side).
    #[arg(short = 'q', long)]
    pub question: Option<String>,
    /// Answer text (back side).
    #[arg(short = 'a', long)]
    pub answer: Option<String>,
    /// Merge selection for long cards (defaults to automatic).
    #[arg(long, value_enum)]
    pub merge: Option<MergeArg>,
}

/// Arguments for `flashdeck card update`.
#[derive(Args, Debug)]
pub struct CardUpdateArgs {
    /// Deck file to modify.
    pub deck: PathBuf,
    /// Card id to edit.
    pub id: u64,
    /// New question text (omit to keep the current value).
    #[arg(short = 'q', long)]
    pub question: Option<String>,
    /// New answer text (omit to keep the current value).
    #[arg(short = 'a', long)]
    pub answer: Option<String>,
    /// Merge selection for long cards (defaults to automatic).
    #[arg(long, value_enum)]
    pub merge: Option<MergeArg>,
}

/// Arguments for `flashdeck card delete`.
#[derive(Args, Debug)]
pub struct CardDeleteArgs {
    /// Deck file to modify.
    pub deck: PathBuf,
    /// Card id to delete.
    pub id: u64,
    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for `flashdeck card show`.
#[derive(Args, Debug)]
pub struct CardShowArgs {
    /// Deck file to read.
    pub deck: PathBuf,
    /// Card id to show.
    pub id: u64,
}

/// Arguments for `flashdeck card list`.
#[derive(Args, Debug)]
pub struct CardListArgs {
    /// Deck file to read.
    pub deck: PathBuf,
}

/// Execute a card command.
pub fn handle(command: CardCommand) -> Result<()> {
    match command {
        CardCommand::Add(args) => add(args),
        CardCommand::Update(args) => update(args),
        CardCommand::Delete(args) => delete(args),
        CardCommand::Show(args) => show(args),
        CardCommand::List(args) => list(args),
    }
}

fn add(args: CardAddArgs) -> Result<()> {
    let mut deck = load_deck(&args.deck);
    let question = args.question.as_deref().unwrap_or("");
    let answer = args.answer.as_deref().unwrap_or("");
    let choice = merge_choice(args.merge);
    let card = deck.add_card(question, answer, choice)?;
    let id = card.id;
    let merged = card.merge;
    deck.save(&args.deck)?;
    match merged {
        Some(merge) => println!(
            "Added card {} to {} (long text, merged {:?})",
            id,
            args.deck.display(),
            merge
        ),
        None => println!("Added card {} to {}", id, args.deck.display()),
    }
    Ok(())
}

fn update(args: CardUpdateArgs) -> Result<()> {
    let mut deck = load_deck(&args.deck);
    let choice = merge_choice(args.merge);
    let card = deck.update_card(
        args.id,
        args.question.as_deref(),
        args.answer.as_deref(),
        choice,
    )?;
    let merged = card.merge;
    deck.save(&args.deck)?;
    println!("Updated card {} in {}", args.id, args.deck.display());
    if merged.is_none() && args.merge.is_some() {
        println!("(text is under {MERGE_THRESHOLD} characters; card stays in one cell)");
    }
    Ok(())
}

fn delete(args: CardDeleteArgs) -> Result<()> {
    let mut deck = load_deck(&args.deck);
    let card = deck
        .find(args.id)
        .ok_or_else(|| anyhow!("no card with id {}", args.id))?;
    let prompt = format!("Delete card {} ({})?", args.id, preview(&card.question, 40));
    if !confirm(&prompt, args.yes)? {
        println!("Aborted; deck unchanged.");
        return Ok(());
    }
    deck.delete_card(args.id)?;
    deck.save(&args.deck)?;
    println!("Deleted card {} from {}", args.id, args.deck.display());
    Ok(())
}

fn show(args: CardShowArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    let card = deck
        .find(args.id)
        .ok_or_else(|| anyhow!("no card with id {}", args.id))?;
    println!("Card {}", card.id);
    println!("Created: {}", card.created_at.to_rfc3339());
    match card.merge {
        Some(merge) => println!("Cells: 2 (merged {:?})", merge),
        None => println!("Cells: 1"),
    }
    println!(
        "Effective length: {} characters (threshold {})",
        card.effective_len(),
        MERGE_THRESHOLD
    );
    println!("Question:\n{}", card.question);
    println!("Answer:\n{}", card.answer);
    Ok(())
}

fn list(args: CardListArgs) -> Result<()> {
    let deck = load_deck(&args.deck);
    if deck.cards.is_empty() {
        println!("No cards yet in {}.", args.deck.display());
        return Ok(());
    }
    for (idx, card) in deck.cards.iter().enumerate() {
        let marker = match card.merge {
            Some(flashdeck::MergeType::Down) => " [down]",
            Some(flashdeck::MergeType::Right) => " [right]",
            None => "",
        };
        println!(
            "{:>4}. (id {}){} Q: {}",
            idx + 1,
            card.id,
            marker,
            preview(&card.question, 48)
        );
        println!("      A: {}", preview(&card.answer, 48));
    }
    let count = deck.cards.len();
    println!("{} card{}", count, if count == 1 { "" } else { "s" });
    Ok(())
}
