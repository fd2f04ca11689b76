use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::merge::{self, MERGE_THRESHOLD, MergeChoice};

/// Placeholder stored when a card has no question text.
pub const NO_QUESTION: &str = "(No question)";
/// Placeholder stored when a card has no answer text.
pub const NO_ANSWER: &str = "(No answer)";
/// Prefix shared by the placeholder strings; text starting with it is
/// treated as placeholder content by the fitter.
pub const PLACEHOLDER_PREFIX: &str = "(No ";

/// Direction a two-cell card grows in on the sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeType {
    /// Primary cell plus the cell directly below it (same column, next row).
    Down,
    /// Primary cell plus the next cell in the same row.
    Right,
}

/// Single flashcard stored in a deck file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u64,
    pub question: String,
    pub answer: String,
    /// `None` means the card fits one cell.
    #[serde(rename = "mergeType", default)]
    pub merge: Option<MergeType>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Build a card from raw user input, applying placeholders and the
    /// merge policy. Fails when both fields are empty after trimming.
    pub fn from_input(
        id: u64,
        question: &str,
        answer: &str,
        choice: MergeChoice,
    ) -> Result<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() && answer.is_empty() {
            return Err(anyhow!("card needs at least a question or an answer"));
        }
        let mut card = Self {
            id,
            question: normalize(question, NO_QUESTION),
            answer: normalize(answer, NO_ANSWER),
            merge: None,
            created_at: Utc::now(),
        };
        card.merge = merge::resolve_merge(None, choice, card.effective_len(), MERGE_THRESHOLD);
        Ok(card)
    }

    /// Number of sheet cells the card consumes.
    pub fn cells(&self) -> usize {
        if self.merge.is_some() { 2 } else { 1 }
    }

    /// The longer of the two fields with markup stripped; this is the
    /// length the merge threshold is compared against.
    pub fn effective_len(&self) -> usize {
        merge::effective_len(&self.question).max(merge::effective_len(&self.answer))
    }
}

fn normalize(text: &str, placeholder: &str) -> String {
    if text.is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

/// In-memory representation of a deck file: an ordered list of cards,
/// persisted as a single JSON array.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub cards: Vec<Card>,
    pub path: Option<PathBuf>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a deck from disk. A missing file or unparseable contents yield
    /// an empty deck with a stderr warning, never an error: saved data that
    /// cannot be read is treated as no saved data.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                return Self {
                    cards: Vec::new(),
                    path: Some(path.to_path_buf()),
                };
            }
        };
        let cards = match serde_json::from_str::<Vec<Card>>(&raw) {
            Ok(cards) => cards,
            Err(err) => {
                eprintln!(
                    "warning: failed to parse deck {}: {}; starting empty",
                    path.display(),
                    err
                );
                Vec::new()
            }
        };
        Self {
            cards,
            path: Some(path.to_path_buf()),
        }
    }

    /// Rewrite the whole deck file. Every mutating command saves the full
    /// array; there is no incremental update path.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to write deck file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.cards)
            .context("failed to serialize deck")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Next card id: ids are monotonic in creation order.
    pub fn next_id(&self) -> u64 {
        self.cards.iter().map(|c| c.id).max().map_or(1, |id| id + 1)
    }

    pub fn find(&self, id: u64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Append a new card built from raw input.
    pub fn add_card(&mut self, question: &str, answer: &str, choice: MergeChoice) -> Result<&Card> {
        let card = Card::from_input(self.next_id(), question, answer, choice)?;
        self.cards.push(card);
        Ok(self.cards.last().expect("card was just pushed"))
    }

    /// Edit a card in place. `None` keeps the current field value. The
    /// merge is re-resolved against the new text length, so a merged card
    /// that shrinks below the threshold loses its merge here.
    pub fn update_card(
        &mut self,
        id: u64,
        question: Option<&str>,
        answer: Option<&str>,
        choice: MergeChoice,
    ) -> Result<&Card> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("no card with id {}", id))?;
        let question = match question {
            Some(q) => q.trim().to_string(),
            None if card.question == NO_QUESTION => String::new(),
            None => card.question.clone(),
        };
        let answer = match answer {
            Some(a) => a.trim().to_string(),
            None if card.answer == NO_ANSWER => String::new(),
            None => card.answer.clone(),
        };
        if question.is_empty() && answer.is_empty() {
            return Err(anyhow!("card needs at least a question or an answer"));
        }
        card.question = normalize(&question, NO_QUESTION);
        card.answer = normalize(&answer, NO_ANSWER);
        let len = card.effective_len();
        card.merge = merge::resolve_merge(card.merge, choice, len, MERGE_THRESHOLD);
        Ok(card)
    }

    /// Remove a card by id, returning it.
    pub fn delete_card(&mut self, id: u64) -> Result<Card> {
        let idx = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| anyhow!("no card with id {}", id))?;
        Ok(self.cards.remove(idx))
    }

    /// Drop every card.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Append already-validated cards (import path), renumbering them so
    /// ids stay monotonic within this deck.
    pub fn extend_imported(&mut self, cards: Vec<Card>) {
        let mut id = self.next_id();
        for mut card in cards {
            card.id = id;
            id += 1;
            self.cards.push(card);
        }
    }

    /// SHA-256 fingerprint of deck contents, shown by `deck info`.
    pub fn hash(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        let buffer = serde_json::to_vec(&self.cards).context("failed to hash deck")?;
        hasher.update(&buffer);
        let digest = hasher.finalize();
        Ok(format!("{digest:x}"))
    }
}
