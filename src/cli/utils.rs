//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flashdeck::Deck;

/// Resolve plain-text input for commands that accept either inline strings or files.
pub fn read_text_arg(text: Option<String>, from: Option<PathBuf>) -> Result<String> {
    if let Some(t) = text {
        return Ok(t);
    }
    if let Some(path) = from {
        if path.as_os_str() == "-" {
            return read_stdin();
        }
        return fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    read_stdin()
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Clap-friendly parser for the cells-per-sheet value.
pub fn parse_cells(input: &str) -> Result<usize, String> {
    let value: usize = input
        .parse()
        .map_err(|_| "cells per sheet must be a number".to_string())?;
    if value == 0 || value % 2 != 0 {
        return Err(format!(
            "cells per sheet must be an even positive integer (got {value})"
        ));
    }
    Ok(value)
}

/// Ask the user to confirm a destructive operation on stdin. `assume_yes`
/// (the `--yes` flag) skips the prompt. Declining leaves state untouched.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

/// Shorten card text for one-line listings.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Load a deck file. Missing or corrupt files come back empty, so this
/// never fails.
pub fn load_deck(path: &Path) -> Deck {
    Deck::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_cells_accepts_even_positive() {
        assert_eq!(parse_cells("4"), Ok(4));
        assert_eq!(parse_cells("8"), Ok(8));
        assert!(parse_cells("0").is_err());
        assert!(parse_cells("5").is_err());
        assert!(parse_cells("four").is_err());
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("multi\nline", 10), "multi line");
        let long = "x".repeat(30);
        let p = preview(&long, 10);
        assert_eq!(p.chars().count(), 10);
        assert!(p.ends_with('…'));
    }
}
