//! JSON card import: a top-level array of objects, each carrying at least
//! one of `question`/`answer`, with an optional `mergeType` hint.
//!
//! Bad documents fail with a typed [`ImportError`]; bad entries inside a
//! good document are skipped and counted so callers can report how many
//! cards actually made it in.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::deck::Card;
use crate::merge::MergeChoice;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import file is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("import file must contain a top-level JSON array, found {0}")]
    NotAnArray(&'static str),
    #[error("import file contains an empty array; nothing to import")]
    EmptyArray,
}

/// Result of a successful parse: the accepted cards plus how many entries
/// were skipped.
#[derive(Debug)]
pub struct ImportOutcome {
    pub cards: Vec<Card>,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct ImportEntry {
    question: Option<String>,
    answer: Option<String>,
    #[serde(rename = "mergeType")]
    merge_type: Option<String>,
}

fn merge_choice(hint: Option<&str>) -> MergeChoice {
    match hint {
        Some("down") => MergeChoice::Down,
        Some("right") => MergeChoice::Right,
        // Unknown hints fall back to length-based inference.
        _ => MergeChoice::Auto,
    }
}

/// Parse an import document into cards with fresh ids and timestamps.
///
/// Entries missing both text fields are skipped with a stderr warning.
/// A stored `mergeType` is only a hint: the merge policy re-validates it
/// against the entry's actual text length.
pub fn parse_import(raw: &str) -> Result<ImportOutcome, ImportError> {
    let value: Value = serde_json::from_str(raw)?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(_) => return Err(ImportError::NotAnArray("an object")),
        Value::String(_) => return Err(ImportError::NotAnArray("a string")),
        Value::Number(_) => return Err(ImportError::NotAnArray("a number")),
        Value::Bool(_) => return Err(ImportError::NotAnArray("a boolean")),
        Value::Null => return Err(ImportError::NotAnArray("null")),
    };
    if entries.is_empty() {
        return Err(ImportError::EmptyArray);
    }

    let mut cards = Vec::new();
    let mut skipped = 0usize;
    for (idx, entry) in entries.into_iter().enumerate() {
        let entry: ImportEntry = match serde_json::from_value(entry) {
            Ok(entry) => entry,
            Err(_) => {
                eprintln!("warning: skipping import entry {}: not an object", idx + 1);
                skipped += 1;
                continue;
            }
        };
        let question = entry.question.as_deref().unwrap_or("");
        let answer = entry.answer.as_deref().unwrap_or("");
        let choice = merge_choice(entry.merge_type.as_deref());
        match Card::from_input(cards.len() as u64 + 1, question, answer, choice) {
            Ok(card) => cards.push(card),
            Err(_) => {
                eprintln!(
                    "warning: skipping import entry {}: missing both question and answer",
                    idx + 1
                );
                skipped += 1;
            }
        }
    }

    Ok(ImportOutcome { cards, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{MergeType, NO_ANSWER, NO_QUESTION};
    use crate::merge::MERGE_THRESHOLD;
    use pretty_assertions::assert_eq;

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_import("{ nope"),
            Err(ImportError::MalformedJson(_))
        ));
    }

    #[test]
    fn non_array_top_level_is_an_error() {
        assert!(matches!(
            parse_import("{\"question\": \"q\"}"),
            Err(ImportError::NotAnArray("an object"))
        ));
        assert!(matches!(
            parse_import("42"),
            Err(ImportError::NotAnArray("a number"))
        ));
    }

    #[test]
    fn empty_array_is_an_error() {
        assert!(matches!(parse_import("[]"), Err(ImportError::EmptyArray)));
    }

    #[test]
    fn valid_entries_get_placeholders_and_fresh_ids() {
        let outcome = parse_import(
            r#"[
                {"question": "q1", "answer": "a1"},
                {"question": "q2"},
                {"answer": "a3"}
            ]"#,
        )
        .unwrap();
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.cards.len(), 3);
        assert_eq!(outcome.cards[1].answer, NO_ANSWER);
        assert_eq!(outcome.cards[2].question, NO_QUESTION);
        let ids: Vec<u64> = outcome.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn entries_missing_both_fields_are_skipped() {
        let outcome = parse_import(
            r#"[
                {"question": "q1"},
                {"note": "neither field"},
                {"question": "  ", "answer": ""},
                {"answer": "a4"}
            ]"#,
        )
        .unwrap();
        assert_eq!(outcome.cards.len(), 2);
        assert_eq!(outcome.skipped, 2);
    }

    #[test]
    fn merge_hint_is_honored_when_length_warrants() {
        let long = "x".repeat(MERGE_THRESHOLD + 1);
        let raw = format!(
            r#"[{{"question": "{long}", "answer": "a", "mergeType": "right"}}]"#
        );
        let outcome = parse_import(&raw).unwrap();
        assert_eq!(outcome.cards[0].merge, Some(MergeType::Right));
    }

    #[test]
    fn merge_hint_below_threshold_is_cleared() {
        let raw = r#"[{"question": "short", "answer": "a", "mergeType": "down"}]"#;
        let outcome = parse_import(raw).unwrap();
        assert_eq!(outcome.cards[0].merge, None);
    }

    #[test]
    fn missing_merge_is_inferred_from_length() {
        let long = "x".repeat(MERGE_THRESHOLD + 1);
        let raw = format!(r#"[{{"question": "{long}", "answer": "a"}}]"#);
        let outcome = parse_import(&raw).unwrap();
        assert_eq!(outcome.cards[0].merge, Some(MergeType::Down));
    }

    #[test]
    fn unknown_merge_hint_falls_back_to_inference() {
        let raw = r#"[{"question": "short", "answer": "a", "mergeType": "sideways"}]"#;
        let outcome = parse_import(raw).unwrap();
        assert_eq!(outcome.cards[0].merge, None);
    }
}
