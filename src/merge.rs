//! Merge policy: decides whether a card needs two cells and in which
//! direction, based on the markup-stripped length of its text.
//!
//! Merge state is never trusted once text changes. Every edit and every
//! import re-runs [`resolve_merge`], so a card cannot stay merged after its
//! text shrinks back under the threshold.

use crate::deck::MergeType;

/// Character-count cutoff above which a card is considered too long for a
/// single cell.
pub const MERGE_THRESHOLD: usize = 450;

/// User-facing merge selection for add/update/import flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeChoice {
    /// Keep the existing merge, inferring one when the card first crosses
    /// the threshold.
    #[default]
    Auto,
    /// Keep the card in one cell and rely on the fitter to shrink the text.
    Single,
    Down,
    Right,
}

/// Remove markup tags so they do not count toward the visual-fit decision.
///
/// Card text may carry lightweight HTML from rich-text editing. Anything
/// between `<` and `>` is dropped; an unterminated tag is dropped to end of
/// input.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Length of the text as the reader sees it, markup excluded.
pub fn effective_len(text: &str) -> usize {
    strip_markup(text).chars().count()
}

/// True when text of this length does not fit a single cell.
///
/// Monotonic: once a length needs a merge, every greater length does too.
pub fn needs_merge(len: usize, threshold: usize) -> bool {
    len > threshold
}

/// Resolve the stored merge for a card given its current text length.
///
/// Below the threshold the result is always `None`, regardless of what the
/// user picked or what was stored before. Above it, an explicit choice wins;
/// `Auto` keeps whatever the card already had, defaulting to `Down` for
/// cards crossing the threshold for the first time.
pub fn resolve_merge(
    existing: Option<MergeType>,
    choice: MergeChoice,
    len: usize,
    threshold: usize,
) -> Option<MergeType> {
    if !needs_merge(len, threshold) {
        return None;
    }
    match choice {
        MergeChoice::Single => None,
        MergeChoice::Down => Some(MergeType::Down),
        MergeChoice::Right => Some(MergeType::Right),
        MergeChoice::Auto => existing.or(Some(MergeType::Down)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strip_markup_drops_tags_keeps_text() {
        assert_eq!(strip_markup("<b>bold</b> and plain"), "bold and plain");
        assert_eq!(strip_markup("no markup"), "no markup");
        assert_eq!(strip_markup("<ul><li>a</li></ul>"), "a");
    }

    #[test]
    fn strip_markup_unterminated_tag_drops_tail() {
        assert_eq!(strip_markup("head<b unterminated"), "head");
    }

    #[test]
    fn effective_len_counts_chars_not_bytes() {
        assert_eq!(effective_len("héllo"), 5);
        assert_eq!(effective_len("<i>héllo</i>"), 5);
    }

    #[test]
    fn needs_merge_is_monotonic() {
        let threshold = MERGE_THRESHOLD;
        let mut crossed = false;
        for len in 0..=(threshold * 2) {
            let needed = needs_merge(len, threshold);
            if crossed {
                assert!(needed, "needs_merge regressed at len {len}");
            }
            crossed = crossed || needed;
        }
        assert!(crossed);
    }

    #[test]
    fn threshold_boundary_is_strict() {
        assert!(!needs_merge(MERGE_THRESHOLD, MERGE_THRESHOLD));
        assert!(needs_merge(MERGE_THRESHOLD + 1, MERGE_THRESHOLD));
    }

    #[test]
    fn resolve_clears_merge_below_threshold() {
        let resolved = resolve_merge(Some(MergeType::Down), MergeChoice::Auto, 10, 450);
        assert_eq!(resolved, None);
        // Explicit requests cannot keep a merge alive either.
        let resolved = resolve_merge(Some(MergeType::Right), MergeChoice::Right, 10, 450);
        assert_eq!(resolved, None);
    }

    #[test]
    fn resolve_clear_is_idempotent() {
        let first = resolve_merge(Some(MergeType::Down), MergeChoice::Auto, 100, 450);
        let second = resolve_merge(first, MergeChoice::Auto, 100, 450);
        assert_eq!(first, None);
        assert_eq!(second, None);
    }

    #[test]
    fn resolve_honors_explicit_choice_above_threshold() {
        assert_eq!(
            resolve_merge(None, MergeChoice::Right, 500, 450),
            Some(MergeType::Right)
        );
        assert_eq!(resolve_merge(Some(MergeType::Down), MergeChoice::Single, 500, 450), None);
    }

    #[test]
    fn resolve_auto_keeps_existing_or_infers_down() {
        assert_eq!(
            resolve_merge(Some(MergeType::Right), MergeChoice::Auto, 500, 450),
            Some(MergeType::Right)
        );
        assert_eq!(
            resolve_merge(None, MergeChoice::Auto, 500, 450),
            Some(MergeType::Down)
        );
    }
}
