//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use flashdeck::{MergeChoice, SheetImageStyle};

/// Merge selector accepted by card commands.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum MergeArg {
    /// Keep the card in a single cell and shrink the text to fit.
    None,
    Down,
    Right,
}

impl From<MergeArg> for MergeChoice {
    fn from(value: MergeArg) -> MergeChoice {
        match value {
            MergeArg::None => MergeChoice::Single,
            MergeArg::Down => MergeChoice::Down,
            MergeArg::Right => MergeChoice::Right,
        }
    }
}

/// Convert an optional CLI flag into a merge choice, defaulting to the
/// policy's automatic resolution.
pub fn merge_choice(arg: Option<MergeArg>) -> MergeChoice {
    arg.map(MergeChoice::from).unwrap_or(MergeChoice::Auto)
}

/// Styles available for PNG sheet previews.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SheetStyleArg {
    Plain,
    Guides,
}

impl std::fmt::Display for SheetStyleArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetStyleArg::Plain => write!(f, "plain"),
            SheetStyleArg::Guides => write!(f, "guides"),
        }
    }
}

impl From<SheetStyleArg> for SheetImageStyle {
    fn from(value: SheetStyleArg) -> SheetImageStyle {
        match value {
            SheetStyleArg::Plain => SheetImageStyle::Plain,
            SheetStyleArg::Guides => SheetImageStyle::Guides,
        }
    }
}
