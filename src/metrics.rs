//! Static character-width metrics for the card face font.
//!
//! The browser-era version of this tool asked the rendering surface whether
//! text overflowed its box. Here the overflow question is answered
//! deterministically: a width table in em units (relative to font size) plus
//! greedy word wrap. Widths approximate a humanist sans-serif; the table
//! covers ASCII 0x20..=0x7E, everything else falls back to an average width.

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.3;

/// Character-width table in em units at 1em.
/// `widths[i]` = width of ASCII character `(i + 32)`.
pub struct FontTable {
    widths: [f32; 95],
    /// Fallback for codepoints outside 0x20..=0x7E.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontTable {
    /// Rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Number of printed lines this text occupies when word-wrapped into a
    /// line of `max_width_em` em units. Greedy wrap: a word that does not
    /// fit the remainder of the line starts a new one. Explicit newlines
    /// force a break. Empty text occupies zero lines.
    pub fn wrapped_lines(&self, text: &str, max_width_em: f32) -> usize {
        let mut total = 0usize;
        for paragraph in text.split('\n') {
            let words: Vec<&str> = paragraph.split_whitespace().collect();
            if words.is_empty() {
                // A blank line still takes vertical space between paragraphs.
                total += 1;
                continue;
            }
            let mut lines = 1usize;
            let mut current = 0.0f32;
            let mut first = true;
            for word in words {
                let word_w = self.measure_str(word);
                let space_w = if first { 0.0 } else { self.space_width };
                if !first && current + space_w + word_w > max_width_em {
                    lines += 1;
                    current = word_w;
                } else {
                    current += space_w + word_w;
                    first = false;
                }
            }
            total += lines;
        }
        total
    }

    /// Width of the widest unbreakable word, in em units. Greedy wrap puts
    /// an overlong word on its own line, so this is the minimum line width
    /// the text can be laid out in.
    pub fn widest_word(&self, text: &str) -> f32 {
        text.split_whitespace()
            .map(|w| self.measure_str(w))
            .fold(0.0, f32::max)
    }
}

/// Card face font: humanist sans-serif widths.
#[rustfmt::skip]
static CARD_FACE_TABLE: FontTable = FontTable {
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// The metric table used for card faces.
pub fn card_face_metrics() -> &'static FontTable {
    &CARD_FACE_TABLE
}
