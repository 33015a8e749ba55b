//! Builtin PDF font metrics used to measure text for alignment.

use std::borrow::Cow;

/// The two standard fonts the invoice uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

const FALLBACK_WIDTH: u16 = 556;

// Advance widths (1/1000 em) for printable ASCII 0x20..=0x7E, from the
// standard Adobe font metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl Font {
    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Self::Helvetica => &HELVETICA_WIDTHS,
            Self::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of `ch`; zero for characters the builtin fonts cannot
    /// encode, since those are never drawn.
    pub fn char_width(&self, ch: char) -> u16 {
        match ch as u32 {
            code @ 0x20..=0x7e => self.widths()[(code - 0x20) as usize],
            _ if is_winansi(ch) => FALLBACK_WIDTH,
            _ => 0,
        }
    }
}

// Code points WinAnsiEncoding places in 0x80..=0x9F.
const WINANSI_EXTRAS: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

/// True when `ch` survives WinAnsiEncoding, the encoding printpdf uses for
/// builtin fonts.
pub fn is_winansi(ch: char) -> bool {
    matches!(ch as u32, 0x20..=0x7e | 0xa0..=0xff) || WINANSI_EXTRAS.contains(&ch)
}

/// `text` without the characters a builtin font would silently drop.
pub fn winansi_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_winansi) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_winansi(*c)).collect())
    }
}

/// Width of `text` in points when set in `font` at `size`.
pub fn string_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| font.char_width(c) as u32).sum();
    units as f32 * size / 1000.0
}
