//! Canonical text form for matching and storage.
//!
//! OCR output from scanned forms mixes Devanagari digits, typographic
//! punctuation, zero-width joiners, and irregular spacing. Every place the
//! library compares or stores text first folds it through [`normalize`];
//! original token text is never mutated.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Regex for zero-width space/joiner/non-joiner characters
    static ref RE_ZERO_WIDTH: Regex = Regex::new(r"[\u{200b}\u{200c}\u{200d}]").unwrap();

    /// Regex for whitespace runs
    static ref RE_WS: Regex = Regex::new(r"\s+").unwrap();
}

/// Map a Devanagari digit to its ASCII equivalent, passing other chars through.
fn fold_digit(c: char) -> char {
    match c {
        '\u{0966}'..='\u{096F}' => {
            // ० .. ९
            char::from(b'0' + (c as u32 - 0x0966) as u8)
        },
        _ => c,
    }
}

/// Produce the canonical comparison form of a string.
///
/// Applies, in order: Devanagari-digit folding, Unicode NFKC, typographic
/// dash/quote folding, lowercasing, zero-width stripping, whitespace
/// collapsing, and trimming.
///
/// # Examples
///
/// ```
/// use form_harvest::normalize::normalize;
///
/// assert_eq!(normalize("  Sh.\u{200b} Ram   Kumar "), "sh. ram kumar");
/// assert_eq!(normalize("०.२५ ha"), "0.25 ha");
/// assert_eq!(normalize("“Village” — Bhilar"), "\"village\" - bhilar");
/// ```
pub fn normalize(s: &str) -> String {
    let folded: String = s.chars().map(fold_digit).collect();
    let nfkc: String = folded.nfkc().collect();
    let ascii_punct: String = nfkc
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            _ => c,
        })
        .collect();
    let lower = ascii_punct.to_lowercase();
    let no_zw = RE_ZERO_WIDTH.replace_all(&lower, "");
    RE_WS.replace_all(no_zw.trim(), " ").into_owned()
}

/// Collapse immediately-repeated whitespace-separated tokens.
///
/// OCR often recognizes a word twice when a label is printed with heavy ink;
/// `"bhilar bhilar gp"` becomes `"bhilar gp"`. Only adjacent repeats are
/// collapsed.
pub fn dedupe_adjacent_tokens(s: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for tok in s.split_whitespace() {
        if out.last() != Some(&tok) {
            out.push(tok);
        }
    }
    out.join(" ")
}
