//! OCR token and page representations.
//!
//! A [`Token`] is one OCR-recognized word: its text as recognized, an
//! optional confidence, and an axis-aligned quadrilateral box. Tokens are
//! immutable once created; normalization for matching happens on the fly
//! and never rewrites the stored text.

use crate::geometry::{quad_from_xywh, Quad, Rect};
use serde::{Deserialize, Serialize};

/// One OCR-recognized word with its bounding box and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Recognized text, exactly as the OCR engine produced it
    pub text: String,
    /// Recognition confidence in `[0, 100]`, if the engine reported one
    pub confidence: Option<f32>,
    /// Axis-aligned quadrilateral box in page pixel coordinates
    #[serde(rename = "bbox")]
    pub quad: Quad,
}

impl Token {
    /// Create a token from text, optional confidence, and a quad box.
    pub fn new(text: impl Into<String>, confidence: Option<f32>, quad: Quad) -> Self {
        Self {
            text: text.into(),
            confidence,
            quad,
        }
    }

    /// Rectangular hull of the token's quad.
    pub fn rect(&self) -> Rect {
        Rect::from_quad(&self.quad)
    }
}

/// One page's OCR output: tokens in production order plus page dimensions.
///
/// Token order is the order the OCR engine emitted them, not layout order;
/// layout order is derived per extraction call by [`crate::layout`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Tokens in OCR production order
    #[serde(rename = "items")]
    pub tokens: Vec<Token>,
    /// Page width in pixels
    pub width: i32,
    /// Page height in pixels
    pub height: i32,
}

impl Page {
    /// Create a page from pre-built tokens.
    pub fn new(tokens: Vec<Token>, width: i32, height: i32) -> Self {
        Self {
            tokens,
            width,
            height,
        }
    }

    /// Build a page from word-level OCR records as engines report them:
    /// `(text, confidence, x, y, w, h)` per word.
    ///
    /// Words with empty (post-trim) text or non-positive dimensions are
    /// skipped, matching what a word-box OCR dump contains after cleanup.
    pub fn from_ocr_words<S: AsRef<str>>(
        words: impl IntoIterator<Item = (S, Option<f32>, i32, i32, i32, i32)>,
        width: i32,
        height: i32,
    ) -> Self {
        let tokens = words
            .into_iter()
            .filter_map(|(text, conf, x, y, w, h)| {
                let text = text.as_ref().trim();
                if text.is_empty() || w <= 0 || h <= 0 {
                    return None;
                }
                Some(Token::new(text, conf, quad_from_xywh(x, y, w, h)))
            })
            .collect();
        Self {
            tokens,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rect() {
        let t = Token::new("word", Some(91.0), quad_from_xywh(10, 20, 40, 12));
        assert_eq!(t.rect(), Rect::new(10, 20, 50, 32));
    }

    #[test]
    fn test_from_ocr_words_skips_empty_and_degenerate() {
        let page = Page::from_ocr_words(
            vec![
                ("Name", Some(95.0), 10, 10, 50, 14),
                ("   ", Some(10.0), 70, 10, 20, 14),
                ("x", None, 100, 10, 0, 14),
                ("Ram", Some(88.0), 120, 10, 30, 14),
            ],
            1000,
            1400,
        );
        assert_eq!(page.tokens.len(), 2);
        assert_eq!(page.tokens[0].text, "Name");
        assert_eq!(page.tokens[1].text, "Ram");
    }
}
