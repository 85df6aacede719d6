//! Windowed value collection around a field anchor.
//!
//! Printed forms put a field's value either inline after the label or on
//! the next row in the same column. Both windows are bounded so a value
//! printed far away (another column, another field) is never harvested,
//! and harvested text is truncated at the next recognized field label.
//!
//! The anchor's line is always re-derived by vertical proximity instead of
//! being remembered as an index: line membership shifts as the running
//! median updates, so a stored index can go stale.

use crate::anchors::cut_at_stop_label;
use crate::geometry::Rect;
use crate::layout::lines::{nearest_line, Line};
use crate::token::Token;
use lazy_static::lazy_static;
use regex::Regex;

/// Geometric parameters for value harvesting.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Horizontal gap (px) between the anchor's right edge and the first
    /// token considered part of the value
    pub x_gap: i32,
    /// Right-window width as a fraction of page width
    pub right_ratio: f64,
    /// Left padding (px) for the below-same-column window
    pub below_pad: i32,
    /// Right extension of the below window as a fraction of page width
    pub below_right_ratio: f64,
    /// Number of lines below the anchor scanned by the column window
    pub lines_down: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            x_gap: 6,
            right_ratio: 0.45,
            below_pad: 22,
            below_right_ratio: 0.18,
            lines_down: 2,
        }
    }
}

/// Join token texts with single spaces, in the given index order.
pub fn join_tokens(tokens: &[Token], indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| tokens[i].text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Collect tokens to the right of the anchor on its own line, falling back
/// to the next line when the same line yields nothing.
///
/// A token qualifies when its horizontal origin lies strictly right of the
/// anchor's right edge plus `x_gap`, and no further right than
/// `anchor_right + max(x_gap, page_width * right_ratio)`. The fallback is
/// single-level: only the immediately following line is retried.
pub fn collect_right_bounded(
    tokens: &[Token],
    lines: &[Line],
    anchor: &Rect,
    page_width: i32,
    cfg: &HarvestConfig,
) -> Vec<usize> {
    let Some(idx) = nearest_line(lines, anchor.center_y()) else {
        return Vec::new();
    };
    let max_x = anchor.x1 + (f64::from(page_width) * cfg.right_ratio).max(f64::from(cfg.x_gap)) as i32;

    let collect = |line: &Line| -> Vec<usize> {
        line.tokens
            .iter()
            .copied()
            .filter(|&i| {
                let x = tokens[i].rect().x0;
                x > anchor.x1 + cfg.x_gap && x <= max_x
            })
            .collect()
    };

    let mut collected = collect(&lines[idx]);
    if collected.is_empty() && idx + 1 < lines.len() {
        collected = collect(&lines[idx + 1]);
    }
    collected
}

/// Collect tokens from the lines below the anchor whose horizontal center
/// falls within the anchor's column window.
///
/// The window spans `[anchor_left - below_pad, anchor_right +
/// page_width * below_right_ratio]`, clamped to the page, over the
/// `lines_down` lines following the anchor's line.
pub fn collect_below_same_column(
    tokens: &[Token],
    lines: &[Line],
    anchor: &Rect,
    page_width: i32,
    cfg: &HarvestConfig,
) -> Vec<usize> {
    let Some(idx) = nearest_line(lines, anchor.center_y()) else {
        return Vec::new();
    };
    let x_left = (anchor.x0 - cfg.below_pad).max(0);
    let x_right =
        (anchor.x1 + (f64::from(page_width) * cfg.below_right_ratio) as i32).min(page_width - 1);

    let mut out = Vec::new();
    for line in lines.iter().skip(idx + 1).take(cfg.lines_down) {
        for &i in &line.tokens {
            let cx = tokens[i].rect().center_x();
            if (x_left..=x_right).contains(&cx) {
                out.push(i);
            }
        }
    }
    out
}

lazy_static! {
    /// Inline "label: value" remainder within the anchor token itself
    static ref RE_INLINE_COLON: Regex = Regex::new(r":\s*(.*)$").unwrap();
}

/// Harvest the value text for an anchor: right-bounded collection with the
/// next-line fallback and stop-label cut. When the window comes back empty,
/// falls back to the inline-colon remainder of the anchor token's raw text.
pub fn harvest_value(
    tokens: &[Token],
    lines: &[Line],
    anchor_index: usize,
    page_width: i32,
    cfg: &HarvestConfig,
) -> String {
    let anchor_rect = tokens[anchor_index].rect();
    let collected = collect_right_bounded(tokens, lines, &anchor_rect, page_width, cfg);
    if !collected.is_empty() {
        let text = cut_at_stop_label(&join_tokens(tokens, &collected));
        log::debug!(
            "harvested {} tokens right of anchor {}: {:?}",
            collected.len(),
            anchor_index,
            text
        );
        return text;
    }
    // OCR sometimes fuses "Label: value" into one token.
    RE_INLINE_COLON
        .captures(&tokens[anchor_index].text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
