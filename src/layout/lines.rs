//! Incremental line clustering over token vertical centers.
//!
//! Tokens are processed sorted by vertical box center; each joins the first
//! existing cluster whose running-median center is within a page-scaled
//! tolerance, else starts a new cluster. This is a single-pass, first-fit
//! assignment with no re-clustering after insertion, so the result depends
//! on processing order: ties break toward the earliest-created line. That
//! order dependence is intentional and must be preserved; downstream
//! anchor-relative windows were tuned against it.

use crate::token::Token;

/// A geometrically-clustered, left-to-right ordered group of tokens sharing
/// an approximate vertical position.
///
/// Holds indices into the token slice it was derived from; lines are
/// recomputed per extraction call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Running median of the member tokens' vertical centers
    pub y_center: i32,
    /// Member token indices, sorted by horizontal box origin
    pub tokens: Vec<usize>,
}

/// One cluster under construction: members plus the running statistic.
struct LineCluster {
    y_center: i32,
    y_values: Vec<i32>,
    tokens: Vec<usize>,
}

impl LineCluster {
    fn push(&mut self, index: usize, y: i32) {
        self.tokens.push(index);
        self.y_values.push(y);
        self.y_center = int_median(&self.y_values);
    }
}

/// Integer median: middle value for odd counts, floor of the mean of the
/// two middle values for even counts.
fn int_median(values: &[i32]) -> i32 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2
    }
}

/// Cluster tokens into ordered text lines by vertical proximity.
///
/// Vertical tolerance is `max(10, page_height * 0.02)` pixels. Returns
/// lines top-to-bottom; tokens within each line are sorted left-to-right
/// by box origin. An empty token set yields an empty line sequence.
///
/// # Examples
///
/// ```
/// use form_harvest::geometry::quad_from_xywh;
/// use form_harvest::layout::group_lines;
/// use form_harvest::token::Token;
///
/// let tokens = vec![
///     Token::new("world", None, quad_from_xywh(60, 100, 40, 14)),
///     Token::new("hello", None, quad_from_xywh(10, 102, 40, 14)),
///     Token::new("below", None, quad_from_xywh(10, 300, 40, 14)),
/// ];
/// let lines = group_lines(&tokens, 1400);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].tokens, vec![1, 0]); // left-to-right
/// ```
pub fn group_lines(tokens: &[Token], page_height: i32) -> Vec<Line> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let tolerance = (f64::from(page_height) * 0.02).max(10.0) as i32;

    let mut order: Vec<usize> = (0..tokens.len()).collect();
    order.sort_by_key(|&i| tokens[i].rect().center_y());

    let mut clusters: Vec<LineCluster> = Vec::new();
    for i in order {
        let y = tokens[i].rect().center_y();
        match clusters
            .iter_mut()
            .find(|c| (c.y_center - y).abs() <= tolerance)
        {
            Some(cluster) => cluster.push(i, y),
            None => clusters.push(LineCluster {
                y_center: y,
                y_values: vec![y],
                tokens: vec![i],
            }),
        }
    }

    log::debug!(
        "grouped {} tokens into {} lines (tolerance {}px)",
        tokens.len(),
        clusters.len(),
        tolerance
    );

    let mut lines: Vec<Line> = clusters
        .into_iter()
        .map(|mut c| {
            c.tokens.sort_by_key(|&i| tokens[i].rect().x0);
            Line {
                y_center: c.y_center,
                tokens: c.tokens,
            }
        })
        .collect();
    // Medians drift while clusters absorb tokens, so creation order is not
    // guaranteed to be monotonic.
    lines.sort_by_key(|l| l.y_center);
    lines
}

/// Index of the line whose `y_center` is nearest to `y`.
///
/// Anchors re-derive their line by proximity rather than remembering an
/// index, because line membership shifts as the running median updates.
pub fn nearest_line(lines: &[Line], y: i32) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .min_by_key(|(_, line)| (line.y_center - y).abs())
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::quad_from_xywh;

    fn tok(text: &str, x: i32, y: i32) -> Token {
        Token::new(text, Some(90.0), quad_from_xywh(x, y, 40, 14))
    }

    #[test]
    fn test_empty_tokens() {
        assert!(group_lines(&[], 1400).is_empty());
    }

    #[test]
    fn test_single_line_sorted_left_to_right() {
        let tokens = vec![tok("b", 100, 50), tok("a", 10, 52), tok("c", 200, 48)];
        let lines = group_lines(&tokens, 1400);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tokens, vec![1, 0, 2]);
    }

    #[test]
    fn test_two_lines_top_to_bottom() {
        let tokens = vec![tok("low", 10, 500), tok("high", 10, 50)];
        let lines = group_lines(&tokens, 1400);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].y_center < lines[1].y_center);
        assert_eq!(lines[0].tokens, vec![1]);
        assert_eq!(lines[1].tokens, vec![0]);
    }

    #[test]
    fn test_tolerance_scales_with_page_height() {
        // 26px apart: joined on a tall page (tol = 0.02 * 3000 = 60),
        // split on a short one (tol = max(10, 0.02 * 400) = 10).
        let tokens = vec![tok("a", 10, 100), tok("b", 60, 126)];
        assert_eq!(group_lines(&tokens, 3000).len(), 1);
        assert_eq!(group_lines(&tokens, 400).len(), 2);
    }

    #[test]
    fn test_running_median_updates() {
        // Third token only joins because the median moved toward it.
        let tokens = vec![tok("a", 10, 100), tok("b", 60, 118), tok("c", 120, 128)];
        let lines = group_lines(&tokens, 1000); // tolerance 20
        assert_eq!(lines.len(), 1);
        // median of {100, 118} = 109; |109 - 128| <= 20 -> joined
        assert_eq!(lines[0].tokens.len(), 3);
    }

    #[test]
    fn test_int_median() {
        assert_eq!(int_median(&[5]), 5);
        assert_eq!(int_median(&[10, 11]), 10);
        assert_eq!(int_median(&[3, 1, 2]), 2);
        assert_eq!(int_median(&[4, 1, 3, 2]), 2);
    }

    #[test]
    fn test_nearest_line() {
        let tokens = vec![tok("a", 10, 100), tok("b", 10, 500)];
        let lines = group_lines(&tokens, 1400);
        assert_eq!(nearest_line(&lines, 120), Some(0));
        assert_eq!(nearest_line(&lines, 480), Some(1));
        assert_eq!(nearest_line(&[], 0), None);
    }
}
