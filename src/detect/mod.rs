//! Visual heuristic detectors: checkbox fill, signature scribble, stamp blobs.
//!
//! The pixel-level primitives (edge maps, contours, thresholding, blurs)
//! come from `image`/`imageproc`; this module owns the policy built on top
//! of them: which candidates survive, how duplicates merge, and which
//! thresholds decide filled/present. All thresholds live in one
//! [`DetectorConfig`] record so tests can exercise boundary values.
//!
//! Detectors run independently of text extraction. In an OCR-only
//! deployment the caller supplies an empty [`DetectedShapes`]; downstream
//! consumers must treat empty collections identically to "detector not
//! run" and fall back to text-only heuristics.

pub mod checkbox;
pub mod signature;
pub mod stamp;

pub use checkbox::detect_checkboxes;
pub use signature::detect_signatures;
pub use stamp::detect_stamps;

use crate::geometry::Rect;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Thresholds and windows for all three detectors, with documented defaults.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Canny low threshold for checkbox/signature edge maps
    pub canny_low: f32,
    /// Canny high threshold for checkbox/signature edge maps
    pub canny_high: f32,
    /// Minimum checkbox side length in pixels
    pub checkbox_min_side: i32,
    /// Maximum checkbox side length in pixels
    pub checkbox_max_side: i32,
    /// Minimum width/height aspect ratio for a checkbox candidate
    pub checkbox_min_aspect: f64,
    /// Maximum width/height aspect ratio for a checkbox candidate
    pub checkbox_max_aspect: f64,
    /// Interior ink fraction above which a checkbox counts as filled
    pub checkbox_fill_threshold: f64,
    /// Pairwise overlap (fraction of the smaller box) that merges duplicates
    pub checkbox_merge_overlap: f64,
    /// Nearest-label search radius as a fraction of max(page width, height)
    pub label_radius_ratio: f64,
    /// Edge density above which a region counts as stroke-bearing
    pub signature_density_threshold: f64,
    /// Padding applied when tightening a signature box to its edge pixels
    pub signature_pad: i32,
    /// Pairwise overlap (fraction of the smaller box) that dedupes signatures
    pub signature_merge_overlap: f64,
    /// Minimum contour area for a stamp blob
    pub stamp_min_area: f64,
    /// Minimum circularity (`4*pi*area / perimeter^2`) for a stamp blob
    pub stamp_min_circularity: f64,
    /// Minimum HSV saturation for stamp color masks
    pub stamp_saturation_min: u8,
    /// Minimum HSV value for stamp color masks
    pub stamp_value_min: u8,
    /// Cap on recognized stamp text length
    pub stamp_text_cap: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            canny_low: 80.0,
            canny_high: 160.0,
            checkbox_min_side: 10,
            checkbox_max_side: 100,
            checkbox_min_aspect: 0.7,
            checkbox_max_aspect: 1.3,
            checkbox_fill_threshold: 0.25,
            checkbox_merge_overlap: 0.3,
            label_radius_ratio: 0.1,
            signature_density_threshold: 0.08,
            signature_pad: 6,
            signature_merge_overlap: 0.2,
            stamp_min_area: 800.0,
            stamp_min_circularity: 0.2,
            stamp_saturation_min: 80,
            stamp_value_min: 80,
            stamp_text_cap: 200,
        }
    }
}

/// A detected checkbox with its fill state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkbox {
    /// Bounding rectangle
    pub rect: Rect,
    /// Whether the interior ink fraction exceeds the fill threshold
    pub filled: bool,
    /// Interior ink fraction in `[0, 1]`
    pub fill_ratio: f64,
    /// Normalized text of the nearest OCR word within the label radius
    pub near_label: Option<String>,
}

/// A detected stroke-bearing (signature/thumb-impression) region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureRegion {
    /// Bounding rectangle, tightened to the edge pixels
    pub rect: Rect,
    /// Edge-pixel density of the candidate region
    pub edge_density: f64,
}

/// Stamp ink color, matched by disjoint hue masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampColor {
    /// Red hue ranges (split to span the hue wraparound)
    Red,
    /// Blue hue range
    Blue,
}

/// A detected stamp blob with the text recognized inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    /// Ink color
    pub color: StampColor,
    /// Bounding rectangle
    pub rect: Rect,
    /// Concatenated recognized text, capped in length
    pub text: String,
    /// Mean confidence of the recognized words, 0.0 when none
    pub avg_confidence: f32,
}

/// All page-scoped shapes the detectors produce.
///
/// Empty collections mean "detector not run"; consumers must not
/// distinguish that from "ran and found nothing".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedShapes {
    /// Detected checkboxes, deduplicated by overlap
    pub checkboxes: Vec<Checkbox>,
    /// Detected signature regions, deduplicated by overlap
    pub signatures: Vec<SignatureRegion>,
    /// Detected stamps (red and blue, no cross-color dedupe)
    pub stamps: Vec<Stamp>,
}

/// OCR collaborator confined to a page region, used by the stamp detector.
///
/// Returns `(text, confidence)` word records for the region. An OCR-only
/// deployment without region re-recognition simply runs the stamp detector
/// with no engine; stamps then carry empty text.
pub trait RegionOcr {
    /// Recognize words within `region` of `image`.
    fn recognize_region(&mut self, image: &RgbImage, region: Rect) -> Vec<(String, Option<f32>)>;
}

/// Merge overlapping duplicate shapes, keeping the higher-scoring shape's
/// attributes whenever a pair overlaps more than `threshold` of the
/// smaller box's area.
///
/// Order-dependent by design: candidates are compared against the already
/// accepted set in production order, matching the detectors' tuning.
pub(crate) fn merge_overlapping<T: Clone>(
    candidates: Vec<T>,
    rect_of: impl Fn(&T) -> Rect,
    score_of: impl Fn(&T) -> f64,
    threshold: f64,
) -> Vec<T> {
    let mut merged: Vec<T> = Vec::new();
    for cand in candidates {
        let cand_rect = rect_of(&cand);
        let mut absorbed = false;
        for kept in merged.iter_mut() {
            if cand_rect.overlap_of_smaller(&rect_of(kept)) > threshold {
                if score_of(&cand) > score_of(kept) {
                    *kept = cand.clone();
                }
                absorbed = true;
                break;
            }
        }
        if !absorbed {
            merged.push(cand);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cb(x0: i32, y0: i32, x1: i32, y1: i32, fill: f64) -> Checkbox {
        Checkbox {
            rect: Rect::new(x0, y0, x1, y1),
            filled: fill > 0.25,
            fill_ratio: fill,
            near_label: None,
        }
    }

    #[test]
    fn test_merge_keeps_higher_score() {
        let merged = merge_overlapping(
            vec![cb(0, 0, 20, 20, 0.1), cb(2, 2, 22, 22, 0.9)],
            |c| c.rect,
            |c| c.fill_ratio,
            0.3,
        );
        assert_eq!(merged.len(), 1);
        assert!((merged[0].fill_ratio - 0.9).abs() < 1e-9);
        assert!(merged[0].filled);
    }

    #[test]
    fn test_merge_keeps_disjoint() {
        let merged = merge_overlapping(
            vec![cb(0, 0, 20, 20, 0.5), cb(100, 100, 120, 120, 0.5)],
            |c| c.rect,
            |c| c.fill_ratio,
            0.3,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_below_threshold_not_absorbed() {
        // ~10% overlap of the smaller box
        let merged = merge_overlapping(
            vec![cb(0, 0, 20, 20, 0.5), cb(18, 18, 38, 38, 0.6)],
            |c| c.rect,
            |c| c.fill_ratio,
            0.3,
        );
        assert_eq!(merged.len(), 2);
    }
}
