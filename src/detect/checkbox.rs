//! Checkbox detection: small near-square contours with an ink-fill ratio.
//!
//! Candidates come from a Canny edge map: external contours approximated
//! down to 4-vertex convex polygons within the configured side and aspect
//! bounds. Each candidate's interior is binarized with Otsu's threshold to
//! measure how much ink it holds, and the nearest OCR word within a
//! page-scaled radius is attached as a label hint for yes/no resolution.

use crate::detect::{merge_overlapping, Checkbox, DetectorConfig};
use crate::normalize::normalize;
use crate::token::Token;
use image::{GrayImage, RgbImage};
use imageproc::contours::find_contours;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

/// Whether a closed polygon is convex: the cross products of consecutive
/// edge pairs never change sign.
fn is_convex(points: &[Point<i32>]) -> bool {
    if points.len() < 4 {
        return false;
    }
    let n = points.len();
    let mut sign = 0i64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let cross = i64::from(b.x - a.x) * i64::from(c.y - b.y)
            - i64::from(b.y - a.y) * i64::from(c.x - b.x);
        if cross != 0 {
            if sign != 0 && (cross > 0) != (sign > 0) {
                return false;
            }
            sign = cross;
        }
    }
    true
}

fn bounding_rect(points: &[Point<i32>]) -> crate::geometry::Rect {
    let xs = points.iter().map(|p| p.x);
    let ys = points.iter().map(|p| p.y);
    crate::geometry::Rect::new(
        xs.clone().min().unwrap_or(0),
        ys.clone().min().unwrap_or(0),
        xs.max().unwrap_or(0),
        ys.max().unwrap_or(0),
    )
}

/// Interior ink fraction of a box: pixels at or below the Otsu threshold
/// of the box's own gray histogram, over the box area.
fn fill_ratio(gray: &GrayImage, rect: &crate::geometry::Rect) -> f64 {
    let (w, h) = (rect.width(), rect.height());
    if w <= 0 || h <= 0 {
        return 0.0;
    }
    let roi = image::imageops::crop_imm(gray, rect.x0 as u32, rect.y0 as u32, w as u32, h as u32)
        .to_image();
    let level = imageproc::contrast::otsu_level(&roi);
    let dark = roi.pixels().filter(|p| p.0[0] <= level).count();
    dark as f64 / (w as f64 * h as f64)
}

/// Detect checkboxes on a page image.
///
/// `tokens` supplies the OCR words used for nearest-label assignment.
/// Overlapping duplicates (more than `checkbox_merge_overlap` of the
/// smaller box) are merged keeping the higher-fill-ratio box's attributes.
pub fn detect_checkboxes(
    image: &RgbImage,
    tokens: &[Token],
    cfg: &DetectorConfig,
) -> Vec<Checkbox> {
    let (page_w, page_h) = (image.width() as i32, image.height() as i32);
    let gray = image::imageops::grayscale(image);
    let blurred = gaussian_blur_f32(&gray, 1.0);
    let edges = canny(&blurred, cfg.canny_low, cfg.canny_high);
    let contours = find_contours::<i32>(&edges);

    // Nearest-label index over normalized word centers
    let words: Vec<(crate::geometry::Rect, String)> = tokens
        .iter()
        .map(|t| (t.rect(), normalize(&t.text)))
        .filter(|(_, text)| !text.is_empty())
        .collect();
    let radius = f64::from(page_w.max(page_h)) * cfg.label_radius_ratio;
    let radius_sq = (radius * radius) as i64;

    let mut candidates = Vec::new();
    for contour in &contours {
        if contour.points.len() < 4 {
            continue;
        }
        let eps = 0.04 * arc_length(&contour.points, true);
        let approx = approximate_polygon_dp(&contour.points, eps, true);
        if approx.len() != 4 || !is_convex(&approx) {
            continue;
        }
        let rect = bounding_rect(&approx);
        let (bw, bh) = (rect.width(), rect.height());
        if bw < cfg.checkbox_min_side
            || bh < cfg.checkbox_min_side
            || bw > cfg.checkbox_max_side
            || bh > cfg.checkbox_max_side
        {
            continue;
        }
        let aspect = f64::from(bw) / f64::from(bh);
        if aspect < cfg.checkbox_min_aspect || aspect > cfg.checkbox_max_aspect {
            continue;
        }

        let ratio = fill_ratio(&gray, &rect);
        let near_label = words
            .iter()
            .filter(|(wr, _)| rect.center_distance_sq(wr) < radius_sq)
            .min_by_key(|(wr, _)| rect.center_distance_sq(wr))
            .map(|(_, text)| text.clone());

        candidates.push(Checkbox {
            rect,
            filled: ratio > cfg.checkbox_fill_threshold,
            fill_ratio: ratio,
            near_label,
        });
    }

    if candidates.is_empty() {
        log::debug!("no checkbox candidates on page");
    }
    merge_overlapping(candidates, |c| c.rect, |c| c.fill_ratio, cfg.checkbox_merge_overlap)
}
