//! Stamp detection: red/blue roundish ink blobs with confined OCR.
//!
//! The page is thresholded into red and blue HSV masks (red uses two hue
//! ranges to span the hue wraparound), each mask is morphologically
//! cleaned, and external contours large and round enough survive. OCR is
//! then run confined to each surviving box through the [`RegionOcr`]
//! collaborator. A region cannot match both masks, so no cross-color
//! deduplication is needed.

use crate::detect::{DetectorConfig, RegionOcr, Stamp, StampColor};
use crate::geometry::Rect;
use image::{GrayImage, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::geometry::arc_length;
use imageproc::morphology::open;
use imageproc::point::Point;

/// RGB to HSV with OpenCV-style ranges: hue in `[0, 180)`, saturation and
/// value in `[0, 255]`.
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    );
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let hue_deg = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (((gf - bf) / delta).rem_euclid(6.0))
    } else if max == gf {
        60.0 * ((bf - rf) / delta + 2.0)
    } else {
        60.0 * ((rf - gf) / delta + 4.0)
    };
    let h = (hue_deg / 2.0).round() as u8; // 0..180
    let s = if max == 0.0 {
        0
    } else {
        (delta / max * 255.0).round() as u8
    };
    let v = (max * 255.0).round() as u8;
    (h, s, v)
}

/// Binary mask of pixels whose hue falls in any of the given ranges and
/// whose saturation/value clear the ink floor.
fn hue_mask(image: &RgbImage, ranges: &[(u8, u8)], cfg: &DetectorConfig) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let (h, s, v) = rgb_to_hsv(p.0[0], p.0[1], p.0[2]);
        let in_hue = ranges.iter().any(|&(lo, hi)| h >= lo && h <= hi);
        if in_hue && s >= cfg.stamp_saturation_min && v >= cfg.stamp_value_min {
            image::Luma([255u8])
        } else {
            image::Luma([0u8])
        }
    })
}

/// Polygon area by the shoelace formula.
fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0i64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
    }
    (sum.abs() as f64) / 2.0
}

fn bounding_rect(points: &[Point<i32>]) -> Rect {
    let xs = points.iter().map(|p| p.x);
    let ys = points.iter().map(|p| p.y);
    Rect::new(
        xs.clone().min().unwrap_or(0),
        ys.clone().min().unwrap_or(0),
        xs.max().unwrap_or(0),
        ys.max().unwrap_or(0),
    )
}

fn stamps_in_mask(
    image: &RgbImage,
    mask: &GrayImage,
    color: StampColor,
    ocr: &mut Option<&mut dyn RegionOcr>,
    cfg: &DetectorConfig,
) -> Vec<Stamp> {
    let cleaned = open(mask, Norm::LInf, 2);
    let mut stamps = Vec::new();
    for contour in find_contours::<i32>(&cleaned) {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let area = contour_area(&contour.points);
        if area < cfg.stamp_min_area {
            continue;
        }
        let perimeter = arc_length(&contour.points, true);
        if perimeter <= 0.0 {
            continue;
        }
        let circularity = 4.0 * std::f64::consts::PI * area / (perimeter * perimeter);
        if circularity < cfg.stamp_min_circularity {
            continue;
        }
        let rect = bounding_rect(&contour.points);

        let (text, avg_confidence) = match ocr {
            Some(engine) => {
                let words = engine.recognize_region(image, rect);
                let confs: Vec<f32> = words.iter().filter_map(|(_, c)| *c).collect();
                let avg = if confs.is_empty() {
                    0.0
                } else {
                    confs.iter().sum::<f32>() / confs.len() as f32
                };
                let mut joined = words
                    .iter()
                    .map(|(t, _)| t.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                joined.truncate(
                    (0..=cfg.stamp_text_cap.min(joined.len()))
                        .rev()
                        .find(|&i| joined.is_char_boundary(i))
                        .unwrap_or(0),
                );
                (joined, avg)
            },
            None => (String::new(), 0.0),
        };

        stamps.push(Stamp {
            color,
            rect,
            text,
            avg_confidence,
        });
    }
    stamps
}

/// Detect red and blue stamps on a page image.
///
/// `ocr` is the optional confined-region OCR collaborator; without one,
/// stamps are located but carry empty text and zero confidence.
pub fn detect_stamps(
    image: &RgbImage,
    mut ocr: Option<&mut dyn RegionOcr>,
    cfg: &DetectorConfig,
) -> Vec<Stamp> {
    // Red spans the hue wraparound, so it needs two disjoint ranges.
    let red_mask = hue_mask(image, &[(0, 10), (160, 180)], cfg);
    let blue_mask = hue_mask(image, &[(90, 130)], cfg);

    let mut stamps = stamps_in_mask(image, &red_mask, StampColor::Red, &mut ocr, cfg);
    stamps.extend(stamps_in_mask(image, &blue_mask, StampColor::Blue, &mut ocr, cfg));
    log::debug!("detected {} stamp blob(s)", stamps.len());
    stamps
}
