//! Signature detection: anchor-aware scribble heuristic.
//!
//! Handwriting produces locally dense, high-frequency strokes that printed
//! text and ruled lines do not. Candidate regions are taken to the
//! right/below of every token containing "signature" or "thumb", plus a
//! fixed bottom-quarter fallback; a region whose Canny edge density
//! crosses the threshold is kept and tightened to the bounding rectangle
//! of its edge pixels.

use crate::detect::{merge_overlapping, DetectorConfig, SignatureRegion};
use crate::geometry::Rect;
use crate::normalize::normalize;
use crate::token::Token;
use image::RgbImage;
use imageproc::edges::canny;

/// Candidate regions around signature-labelled tokens plus the
/// bottom-quarter fallback, clamped to the page.
fn candidate_regions(tokens: &[Token], page_w: i32, page_h: i32) -> Vec<Rect> {
    let mut regions = Vec::new();
    for token in tokens {
        let t = normalize(&token.text);
        if t.contains("signature") || t.contains("thumb") {
            let r = token.rect();
            regions.push(Rect::new(
                (r.x1 + 10).min(page_w - 1),
                (r.y0 - 40).max(0),
                (r.x1 + page_w / 4).min(page_w - 1),
                (r.y1 + 80).min(page_h - 1),
            ));
        }
    }
    // Signatures sit at the bottom of the form even when the label token
    // was mis-OCR'd.
    regions.push(Rect::new(
        page_w / 10,
        page_h * 3 / 4,
        page_w * 9 / 10,
        page_h * 98 / 100,
    ));
    regions
}

/// Detect stroke-bearing regions on a page image.
///
/// Surviving regions are deduplicated by pairwise overlap (more than
/// `signature_merge_overlap` of the smaller area), keeping the higher
/// edge density. Presence of any surviving region is what sets the
/// document's signature flag; the text fallback lives with field
/// extraction, not here.
pub fn detect_signatures(
    image: &RgbImage,
    tokens: &[Token],
    cfg: &DetectorConfig,
) -> Vec<SignatureRegion> {
    let (page_w, page_h) = (image.width() as i32, image.height() as i32);
    let gray = image::imageops::grayscale(image);

    let mut found = Vec::new();
    for region in candidate_regions(tokens, page_w, page_h) {
        let (w, h) = (region.width(), region.height());
        if w <= 0 || h <= 0 {
            continue;
        }
        let roi =
            image::imageops::crop_imm(&gray, region.x0 as u32, region.y0 as u32, w as u32, h as u32)
                .to_image();
        let edges = canny(&roi, cfg.canny_low, cfg.canny_high + 20.0);
        let edge_pixels: Vec<(i32, i32)> = edges
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 0)
            .map(|(x, y, _)| (x as i32, y as i32))
            .collect();
        let density = edge_pixels.len() as f64 / (w as f64 * h as f64);
        if density <= cfg.signature_density_threshold {
            continue;
        }

        // Tighten to the edge-pixel bounding rect; a handful of pixels
        // means the density came from a stray line, not a scribble.
        if edge_pixels.len() <= 10 {
            continue;
        }
        let min_x = edge_pixels.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let max_x = edge_pixels.iter().map(|&(x, _)| x).max().unwrap_or(0);
        let min_y = edge_pixels.iter().map(|&(_, y)| y).min().unwrap_or(0);
        let max_y = edge_pixels.iter().map(|&(_, y)| y).max().unwrap_or(0);
        let pad = cfg.signature_pad;
        let rect = Rect::new(
            (region.x0 + min_x - pad).max(0),
            (region.y0 + min_y - pad).max(0),
            (region.x0 + max_x + pad).min(page_w - 1),
            (region.y0 + max_y + pad).min(page_h - 1),
        );
        found.push(SignatureRegion {
            rect,
            edge_density: density,
        });
    }

    merge_overlapping(
        found,
        |s| s.rect,
        |s| s.edge_density,
        cfg.signature_merge_overlap,
    )
}
