//! Per-page field extraction.
//!
//! Orchestrates anchor resolution, windowed harvesting, sanitization, and
//! detector-shape consumption into one [`PageFields`] record. Extraction is
//! best-effort per slot: a field that cannot be resolved stays null and
//! never fails its siblings.

use crate::anchors::{cut_at_stop_label, find_anchor, AnchorConfig, FieldKey};
use crate::detect::{Checkbox, DetectedShapes};
use crate::fields::PageFields;
use crate::harvest::{
    collect_below_same_column, harvest_value, join_tokens, HarvestConfig,
};
use crate::layout::{group_lines, Line};
use crate::normalize::normalize;
use crate::sanitize::{
    area_after_keyword, parse_members, parse_parent_names, sanitize_address,
    sanitize_gram_panchayat, sanitize_person, sanitize_required_suffix,
    sanitize_village, yes_no_near_anchor,
};
use crate::token::{Page, Token};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_HABITATION: Regex = Regex::new(r"\bhabitation[:\s]*").unwrap();
    static ref RE_SELF_CULTIVATION: Regex =
        Regex::new(r"\bself[-\s]*cultivation[:\s]*").unwrap();
    static ref RE_CHECKED_GLYPH: Regex = Regex::new(r"\[\s*[x✓✔]\s*\]").unwrap();
    static ref RE_SIGNATURE_INLINE: Regex =
        Regex::new(r"\bsignature[^:\n]*:\s*\S").unwrap();
}

/// Chars of line text scanned after an area keyword for the number+unit.
const AREA_WINDOW_CHARS: usize = 40;

/// Harvested raw value for one field, plus the anchor token index when an
/// anchor was found at all.
fn get_after(
    tokens: &[Token],
    lines: &[Line],
    anchors: &AnchorConfig,
    key: FieldKey,
    page_width: i32,
    cfg: &HarvestConfig,
) -> (String, Option<usize>) {
    let Some(idx) = find_anchor(tokens, anchors.patterns(key)) else {
        return (String::new(), None);
    };
    log::debug!("anchor {:?} -> token {} {:?}", key, idx, tokens[idx].text);
    (harvest_value(tokens, lines, idx, page_width, cfg), Some(idx))
}

/// Resolve a yes/no boolean from a checkbox pair near the anchor.
///
/// Takes the checkboxes whose vertical center falls within a band
/// `max(12, anchor_height * 1.5)` around the anchor's center. With two or
/// more, the leftmost pair decides by exclusive fill, reading the left box
/// as "yes" by position (the form family prints yes before no; the labels
/// themselves are not verified). Otherwise a filled box whose nearby label
/// contains "yes" or "no" decides.
fn bool_from_checkbox_pair(
    anchor: Option<&Token>,
    checkboxes: &[Checkbox],
) -> Option<bool> {
    let anchor_rect = anchor?.rect();
    let band = 12.max((f64::from(anchor_rect.height()) * 1.5) as i32);
    let cy = anchor_rect.center_y();

    let mut close: Vec<&Checkbox> = checkboxes
        .iter()
        .filter(|b| (b.rect.center_y() - cy).abs() <= band)
        .collect();
    if close.len() >= 2 {
        close.sort_by_key(|b| b.rect.x0);
        let (left, right) = (close[0], close[1]);
        if left.filled != right.filled {
            return Some(left.filled);
        }
    }
    for b in &close {
        if !b.filled {
            continue;
        }
        if let Some(label) = &b.near_label {
            if label.contains("yes") {
                return Some(true);
            }
            if label.contains("no") {
                return Some(false);
            }
        }
    }
    None
}

/// Whether the page text alone indicates a signature: a checked-box glyph
/// or an inline "signature ...: value" with a non-empty value.
fn signature_in_text(tokens: &[Token]) -> bool {
    let page_text = normalize(
        &tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    );
    RE_CHECKED_GLYPH.is_match(&page_text) || RE_SIGNATURE_INLINE.is_match(&page_text)
}

/// Extract all typed fields from one page.
///
/// `shapes` carries the visual detector output for the same page; pass
/// [`DetectedShapes::default()`] when the detectors were not run. A page
/// with no tokens and no shapes yields an all-default record.
pub fn extract_page_fields(
    page: &Page,
    shapes: &DetectedShapes,
    anchors: &AnchorConfig,
    harvest: &HarvestConfig,
) -> PageFields {
    let tokens = &page.tokens;
    let lines = group_lines(tokens, page.height);
    let mut out = PageFields::default();

    let get = |key: FieldKey| get_after(tokens, &lines, anchors, key, page.width, harvest);

    let (claim_raw, _) = get(FieldKey::ClaimantName);
    let (spouse_raw, _) = get(FieldKey::SpouseName);
    let (addr_raw, _) = get(FieldKey::Address);
    let (village_raw, _) = get(FieldKey::Village);
    let (gp_raw, _) = get(FieldKey::GramPanchayat);
    let (tehsil_raw, _) = get(FieldKey::TehsilTaluka);
    let (district_raw, _) = get(FieldKey::District);

    // Father/mother often sit below the label instead of beside it.
    let (mut fm_raw, fm_anchor) = get(FieldKey::FatherMother);
    if fm_raw.is_empty() {
        if let Some(idx) = fm_anchor {
            let below = collect_below_same_column(
                tokens,
                &lines,
                &tokens[idx].rect(),
                page.width,
                harvest,
            );
            fm_raw = cut_at_stop_label(&join_tokens(tokens, &below));
        }
    }
    if !fm_raw.is_empty() {
        let (father, mother) = parse_parent_names(&fm_raw);
        out.father_name = father.as_deref().and_then(sanitize_person);
        out.mother_name = mother.as_deref().and_then(sanitize_person);
    }

    let (members_raw, _) = get(FieldKey::OtherMembers);
    if !members_raw.is_empty() {
        out.other_members = parse_members(&members_raw);
    }

    out.claimant_name = sanitize_person(&claim_raw);
    out.spouse_name = sanitize_person(&spouse_raw);
    out.address = sanitize_address(&addr_raw);
    out.village = sanitize_village(&village_raw);
    out.gram_panchayat = sanitize_gram_panchayat(&gp_raw);
    out.tehsil_taluka = sanitize_required_suffix(&tehsil_raw, "taluka", 3);
    out.district = sanitize_required_suffix(&district_raw, "district", 3);

    out.habitation_area_ha =
        area_after_keyword(tokens, &lines, &RE_HABITATION, AREA_WINDOW_CHARS);
    out.self_cultivation_area_ha =
        area_after_keyword(tokens, &lines, &RE_SELF_CULTIVATION, AREA_WINDOW_CHARS);

    // Attestation booleans: checkboxes first, then nearby yes/no text.
    let (_, st_anchor) = get(FieldKey::ScheduledTribe);
    let (_, ot_anchor) = get(FieldKey::Otfd);
    out.scheduled_tribe =
        bool_from_checkbox_pair(st_anchor.map(|i| &tokens[i]), &shapes.checkboxes)
            .or_else(|| {
                st_anchor.and_then(|i| {
                    yes_no_near_anchor(tokens, &lines, tokens[i].rect().center_y())
                })
            });
    out.otfd = bool_from_checkbox_pair(ot_anchor.map(|i| &tokens[i]), &shapes.checkboxes)
        .or_else(|| {
            ot_anchor.and_then(|i| {
                yes_no_near_anchor(tokens, &lines, tokens[i].rect().center_y())
            })
        });
    out.apply_exclusivity();

    if !shapes.signatures.is_empty() {
        out.signature_present = Some(true);
    } else if signature_in_text(tokens) {
        out.signature_present = Some(true);
    }

    split_duplicated_claimant_spouse(&mut out);
    out
}

/// When a shared label window feeds both name fields, claimant and spouse
/// come back identical. A duplicated 3- or 4-token value is split: first
/// two tokens to the claimant, the rest to the spouse.
fn split_duplicated_claimant_spouse(out: &mut PageFields) {
    let (Some(claimant), Some(spouse)) = (&out.claimant_name, &out.spouse_name) else {
        return;
    };
    if normalize(claimant) != normalize(spouse) {
        return;
    }
    let toks: Vec<String> = claimant.split_whitespace().map(String::from).collect();
    match toks.len() {
        3 => {
            out.claimant_name = Some(toks[..2].join(" "));
            out.spouse_name = Some(toks[2].clone());
        },
        4 => {
            out.claimant_name = Some(toks[..2].join(" "));
            out.spouse_name = Some(toks[2..].join(" "));
        },
        _ => {},
    }
}
