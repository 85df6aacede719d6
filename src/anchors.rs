//! Field anchors: locating printed labels among OCR tokens.
//!
//! Each logical field is anchored by a small fixed list of label patterns
//! covering the printed-form phrasing and its common alternates. Anchor
//! resolution is deliberately unscored: the first token (in OCR production
//! order) whose normalized text matches any pattern wins, which keeps the
//! result stable across runs on unchanged input.
//!
//! The pattern tables are an explicit configuration value rather than
//! ambient globals, so a different form family can swap them in without
//! touching the resolution code.

use crate::normalize::normalize;
use crate::token::Token;
use lazy_static::lazy_static;
use regex::Regex;

/// Logical fields the extractor anchors on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// Claimant / holder name
    ClaimantName,
    /// Spouse name
    SpouseName,
    /// Combined father/mother label
    FatherMother,
    /// Postal address
    Address,
    /// Village / gram sabha
    Village,
    /// Gram panchayat
    GramPanchayat,
    /// Tehsil / taluka
    TehsilTaluka,
    /// District
    District,
    /// Scheduled-tribe attestation
    ScheduledTribe,
    /// Other-traditional-forest-dweller attestation
    Otfd,
    /// Dependent family members list
    OtherMembers,
}

/// All anchored fields, in extraction order.
pub const ALL_FIELDS: [FieldKey; 11] = [
    FieldKey::ClaimantName,
    FieldKey::SpouseName,
    FieldKey::FatherMother,
    FieldKey::Address,
    FieldKey::Village,
    FieldKey::GramPanchayat,
    FieldKey::TehsilTaluka,
    FieldKey::District,
    FieldKey::ScheduledTribe,
    FieldKey::Otfd,
    FieldKey::OtherMembers,
];

/// Immutable per-field label-pattern table.
///
/// The default table is tuned to the Forest Rights Act claim-form family.
/// Patterns match against [`normalize`]d token text, case-insensitively.
#[derive(Debug, Clone)]
pub struct AnchorConfig {
    patterns: Vec<(FieldKey, Vec<Regex>)>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self::fra_claim_form()
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("anchor pattern must compile")
}

impl AnchorConfig {
    /// Label patterns for the Forest Rights Act claim-form family.
    pub fn fra_claim_form() -> Self {
        let patterns = vec![
            (
                FieldKey::ClaimantName,
                vec![
                    re(r"name\(s\)\s*of\s*holder\(s\)"),
                    re(r"name\s*of\s*the\s*claimant"),
                ],
            ),
            (FieldKey::SpouseName, vec![re(r"name\s*of\s*spouse")]),
            (
                FieldKey::FatherMother,
                vec![re(r"name\s*of\s*father\s*/\s*mother")],
            ),
            (FieldKey::Address, vec![re(r"\b4\.\s*address\b"), re(r"\baddress\b")]),
            (
                FieldKey::Village,
                vec![re(r"village\s*/\s*gram\s*sabha"), re(r"\bvillage\b")],
            ),
            (FieldKey::GramPanchayat, vec![re(r"gram\s*panchayat\b")]),
            (FieldKey::TehsilTaluka, vec![re(r"tehsil\s*/\s*taluka"), re(r"\btaluka\b")]),
            (FieldKey::District, vec![re(r"\b8\.\s*district\b"), re(r"\bdistrict\b")]),
            (FieldKey::ScheduledTribe, vec![re(r"scheduled\s*tribe")]),
            (
                FieldKey::Otfd,
                vec![re(r"other\s*traditional\s*forest\s*dweller")],
            ),
            (
                FieldKey::OtherMembers,
                vec![
                    re(r"\b10\.\s*name of other members\b"),
                    re(r"\bname of other members\b"),
                    re(r"name\s*of\s*dependents"),
                ],
            ),
        ];
        Self { patterns }
    }

    /// Patterns registered for a field (empty slice if none).
    pub fn patterns(&self, key: FieldKey) -> &[Regex] {
        self.patterns
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, p)| p.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the patterns for one field, keeping the rest.
    pub fn with_patterns(mut self, key: FieldKey, patterns: Vec<Regex>) -> Self {
        if let Some(entry) = self.patterns.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = patterns;
        } else {
            self.patterns.push((key, patterns));
        }
        self
    }
}

/// Find the anchor token for a field: the first token, in the given order,
/// whose normalized text matches any of the patterns.
///
/// Returns the token's index, or `None` when no label is present on the
/// page (the field then resolves to its default empty value).
pub fn find_anchor(tokens: &[Token], patterns: &[Regex]) -> Option<usize> {
    for (i, token) in tokens.iter().enumerate() {
        let text = normalize(&token.text);
        if patterns.iter().any(|p| p.is_match(&text)) {
            log::debug!("anchor matched token {} ({:?})", i, token.text);
            return Some(i);
        }
    }
    None
}

lazy_static! {
    /// Every other field label the form family prints; harvested text is
    /// truncated at the first occurrence to stop bleed-through between
    /// adjacent unlabeled values.
    static ref RE_STOP_LABEL: Regex = Regex::new(
        r"(?i)\b(name of|address|village|gram\s*panchayat|gp|tehs?il|taluka|district|scheduled|other\s+traditional|nature of claim|evidence|extent of|habitation|self[-\s]*cultivation|signature|thumb impression)\b"
    )
    .unwrap();
}

/// Truncate harvested text at the next recognized field label.
///
/// Applying the cut to already-cut text is a no-op.
///
/// # Examples
///
/// ```
/// use form_harvest::anchors::cut_at_stop_label;
///
/// assert_eq!(cut_at_stop_label("ram kumar village bhilar"), "ram kumar");
/// assert_eq!(cut_at_stop_label("ram kumar"), "ram kumar");
/// ```
pub fn cut_at_stop_label(text: &str) -> String {
    match RE_STOP_LABEL.find(text) {
        Some(m) => text[..m.start()].trim().to_string(),
        None => text.trim().to_string(),
    }
}
