//! Per-field sanitizers and structural parsers.
//!
//! Inputs are raw harvested text (already stop-cut); outputs are typed
//! values, with `None`/empty on unparsable input rather than an error.
//! The heuristics here are tuned to one form family and intentionally
//! conservative: a sanitizer that cannot make sense of its input gives up
//! instead of guessing.

use crate::fields::Member;
use crate::layout::lines::{nearest_line, Line};
use crate::normalize::{dedupe_adjacent_tokens, normalize};
use crate::token::Token;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Structural words that never belong in a person-name value
    static ref RE_STRUCTURAL: Regex = Regex::new(
        r"\b(house|address|village|district|taluka|tehs?il|panchayat|gp|pattas?|leases?|grants?)\b"
    )
    .unwrap();

    /// Digits and list punctuation stripped from person names
    static ref RE_NAME_NOISE: Regex = Regex::new(r"[0-9\[\]().:,/]+").unwrap();

    /// Characters allowed in an address value
    static ref RE_ADDRESS_REJECT: Regex = Regex::new(r"[^a-z0-9 ,/]").unwrap();

    /// Gram-panchayat suffix and anything after it
    static ref RE_GP_SUFFIX: Regex = Regex::new(r"\b(gram\s*panchayat|gp)\b.*$").unwrap();

    /// Short phrase immediately preceding "gp"
    static ref RE_BEFORE_GP: Regex = Regex::new(r"\b([a-z][a-z\s]{0,24})\s+gp\b").unwrap();

    /// Short phrase immediately preceding "gram panchayat"
    static ref RE_BEFORE_GRAM_PANCHAYAT: Regex =
        Regex::new(r"\b([a-z][a-z\s]{0,24})\s+gram\s*panchayat\b").unwrap();

    /// Parent-name separators: slash, pipe, double space, comma, " and "
    static ref RE_PARENT_SPLIT: Regex = Regex::new(r"\s*/\s*|\s*\|\s*|\s{2,}|,| and ").unwrap();

    /// "name (age)" member form
    static ref RE_MEMBER_PAREN_AGE: Regex =
        Regex::new(r"([a-z][a-z\s.]+?)\s*\(\s*(\d{1,3})\s*\)").unwrap();

    /// "name age" member form
    static ref RE_MEMBER_TRAILING_AGE: Regex =
        Regex::new(r"^([a-z][a-z\s.]+?)\s+(\d{1,3})$").unwrap();

    /// Empty parenthesized group left by an age OCR dropped
    static ref RE_EMPTY_PARENS: Regex = Regex::new(r"\(\s*\)").unwrap();

    /// Number followed by a hectare unit, tolerating OCR'd decimal
    /// separators: "0.25 ha", "0,25 ha", "1 25 ha"
    static ref RE_AREA_NUMBER: Regex =
        Regex::new(r"(?i)([0-9]+(?:[.,]\s*[0-9]+|\s+[0-9]{2})?)\s*h[a\u{0251}]\b").unwrap();

    static ref RE_YES: Regex = Regex::new(r"\byes\b").unwrap();
    static ref RE_NO: Regex = Regex::new(r"\bno\b").unwrap();
    static ref RE_WS_DOT: Regex = Regex::new(r"\s*\.\s*").unwrap();
    static ref RE_SPACED_DECIMAL: Regex = Regex::new(r"(\d)\s+(\d{2})$").unwrap();
    static ref RE_WS: Regex = Regex::new(r"\s+").unwrap();
}

/// Sanitize a person-name value: structural words, digits, and punctuation
/// stripped, capped at the first 3 remaining tokens.
///
/// # Examples
///
/// ```
/// use form_harvest::sanitize::sanitize_person;
///
/// assert_eq!(
///     sanitize_person("sh. ram kumar house no 12 village x"),
///     Some("sh ram kumar".to_string())
/// );
/// assert_eq!(sanitize_person("123 / :"), None);
/// ```
pub fn sanitize_person(raw: &str) -> Option<String> {
    let t = normalize(raw);
    let t = RE_STRUCTURAL.replace_all(&t, " ");
    let t = RE_NAME_NOISE.replace_all(&t, " ");
    let parts: Vec<&str> = t.split_whitespace().take(3).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Sanitize an address value: keep only alphanumeric, space, comma, slash.
pub fn sanitize_address(raw: &str) -> Option<String> {
    let t = normalize(raw);
    let t = RE_ADDRESS_REJECT.replace_all(&t, " ");
    let t = RE_WS.replace_all(t.trim(), " ");
    let t = t.trim_matches(|c| c == ' ' || c == ',');
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Sanitize a village value: drop a "gram panchayat"/"gp" suffix and
/// everything after it, collapse repeated tokens, keep the first 3.
pub fn sanitize_village(raw: &str) -> Option<String> {
    let t = normalize(raw);
    let t = RE_GP_SUFFIX.replace(&t, "").trim().to_string();
    let t = dedupe_adjacent_tokens(&t);
    let parts: Vec<&str> = t.split_whitespace().take(3).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Sanitize a gram-panchayat value: the short phrase immediately preceding
/// "gp" or "gram panchayat", else the first 2 tokens with " gp" appended.
pub fn sanitize_gram_panchayat(raw: &str) -> Option<String> {
    let t = normalize(raw);
    if let Some(c) = RE_BEFORE_GP.captures(&t) {
        return Some(dedupe_adjacent_tokens(&format!("{} gp", c[1].trim())));
    }
    if let Some(c) = RE_BEFORE_GRAM_PANCHAYAT.captures(&t) {
        return Some(dedupe_adjacent_tokens(&format!("{} gp", c[1].trim())));
    }
    let base: Vec<&str> = t.split_whitespace().take(2).collect();
    if base.is_empty() {
        None
    } else {
        Some(dedupe_adjacent_tokens(&format!("{} gp", base.join(" "))))
    }
}

/// Sanitize a value that must carry a suffix word ("taluka", "district"):
/// the phrase immediately preceding the suffix, else the first
/// `keep_tokens` tokens. A lone placeholder token "sample" becomes
/// "sample <suffix>".
pub fn sanitize_required_suffix(raw: &str, suffix: &str, keep_tokens: usize) -> Option<String> {
    let t = normalize(raw);
    let pattern = format!(r"\b([a-z][a-z\s]{{0,40}}?)\s+{}\b", regex::escape(suffix));
    if let Ok(re) = Regex::new(&pattern) {
        if let Some(c) = re.captures(&t) {
            let phrase = format!("{} {}", c[1].trim(), suffix);
            let capped: Vec<&str> = phrase.split_whitespace().take(keep_tokens).collect();
            return Some(capped.join(" "));
        }
    }
    let parts: Vec<&str> = t.split_whitespace().collect();
    if parts.len() == 1 && parts[0] == "sample" {
        return Some(format!("sample {suffix}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.into_iter().take(keep_tokens).collect::<Vec<_>>().join(" "))
    }
}

/// Split a combined father/mother value into the two names.
///
/// The first segment is the father, the second the mother; either is
/// discarded when it contains a structural word (the split fell on the
/// wrong separator and swallowed an address fragment).
pub fn parse_parent_names(raw: &str) -> (Option<String>, Option<String>) {
    let t = normalize(raw);
    let parts: Vec<String> = RE_PARENT_SPLIT
        .split(&t)
        .map(|p| p.trim_matches(|c| c == ' ' || c == ':').to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let (mut father, mut mother) = match parts.len() {
        0 => (None, None),
        1 => (Some(parts[0].clone()), None),
        _ => (Some(parts[0].clone()), Some(parts[1].clone())),
    };
    if father.as_deref().is_some_and(|f| RE_STRUCTURAL.is_match(f)) {
        father = None;
    }
    if mother.as_deref().is_some_and(|m| RE_STRUCTURAL.is_match(m)) {
        mother = None;
    }
    (father, mother)
}

/// Parse a dependent-members list tolerantly.
///
/// Segments split on comma/semicolon; each segment tries "name (age)",
/// then "name age", then a bare name with empty parens stripped.
pub fn parse_members(raw: &str) -> Vec<Member> {
    let t = normalize(raw).replace(';', ",");
    let mut members = Vec::new();
    for chunk in t.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some(c) = RE_MEMBER_PAREN_AGE.captures(chunk) {
            let name = RE_WS.replace_all(c[1].trim(), " ").into_owned();
            members.push(Member::new(name, c[2].parse().ok()));
        } else if let Some(c) = RE_MEMBER_TRAILING_AGE.captures(chunk) {
            let name = RE_WS.replace_all(c[1].trim(), " ").into_owned();
            members.push(Member::new(name, c[2].parse().ok()));
        } else {
            let name = RE_EMPTY_PARENS.replace_all(chunk, "");
            let name = name.trim_matches(|c| c == ' ' || c == ':');
            if !name.is_empty() {
                members.push(Member::new(name, None));
            }
        }
    }
    members
}

/// Parse a number token matched by [`RE_AREA_NUMBER`] into a float,
/// normalizing OCR'd decimal separators: comma to dot, spaces around a dot
/// removed, and a trailing "digit space two-digits" pattern read as a
/// decimal ("1 25" -> 1.25).
fn parse_area_token(token: &str) -> Option<f64> {
    let t = token.replace(',', ".");
    let t = RE_WS_DOT.replace_all(&t, ".");
    let t = RE_SPACED_DECIMAL.replace(&t, "$1.$2");
    t.parse().ok()
}

/// Search line text for a keyword followed (within `max_chars`) by a
/// number-then-hectare pattern; returns the first match as a float.
///
/// Scans single lines first, then pairs of adjacent lines concatenated, to
/// handle values that wrap onto the next row.
pub fn area_after_keyword(
    tokens: &[Token],
    lines: &[Line],
    keyword: &Regex,
    max_chars: usize,
) -> Option<f64> {
    let line_text = |line: &Line| -> String {
        normalize(
            &line
                .tokens
                .iter()
                .map(|&i| tokens[i].text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    };

    let search = |text: &str| -> Option<f64> {
        for m in keyword.find_iter(text) {
            let end = (m.end() + max_chars).min(text.len());
            // Guard against slicing mid-codepoint in normalized text.
            let end = (end..=text.len()).find(|&i| text.is_char_boundary(i))?;
            if let Some(c) = RE_AREA_NUMBER.captures(&text[m.end()..end]) {
                if let Some(v) = parse_area_token(&c[1]) {
                    return Some(v);
                }
            }
        }
        None
    };

    for line in lines {
        if let Some(v) = search(&line_text(line)) {
            return Some(v);
        }
    }
    for pair in lines.windows(2) {
        let joined = format!("{} {}", line_text(&pair[0]), line_text(&pair[1]));
        if let Some(v) = search(&joined) {
            return Some(v);
        }
    }
    None
}

/// Resolve a yes/no boolean from isolated "yes"/"no" tokens on the
/// anchor's line and the line below it.
///
/// Returns a value only when exactly one of the two words appears;
/// conflicting or absent evidence resolves to `None` rather than a guess.
pub fn yes_no_near_anchor(
    tokens: &[Token],
    lines: &[Line],
    anchor_center_y: i32,
) -> Option<bool> {
    let idx = nearest_line(lines, anchor_center_y)?;
    let mut saw_yes = false;
    let mut saw_no = false;
    for line in lines.iter().skip(idx).take(2) {
        for &i in &line.tokens {
            let t = normalize(&tokens[i].text);
            saw_yes |= RE_YES.is_match(&t);
            saw_no |= RE_NO.is_match(&t);
        }
    }
    match (saw_yes, saw_no) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::quad_from_xywh;
    use crate::layout::group_lines;

    #[test]
    fn test_sanitize_person_strips_structural_and_digits() {
        assert_eq!(
            sanitize_person("sh. ram kumar house no 12 village x"),
            Some("sh ram kumar".to_string())
        );
    }

    #[test]
    fn test_sanitize_person_empty() {
        assert_eq!(sanitize_person(""), None);
        assert_eq!(sanitize_person("village district 99"), None);
    }

    #[test]
    fn test_sanitize_address() {
        assert_eq!(
            sanitize_address("H.No 12, Ward-3 / Bhilar!"),
            Some("h no 12, ward 3 / bhilar".to_string())
        );
        assert_eq!(sanitize_address("!!"), None);
    }

    #[test]
    fn test_sanitize_village_cuts_gp_suffix() {
        assert_eq!(
            sanitize_village("bhilar bhilar gram panchayat bhilar"),
            Some("bhilar".to_string())
        );
        assert_eq!(sanitize_village("kond kond gp"), Some("kond".to_string()));
    }

    #[test]
    fn test_sanitize_gram_panchayat() {
        assert_eq!(
            sanitize_gram_panchayat("bhilar gp and more"),
            Some("bhilar gp".to_string())
        );
        assert_eq!(
            sanitize_gram_panchayat("kond gram panchayat"),
            Some("kond gp".to_string())
        );
        // Fallback: first two tokens + " gp"
        assert_eq!(
            sanitize_gram_panchayat("kond khurd something"),
            Some("kond khurd gp".to_string())
        );
        assert_eq!(sanitize_gram_panchayat(""), None);
    }

    #[test]
    fn test_sanitize_required_suffix() {
        assert_eq!(
            sanitize_required_suffix("mahabaleshwar taluka extra words", "taluka", 3),
            Some("mahabaleshwar taluka".to_string())
        );
        assert_eq!(
            sanitize_required_suffix("sample", "district", 3),
            Some("sample district".to_string())
        );
        assert_eq!(
            sanitize_required_suffix("satara words here more", "district", 3),
            Some("satara words here".to_string())
        );
        assert_eq!(sanitize_required_suffix("", "taluka", 3), None);
    }

    #[test]
    fn test_parse_parent_names() {
        assert_eq!(
            parse_parent_names("Shyam Lal / Kamla Devi"),
            (Some("shyam lal".to_string()), Some("kamla devi".to_string()))
        );
        assert_eq!(
            parse_parent_names("Shyam Lal"),
            (Some("shyam lal".to_string()), None)
        );
        // Structural word discards the segment that swallowed it
        assert_eq!(
            parse_parent_names("Shyam Lal / village bhilar"),
            (Some("shyam lal".to_string()), None)
        );
    }

    #[test]
    fn test_parse_members_forms() {
        let members = parse_members("Sita (12), Gopal 8; Radha ( )");
        assert_eq!(
            members,
            vec![
                Member::new("sita", Some(12)),
                Member::new("gopal", Some(8)),
                Member::new("radha", None),
            ]
        );
    }

    #[test]
    fn test_parse_members_empty() {
        assert!(parse_members("").is_empty());
        assert!(parse_members(" , ; ,").is_empty());
    }

    fn line_of(text: &str, y: i32) -> Vec<Token> {
        text.split(' ')
            .enumerate()
            .map(|(i, w)| {
                Token::new(w, Some(90.0), quad_from_xywh(10 + (i as i32) * 80, y, 70, 14))
            })
            .collect()
    }

    #[test]
    fn test_area_simple_decimal() {
        let tokens = line_of("habitation 0.25 ha", 100);
        let lines = group_lines(&tokens, 1400);
        let kw = Regex::new(r"\bhabitation[:\s]*").unwrap();
        assert_eq!(area_after_keyword(&tokens, &lines, &kw, 40), Some(0.25));
    }

    #[test]
    fn test_area_spaced_decimal_fixup() {
        let tokens = line_of("habitation 1 25 ha", 100);
        let lines = group_lines(&tokens, 1400);
        let kw = Regex::new(r"\bhabitation[:\s]*").unwrap();
        assert_eq!(area_after_keyword(&tokens, &lines, &kw, 40), Some(1.25));
    }

    #[test]
    fn test_area_comma_decimal() {
        let tokens = line_of("self-cultivation 0,50 ha", 100);
        let lines = group_lines(&tokens, 1400);
        let kw = Regex::new(r"\bself[-\s]*cultivation[:\s]*").unwrap();
        assert_eq!(area_after_keyword(&tokens, &lines, &kw, 40), Some(0.5));
    }

    #[test]
    fn test_area_wraps_to_next_line() {
        let mut tokens = line_of("extent of habitation", 100);
        tokens.extend(line_of("0.75 ha", 160));
        let lines = group_lines(&tokens, 1400);
        let kw = Regex::new(r"\bhabitation[:\s]*").unwrap();
        assert_eq!(area_after_keyword(&tokens, &lines, &kw, 40), Some(0.75));
    }

    #[test]
    fn test_area_absent() {
        let tokens = line_of("no areas here", 100);
        let lines = group_lines(&tokens, 1400);
        let kw = Regex::new(r"\bhabitation[:\s]*").unwrap();
        assert_eq!(area_after_keyword(&tokens, &lines, &kw, 40), None);
    }

    #[test]
    fn test_yes_no_exclusive_only() {
        let tokens = line_of("scheduled tribe yes", 100);
        let lines = group_lines(&tokens, 1400);
        assert_eq!(yes_no_near_anchor(&tokens, &lines, 107), Some(true));

        let tokens = line_of("scheduled tribe yes no", 100);
        let lines = group_lines(&tokens, 1400);
        assert_eq!(yes_no_near_anchor(&tokens, &lines, 107), None);

        let tokens = line_of("scheduled tribe", 100);
        let lines = group_lines(&tokens, 1400);
        assert_eq!(yes_no_near_anchor(&tokens, &lines, 107), None);
    }

    #[test]
    fn test_yes_no_next_line() {
        let mut tokens = line_of("otfd claim", 100);
        tokens.extend(line_of("no", 160));
        let lines = group_lines(&tokens, 1400);
        assert_eq!(yes_no_near_anchor(&tokens, &lines, 107), Some(false));
    }
}
