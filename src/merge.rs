//! Cross-page merge of per-page field records.
//!
//! Multi-page claim forms repeat labels across pages, and later pages are
//! usually continuation sheets with worse scan quality. The merge therefore
//! trusts the earliest page that produced a value: for every scalar slot
//! the first non-empty value wins and later pages never override it. The
//! dependent-members list instead unions across pages, keyed by
//! `(name, age)` identity, preserving first-seen order.

use crate::fields::{Member, PageFields};
use indexmap::IndexSet;

fn pick<T: Clone>(slots: impl Iterator<Item = Option<T>>) -> Option<T> {
    slots.flatten().next()
}

fn pick_str(slots: impl Iterator<Item = Option<String>>) -> Option<String> {
    slots.flatten().find(|s| !s.is_empty())
}

/// Merge per-page records into one document-level record.
///
/// The scheduled-tribe/OTFD exclusivity rule is re-applied after the merge,
/// since the two flags may have been picked from different pages.
pub fn merge_pages(pages: &[PageFields]) -> PageFields {
    let mut members: IndexSet<Member> = IndexSet::new();
    for page in pages {
        for member in &page.other_members {
            members.insert(member.clone());
        }
    }

    let mut out = PageFields {
        claimant_name: pick_str(pages.iter().map(|p| p.claimant_name.clone())),
        spouse_name: pick_str(pages.iter().map(|p| p.spouse_name.clone())),
        father_name: pick_str(pages.iter().map(|p| p.father_name.clone())),
        mother_name: pick_str(pages.iter().map(|p| p.mother_name.clone())),
        address: pick_str(pages.iter().map(|p| p.address.clone())),
        village: pick_str(pages.iter().map(|p| p.village.clone())),
        gram_panchayat: pick_str(pages.iter().map(|p| p.gram_panchayat.clone())),
        tehsil_taluka: pick_str(pages.iter().map(|p| p.tehsil_taluka.clone())),
        district: pick_str(pages.iter().map(|p| p.district.clone())),
        scheduled_tribe: pick(pages.iter().map(|p| p.scheduled_tribe)),
        otfd: pick(pages.iter().map(|p| p.otfd)),
        other_members: members.into_iter().collect(),
        habitation_area_ha: pick(pages.iter().map(|p| p.habitation_area_ha)),
        self_cultivation_area_ha: pick(pages.iter().map(|p| p.self_cultivation_area_ha)),
        signature_present: pick(pages.iter().map(|p| p.signature_present)),
    };
    out.apply_exclusivity();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_empty_wins() {
        let pages = vec![
            PageFields {
                village: Some("bhilar".to_string()),
                ..Default::default()
            },
            PageFields {
                village: Some("other".to_string()),
                district: Some("satara".to_string()),
                ..Default::default()
            },
        ];
        let merged = merge_pages(&pages);
        assert_eq!(merged.village, Some("bhilar".to_string()));
        assert_eq!(merged.district, Some("satara".to_string()));
    }

    #[test]
    fn test_empty_string_does_not_win() {
        let pages = vec![
            PageFields {
                claimant_name: Some(String::new()),
                ..Default::default()
            },
            PageFields {
                claimant_name: Some("ram kumar".to_string()),
                ..Default::default()
            },
        ];
        let merged = merge_pages(&pages);
        assert_eq!(merged.claimant_name, Some("ram kumar".to_string()));
    }

    #[test]
    fn test_false_boolean_is_a_value() {
        let pages = vec![
            PageFields {
                scheduled_tribe: Some(false),
                ..Default::default()
            },
            PageFields {
                scheduled_tribe: Some(true),
                ..Default::default()
            },
        ];
        assert_eq!(merge_pages(&pages).scheduled_tribe, Some(false));
    }

    #[test]
    fn test_members_union_preserves_first_seen_order() {
        let pages = vec![
            PageFields {
                other_members: vec![
                    Member::new("sita", Some(32)),
                    Member::new("mohan", Some(12)),
                ],
                ..Default::default()
            },
            PageFields {
                other_members: vec![
                    Member::new("mohan", Some(12)),
                    Member::new("gita", None),
                ],
                ..Default::default()
            },
        ];
        let merged = merge_pages(&pages);
        assert_eq!(
            merged.other_members,
            vec![
                Member::new("sita", Some(32)),
                Member::new("mohan", Some(12)),
                Member::new("gita", None),
            ]
        );
    }

    #[test]
    fn test_same_name_different_age_both_kept() {
        let pages = vec![
            PageFields {
                other_members: vec![Member::new("mohan", Some(12))],
                ..Default::default()
            },
            PageFields {
                other_members: vec![Member::new("mohan", None)],
                ..Default::default()
            },
        ];
        assert_eq!(merge_pages(&pages).other_members.len(), 2);
    }

    #[test]
    fn test_exclusivity_reapplied_across_pages() {
        let pages = vec![
            PageFields {
                scheduled_tribe: Some(true),
                ..Default::default()
            },
            PageFields {
                otfd: Some(true),
                ..Default::default()
            },
        ];
        let merged = merge_pages(&pages);
        assert_eq!(merged.scheduled_tribe, Some(true));
        assert_eq!(merged.otfd, Some(false));
    }

    #[test]
    fn test_no_pages_yields_defaults() {
        assert_eq!(merge_pages(&[]), PageFields::default());
    }
}
