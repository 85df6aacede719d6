//! Typed field records produced by extraction.
//!
//! Null-vs-empty convention, which output consumers rely on: string,
//! boolean, and float fields serialize as `null` when absent; the member
//! list serializes as `[]` when absent, never `null`.

use serde::{Deserialize, Serialize};

/// One dependent family member parsed from the members list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Member name
    pub name: String,
    /// Age in years, when the form states one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl Member {
    /// Create a member record.
    pub fn new(name: impl Into<String>, age: Option<u32>) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// The fixed set of typed field slots one page resolves to.
///
/// All slots default to null/empty; extraction fills what it can and never
/// fails a sibling field over one unparsable slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageFields {
    /// Claimant / holder name
    pub claimant_name: Option<String>,
    /// Spouse name
    pub spouse_name: Option<String>,
    /// Father's name
    pub father_name: Option<String>,
    /// Mother's name
    pub mother_name: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Village / gram sabha
    pub village: Option<String>,
    /// Gram panchayat
    pub gram_panchayat: Option<String>,
    /// Tehsil / taluka
    pub tehsil_taluka: Option<String>,
    /// District
    pub district: Option<String>,
    /// Scheduled-tribe attestation
    pub scheduled_tribe: Option<bool>,
    /// Other-traditional-forest-dweller attestation
    pub otfd: Option<bool>,
    /// Dependent family members
    #[serde(default)]
    pub other_members: Vec<Member>,
    /// Habitation area in hectares
    pub habitation_area_ha: Option<f64>,
    /// Self-cultivation area in hectares
    pub self_cultivation_area_ha: Option<f64>,
    /// Whether a signature or thumb impression is present
    pub signature_present: Option<bool>,
}

impl PageFields {
    /// Force the scheduled-tribe / OTFD mutual exclusivity: a claimant
    /// attested as a scheduled tribe cannot also be an other traditional
    /// forest dweller, so a double-true resolves in favor of the tribe flag.
    pub fn apply_exclusivity(&mut self) {
        if self.scheduled_tribe == Some(true) && self.otfd == Some(true) {
            self.otfd = Some(false);
        }
    }
}

/// One page's extraction outcome, retained for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number within the document
    pub page_number: usize,
    /// Fields resolved on this page
    pub fields: PageFields,
}

/// The merged, page-independent field set representing one claim form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Input identifier (path or name) the caller supplied
    pub input: String,
    /// Number of pages processed
    pub page_count: usize,
    /// Per-page results, in page order
    pub pages: Vec<PageResult>,
    /// Merged document-level fields
    pub extracted: PageFields,
}
