//! End-to-end extraction over synthetic OCR pages.

use form_harvest::fields::Member;
use form_harvest::geometry::quad_from_xywh;
use form_harvest::pipeline::FormPipeline;
use form_harvest::report::ReportWriter;
use form_harvest::token::{Page, Token};

const PAGE_W: i32 = 2480;
const PAGE_H: i32 = 3500;

fn mock_token(text: &str, x: i32, y: i32, w: i32) -> Token {
    Token::new(text, Some(90.0), quad_from_xywh(x, y, w, 28))
}

/// A synthetic first page of a claim form, labels fused the way OCR
/// usually reports printed label runs.
fn claim_form_page() -> Page {
    Page::new(
        vec![
            mock_token("Name of the claimant:", 40, 200, 300),
            mock_token("Shri", 400, 202, 60),
            mock_token("Ramesh", 480, 202, 100),
            mock_token("Waghmare", 600, 202, 140),
            mock_token("Name of spouse:", 40, 320, 240),
            mock_token("Sunita", 300, 322, 90),
            mock_token("Waghmare", 400, 322, 140),
            mock_token("Name of father / mother:", 40, 440, 340),
            mock_token("Baburao", 400, 441, 110),
            mock_token("/", 520, 441, 10),
            mock_token("Kamal", 540, 441, 90),
            mock_token("4. Address:", 40, 560, 160),
            mock_token("Waghmare", 220, 562, 140),
            mock_token("wada,", 380, 562, 80),
            mock_token("Bhilar", 480, 562, 90),
            mock_token("Village / Gram Sabha:", 40, 680, 280),
            mock_token("Bhilar", 340, 682, 90),
            mock_token("Gram Panchayat:", 40, 800, 220),
            mock_token("Bhilar", 280, 802, 90),
            mock_token("Tehsil / Taluka:", 40, 920, 220),
            mock_token("Mahabaleshwar", 280, 922, 210),
            mock_token("8. District:", 40, 1040, 160),
            mock_token("Satara", 220, 1042, 90),
            mock_token("Scheduled Tribe:", 40, 1160, 240),
            mock_token("yes", 400, 1162, 50),
            mock_token("Extent of habitation:", 40, 1280, 290),
            mock_token("0.25", 360, 1282, 60),
            mock_token("ha", 440, 1282, 30),
            mock_token("Other Traditional Forest Dweller:", 40, 1400, 460),
            mock_token("no", 540, 1402, 35),
            mock_token("Extent of self-cultivation:", 40, 1520, 360),
            mock_token("1", 420, 1522, 15),
            mock_token("25", 450, 1522, 35),
            mock_token("ha", 500, 1522, 30),
            mock_token("Name of other members:", 40, 1640, 340),
            mock_token("Sita", 400, 1642, 55),
            mock_token("(32),", 470, 1642, 65),
            mock_token("Mohan", 550, 1642, 90),
            mock_token("(12)", 660, 1642, 55),
            mock_token("Signature of claimant:", 40, 3300, 300),
            mock_token("(signed)", 360, 3302, 110),
        ],
        PAGE_W,
        PAGE_H,
    )
}

#[test]
fn test_full_page_extraction() {
    let pipeline = FormPipeline::new();
    let fields = pipeline.process_page(&claim_form_page(), &Default::default());

    assert_eq!(fields.claimant_name.as_deref(), Some("shri ramesh waghmare"));
    assert_eq!(fields.spouse_name.as_deref(), Some("sunita waghmare"));
    assert_eq!(fields.father_name.as_deref(), Some("baburao"));
    assert_eq!(fields.mother_name.as_deref(), Some("kamal"));
    assert_eq!(fields.address.as_deref(), Some("waghmare wada, bhilar"));
    assert_eq!(fields.village.as_deref(), Some("bhilar"));
    assert_eq!(fields.gram_panchayat.as_deref(), Some("bhilar gp"));
    assert_eq!(fields.tehsil_taluka.as_deref(), Some("mahabaleshwar"));
    assert_eq!(fields.district.as_deref(), Some("satara"));
    assert_eq!(fields.scheduled_tribe, Some(true));
    assert_eq!(fields.otfd, Some(false));
    assert_eq!(fields.habitation_area_ha, Some(0.25));
    assert_eq!(fields.self_cultivation_area_ha, Some(1.25));
    assert_eq!(
        fields.other_members,
        vec![Member::new("sita", Some(32)), Member::new("mohan", Some(12))]
    );
    assert_eq!(fields.signature_present, Some(true));
}

#[test]
fn test_two_page_document_first_value_wins() {
    let pipeline = FormPipeline::new();
    let page2 = Page::new(
        vec![
            // Continuation sheet repeating a label with a different value
            mock_token("Village / Gram Sabha:", 40, 200, 280),
            mock_token("Panchgani", 340, 202, 150),
            mock_token("8. District:", 40, 320, 160),
            mock_token("Satara", 220, 322, 90),
            mock_token("Name of other members:", 40, 440, 340),
            mock_token("Gita", 400, 442, 55),
        ],
        PAGE_W,
        PAGE_H,
    );
    let record =
        pipeline.process_document("claim_042.pdf", &[claim_form_page(), page2], &[]);

    assert_eq!(record.page_count, 2);
    // Page 1 already resolved the village; page 2 must not override it.
    assert_eq!(record.extracted.village.as_deref(), Some("bhilar"));
    // Members union across pages, first-seen order.
    assert_eq!(
        record.extracted.other_members,
        vec![
            Member::new("sita", Some(32)),
            Member::new("mohan", Some(12)),
            Member::new("gita", None),
        ]
    );
    // Page 2's own record keeps its local view.
    assert_eq!(record.pages[1].fields.village.as_deref(), Some("panchgani"));
}

#[test]
fn test_blank_page_contributes_nothing() {
    let pipeline = FormPipeline::new();
    let blank = Page::new(vec![], PAGE_W, PAGE_H);
    let record = pipeline.process_document("claim", &[blank, claim_form_page()], &[]);
    assert_eq!(record.extracted.claimant_name.as_deref(), Some("shri ramesh waghmare"));
}

#[test]
fn test_artifacts_written_per_document() {
    let pipeline = FormPipeline::new();
    let page = claim_form_page();
    let record = pipeline.process_document("claim_042.pdf", &[page.clone()], &[]);

    let dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(dir.path()).unwrap();
    writer.write_document("claim_042", &record).unwrap();
    writer.write_page_tokens("claim_042", 1, &page).unwrap();
    writer.write_manifest(&["claim_042.pdf".to_string()]).unwrap();

    assert!(dir.path().join("docs/claim_042_structured.json").is_file());
    assert!(dir.path().join("pages/claim_042_p1_ocr.json").is_file());
    assert!(dir.path().join("manifest.json").is_file());
}
