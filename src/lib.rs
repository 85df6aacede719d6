//! # Form Harvest
//!
//! Layout-aware field extraction for scanned claim forms.
//!
//! Forest Rights Act claim forms arrive as photographs or scans with OCR
//! tokens attached; this crate turns those tokens (and, optionally, the
//! page image) into a typed, merged record per document:
//!
//! - **Line grouping**: tokens clustered into visual lines by vertical
//!   center, tolerant of skew and uneven OCR boxes
//! - **Anchors**: printed field labels located by per-field regex tables
//! - **Harvesting**: value text collected from windows to the right of and
//!   below each anchor, cut at the next printed label
//! - **Sanitizers**: per-field cleanup (names, addresses, administrative
//!   units, member lists, areas with units, yes/no attestations)
//! - **Visual detectors**: checkbox, signature, and stamp heuristics over
//!   the page image
//! - **Merge**: first-non-empty resolution across pages, with an
//!   order-preserving union of the dependent-members list
//!
//! ## Quick Start
//!
//! ```
//! use form_harvest::pipeline::FormPipeline;
//! use form_harvest::token::{Page, Token};
//! use form_harvest::geometry::quad_from_xywh;
//!
//! let page = Page::new(
//!     vec![
//!         Token::new("Village / Gram Sabha:", Some(92.0), quad_from_xywh(40, 400, 260, 24)),
//!         Token::new("Bhilar", Some(88.0), quad_from_xywh(320, 402, 90, 24)),
//!     ],
//!     2480,
//!     3500,
//! );
//!
//! let pipeline = FormPipeline::new();
//! let record = pipeline.process_document("claim_042.pdf", &[page], &[]);
//! assert_eq!(record.extracted.village.as_deref(), Some("bhilar"));
//! ```
//!
//! Extraction is best-effort by design: a field whose label or value
//! cannot be resolved stays `None`, and a page with no usable content
//! yields an all-default record rather than an error. [`error::Error`]
//! covers only the I/O seams (artifact writing, image decoding).

pub mod anchors;
pub mod detect;
pub mod error;
pub mod extract;
pub mod fields;
pub mod geometry;
pub mod harvest;
pub mod layout;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod token;

// Re-exports
pub use anchors::{AnchorConfig, FieldKey};
pub use detect::{DetectedShapes, DetectorConfig, RegionOcr};
pub use error::{Error, Result};
pub use fields::{DocumentRecord, Member, PageFields, PageResult};
pub use harvest::HarvestConfig;
pub use pipeline::{FormPipeline, PipelineConfig};
pub use token::{Page, Token};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
