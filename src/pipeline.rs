//! The extraction pipeline - orchestrates the full flow.
//!
//! ```text
//! Page (OCR tokens + geometry)        page image (optional)
//!     ↓                                   ↓
//! [line grouping]                     [visual detectors]
//!     ↓                                   ↓
//! [anchors → harvest → sanitize]  ←  DetectedShapes
//!     ↓
//! PageFields (one per page)
//!     ↓
//! [cross-page merge]
//!     ↓
//! DocumentRecord
//! ```
//!
//! The pipeline is synchronous and holds no mutable state between calls;
//! one instance can process any number of documents.

use crate::anchors::AnchorConfig;
use crate::detect::{
    detect_checkboxes, detect_signatures, detect_stamps, DetectedShapes,
    DetectorConfig, RegionOcr,
};
use crate::extract::extract_page_fields;
use crate::fields::{DocumentRecord, PageFields, PageResult};
use crate::harvest::HarvestConfig;
use crate::merge::merge_pages;
use crate::token::Page;
use image::RgbImage;

/// Unified configuration for the extraction pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Field label patterns
    pub anchors: AnchorConfig,
    /// Value-collection window geometry
    pub harvest: HarvestConfig,
    /// Visual detector thresholds
    pub detector: DetectorConfig,
}

/// The claim-form extraction pipeline.
pub struct FormPipeline {
    config: PipelineConfig,
}

impl FormPipeline {
    /// Create a pipeline with the default FRA claim-form configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the visual detectors over one page image.
    ///
    /// `page` supplies the OCR tokens the checkbox and signature detectors
    /// use for label proximity; `ocr` is the optional confined-region
    /// engine for stamp text.
    pub fn detect_shapes(
        &self,
        image: &RgbImage,
        page: &Page,
        ocr: Option<&mut dyn RegionOcr>,
    ) -> DetectedShapes {
        DetectedShapes {
            checkboxes: detect_checkboxes(image, &page.tokens, &self.config.detector),
            signatures: detect_signatures(image, &page.tokens, &self.config.detector),
            stamps: detect_stamps(image, ocr, &self.config.detector),
        }
    }

    /// Extract fields from one page.
    ///
    /// Pass [`DetectedShapes::default()`] when no page image is available;
    /// extraction then relies on OCR text alone.
    pub fn process_page(&self, page: &Page, shapes: &DetectedShapes) -> PageFields {
        extract_page_fields(page, shapes, &self.config.anchors, &self.config.harvest)
    }

    /// Process a whole document: per-page extraction followed by the
    /// cross-page merge.
    ///
    /// `shapes` must be parallel to `pages` (one entry per page, in page
    /// order); extra entries are ignored and missing ones default to
    /// no-shapes.
    pub fn process_document(
        &self,
        input: impl Into<String>,
        pages: &[Page],
        shapes: &[DetectedShapes],
    ) -> DocumentRecord {
        let empty = DetectedShapes::default();
        let mut results = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            let page_shapes = shapes.get(i).unwrap_or(&empty);
            let fields = self.process_page(page, page_shapes);
            results.push(PageResult {
                page_number: i + 1,
                fields,
            });
        }
        let extracted = merge_pages(
            &results.iter().map(|r| r.fields.clone()).collect::<Vec<_>>(),
        );
        let input = input.into();
        log::debug!("processed document {:?} ({} pages)", input, pages.len());
        DocumentRecord {
            input,
            page_count: pages.len(),
            pages: results,
            extracted,
        }
    }
}

impl Default for FormPipeline {
    fn default() -> Self {
        Self::new()
    }
}
