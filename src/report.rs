//! Run artifacts: JSON files written per document and per run.
//!
//! Layout under the output directory:
//!
//! ```text
//! out/
//!   docs/<name>_structured.json     one DocumentRecord per input
//!   pages/<name>_p<N>_ocr.json      raw OCR tokens per page
//!   manifest.json                   document list + run timestamp
//! ```

use crate::error::Result;
use crate::fields::DocumentRecord;
use crate::token::Page;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Run manifest: what was processed and when.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: String,
    document_count: usize,
    documents: &'a [String],
}

/// Writes extraction artifacts under one output directory.
#[derive(Debug)]
pub struct ReportWriter {
    outdir: PathBuf,
}

impl ReportWriter {
    /// Create a writer rooted at `outdir`, creating the directory tree.
    pub fn new(outdir: impl AsRef<Path>) -> Result<Self> {
        let outdir = outdir.as_ref().to_path_buf();
        fs::create_dir_all(outdir.join("docs"))?;
        fs::create_dir_all(outdir.join("pages"))?;
        Ok(Self { outdir })
    }

    /// Root output directory.
    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    fn write_json<T: Serialize>(&self, path: PathBuf, value: &T) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)?;
        log::debug!("wrote {:?}", path);
        Ok(path)
    }

    /// Write the structured record for one document.
    pub fn write_document(&self, name: &str, record: &DocumentRecord) -> Result<PathBuf> {
        let path = self.outdir.join("docs").join(format!("{name}_structured.json"));
        self.write_json(path, record)
    }

    /// Write the raw OCR tokens for one page, for audit and replay.
    pub fn write_page_tokens(
        &self,
        name: &str,
        page_number: usize,
        page: &Page,
    ) -> Result<PathBuf> {
        let path = self
            .outdir
            .join("pages")
            .join(format!("{name}_p{page_number}_ocr.json"));
        self.write_json(path, page)
    }

    /// Write the run manifest listing every processed document.
    pub fn write_manifest(&self, documents: &[String]) -> Result<PathBuf> {
        let manifest = Manifest {
            generated_at: Utc::now().to_rfc3339(),
            document_count: documents.len(),
            documents,
        };
        self.write_json(self.outdir.join("manifest.json"), &manifest)
    }
}
