//! Batch extraction over OCR page dumps.
//!
//! Input is a JSON file (or a folder of them) holding the OCR output for
//! one document each: either a single page object or an array of pages,
//! in the `{"items": [...], "width": W, "height": H}` shape. Structured
//! records, per-page token copies, and a run manifest are written under
//! the output directory.

use form_harvest::pipeline::FormPipeline;
use form_harvest::report::ReportWriter;
use form_harvest::token::Page;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

struct RunConfig {
    input: PathBuf,
    outdir: PathBuf,
}

impl RunConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();

        if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
            eprintln!("Usage: {} <input.json | input-dir> [--outdir DIR]", args[0]);
            eprintln!();
            eprintln!("  input    OCR page dump (JSON) or a folder of them, one per document");
            eprintln!("  --outdir Output directory (default: ./harvest_output)");
            std::process::exit(if args.len() < 2 { 1 } else { 0 });
        }

        let mut input = None;
        let mut outdir = PathBuf::from("./harvest_output");
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--outdir" => {
                    i += 1;
                    if i >= args.len() {
                        eprintln!("--outdir requires a value");
                        std::process::exit(1);
                    }
                    outdir = PathBuf::from(&args[i]);
                },
                other => input = Some(PathBuf::from(other)),
            }
            i += 1;
        }

        let Some(input) = input else {
            eprintln!("No input path given");
            std::process::exit(1);
        };
        Self { input, outdir }
    }
}

fn discover_inputs(path: &Path) -> Vec<PathBuf> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.extension().is_some_and(|e| e == "json"))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    }
}

/// Read one document's pages: a JSON array of pages, or a single page.
fn read_pages(path: &Path) -> form_harvest::Result<Vec<Page>> {
    let raw = fs::read_to_string(path)?;
    match serde_json::from_str::<Vec<Page>>(&raw) {
        Ok(pages) => Ok(pages),
        Err(_) => Ok(vec![serde_json::from_str::<Page>(&raw)?]),
    }
}

fn main() {
    env_logger::init();

    let config = RunConfig::from_args();
    let inputs = discover_inputs(&config.input);
    if inputs.is_empty() {
        eprintln!("No JSON inputs found in {}", config.input.display());
        std::process::exit(1);
    }

    let writer = match ReportWriter::new(&config.outdir) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Failed to prepare output directory: {}", e);
            std::process::exit(1);
        },
    };

    println!("Form harvest");
    println!("Input:  {}", config.input.display());
    println!("Output: {}", config.outdir.display());
    println!("Found {} document(s)\n", inputs.len());

    let pipeline = FormPipeline::new();
    let start = Instant::now();
    let mut processed = Vec::new();
    let mut failed = 0;

    for (i, path) in inputs.iter().enumerate() {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("document_{}", i + 1));
        print!("[{}/{}] {} ... ", i + 1, inputs.len(), name);

        let result = read_pages(path).and_then(|pages| {
            let record = pipeline.process_document(path.display().to_string(), &pages, &[]);
            writer.write_document(&name, &record)?;
            for (page_index, page) in pages.iter().enumerate() {
                writer.write_page_tokens(&name, page_index + 1, page)?;
            }
            Ok(record.page_count)
        });

        match result {
            Ok(page_count) => {
                println!("ok ({} pages)", page_count);
                processed.push(name);
            },
            Err(e) => {
                println!("failed: {}", e);
                failed += 1;
            },
        }
    }

    if let Err(e) = writer.write_manifest(&processed) {
        eprintln!("Failed to write manifest: {}", e);
        std::process::exit(1);
    }

    println!("\nDone: {} ok, {} failed in {:.2}s", processed.len(), failed, start.elapsed().as_secs_f64());
    if failed > 0 {
        std::process::exit(1);
    }
}
