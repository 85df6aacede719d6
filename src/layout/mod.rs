//! Layout analysis for OCR token streams.
//!
//! OCR engines emit tokens in production order, which only loosely follows
//! the printed layout. This module rebuilds the layout structure needed by
//! anchor-relative harvesting: tokens clustered into top-to-bottom text
//! lines, each line ordered left-to-right.

pub mod lines;

pub use lines::{group_lines, Line};
