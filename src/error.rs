//! Error types for the form extraction library.
//!
//! Per-field failures (missing anchor, empty harvest, unparsable text,
//! ambiguous booleans, degenerate detector input) are not errors: each
//! resolves locally to `None`/empty and never aborts sibling fields. The
//! variants here cover the collaborator seams only: artifact I/O, JSON
//! serialization, and raster input handed to the visual detectors.

/// Result type alias for form extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the library's collaborator boundaries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error while writing run artifacts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raster input could not be processed by a visual detector
    #[error("Image error: {0}")]
    Image(String),

    /// Page metadata is structurally invalid (non-positive dimensions)
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}
