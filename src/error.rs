//! Error types for document ingestion, rendering, detection and export.

use std::path::PathBuf;

use thiserror::Error;

/// Input errors raised while opening a PDF. Nothing in the session changes when these occur.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Not a PDF file: {}", path.display())]
    NotPdf { path: PathBuf },

    #[error("File is too large ({size} bytes, limit is {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Could not read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File does not start with a PDF header")]
    MissingHeader,

    #[error("PDF could not be parsed")]
    Parse(#[source] lopdf::Error),

    #[error("PDF has no pages")]
    NoPages,
}

/// Page rasterization errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF rendering library is not available: {message}")]
    LibraryUnavailable { message: String },

    #[error("Failed to open document for rendering: {message}")]
    Open { message: String },

    #[error("Page {page} does not exist (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("Failed to render page {page}: {message}")]
    Render { page: usize, message: String },
}

/// Suggestion service errors
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Detector endpoint is not configured")]
    NotConfigured,

    #[error("Detector did not answer in time")]
    Timeout,

    #[error("Failed to encode page image")]
    Encode(#[source] image::ImageError),

    #[error("Detector request failed: {message}")]
    Transport { message: String },

    #[error("Detector returned status {status}")]
    Status { status: u16 },

    #[error("Invalid response from detector")]
    InvalidResponse(#[source] std::io::Error),
}

/// Export errors. Per-mask problems fall back to solid fills and never surface here.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to load document for export")]
    Load(#[source] lopdf::Error),

    #[error("Failed to serialize exported document: {message}")]
    Save { message: String },

    #[error("Page object {0:?} is malformed")]
    MalformedPage(lopdf::ObjectId),

    #[error("Could not write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
