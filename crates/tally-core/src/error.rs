//! Error types for the tally-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the tally library.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Structured (CSV export) lane error.
    #[error("structured invoice error: {0}")]
    Structured(#[from] StructuredError),

    /// Unstructured (PDF) lane extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Master catalog could not be used.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while reading a structured CSV export.
#[derive(Error, Debug)]
pub enum StructuredError {
    /// One or more required columns are absent from the header.
    #[error(
        "missing required columns in CSV: {}. Available columns: {}",
        .missing.join(", "),
        .found.join(", ")
    )]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// The input has no header row at all.
    #[error("the uploaded CSV file is empty: {0}")]
    EmptyInput(String),

    /// The input is not well-formed CSV.
    #[error("error parsing CSV file: {0}")]
    MalformedInput(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Page number out of range.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// Failed to decode a page content stream.
    #[error("failed to decode content of page {page}: {reason}")]
    Content { page: u32, reason: String },

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),
}

/// Errors raised by the unstructured (PDF) lane.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The underlying PDF library failed.
    #[error("failed to extract data from PDF: {0}")]
    Pdf(#[from] PdfError),

    /// The document parsed but no invoice item could be found.
    #[error("could not extract any data from PDF invoice")]
    NoItems,
}

/// Errors related to loading the master catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog reference does not exist.
    #[error("vendor master file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The catalog exists but could not be read.
    #[error("error loading vendor master file: {0}")]
    Load(String),
}

/// Result type for the tally library.
pub type Result<T> = std::result::Result<T, TallyError>;
