//! PDF processing module.
//!
//! Text comes out two ways: plain page text for header fields, and
//! positioned runs that feed table detection.

mod extractor;
mod layout;
mod table;

pub use extractor::PdfExtractor;
pub use layout::{group_lines, RunCollector, TextLine, TextRun};
pub use table::{DetectedTable, TableDetector};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract plain text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract positioned text runs from a specific page (1-indexed).
    fn extract_page_runs(&self, page: u32) -> Result<Vec<TextRun>>;
}
