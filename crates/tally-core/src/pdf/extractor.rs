//! PDF text extraction using lopdf and pdf-extract.
//!
//! pdf-extract panics on some malformed fonts and content streams, so every
//! call into it runs under [`std::panic::catch_unwind`] and a panic surfaces
//! as a [`PdfError`] for that page.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, trace};

use super::layout::{RunCollector, TextRun};
use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    /// pdf-extract's own parse of the same bytes (it pins an older lopdf).
    layout: Option<pdf_extract::Document>,
    raw_data: Vec<u8>,
    split_gap_em: f32,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            layout: None,
            raw_data: Vec::new(),
            split_gap_em: 2.0,
        }
    }

    /// Set the horizontal gap (in ems) between two glyphs that separates
    /// two runs.
    pub fn with_split_gap(mut self, split_gap_em: f32) -> Self {
        self.split_gap_em = split_gap_em;
        self
    }

    /// Create an extractor and load `data` into it.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        Ok(extractor)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    fn check_page(&self, page: u32) -> Result<()> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        Ok(())
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `f`, turning both its error and a panic into a message.
fn guarded<T, E, F>(f: F) -> std::result::Result<T, String>
where
    E: Display,
    F: FnOnce() -> std::result::Result<T, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("pdf-extract panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract reads the bytes, so keep the decrypted form
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let layout = guarded(|| pdf_extract::Document::load_mem(&self.raw_data))
            .map_err(PdfError::Parse)?;

        debug!("Loaded PDF with {} pages", doc.get_pages().len());
        self.document = Some(doc);
        self.layout = Some(layout);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        self.check_page(page)?;

        match guarded(|| pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)) {
            Ok(pages) => Ok(pages
                .into_iter()
                .nth(page as usize - 1)
                .unwrap_or_default()),
            Err(reason) => {
                debug!("pdf-extract failed ({}), falling back to lopdf text", reason);
                guarded(|| doc.extract_text(&[page])).map_err(PdfError::TextExtraction)
            }
        }
    }

    fn extract_page_runs(&self, page: u32) -> Result<Vec<TextRun>> {
        self.check_page(page)?;
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        let mut collector = RunCollector::new(self.split_gap_em);
        guarded(|| pdf_extract::output_doc_page(layout, &mut collector, page))
            .map_err(|reason| PdfError::Content { page, reason })?;

        let runs = collector.into_runs();
        trace!("Page {}: {} text runs", page, runs.len());
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{broken_cid_font_pdf, identity_h_pdf, pdf_with_pages};

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_load_garbage() {
        let mut extractor = PdfExtractor::new();
        assert!(matches!(
            extractor.load(b"not a pdf at all"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_page_runs() {
        let data = pdf_with_pages(&[
            &[(50, 780, "Invoice #: INV-7")],
            &[(50, 700, "SKU"), (150, 700, "Description")],
        ]);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();
        assert_eq!(extractor.page_count(), 2);

        let runs = extractor.extract_page_runs(2).unwrap();
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["SKU", "Description"]);
        assert_eq!(runs[1].x, 150.0);
    }

    #[test]
    fn test_page_text() {
        let data = pdf_with_pages(&[&[(50, 780, "Invoice #: INV-7")]]);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();
        let text = extractor.extract_page_text(1).unwrap();
        assert!(text.contains("INV-7"), "got {text:?}");
    }

    #[test]
    fn test_invalid_page() {
        let data = pdf_with_pages(&[&[(50, 780, "only page")]]);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();
        assert!(matches!(
            extractor.extract_page_runs(3),
            Err(PdfError::InvalidPage(3))
        ));
        assert!(matches!(
            extractor.extract_page_text(0),
            Err(PdfError::InvalidPage(0))
        ));
    }

    #[test]
    fn test_identity_h_font_runs() {
        let data = identity_h_pdf(&[(50, 700, "SKU"), (150, 700, "Widget A 750ml")]);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();

        let runs = extractor.extract_page_runs(1).unwrap();
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["SKU", "Widget A 750ml"]);
        assert_eq!(runs[0].font_size, 10.0);
    }

    #[test]
    fn test_font_panic_becomes_content_error() {
        let data = broken_cid_font_pdf(&[(50, 700, "SKU"), (150, 700, "Qty")]);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();

        match extractor.extract_page_runs(1) {
            Err(PdfError::Content { page, reason }) => {
                assert_eq!(page, 1);
                assert!(reason.contains("panicked"), "got {reason:?}");
            }
            other => panic!("expected a content error, got {other:?}"),
        }
        // the text path falls back to lopdf instead of unwinding
        let _ = extractor.extract_page_text(1);
    }
}
