//! Vendor-aware ingestion: lane dispatch plus configured parsers and matcher.

use std::path::Path;

use tracing::{debug, info};

use crate::catalog::{CatalogMatcher, CatalogSource};
use crate::error::{Result, TallyError};
use crate::invoice::rules::SizeNormalizer;
use crate::invoice::{match_items, PdfInvoiceParser, StructuredParser};
use crate::models::config::{Lane, TallyConfig};
use crate::models::invoice::{IngestReport, ProcessedInvoiceRow, StructuredInvoiceRow};

/// Rows produced by one ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutput {
    /// Canonical rows from a CSV export.
    Structured(Vec<StructuredInvoiceRow>),
    /// Matched rows from a PDF invoice.
    Unstructured(Vec<ProcessedInvoiceRow>),
}

impl IngestOutput {
    /// Lane the rows came from.
    pub fn lane(&self) -> Lane {
        match self {
            IngestOutput::Structured(_) => Lane::Structured,
            IngestOutput::Unstructured(_) => Lane::Unstructured,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IngestOutput::Structured(rows) => rows.len(),
            IngestOutput::Unstructured(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row and match counts.
    pub fn report(&self) -> IngestReport {
        match self {
            IngestOutput::Structured(rows) => IngestReport::for_structured(rows),
            IngestOutput::Unstructured(rows) => IngestReport::for_processed(rows),
        }
    }
}

/// Runs vendor documents through the lane their profile names.
#[derive(Debug, Clone, Default)]
pub struct InvoiceIngester {
    config: TallyConfig,
}

impl InvoiceIngester {
    pub fn new(config: TallyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TallyConfig {
        &self.config
    }

    /// PDF parser built from the layout and size settings.
    pub fn pdf_parser(&self) -> PdfInvoiceParser {
        PdfInvoiceParser::new()
            .with_pdf_config(self.config.pdf.clone())
            .with_size_normalizer(
                SizeNormalizer::new().with_liter_cutoff(self.config.sizes.liter_cutoff),
            )
    }

    /// Parse a structured CSV export.
    pub fn process_structured(&self, data: &[u8]) -> Result<Vec<StructuredInvoiceRow>> {
        let rows = StructuredParser::new().parse(data)?;
        log_report(&IngestReport::for_structured(&rows));
        Ok(rows)
    }

    /// Extract items from a PDF invoice and match them against `catalog`.
    ///
    /// The PDF is read first; the catalog is only resolved once items exist.
    pub fn process_unstructured<S: CatalogSource + ?Sized>(
        &self,
        data: &[u8],
        catalog: &S,
    ) -> Result<Vec<ProcessedInvoiceRow>> {
        let items = self.pdf_parser().extract_items(data)?;

        let catalog = catalog.load_catalog()?;
        debug!("Matching {} items against {} catalog rows", items.len(), catalog.len());

        let matcher = CatalogMatcher::from_config(&catalog, &self.config.matching);
        let rows = match_items(items, &matcher);

        log_report(&IngestReport::for_processed(&rows));
        Ok(rows)
    }

    /// Process a document for a configured vendor.
    ///
    /// `catalog_override` replaces the vendor's default master catalog.
    pub fn process(
        &self,
        vendor_id: &str,
        data: &[u8],
        catalog_override: Option<&Path>,
    ) -> Result<IngestOutput> {
        let vendor = self
            .config
            .vendors
            .get(vendor_id)
            .ok_or_else(|| TallyError::Config(format!("unknown vendor: {}", vendor_id)))?;

        debug!("Processing document for {} ({:?} lane)", vendor.name, vendor.lane);

        match vendor.lane {
            Lane::Structured => self.process_structured(data).map(IngestOutput::Structured),
            Lane::Unstructured => {
                let catalog = catalog_override
                    .or(vendor.catalog.as_deref())
                    .ok_or_else(|| {
                        TallyError::Config(format!("no master catalog configured for vendor {}", vendor.id))
                    })?;
                self.process_unstructured(data, catalog)
                    .map(IngestOutput::Unstructured)
            }
        }
    }
}

fn log_report(report: &IngestReport) {
    info!(
        "Processed {} rows, {} matched ({:.1}%)",
        report.total_rows,
        report.matched_rows,
        report.match_rate()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MasterCatalog;
    use crate::error::{CatalogError, StructuredError};
    use crate::fixtures::sample_invoice_pdf;
    use crate::models::config::VendorProfile;
    use crate::models::invoice::MatchedId;
    use std::io::Write;

    fn write_catalog(rows: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Product Name,Internal ID,Size (ml)").unwrap();
        write!(file, "{rows}").unwrap();
        file
    }

    #[test]
    fn test_process_structured_vendor() {
        let csv = "Vendor Name,Process Date,Invoice Number,Product Number,Quantity,Unit Cost,Product Description\n\
                   Fintech,2024-05-01 08:00:00,F-1,P-1,3,2.00,Beer\n";
        let output = InvoiceIngester::default()
            .process("fintech", csv.as_bytes(), None)
            .unwrap();

        assert_eq!(output.lane(), Lane::Structured);
        assert_eq!(output.len(), 1);
        assert_eq!(output.report().match_rate(), 100.0);
    }

    #[test]
    fn test_header_only_export_is_empty() {
        let csv = "Vendor Name,Process Date,Invoice Number,Product Number,Quantity,Unit Cost,Product Description\n";
        let output = InvoiceIngester::default()
            .process("fintech", csv.as_bytes(), None)
            .unwrap();

        assert!(output.is_empty());
        assert_eq!(output.report().total_rows, 0);
    }

    #[test]
    fn test_structured_errors_surface() {
        let err = InvoiceIngester::default()
            .process("fintech", b"", None)
            .unwrap_err();
        assert!(matches!(err, TallyError::Structured(StructuredError::EmptyInput(_))));
    }

    #[test]
    fn test_unknown_vendor() {
        let err = InvoiceIngester::default()
            .process("acme", b"", None)
            .unwrap_err();
        assert!(matches!(err, TallyError::Config(msg) if msg.contains("acme")));
    }

    #[test]
    fn test_unstructured_with_override() {
        let catalog = write_catalog("Widget A 750ml,W-1,750\nGizmo Deluxe,G-9,1750\n");
        let output = InvoiceIngester::default()
            .process("specs", &sample_invoice_pdf(), Some(catalog.path()))
            .unwrap();

        let IngestOutput::Unstructured(rows) = &output else {
            panic!("expected unstructured output");
        };
        assert_eq!(rows[0].matched_id, MatchedId::Matched("W-1".to_string()));
        assert_eq!(output.report().matched_rows, 2);
    }

    #[test]
    fn test_default_catalog_missing() {
        // the default specs catalog path is relative and absent in the test cwd
        let err = InvoiceIngester::default()
            .process("specs", &sample_invoice_pdf(), None)
            .unwrap_err();
        assert!(matches!(err, TallyError::Catalog(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_vendor_without_catalog() {
        let mut config = TallyConfig::default();
        config.vendors.0.push(VendorProfile {
            id: "local".to_string(),
            name: "Local PDF".to_string(),
            lane: Lane::Unstructured,
            catalog: None,
        });

        let err = InvoiceIngester::new(config)
            .process("local", &sample_invoice_pdf(), None)
            .unwrap_err();
        assert!(matches!(err, TallyError::Config(_)));
    }

    #[test]
    fn test_configured_threshold() {
        let catalog = MasterCatalog::new(
            vec!["Name".into(), "ID".into()],
            vec![vec!["Widget A Special".into(), "W-S".into()]],
        );

        let mut config = TallyConfig::default();
        let rows = InvoiceIngester::new(config.clone())
            .process_unstructured(&sample_invoice_pdf(), &catalog)
            .unwrap();
        assert!(rows[0].matched_id.is_match());

        config.matching.min_score = 101.0;
        let rows = InvoiceIngester::new(config)
            .process_unstructured(&sample_invoice_pdf(), &catalog)
            .unwrap();
        assert!(rows.iter().all(|r| !r.matched_id.is_match()));
    }
}
