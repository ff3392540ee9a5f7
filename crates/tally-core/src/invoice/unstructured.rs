//! Unstructured lane: item tables printed in vendor PDF invoices.

use tracing::{debug, info};

use super::columns::{header_keywords, ColumnMap};
use crate::catalog::{CatalogMatcher, CatalogSource, Scorer};
use crate::error::ExtractionError;
use crate::invoice::rules::{extract_header, InvoiceHeader, SizeNormalizer};
use crate::models::config::PdfConfig;
use crate::models::invoice::{MatchedId, ProcessedInvoiceRow, RawInvoiceItem};
use crate::pdf::{group_lines, DetectedTable, PdfExtractor, PdfProcessor, TableDetector};

/// Extracts line items from PDF invoices.
#[derive(Debug, Clone)]
pub struct PdfInvoiceParser {
    config: PdfConfig,
    sizes: SizeNormalizer,
}

impl PdfInvoiceParser {
    pub fn new() -> Self {
        Self {
            config: PdfConfig::default(),
            sizes: SizeNormalizer::new(),
        }
    }

    /// Set layout and table detection options.
    pub fn with_pdf_config(mut self, config: PdfConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the size normalizer used for size cells.
    pub fn with_size_normalizer(mut self, sizes: SizeNormalizer) -> Self {
        self.sizes = sizes;
        self
    }

    /// Extract every item row from a PDF document.
    pub fn extract_items(&self, data: &[u8]) -> Result<Vec<RawInvoiceItem>, ExtractionError> {
        let mut pdf = PdfExtractor::new().with_split_gap(self.config.split_gap_em);
        pdf.load(data)?;
        self.extract_items_from(&pdf)
    }

    /// Extract every item row from an already loaded document.
    ///
    /// Fails with [`ExtractionError::NoItems`] when no table yields an item.
    pub fn extract_items_from<P: PdfProcessor>(
        &self,
        pdf: &P,
    ) -> Result<Vec<RawInvoiceItem>, ExtractionError> {
        let page_count = pdf.page_count();

        let header = if page_count > 0 {
            extract_header(&pdf.extract_page_text(1)?)
        } else {
            InvoiceHeader::default()
        };
        debug!(
            "Invoice header: number={:?}, date={:?}",
            header.invoice_number, header.invoice_date
        );

        let detector = TableDetector::new(&self.config).with_header_keywords(header_keywords());

        let mut items = Vec::new();
        for page in 1..=page_count {
            let runs = pdf.extract_page_runs(page)?;
            let lines = group_lines(runs, self.config.line_tolerance);

            for table in detector.detect(&lines) {
                if table.rows.len() < 2 {
                    continue;
                }
                items.extend(self.items_from_table(&table, &header));
            }
        }

        if items.is_empty() {
            return Err(ExtractionError::NoItems);
        }

        info!("Extracted {} items from {} pages", items.len(), page_count);
        Ok(items)
    }

    /// Turn the data rows of one table into items.
    ///
    /// Rows too short to reach the SKU, description, quantity and price
    /// columns are skipped, as are rows with neither description nor SKU.
    pub fn items_from_table(
        &self,
        table: &DetectedTable,
        header: &InvoiceHeader,
    ) -> Vec<RawInvoiceItem> {
        let columns = ColumnMap::from_header(table.header());
        let widest = columns.widest().unwrap_or(0);

        let mut items = Vec::new();
        for row in table.data_rows() {
            if row.is_empty() || row.len() <= widest {
                continue;
            }

            let sku = ColumnMap::cell(row, columns.sku);
            let description = ColumnMap::cell(row, columns.description);
            if sku.is_empty() && description.is_empty() {
                continue;
            }

            let size = ColumnMap::cell(row, columns.size);
            let normalized_size = if size.is_empty() {
                self.sizes.normalize(&description)
            } else {
                self.sizes.normalize(&size)
            };

            items.push(RawInvoiceItem {
                invoice_number: header.invoice_number.clone(),
                invoice_date: header.invoice_date.clone(),
                sku,
                description,
                quantity: ColumnMap::cell(row, columns.quantity),
                unit_price: ColumnMap::cell(row, columns.unit_price),
                size,
                normalized_size,
            });
        }
        items
    }
}

impl Default for PdfInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Match extracted items against a catalog. Unmatched items get "No Match".
pub fn match_items<S: Scorer>(
    items: Vec<RawInvoiceItem>,
    matcher: &CatalogMatcher<'_, S>,
) -> Vec<ProcessedInvoiceRow> {
    items
        .into_iter()
        .map(|item| {
            let matched = MatchedId::from(matcher.match_id(&item.description, item.normalized_size));
            ProcessedInvoiceRow::from_item(item, matched)
        })
        .collect()
}

/// Extract items from a PDF invoice and match them against a catalog with
/// default settings.
///
/// The document is read before the catalog is resolved, so an unreadable
/// PDF is reported even when the catalog is also missing.
pub fn process_unstructured<S: CatalogSource + ?Sized>(
    data: &[u8],
    catalog: &S,
) -> crate::Result<Vec<ProcessedInvoiceRow>> {
    let items = PdfInvoiceParser::new().extract_items(data)?;
    let catalog = catalog.load_catalog()?;
    let matcher = CatalogMatcher::new(&catalog);
    Ok(match_items(items, &matcher))
}
