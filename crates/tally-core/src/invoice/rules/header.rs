//! Invoice header fields read from the first page text.

use super::FieldExtractor;
use super::patterns::{INVOICE_DATE, INVOICE_NUMBER};

/// Invoice number extractor.
pub struct InvoiceNumberExtractor;

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        INVOICE_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }
}

/// Invoice date extractor. The date is kept as printed.
pub struct InvoiceDateExtractor;

impl FieldExtractor for InvoiceDateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        INVOICE_DATE
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }
}

/// Header metadata shared by every item on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceHeader {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
}

/// Extract the invoice number and date. Missing fields are not an error.
pub fn extract_header(text: &str) -> InvoiceHeader {
    InvoiceHeader {
        invoice_number: InvoiceNumberExtractor.extract(text),
        invoice_date: InvoiceDateExtractor.extract(text),
    }
}
