//! Rule-based field extractors for vendor invoices.

pub mod dates;
pub mod header;
pub mod patterns;
pub mod sizes;

pub use dates::{normalize_date, parse_date};
pub use header::{extract_header, InvoiceHeader, InvoiceDateExtractor, InvoiceNumberExtractor};
pub use sizes::{normalize_size, SizeNormalizer};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}
