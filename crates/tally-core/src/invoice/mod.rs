//! Invoice ingestion lanes.
//!
//! The structured lane reads vendor CSV exports with a fixed schema. The
//! unstructured lane pulls item tables out of PDF invoices and leaves them
//! ready for catalog matching.

mod columns;
pub mod rules;
mod structured;
mod unstructured;

pub use columns::{
    find_column, header_keywords, ColumnMap, DESCRIPTION_ALIASES, PRICE_ALIASES,
    QUANTITY_ALIASES, SIZE_ALIASES, SKU_ALIASES,
};
pub use structured::{process_structured, StructuredParser};
pub use unstructured::{match_items, process_unstructured, PdfInvoiceParser};
