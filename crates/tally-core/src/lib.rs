//! Core library for vendor invoice ingestion.
//!
//! This crate provides:
//! - Structured lane: CSV exports validated against a fixed column contract
//! - Unstructured lane: item tables and header fields extracted from PDFs
//! - Bottle size normalization to milliliters
//! - Token-set fuzzy matching against a master product catalog
//! - CSV, JSON and text output of the resulting rows

pub mod catalog;
pub mod error;
pub mod export;
pub mod ingest;
pub mod invoice;
pub mod models;
pub mod pdf;
mod table;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog::{CatalogMatcher, CatalogSource, MasterCatalog, Scorer, TokenSetScorer};
pub use error::{CatalogError, ExtractionError, PdfError, Result, StructuredError, TallyError};
pub use ingest::{IngestOutput, InvoiceIngester};
pub use invoice::{find_column, process_structured, process_unstructured};
pub use invoice::rules::{normalize_date, normalize_size, SizeNormalizer};
pub use models::config::{Lane, TallyConfig, VendorProfile};
pub use models::invoice::{
    IngestReport, MatchedId, ProcessedInvoiceRow, RawInvoiceItem, StructuredInvoiceRow, NO_MATCH,
};
pub use table::CsvTable;
