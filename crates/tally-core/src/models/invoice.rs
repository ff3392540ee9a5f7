//! Invoice row models shared by both ingestion lanes.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Columns a structured vendor export must carry, in output order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Vendor Name",
    "Process Date",
    "Invoice Number",
    "Product Number",
    "Quantity",
    "Unit Cost",
    "Product Description",
];

/// Sentinel written in place of a catalog identifier when nothing matched.
pub const NO_MATCH: &str = "No Match";

/// A line item as read from a PDF table, before catalog matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInvoiceItem {
    /// Invoice number from the first page header.
    pub invoice_number: Option<String>,
    /// Invoice date as printed by the vendor.
    pub invoice_date: Option<String>,
    /// Vendor SKU, possibly empty.
    pub sku: String,
    /// Free-text product description.
    pub description: String,
    /// Quantity as printed. Vendor formats vary, so it stays text.
    pub quantity: String,
    /// Unit price as printed.
    pub unit_price: String,
    /// Size cell as printed, e.g. "750ML" or "1 L".
    pub size: String,
    /// Size in milliliters when one could be recovered.
    pub normalized_size: Option<u32>,
}

/// One row of a structured vendor export, projected to the required columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredInvoiceRow {
    #[serde(rename = "Vendor Name")]
    pub vendor_name: String,

    /// Always `YYYY-MM-DD` when the source value was recognizable as a date.
    #[serde(rename = "Process Date")]
    pub process_date: String,

    #[serde(rename = "Invoice Number")]
    pub invoice_number: String,

    #[serde(rename = "Product Number")]
    pub product_number: String,

    #[serde(rename = "Quantity")]
    pub quantity: String,

    #[serde(rename = "Unit Cost")]
    pub unit_cost: String,

    #[serde(rename = "Product Description")]
    pub product_description: String,
}

/// Catalog identifier recovered for a PDF line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchedId {
    /// Identifier of the best catalog candidate.
    Matched(String),
    /// No candidate cleared the acceptance threshold.
    NoMatch,
}

impl MatchedId {
    /// Check whether a catalog identifier was found.
    pub fn is_match(&self) -> bool {
        matches!(self, MatchedId::Matched(_))
    }

    /// The identifier, or the `"No Match"` sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            MatchedId::Matched(id) => id,
            MatchedId::NoMatch => NO_MATCH,
        }
    }
}

impl From<Option<String>> for MatchedId {
    fn from(value: Option<String>) -> Self {
        value.map_or(MatchedId::NoMatch, MatchedId::Matched)
    }
}

impl fmt::Display for MatchedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MatchedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MatchedIdVisitor;

        impl Visitor<'_> for MatchedIdVisitor {
            type Value = MatchedId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a catalog identifier or \"No Match\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<MatchedId, E> {
                if value == NO_MATCH {
                    Ok(MatchedId::NoMatch)
                } else {
                    Ok(MatchedId::Matched(value.to_string()))
                }
            }
        }

        deserializer.deserialize_str(MatchedIdVisitor)
    }
}

/// A PDF line item after size normalization and catalog matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedInvoiceRow {
    #[serde(rename = "Invoice Number")]
    pub invoice_number: Option<String>,

    #[serde(rename = "Invoice Date")]
    pub invoice_date: Option<String>,

    #[serde(rename = "SKU")]
    pub sku: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Quantity")]
    pub quantity: String,

    #[serde(rename = "Unit Price")]
    pub unit_price: String,

    #[serde(rename = "Normalized Size (ml)")]
    pub normalized_size: Option<u32>,

    #[serde(rename = "Matched Internal ID")]
    pub matched_id: MatchedId,
}

impl ProcessedInvoiceRow {
    /// Combine an extracted item with its match outcome.
    pub fn from_item(item: RawInvoiceItem, matched_id: MatchedId) -> Self {
        Self {
            invoice_number: item.invoice_number,
            invoice_date: item.invoice_date,
            sku: item.sku,
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            normalized_size: item.normalized_size,
            matched_id,
        }
    }
}

/// Summary of a single ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Rows in the output table.
    pub total_rows: usize,
    /// Rows that carry a catalog identifier.
    pub matched_rows: usize,
}

impl IngestReport {
    /// Report for a structured export. Every row carries its own product number.
    pub fn for_structured(rows: &[StructuredInvoiceRow]) -> Self {
        Self {
            total_rows: rows.len(),
            matched_rows: rows.len(),
        }
    }

    /// Report for matched PDF rows.
    pub fn for_processed(rows: &[ProcessedInvoiceRow]) -> Self {
        Self {
            total_rows: rows.len(),
            matched_rows: rows.iter().filter(|r| r.matched_id.is_match()).count(),
        }
    }

    /// Percentage of rows with a catalog identifier (0 when there are no rows).
    pub fn match_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.matched_rows as f64 / self.total_rows as f64 * 100.0
        }
    }
}
