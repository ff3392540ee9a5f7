//! Structured lane: vendor CSV exports with a fixed column contract.

use tracing::debug;

use crate::error::StructuredError;
use crate::invoice::rules::normalize_date;
use crate::models::invoice::{StructuredInvoiceRow, REQUIRED_COLUMNS};
use crate::table::{CsvTable, TableReadError};

/// Parses structured vendor exports.
///
/// The export must carry every column of [`REQUIRED_COLUMNS`]. Rows are
/// projected to those columns in source order and the process date is
/// rewritten as `YYYY-MM-DD` where possible.
#[derive(Debug, Clone, Default)]
pub struct StructuredParser;

impl StructuredParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV bytes into canonical rows.
    pub fn parse(&self, data: &[u8]) -> Result<Vec<StructuredInvoiceRow>, StructuredError> {
        let table = CsvTable::read(data).map_err(|e| match e {
            TableReadError::Empty(msg) => StructuredError::EmptyInput(msg),
            TableReadError::Malformed(msg) => StructuredError::MalformedInput(msg),
        })?;

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| table.column(col).is_none())
            .map(|col| col.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(StructuredError::Schema {
                missing,
                found: table.headers.clone(),
            });
        }

        // every required column was found above
        let index: Vec<usize> = REQUIRED_COLUMNS
            .iter()
            .filter_map(|col| table.column(col))
            .collect();

        let rows: Vec<StructuredInvoiceRow> = table
            .rows
            .iter()
            .map(|row| {
                let cell = |i: usize| row[index[i]].clone();
                StructuredInvoiceRow {
                    vendor_name: cell(0),
                    process_date: normalize_date(&row[index[1]]),
                    invoice_number: cell(2),
                    product_number: cell(3),
                    quantity: cell(4),
                    unit_cost: cell(5),
                    product_description: cell(6),
                }
            })
            .collect();

        debug!("Parsed {} structured invoice rows", rows.len());
        Ok(rows)
    }
}

/// Parse a structured vendor export.
pub fn process_structured(data: &[u8]) -> Result<Vec<StructuredInvoiceRow>, StructuredError> {
    StructuredParser::new().parse(data)
}
