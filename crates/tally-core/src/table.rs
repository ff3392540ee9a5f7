//! Header-plus-rows CSV reading shared by vendor exports and master catalogs.

use std::io::Read;

use tracing::trace;

/// Why a CSV table could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TableReadError {
    /// No header row.
    Empty(String),
    /// Bad encoding, bad quoting, or a row wider than the header.
    Malformed(String),
}

/// A CSV table held in memory as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Column names from the header row.
    pub headers: Vec<String>,
    /// Data rows, each padded to the header width.
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a column by exact (trimmed) name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Read a comma-separated table with a header row.
    ///
    /// Rows shorter than the header are padded with empty cells; rows longer
    /// than the header are rejected.
    pub(crate) fn read<R: Read>(reader: R) -> Result<Self, TableReadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| TableReadError::Malformed(e.to_string()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(TableReadError::Empty(
                "no columns to parse from file".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| TableReadError::Malformed(e.to_string()))?;

            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(TableReadError::Malformed(format!(
                    "expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        trace!("Read CSV table: {} columns, {} rows", headers.len(), rows.len());

        Ok(Self { headers, rows })
    }
}
