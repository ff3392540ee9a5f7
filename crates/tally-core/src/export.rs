//! Output tables as CSV, JSON or aligned text.

use std::io::Write;

use serde::Serialize;

use crate::models::invoice::{ProcessedInvoiceRow, StructuredInvoiceRow, REQUIRED_COLUMNS};

/// A row with a fixed column layout.
///
/// Cells come from the row's `Serialize` impl; [`Self::HEADERS`] must list
/// the serialized field names in declaration order.
pub trait TableRow: Serialize {
    /// Column names, in output order.
    const HEADERS: &'static [&'static str];
}

impl TableRow for StructuredInvoiceRow {
    const HEADERS: &'static [&'static str] = &REQUIRED_COLUMNS;
}

impl TableRow for ProcessedInvoiceRow {
    const HEADERS: &'static [&'static str] = &[
        "Invoice Number",
        "Invoice Date",
        "SKU",
        "Description",
        "Quantity",
        "Unit Price",
        "Normalized Size (ml)",
        "Matched Internal ID",
    ];
}

/// Write rows as CSV: header first, one record per line, standard quoting.
/// Absent values are empty cells.
///
/// The header is written even when there are no rows.
pub fn write_csv<T: TableRow, W: Write>(rows: &[T], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!rows.is_empty())
        .from_writer(writer);
    if rows.is_empty() {
        wtr.write_record(T::HEADERS)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render rows as a CSV string.
pub fn to_csv_string<T: TableRow>(rows: &[T]) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render rows as a pretty-printed JSON array keyed by column name.
pub fn to_json<T: Serialize>(rows: &[T]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Render rows as a left-aligned text table.
pub fn to_text<T: TableRow>(rows: &[T]) -> Result<String, csv::Error> {
    let csv = to_csv_string(rows)?;
    let body = csv::Reader::from_reader(csv.as_bytes())
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&render_line(T::HEADERS.iter().copied(), &widths));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for cells in &body {
        out.push_str(&render_line(cells.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    Ok(out)
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    padded.join("  ").trim_end().to_string()
}
