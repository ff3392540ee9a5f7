//! Table detection over positioned text lines.
//!
//! A table starts at a header line: a line with enough cells where at least
//! two, and at least half, are digit-free cells containing a header keyword.
//! Header cells fix the column anchors. Every following line with enough
//! cells becomes a row, each run landing in the column whose anchor is
//! nearest. A line with too few cells is wrapped text and is appended to the
//! row above it.
//!
//! The table ends at the next header line, at a vertical gap wider than
//! `max_row_gap_em` line heights, or at the end of the page.

use tracing::debug;

use super::layout::{TextLine, TextRun};
use crate::models::config::PdfConfig;

/// A table found on a page. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedTable {
    pub rows: Vec<Vec<String>>,
}

impl DetectedTable {
    /// Header cells.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Finds header-anchored tables in page lines.
#[derive(Debug, Clone)]
pub struct TableDetector {
    min_columns: usize,
    max_row_gap_em: f32,
    header_keywords: Vec<String>,
}

/// Font size assumed for lines that carry none.
const FALLBACK_LINE_HEIGHT: f32 = 10.0;

struct OpenTable {
    anchors: Vec<f32>,
    table: DetectedTable,
    last_y: f32,
}

impl TableDetector {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            min_columns: config.min_columns.max(1),
            max_row_gap_em: config.max_row_gap_em,
            header_keywords: Vec::new(),
        }
    }

    /// Words that identify a header cell (case-insensitive substring).
    pub fn with_header_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.header_keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Detect tables in lines ordered top to bottom.
    pub fn detect(&self, lines: &[TextLine]) -> Vec<DetectedTable> {
        let mut tables = Vec::new();
        let mut current: Option<OpenTable> = None;

        for line in lines {
            if current
                .as_ref()
                .is_some_and(|open| self.gap_ends_table(open.last_y, line))
            {
                if let Some(open) = current.take() {
                    tables.push(open.table);
                }
            }

            if self.is_header(line) {
                if let Some(open) = current.take() {
                    tables.push(open.table);
                }
                current = Some(OpenTable {
                    anchors: line.runs.iter().map(|r| r.x).collect(),
                    table: DetectedTable {
                        rows: vec![line.runs.iter().map(|r| r.text.clone()).collect()],
                    },
                    last_y: line.y,
                });
                continue;
            }

            let Some(open) = current.as_mut() else {
                continue;
            };
            if line.runs.len() >= self.min_columns {
                let mut row = vec![String::new(); open.anchors.len()];
                fill_columns(&open.anchors, &line.runs, &mut row);
                open.table.rows.push(row);
            } else if open.table.rows.len() > 1 {
                if let Some(row) = open.table.rows.last_mut() {
                    fill_columns(&open.anchors, &line.runs, row);
                }
            }
            open.last_y = line.y;
        }

        if let Some(open) = current {
            tables.push(open.table);
        }

        debug!("Detected {} tables", tables.len());
        tables
    }

    fn gap_ends_table(&self, last_y: f32, line: &TextLine) -> bool {
        let size = line.runs.iter().map(|r| r.font_size).fold(0.0, f32::max);
        let height = if size > 0.0 { size } else { FALLBACK_LINE_HEIGHT };
        last_y - line.y > self.max_row_gap_em * height
    }

    fn is_header(&self, line: &TextLine) -> bool {
        if line.runs.len() < self.min_columns.max(2) {
            return false;
        }
        let hits = line
            .runs
            .iter()
            .filter(|run| {
                let cell = run.text.to_lowercase();
                !cell.chars().any(|c| c.is_ascii_digit())
                    && self.header_keywords.iter().any(|k| cell.contains(k.as_str()))
            })
            .count();
        hits >= 2 && hits * 2 >= line.runs.len()
    }
}

/// Append runs to the cell of the column with the nearest anchor. Text
/// sharing a cell is joined with a space.
fn fill_columns(anchors: &[f32], runs: &[TextRun], row: &mut [String]) {
    for run in runs {
        let column = anchors
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - run.x).abs().total_cmp(&(*b - run.x).abs()))
            .map(|(i, _)| i)
            .unwrap_or(0);

        if let Some(cell) = row.get_mut(column) {
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(&run.text);
        }
    }
}
