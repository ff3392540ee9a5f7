//! Master product catalog and approximate description matching.

mod matcher;
pub mod similarity;

pub use matcher::{CatalogMatch, CatalogMatcher, Scorer, TokenSetScorer};

use std::borrow::Cow;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CatalogError;
use crate::table::{CsvTable, TableReadError};

/// Accepted product-name columns, in priority order.
pub const NAME_COLUMNS: &[&str] = &["Product Name", "Name", "Description", "Product Description"];

/// Accepted identifier columns, in priority order.
pub const ID_COLUMNS: &[&str] = &["Internal ID", "ID", "Product ID", "SKU", "Product Number"];

/// Accepted size (milliliters) columns, in priority order.
pub const SIZE_COLUMNS: &[&str] = &["Size (ml)", "Normalized Size"];

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// The authoritative product table extracted descriptions are reconciled against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterCatalog {
    table: CsvTable,
}

impl MasterCatalog {
    /// Build a catalog from a header and rows. Rows are padded to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            table: CsvTable { headers, rows },
        }
    }

    /// Read a catalog from CSV data.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let table = CsvTable::read(reader).map_err(|e| match e {
            TableReadError::Empty(msg) | TableReadError::Malformed(msg) => CatalogError::Load(msg),
        })?;
        Ok(Self { table })
    }

    /// Read a catalog from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CatalogError::NotFound(path.to_path_buf()),
            _ => CatalogError::Load(e.to_string()),
        })?;

        let catalog = Self::from_reader(file)?;
        debug!(
            "Loaded master catalog {} with {} rows",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    /// Catalog rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.table.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    /// Check if the catalog has no rows.
    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// First alias that names a column of this catalog, as a column index.
    pub fn find_column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| self.table.column(alias))
    }
}

/// Anything the caller can resolve into a master catalog.
pub trait CatalogSource {
    /// Resolve the reference into a table.
    fn load_catalog(&self) -> Result<Cow<'_, MasterCatalog>>;
}

impl CatalogSource for MasterCatalog {
    fn load_catalog(&self) -> Result<Cow<'_, MasterCatalog>> {
        Ok(Cow::Borrowed(self))
    }
}

impl CatalogSource for Path {
    fn load_catalog(&self) -> Result<Cow<'_, MasterCatalog>> {
        MasterCatalog::from_path(self).map(Cow::Owned)
    }
}

impl CatalogSource for PathBuf {
    fn load_catalog(&self) -> Result<Cow<'_, MasterCatalog>> {
        self.as_path().load_catalog()
    }
}
