//! Locating invoice fields in a table header row.

/// Header spellings for the product code column.
pub const SKU_ALIASES: &[&str] = &["sku", "item", "product number", "code"];

/// Header spellings for the description column.
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "product", "item description"];

/// Header spellings for the quantity column.
pub const QUANTITY_ALIASES: &[&str] = &["qty", "quantity", "qty.", "qty:"];

/// Header spellings for the unit price column.
pub const PRICE_ALIASES: &[&str] = &["price", "unit price", "unit cost", "cost"];

/// Header spellings for the size column.
pub const SIZE_ALIASES: &[&str] = &["size", "volume", "ml", "ml:", "size (ml)"];

/// Every alias of every field, for spotting header rows.
pub fn header_keywords() -> impl Iterator<Item = &'static str> {
    [
        SKU_ALIASES,
        DESCRIPTION_ALIASES,
        QUANTITY_ALIASES,
        PRICE_ALIASES,
        SIZE_ALIASES,
    ]
    .into_iter()
    .flatten()
    .copied()
}

/// Index of the first header cell that contains any alias, ignoring case.
///
/// Cells are scanned left to right; the first cell with a hit wins. Empty
/// cells never match.
pub fn find_column<S: AsRef<str>>(header: &[S], aliases: &[&str]) -> Option<usize> {
    header.iter().position(|cell| {
        let cell = cell.as_ref().trim().to_lowercase();
        !cell.is_empty() && aliases.iter().any(|alias| cell.contains(alias))
    })
}

/// Field positions of an item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub sku: Option<usize>,
    pub description: Option<usize>,
    pub quantity: Option<usize>,
    pub unit_price: Option<usize>,
    pub size: Option<usize>,
}

impl ColumnMap {
    /// Resolve every field against a header row.
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            sku: find_column(header, SKU_ALIASES),
            description: find_column(header, DESCRIPTION_ALIASES),
            quantity: find_column(header, QUANTITY_ALIASES),
            unit_price: find_column(header, PRICE_ALIASES),
            size: find_column(header, SIZE_ALIASES),
        }
    }

    /// Highest index among the SKU, description, quantity and price columns.
    pub fn widest(&self) -> Option<usize> {
        [self.sku, self.description, self.quantity, self.unit_price]
            .into_iter()
            .flatten()
            .max()
    }

    /// Cell text for a column, trimmed; empty when the column is absent.
    pub fn cell<S: AsRef<str>>(row: &[S], column: Option<usize>) -> String {
        column
            .and_then(|i| row.get(i))
            .map(|cell| cell.as_ref().trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_column_case_insensitive_substring() {
        let header = ["Line", "Item Code", "Unit Price (USD)"];
        assert_eq!(find_column(&header, PRICE_ALIASES), Some(2));
        assert_eq!(find_column(&header, SKU_ALIASES), Some(1));
        assert_eq!(find_column(&header, QUANTITY_ALIASES), None);
    }

    #[test]
    fn test_find_column_first_cell_wins() {
        // "Product" matches the description aliases before "Description" does
        let header = ["Product", "Description"];
        assert_eq!(find_column(&header, DESCRIPTION_ALIASES), Some(0));
    }

    #[test]
    fn test_find_column_ignores_empty_cells() {
        let header = ["", "  ", "QTY."];
        assert_eq!(find_column(&header, QUANTITY_ALIASES), Some(2));
        let empty: [&str; 0] = [];
        assert_eq!(find_column(&empty, QUANTITY_ALIASES), None);
    }

    #[test]
    fn test_column_map() {
        let header = ["Item", "Description", "Size", "Qty", "Unit Price"];
        let map = ColumnMap::from_header(&header);
        // "Item Description" style headers would also hit sku, the leftmost cell wins
        assert_eq!(map.sku, Some(0));
        assert_eq!(map.description, Some(1));
        assert_eq!(map.size, Some(2));
        assert_eq!(map.quantity, Some(3));
        assert_eq!(map.unit_price, Some(4));
        assert_eq!(map.widest(), Some(4));
    }

    #[test]
    fn test_column_map_none() {
        let map = ColumnMap::from_header(&["Foo", "Bar"]);
        assert_eq!(map.sku, None);
        assert_eq!(map.size, None);
        assert_eq!(map.widest(), None);
    }

    #[test]
    fn test_cell() {
        let row = [" A-1 ", "Widget"];
        assert_eq!(ColumnMap::cell(&row, Some(0)), "A-1");
        assert_eq!(ColumnMap::cell(&row, Some(5)), "");
        assert_eq!(ColumnMap::cell(&row, None), "");
    }
}
