use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for the numeric pipeline stages.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the value as a string label, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded batch input
// ---------------------------------------------------------------------------

/// An in-memory table with a fixed column order.
///
/// Column order is preserved exactly as read from the source file so that
/// extra (non-feature) columns round-trip untouched into the exported CSV.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Ordered column names, as they appeared in the source file.
    pub columns: Vec<String>,
    /// Row-major cells; every row has `columns.len()` entries.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Index of a column by exact name match.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column index). `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Append a column on the right; `values` must have one entry per row.
    pub fn push_column(&mut self, name: &str, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_index_is_exact_match() {
        let table = Table::new(vec!["Substance".into(), "Unit".into()]);
        assert_eq!(table.column_index("Substance"), Some(0));
        // Misspellings and case changes never resolve.
        assert_eq!(table.column_index("Substace"), None);
        assert_eq!(table.column_index("substance"), None);
    }

    #[test]
    fn push_column_keeps_row_width() {
        let mut table = Table::new(vec!["a".into()]);
        assert!(table.is_empty());
        table.rows.push(vec![CellValue::Integer(1)]);
        table.rows.push(vec![CellValue::Integer(2)]);
        table.push_column("pred", vec![CellValue::Float(0.5), CellValue::Float(1.5)]);
        assert_eq!(table.columns, vec!["a", "pred"]);
        assert_eq!(table.get(1, 1), Some(&CellValue::Float(1.5)));
    }

    #[test]
    fn cell_numeric_coercion() {
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Float(1.25).as_f64(), Some(1.25));
        assert_eq!(CellValue::String("3".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }
}
