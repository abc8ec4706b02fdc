//! Tabular records augmented by inventory modules.
//!
//! A [`Table`] is the in-memory form of an uploaded activity spreadsheet:
//! ordered column headers and rows of [`Cell`]s. Modules never modify the
//! input columns; they append derived columns one at a time, so a formula
//! may read any column appended before it.

use crate::errors::{EacvError, EacvResult};
use crate::{normalise_key, FloatValue};
use std::fmt;

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank field or null derived value
    #[default]
    Empty,
    Number(FloatValue),
    Text(String),
}

/// Parse a number written with a decimal comma, optionally grouping
/// thousands with dots (`"0,85"`, `"1.234,56"`).
fn parse_decimal_comma(field: &str) -> Option<FloatValue> {
    let (integer, fraction) = field.split_once(',')?;
    if fraction.contains(['.', ',']) {
        return None;
    }
    let groups: Vec<&str> = integer.trim_start_matches(['-', '+']).split('.').collect();
    let grouped = groups.len() == 1
        || ((1..=3).contains(&groups[0].len()) && groups[1..].iter().all(|g| g.len() == 3));
    if !grouped {
        return None;
    }
    format!("{}.{}", integer.replace('.', ""), fraction)
        .parse::<FloatValue>()
        .ok()
}

/// Parse a numeric field, accepting the Brazilian decimal comma.
///
/// Non-finite values are rejected.
pub(crate) fn parse_number(field: &str) -> Option<FloatValue> {
    let field = field.trim();
    field
        .parse::<FloatValue>()
        .ok()
        .or_else(|| parse_decimal_comma(field))
        .filter(|v| v.is_finite())
}

impl Cell {
    /// Classify a raw field as empty, numeric or text.
    pub fn parse(field: &str) -> Self {
        if field.trim().is_empty() {
            return Cell::Empty;
        }
        match parse_number(field) {
            Some(value) => Cell::Number(value),
            None => Cell::Text(field.to_string()),
        }
    }

    /// Numeric value of the cell, if it has one
    pub fn as_number(&self) -> Option<FloatValue> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(text) => parse_number(text),
            Cell::Empty => None,
        }
    }

    /// Text form of the cell. Numbers are formatted.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(value) => Some(value.to_string()),
            Cell::Text(text) => Some(text.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<FloatValue> for Cell {
    fn from(value: FloatValue) -> Self {
        if value.is_finite() {
            Cell::Number(value)
        } else {
            Cell::Empty
        }
    }
}

impl From<Option<FloatValue>> for Cell {
    fn from(value: Option<FloatValue>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Empty)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(value) => write!(f, "{}", value),
            Cell::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Ordered columns and rows of cells.
///
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given headers
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from headers and rows
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> EacvResult<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// One-row table of named values, or an empty table when there are none
    pub fn from_record(record: impl IntoIterator<Item = (String, Cell)>) -> Self {
        let (columns, row): (Vec<String>, Vec<Cell>) = record.into_iter().unzip();
        let rows = if columns.is_empty() { Vec::new() } else { vec![row] };
        Self { columns, rows }
    }

    /// Append a row.
    ///
    /// Fails if the row does not have one cell per column.
    pub fn push_row(&mut self, row: Vec<Cell>) -> EacvResult<()> {
        if row.len() != self.columns.len() {
            return Err(EacvError::RowLength {
                row: self.rows.len(),
                found: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.rows.len()).map(move |index| Row { table: self, index })
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let column = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[column])
    }

    pub fn number(&self, row: usize, column: &str) -> Option<FloatValue> {
        self.cell(row, column).and_then(Cell::as_number)
    }

    /// Numeric values of a column, one per row. An absent column yields nulls.
    pub fn column_numbers(&self, column: &str) -> Vec<Option<FloatValue>> {
        self.rows().map(|row| row.number(column)).collect()
    }

    /// Sum of a column with nulls skipped.
    ///
    /// Returns `None` if the column does not exist.
    pub fn column_sum(&self, column: &str) -> Option<FloatValue> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().filter_map(|r| r[index].as_number()).sum())
    }

    /// Append a column, or replace the cells of an existing column with the same name.
    pub fn set_column(&mut self, name: &str, cells: Vec<Cell>) -> EacvResult<()> {
        if cells.len() != self.rows.len() {
            return Err(EacvError::Error(format!(
                "Column \"{}\" has {} values but the table has {} rows",
                name,
                cells.len(),
                self.rows.len()
            )));
        }
        self.put_column(name, cells);
        Ok(())
    }

    fn put_column(&mut self, name: &str, cells: Vec<Cell>) {
        match self.column_index(name) {
            Some(index) => {
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row[index] = cell;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row.push(cell);
                }
            }
        }
    }

    /// Compute a numeric column row by row and append it.
    ///
    /// `None` (and any non-finite result) is stored as a null cell.
    pub fn derive_number<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(&Row<'_>) -> Option<FloatValue>,
    {
        let cells: Vec<Cell> = self.rows().map(|row| Cell::from(f(&row))).collect();
        self.put_column(name, cells);
    }

    /// Compute a text column row by row and append it.
    pub fn derive_text<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(&Row<'_>) -> String,
    {
        let cells: Vec<Cell> = self.rows().map(|row| Cell::Text(f(&row))).collect();
        self.put_column(name, cells);
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of the row in its table
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cell(&self, column: &str) -> Option<&'a Cell> {
        let column = self.table.column_index(column)?;
        Some(&self.table.rows[self.index][column])
    }

    /// Numeric value, or `None` if the cell is blank, absent or not a number
    pub fn number(&self, column: &str) -> Option<FloatValue> {
        self.cell(column).and_then(Cell::as_number)
    }

    /// Numeric value with blanks (and absent columns) read as zero.
    ///
    /// Text that is not a number still yields `None`.
    pub fn number_filled(&self, column: &str) -> Option<FloatValue> {
        match self.cell(column) {
            None | Some(Cell::Empty) => Some(0.0),
            Some(cell) => cell.as_number(),
        }
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.cell(column).and_then(Cell::as_text)
    }

    /// Normalised text value for reference lookups; blank cells yield `None`
    pub fn key(&self, column: &str) -> Option<String> {
        self.text(column)
            .map(|t| normalise_key(&t))
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["Nome".to_string(), "Quantidade".to_string()],
            vec![
                vec![Cell::from("Cal"), Cell::Number(2.0)],
                vec![Cell::from("Ureia"), Cell::Empty],
                vec![Cell::from("Gesso"), Cell::from("n/a")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("   "), Cell::Empty);
        assert_eq!(Cell::parse("12.5"), Cell::Number(12.5));
        assert_eq!(Cell::parse("0,85"), Cell::Number(0.85));
        assert_eq!(Cell::parse("1,000.5"), Cell::Text("1,000.5".to_string()));
        assert_eq!(Cell::parse("1.234,56"), Cell::Number(1234.56));
        assert_eq!(Cell::parse("-12.345.678,9"), Cell::Number(-12345678.9));
        assert_eq!(Cell::parse("1.23,4"), Cell::Text("1.23,4".to_string()));
        assert_eq!(Cell::parse("1.234.5,6"), Cell::Text("1.234.5,6".to_string()));
        assert_eq!(Cell::parse("NaN"), Cell::Text("NaN".to_string()));
        assert_eq!(Cell::parse("óleo diesel"), Cell::from("óleo diesel"));
    }

    #[test]
    fn test_non_finite_is_null() {
        assert_eq!(Cell::from(f64::INFINITY), Cell::Empty);
        assert_eq!(Cell::from(f64::NAN), Cell::Empty);
        assert_eq!(Cell::from(None), Cell::Empty);
    }

    #[test]
    fn test_from_record() {
        let table = Table::from_record([
            ("a".to_string(), Cell::Number(1.0)),
            ("b".to_string(), Cell::Empty),
        ]);
        assert_eq!(table.columns(), &["a", "b"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.number(0, "a"), Some(1.0));
        assert_eq!(table.cell(0, "b"), Some(&Cell::Empty));

        let empty = Table::from_record(Vec::<(String, Cell)>::new());
        assert!(empty.columns().is_empty());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_push_row_length_mismatch() {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(
            table.push_row(vec![Cell::Empty]),
            Err(EacvError::RowLength {
                row: 0,
                found: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_row_accessors() {
        let table = sample();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].number("Quantidade"), Some(2.0));
        assert_eq!(rows[1].number("Quantidade"), None);
        assert_eq!(rows[1].number_filled("Quantidade"), Some(0.0));
        assert_eq!(rows[2].number_filled("Quantidade"), None);
        assert_eq!(rows[0].number_filled("Ausente"), Some(0.0));
        assert_eq!(rows[0].key("Nome"), Some("cal".to_string()));
        assert_eq!(rows[0].text("Ausente"), None);
    }

    #[test]
    fn test_derive_number_appends_in_order() {
        let mut table = sample();
        table.derive_number("Dobro", |row| row.number("Quantidade").map(|q| q * 2.0));
        table.derive_number("Quádruplo", |row| row.number("Dobro").map(|q| q * 2.0));

        assert_eq!(table.columns(), &["Nome", "Quantidade", "Dobro", "Quádruplo"]);
        assert_eq!(table.number(0, "Quádruplo"), Some(8.0));
        assert_eq!(table.cell(1, "Quádruplo"), Some(&Cell::Empty));
    }

    #[test]
    fn test_set_column_replaces_existing() {
        let mut table = sample();
        table
            .set_column("Quantidade", vec![Cell::Number(1.0); 3])
            .unwrap();
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.column_sum("Quantidade"), Some(3.0));
        assert!(table.set_column("Outra", vec![Cell::Empty]).is_err());
    }

    #[test]
    fn test_column_sum_skips_nulls() {
        let table = sample();
        assert_eq!(table.column_sum("Quantidade"), Some(2.0));
        assert_eq!(table.column_sum("Ausente"), None);
        assert_eq!(table.column_numbers("Ausente"), vec![None, None, None]);
    }
}
