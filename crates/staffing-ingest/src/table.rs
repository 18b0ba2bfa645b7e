//! In-memory tables: an ordered column set and rows of typed cells.

use std::borrow::Cow;
use std::fmt;

use crate::coerce::{format_numeric, parse_bool, parse_number};

/// A single cell value.
///
/// Freshly parsed tables hold only [`Cell::Text`]; [`crate::TableKind::prepare`]
/// coerces the boolean and numeric columns of each table kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Text rendering, as written to CSV.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(value) => Cow::Borrowed(value.as_str()),
            Cell::Number(value) => Cow::Owned(format_numeric(*value)),
            Cell::Bool(true) => Cow::Borrowed("True"),
            Cell::Bool(false) => Cow::Borrowed("False"),
        }
    }

    pub fn as_number(&self) -> f64 {
        match self {
            Cell::Text(value) => parse_number(value),
            Cell::Number(value) => *value,
            Cell::Bool(value) => f64::from(u8::from(*value)),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Cell::Text(value) => parse_bool(value).unwrap_or(false),
            Cell::Number(value) => *value != 0.0,
            Cell::Bool(value) => *value,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Tabular data with a shared column set.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the table has neither columns nor rows (empty input).
    pub fn is_blank(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Renames a column in place. Returns false when `from` is absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Text(String::new()));
        self.rows.push(cells);
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.rows.len()).map(move |index| Row { table: self, index })
    }

    /// Applies `f` to every cell of one column.
    pub(crate) fn map_column(&mut self, column: usize, mut f: impl FnMut(usize, &Cell) -> Cell) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(column) {
                *cell = f(index, cell);
            }
        }
    }

    pub(crate) fn raw_rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

/// A borrowed view of one table row with by-name accessors.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    /// Zero-based row index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based line number in the source file (the header is line 1).
    pub fn line(&self) -> usize {
        self.index + 2
    }

    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let idx = self.table.column_index(column)?;
        self.table.rows[self.index].get(idx)
    }

    /// Trimmed text of a column; empty when the column is absent.
    pub fn text(&self, column: &str) -> String {
        self.get(column)
            .map(|cell| cell.as_text().trim().to_string())
            .unwrap_or_default()
    }

    /// Numeric value of a column; zero when absent or invalid.
    pub fn number(&self, column: &str) -> f64 {
        self.get(column).map_or(0.0, Cell::as_number)
    }

    /// Boolean value of a column; false when absent.
    pub fn flag(&self, column: &str) -> bool {
        self.get(column).is_some_and(Cell::as_bool)
    }

    /// True when every cell of the row is empty text.
    pub fn is_blank(&self) -> bool {
        self.table.rows[self.index]
            .iter()
            .all(|cell| matches!(cell, Cell::Text(value) if value.trim().is_empty()))
    }
}
