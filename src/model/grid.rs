//! Spreadsheet grid and field locators.

use crate::normalize::{parse_decimal, parse_leading_integer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

static EMPTY_CELL: Cell = Cell::Empty;

/// A single untyped spreadsheet value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Absent or blank cell
    #[default]
    Empty,
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl Cell {
    /// Check whether the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// String representation used for label matching and pass-through fields.
    ///
    /// Whole numbers render without a fractional part (`15`, not `15.0`).
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) => Some(Cow::Owned(number_to_text(*n))),
        }
    }

    /// Owned, trimmed text; `None` for empty cells and blank strings.
    pub fn trimmed_text(&self) -> Option<String> {
        self.text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Numeric value, parsing text leniently (`"1 234,5"` is `1234.5`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_decimal(s),
        }
    }

    /// Integer value, truncating numbers and reading leading digits of text.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Cell::Number(_) => None,
            Cell::Text(s) => parse_leading_integer(s),
        }
    }
}

fn number_to_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Zero-based cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl CellPos {
    /// Create a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// In-memory first sheet of a workbook, row-major and 0-indexed.
///
/// Rows may have different lengths; reads outside the stored area
/// yield [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create a grid from rows.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of a row; empty slice when out of range.
    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Bounds-checked read.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.row(row).get(col).unwrap_or(&EMPTY_CELL)
    }

    /// Bounds-checked read with signed coordinates; negatives yield [`Cell::Empty`].
    pub fn get_cell(&self, row: isize, col: isize) -> &Cell {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) => self.get(r, c),
            _ => &EMPTY_CELL,
        }
    }

    /// Find the first cell whose text contains `needle`.
    ///
    /// Rows are scanned top to bottom (only the first `max_rows` if given),
    /// each row left to right. Matching is a case-sensitive substring test.
    pub fn find_cell_by_text(&self, needle: &str, max_rows: Option<usize>) -> Option<CellPos> {
        self.find_cell_where(max_rows, |text| text.contains(needle))
    }

    /// Find the first cell whose text satisfies `pred`.
    pub fn find_cell_where<F>(&self, max_rows: Option<usize>, pred: F) -> Option<CellPos>
    where
        F: FnMut(&str) -> bool,
    {
        self.cells_where(max_rows, pred).next()
    }

    /// All cells containing `needle`, in scan order.
    pub fn cells_containing<'a>(
        &'a self,
        needle: &'a str,
        max_rows: Option<usize>,
    ) -> impl Iterator<Item = CellPos> + 'a {
        self.cells_where(max_rows, move |text| text.contains(needle))
    }

    fn cells_where<'a, F>(
        &'a self,
        max_rows: Option<usize>,
        mut pred: F,
    ) -> impl Iterator<Item = CellPos> + 'a
    where
        F: FnMut(&str) -> bool + 'a,
    {
        let limit = max_rows.unwrap_or(usize::MAX);
        self.rows
            .iter()
            .take(limit)
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(move |(col, cell)| (CellPos::new(row, col), cell))
            })
            .filter(move |(_, cell)| cell.text().is_some_and(|t| pred(t.as_ref())))
            .map(|(pos, _)| pos)
    }
}

impl From<Vec<Vec<Cell>>> for Grid {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::new(vec![
            vec![Cell::from("Счет-фактура № "), Cell::Empty, Cell::from(42i64)],
            vec![],
            vec![Cell::Empty, Cell::from("Продавец: "), Cell::from("ООО Ромашка")],
        ])
    }

    #[test]
    fn test_get_out_of_range() {
        let grid = sample();
        assert_eq!(grid.get(0, 2), &Cell::Number(42.0));
        assert!(grid.get(1, 0).is_empty());
        assert!(grid.get(100, 0).is_empty());
        assert!(grid.get(0, 100).is_empty());
        assert!(grid.get_cell(-1, 0).is_empty());
        assert!(grid.get_cell(0, -5).is_empty());
        assert!(grid.get_cell(isize::MIN, isize::MAX).is_empty());
    }

    #[test]
    fn test_find_cell_by_text() {
        let grid = sample();
        assert_eq!(
            grid.find_cell_by_text("Продавец:", None),
            Some(CellPos::new(2, 1))
        );
        assert_eq!(grid.find_cell_by_text("Продавец:", Some(2)), None);
        assert_eq!(grid.find_cell_by_text("Покупатель:", None), None);
    }

    #[test]
    fn test_find_matches_numbers_as_text() {
        let grid = sample();
        assert_eq!(grid.find_cell_by_text("42", None), Some(CellPos::new(0, 2)));
    }

    #[test]
    fn test_find_is_case_sensitive() {
        let grid = sample();
        assert_eq!(grid.find_cell_by_text("продавец:", None), None);
    }

    #[test]
    fn test_cells_containing_order() {
        let grid = Grid::new(vec![
            vec![Cell::from("Адрес: a"), Cell::from("Адрес: b")],
            vec![Cell::from("Адрес: c")],
        ]);
        let found: Vec<_> = grid.cells_containing("Адрес:", None).collect();
        assert_eq!(
            found,
            vec![CellPos::new(0, 0), CellPos::new(0, 1), CellPos::new(1, 0)]
        );
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(Cell::from(15.0).text().as_deref(), Some("15"));
        assert_eq!(Cell::from(1.5).text().as_deref(), Some("1.5"));
        assert_eq!(Cell::from("  x ").trimmed_text(), Some("x".to_string()));
        assert_eq!(Cell::from("   ").trimmed_text(), None);
        assert_eq!(Cell::from("1 234,5").as_number(), Some(1234.5));
        assert_eq!(Cell::from("12.").as_integer(), Some(12));
        assert_eq!(Cell::from(3.9).as_integer(), Some(3));
        assert_eq!(Cell::from(None::<f64>), Cell::Empty);
    }
}
