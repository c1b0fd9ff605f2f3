//! Grid reader: loads the first sheet of a workbook into a [`Grid`].

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{Cell, Grid};
use calamine::{
    open_workbook_auto, open_workbook_auto_from_rs, Data, DataType, Range, Reader, Sheets,
};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Spreadsheet reader over any supported workbook format.
pub struct GridReader<RS> {
    workbook: Sheets<RS>,
}

impl GridReader<BufReader<File>> {
    /// Open a workbook from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        log::debug!("Opening {} as {}", path.display(), format);
        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }
}

impl<'a> GridReader<Cursor<&'a [u8]>> {
    /// Open a workbook from in-memory bytes.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        log::debug!("Reading {} bytes as {}", data.len(), format);
        let workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
        Ok(Self { workbook })
    }
}

impl<RS: Read + Seek> GridReader<RS> {
    /// Names of all sheets in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Read the first sheet.
    pub fn first_sheet(&mut self) -> Result<Grid> {
        let range = self
            .workbook
            .worksheet_range_at(0)
            .ok_or(Error::EmptyWorkbook)??;
        let grid = range_to_grid(&range);
        log::debug!("First sheet loaded: {} rows", grid.row_count());
        Ok(grid)
    }
}

/// Read the first sheet of a workbook file.
pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    GridReader::open(path)?.first_sheet()
}

/// Read the first sheet of a workbook held in memory.
pub fn read_grid_from_bytes(data: &[u8]) -> Result<Grid> {
    GridReader::from_bytes(data)?.first_sheet()
}

/// Convert a calamine range to a grid with absolute coordinates.
///
/// Rows and columns before the range start are filled with empty cells so
/// that row 0 / column 0 always correspond to cell A1.
pub fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(convert_cell));
        while cells.last().is_some_and(Cell::is_empty) {
            cells.pop();
        }
        rows.push(cells);
    }
    Grid::new(rows)
}

/// Convert one calamine value to a grid cell.
pub fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(n) => Cell::Number(*n),
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.nfc().collect())
            }
        }
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_date() {
            Some(date) => Cell::Text(date.format("%d.%m.%Y").to_string()),
            None => Cell::Text(data.to_string()),
        },
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_values() {
        assert_eq!(convert_cell(&Data::Int(5)), Cell::Number(5.0));
        assert_eq!(convert_cell(&Data::Float(1.5)), Cell::Number(1.5));
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::String("  ".to_string())), Cell::Empty);
        assert_eq!(
            convert_cell(&Data::String("Продавец:".to_string())),
            Cell::Text("Продавец:".to_string())
        );
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Text("TRUE".to_string()));
    }

    #[test]
    fn test_convert_cell_nfc() {
        // "й" as "и" + combining breve
        let decomposed = "ма\u{0438}\u{0306}".to_string();
        assert_eq!(
            convert_cell(&Data::String(decomposed)),
            Cell::Text("ма\u{0439}".to_string())
        );
    }

    #[test]
    fn test_range_to_grid_absolute_coordinates() {
        let mut range: Range<Data> = Range::new((2, 3), (3, 4));
        range.set_value((2, 3), Data::String("Продавец:".to_string()));
        range.set_value((3, 4), Data::Float(7.0));

        let grid = range_to_grid(&range);
        assert_eq!(grid.row_count(), 4);
        assert!(grid.get(0, 0).is_empty());
        assert_eq!(grid.get(2, 3), &Cell::Text("Продавец:".to_string()));
        assert_eq!(grid.get(3, 4), &Cell::Number(7.0));
        assert_eq!(grid.row(2).len(), 4);
    }

    #[test]
    fn test_from_bytes_rejects_unknown_format() {
        let result = read_grid_from_bytes(b"not a workbook at all");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_from_bytes_rejects_corrupt_zip() {
        let result = read_grid_from_bytes(b"PK\x03\x04garbage");
        assert!(result.is_err());
    }
}
