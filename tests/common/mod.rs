//! Shared fixtures: a realistic UPD sheet buildable as a grid or as xlsx bytes.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use updxml::{Cell, Grid};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Sparse sheet description.
#[derive(Default)]
pub struct SheetBuilder {
    cells: Vec<(usize, usize, Cell)>,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any earlier value at the same position.
    pub fn set(mut self, row: usize, col: usize, value: impl Into<Cell>) -> Self {
        self.cells.retain(|(r, c, _)| (*r, *c) != (row, col));
        self.cells.push((row, col, value.into()));
        self
    }

    pub fn to_grid(&self) -> Grid {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (row, col, cell) in &self.cells {
            if rows.len() <= *row {
                rows.resize(row + 1, Vec::new());
            }
            let cells = &mut rows[*row];
            if cells.len() <= *col {
                cells.resize(col + 1, Cell::Empty);
            }
            cells[*col] = cell.clone();
        }
        Grid::new(rows)
    }

    /// Minimal xlsx package with one worksheet using inline strings.
    pub fn to_xlsx(&self) -> Vec<u8> {
        let mut sorted: Vec<&(usize, usize, Cell)> = self.cells.iter().collect();
        sorted.sort_by_key(|(row, col, _)| (*row, *col));

        let mut sheet_data = String::new();
        let mut current_row = None;
        for (row, col, cell) in sorted {
            if current_row != Some(*row) {
                if current_row.is_some() {
                    sheet_data.push_str("</row>");
                }
                sheet_data.push_str(&format!("<row r=\"{}\">", row + 1));
                current_row = Some(*row);
            }
            let reference = format!("{}{}", column_name(*col), row + 1);
            match cell {
                Cell::Number(n) => {
                    sheet_data.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, n))
                }
                Cell::Text(s) => sheet_data.push_str(&format!(
                    "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                    reference,
                    updxml::normalize::escape_xml(s)
                )),
                Cell::Empty => {}
            }
        }
        if current_row.is_some() {
            sheet_data.push_str("</row>");
        }

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#
                    .to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                    .to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="УПД" sheetId="1" r:id="rId1"/></sheets></workbook>"#
                    .to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#
                    .to_string(),
            ),
            (
                "xl/worksheets/sheet1.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    sheet_data
                ),
            ),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

/// Spreadsheet column name for a 0-indexed column (0 is `A`, 26 is `AA`).
pub fn column_name(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

/// A UPD laid out at the default column positions with three goods rows.
///
/// Totals: 7800.00 without VAT, 1260.00 VAT, 9060.00 with VAT, quantity 104.5.
pub fn sample_upd() -> SheetBuilder {
    SheetBuilder::new()
        .set(0, 40, "Приложение № 1 к постановлению Правительства РФ от 26 декабря 2011 г. № 1137")
        .set(1, 1, "Счет-фактура №")
        .set(1, 15, "А-17")
        .set(1, 20, "от")
        .set(1, 24, "15 января 2026 г.")
        .set(3, 1, "Продавец:")
        .set(3, 17, "ООО \"Ромашка\"")
        .set(4, 1, "Адрес:")
        .set(4, 17, "г. Москва, ул. Тверская, д. 1")
        .set(5, 1, "ИНН/КПП продавца:")
        .set(5, 17, "7707083893/770701001")
        .set(8, 1, "Покупатель:")
        .set(8, 56, "АО \"Лютик & Ко\"")
        .set(9, 1, "Адрес:")
        .set(9, 56, "г. Тверь, пр. Ленина, 5")
        .set(10, 1, "ИНН/КПП покупателя:")
        .set(10, 56, "6901000000 / 690101001")
        .set(13, 5, "№ п/п")
        .set(13, 9, "Наименование товара")
        .set(14, 5, "А")
        .set(14, 9, "1")
        // item 1
        .set(15, 5, 1.0)
        .set(15, 9, "ABC-100 Кабель ВВГ 3х2.5")
        .set(15, 22, "006")
        .set(15, 24, "м")
        .set(15, 26, 100.0)
        .set(15, 29, 55.5)
        .set(15, 39, 5550.0)
        .set(15, 51, "20%")
        .set(15, 53, 1110.0)
        .set(15, 57, 6660.0)
        // item 2
        .set(16, 5, 2.0)
        .set(16, 9, "Розетка <двойная>")
        .set(16, 22, "796")
        .set(16, 24, "шт")
        .set(16, 26, 3.0)
        .set(16, 29, 250.0)
        .set(16, 39, 750.0)
        .set(16, 51, 0.2)
        .set(16, 53, 150.0)
        .set(16, 57, 900.0)
        // item 3: no unit columns, VAT exempt
        .set(17, 5, 3.0)
        .set(17, 9, "Услуга монтажа")
        .set(17, 26, 1.5)
        .set(17, 29, 1000.0)
        .set(17, 39, 1500.0)
        .set(17, 51, "без НДС")
        .set(17, 57, 1500.0)
        .set(18, 9, "Всего к оплате")
        .set(18, 39, 7800.0)
        .set(18, 57, 9060.0)
}
