//! Goods table extraction.
//!
//! The table is found in two phases: the header row is located by its
//! row-number label, then the first data row is searched for in a short
//! window below it. Rows are then read downward until the table ends.

use super::options::{ItemDefaults, ItemsMapping};
use crate::model::{Cell, Grid, LineItem, VatRate};
use crate::normalize::{extract_article, parse_decimal};

const TOTALS_KEYWORDS: [&str; 2] = ["всего", "итого"];

/// Extracts [`LineItem`]s from the goods table of a grid.
pub struct LineItemExtractor<'a> {
    grid: &'a Grid,
    mapping: &'a ItemsMapping,
    defaults: &'a ItemDefaults,
}

impl<'a> LineItemExtractor<'a> {
    /// Create an extractor over a grid.
    pub fn new(grid: &'a Grid, mapping: &'a ItemsMapping, defaults: &'a ItemDefaults) -> Self {
        Self {
            grid,
            mapping,
            defaults,
        }
    }

    /// Locate the table header row.
    ///
    /// A cell matches when it contains the configured label, or when the
    /// label occurs in it once whitespace is ignored on both sides. This
    /// accepts `№ п/п`, `№\nп/п` and `№\r\nп/п` alike.
    pub fn find_header_row(&self) -> Option<usize> {
        let label = &self.mapping.header_search_text;
        let compact_label = strip_whitespace(label);
        self.grid
            .find_cell_where(None, |text| {
                text.contains(label.as_str())
                    || (!compact_label.is_empty()
                        && strip_whitespace(text).contains(&compact_label))
            })
            .map(|pos| pos.row)
    }

    /// Locate the first data row below `header_row`.
    ///
    /// The first row within the search window numbered `1` and carrying a
    /// textual name wins. Otherwise the fixed fallback offset is used.
    pub fn find_data_start_row(&self, header_row: usize) -> usize {
        let window_end = header_row
            .saturating_add(self.mapping.data_start_window)
            .saturating_add(1)
            .min(self.grid.row_count());
        for row in (header_row + 1)..window_end {
            if self.is_first_item_row(row) {
                log::debug!("Goods table data starts at row {}", row);
                return row;
            }
        }

        let fallback = header_row.saturating_add(self.mapping.fallback_offset);
        log::warn!(
            "First goods row not recognized below header row {}, assuming row {}",
            header_row,
            fallback
        );
        fallback
    }

    /// Extract all line items. A missing table yields an empty list.
    pub fn extract(&self) -> Vec<LineItem> {
        let Some(header_row) = self.find_header_row() else {
            log::warn!(
                "Goods table header {:?} not found",
                self.mapping.header_search_text
            );
            return Vec::new();
        };
        log::debug!("Goods table header at row {}", header_row);

        let start = self.find_data_start_row(header_row);
        let mut items = Vec::new();

        for row in start..self.grid.row_count() {
            if items.len() >= self.mapping.max_items {
                log::warn!(
                    "Stopped after {} items, remaining rows ignored",
                    self.mapping.max_items
                );
                break;
            }

            let Some(row_number) = self.cell(row, self.mapping.row_number_column).as_integer()
            else {
                log::debug!("Goods table ends at row {}", row);
                break;
            };

            let name = self
                .cell(row, self.mapping.name_column)
                .trimmed_text()
                .unwrap_or_default();
            if is_totals_row(&name) {
                log::debug!("Totals row reached at row {}", row);
                break;
            }
            if name.chars().count() < 2 {
                continue;
            }

            items.push(self.read_item(row, row_number, name));
        }

        log::debug!("Extracted {} line items", items.len());
        items
    }

    fn read_item(&self, row: usize, row_number: i64, name: String) -> LineItem {
        let m = self.mapping;
        LineItem {
            row_number,
            article: extract_article(&name),
            name,
            unit_code: self
                .cell(row, m.okei_code_column)
                .trimmed_text()
                .unwrap_or_else(|| self.defaults.okei_code.clone()),
            unit_name: self
                .cell(row, m.unit_column)
                .trimmed_text()
                .unwrap_or_else(|| self.defaults.unit.clone()),
            quantity: self.cell(row, m.quantity_column).as_number(),
            price: self.cell(row, m.price_column).as_number(),
            amount_no_vat: self.cell(row, m.amount_no_vat_column).as_number(),
            vat_rate: self.vat_rate(self.cell(row, m.vat_rate_column)),
            vat_amount: self.cell(row, m.vat_amount_column).as_number(),
            amount_with_vat: self.cell(row, m.amount_with_vat_column).as_number(),
        }
    }

    fn vat_rate(&self, cell: &Cell) -> VatRate {
        match cell {
            Cell::Empty => VatRate::Rate(self.defaults.vat_rate),
            Cell::Number(rate) => VatRate::Rate(*rate),
            Cell::Text(text) => match parse_decimal(text) {
                Some(rate) => VatRate::Rate(rate),
                None => VatRate::Label(text.trim().to_string()),
            },
        }
    }

    fn is_first_item_row(&self, row: usize) -> bool {
        let numbered_one = match self.cell(row, self.mapping.row_number_column) {
            Cell::Number(n) => *n == 1.0,
            Cell::Text(s) => s.trim() == "1",
            Cell::Empty => false,
        };
        let named = match self.cell(row, self.mapping.name_column) {
            Cell::Text(s) => {
                let name = s.trim();
                name.chars().count() > 3 && !name.chars().all(|c| c.is_ascii_digit())
            }
            Cell::Number(_) | Cell::Empty => false,
        };
        numbered_one && named
    }

    fn cell(&self, row: usize, col: usize) -> &'a Cell {
        self.grid.get(row, col)
    }
}

/// Extract line items from a grid.
pub fn extract_items(
    grid: &Grid,
    mapping: &ItemsMapping,
    defaults: &ItemDefaults,
) -> Vec<LineItem> {
    LineItemExtractor::new(grid, mapping, defaults).extract()
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_totals_row(name: &str) -> bool {
    let lower = name.to_lowercase();
    TOTALS_KEYWORDS.iter().any(|kw| lower.contains(kw))
}
