//! Document header extraction: number, date, parties, addresses, tax ids.

use super::options::ColumnMapping;
use crate::model::{DocumentInfo, Grid};
use crate::normalize::{parse_inn_kpp, recognize_date};

/// Extracts [`DocumentInfo`] from a grid by locating labels and reading
/// the configured columns on the label rows.
///
/// Nothing is fabricated: a field whose label or value is missing stays
/// `None`.
pub struct DocumentInfoExtractor<'a> {
    grid: &'a Grid,
    mapping: &'a ColumnMapping,
}

impl<'a> DocumentInfoExtractor<'a> {
    /// Create an extractor over a grid.
    pub fn new(grid: &'a Grid, mapping: &'a ColumnMapping) -> Self {
        Self { grid, mapping }
    }

    /// Run every field extraction.
    pub fn extract(&self) -> DocumentInfo {
        let mut info = DocumentInfo {
            doc_number: self.doc_number(),
            doc_date: self.doc_date(),
            seller_name: self.labelled_value(
                &self.mapping.seller.name_search_text,
                self.mapping.seller.name_column,
            ),
            buyer_name: self.labelled_value(
                &self.mapping.buyer.name_search_text,
                self.mapping.buyer.name_column,
            ),
            ..Default::default()
        };

        let (seller_address, buyer_address) = self.addresses();
        info.seller_address = seller_address;
        info.buyer_address = buyer_address;

        info.set_seller_tax_ids(parse_inn_kpp(
            self.labelled_value(
                &self.mapping.seller.inn_kpp_search_text,
                self.mapping.seller.inn_kpp_column,
            )
            .as_deref(),
        ));
        info.set_buyer_tax_ids(parse_inn_kpp(
            self.labelled_value(
                &self.mapping.buyer.inn_kpp_search_text,
                self.mapping.buyer.inn_kpp_column,
            )
            .as_deref(),
        ));

        log::debug!(
            "Document info: {} of 10 fields found",
            info.found_count()
        );
        info
    }

    /// Document number, passed through as found.
    pub fn doc_number(&self) -> Option<String> {
        let cfg = &self.mapping.document;
        self.labelled_value(&cfg.number_search_text, cfg.number_column)
    }

    /// Document date.
    ///
    /// Tried in order within the first `date_search_rows` rows:
    /// 1. a row with a cell equal to the date label and a recognizable date
    ///    in the date column;
    /// 2. any recognizable date elsewhere on such a label row;
    /// 3. any recognizable date on the document number row;
    /// 4. any recognizable date in any cell.
    ///
    /// If a label row had an unrecognizable value in the date column and no
    /// step succeeded, that raw value is returned.
    pub fn doc_date(&self) -> Option<String> {
        let cfg = &self.mapping.document;
        let label = cfg.date_search_text.trim();
        let limit = cfg.date_search_rows.min(self.grid.row_count());

        let label_rows: Vec<usize> = (0..limit)
            .filter(|&row| {
                self.grid
                    .row(row)
                    .iter()
                    .any(|cell| cell.text().is_some_and(|t| t.trim() == label))
            })
            .collect();

        let mut raw_value = None;
        for &row in &label_rows {
            if let Some(text) = self.grid.get(row, cfg.date_column).trimmed_text() {
                if let Some(date) = recognize_date(&text) {
                    log::debug!("Document date found next to label at row {}", row);
                    return Some(date);
                }
                raw_value.get_or_insert(text);
            }
        }

        let first_date_in = |row: usize| {
            self.grid
                .row(row)
                .iter()
                .find_map(|cell| cell.text().and_then(|t| recognize_date(&t)))
        };

        if let Some(date) = label_rows.iter().find_map(|&row| first_date_in(row)) {
            log::debug!("Document date found on a label row outside the date column");
            return Some(date);
        }
        let number_row = self
            .grid
            .find_cell_by_text(&cfg.number_search_text, Some(limit))
            .map(|pos| pos.row);
        if let Some(date) = number_row.and_then(first_date_in) {
            log::debug!("Document date found on the document number row");
            return Some(date);
        }
        if let Some(date) = (0..limit).find_map(first_date_in) {
            log::debug!("Document date found by pattern scan");
            return Some(date);
        }

        if raw_value.is_some() {
            log::warn!("Document date is not recognizable, keeping raw value");
        }
        raw_value
    }

    /// Seller and buyer addresses.
    ///
    /// The first address label within the configured rows belongs to the
    /// seller and the second to the buyer; source documents always list the
    /// seller first.
    pub fn addresses(&self) -> (Option<String>, Option<String>) {
        let cfg = &self.mapping.address;
        let mut hits = self
            .grid
            .cells_containing(&cfg.search_text, Some(cfg.search_rows));

        let seller = hits.next().and_then(|pos| {
            self.grid
                .get(pos.row, self.mapping.seller.address_column)
                .trimmed_text()
        });
        let buyer = hits.next().and_then(|pos| {
            self.grid
                .get(pos.row, self.mapping.buyer.address_column)
                .trimmed_text()
        });
        (seller, buyer)
    }

    /// Locate `label` and read the trimmed value at `column` on its row.
    fn labelled_value(&self, label: &str, column: usize) -> Option<String> {
        let pos = self.grid.find_cell_by_text(label, None)?;
        let value = self.grid.get(pos.row, column).trimmed_text();
        if value.is_none() {
            log::debug!(
                "Label {:?} found at row {} but column {} is empty",
                label,
                pos.row,
                column
            );
        }
        value
    }
}

/// Extract document header fields from a grid.
pub fn extract_document_info(grid: &Grid, mapping: &ColumnMapping) -> DocumentInfo {
    DocumentInfoExtractor::new(grid, mapping).extract()
}
