//! Spreadsheet reading and field extraction.

mod document_info;
mod line_items;
mod options;
mod reader;

pub use document_info::{extract_document_info, DocumentInfoExtractor};
pub use line_items::{extract_items, LineItemExtractor};
pub use options::{
    AddressMapping, ColumnMapping, DocumentMapping, ItemDefaults, ItemsMapping, PartyMapping,
};
pub use reader::{convert_cell, range_to_grid, read_grid, read_grid_from_bytes, GridReader};

use crate::model::{ExtractedDocument, Grid};

/// Run both extractors over a grid and compute totals.
///
/// Header and item extraction are independent of each other; a missing
/// label or table never fails, it only leaves fields unset.
pub fn extract(grid: &Grid, mapping: &ColumnMapping, defaults: &ItemDefaults) -> ExtractedDocument {
    let info = extract_document_info(grid, mapping);
    let items = extract_items(grid, &mapping.items, defaults);
    ExtractedDocument::new(info, items)
}
