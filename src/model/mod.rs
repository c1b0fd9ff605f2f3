//! Data model for spreadsheet conversion.
//!
//! [`Grid`] holds the raw first sheet; [`DocumentInfo`], [`LineItem`] and
//! [`Totals`] hold what the extractors pull out of it.

mod document;
mod grid;
mod item;

pub use document::{DocumentInfo, ExtractedDocument, InnKpp};
pub use grid::{Cell, CellPos, Grid};
pub use item::{LineItem, Totals, VatRate};
