//! # updxml
//!
//! Converts UPD (универсальный передаточный документ) spreadsheets into
//! `ON_NSCHFDOPPR` XML exchange files.
//!
//! The first sheet of a workbook is read into a [`Grid`], header fields and
//! the goods table are located by labels and fixed column offsets, and the
//! result is rendered into the XML schema with generated identifiers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use updxml::{convert_file, ConverterConfig};
//!
//! fn main() -> updxml::Result<()> {
//!     let written = convert_file("upd.xlsx", "out", &ConverterConfig::default())?;
//!     println!("{}", written.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Best-effort extraction**: missing labels leave fields unset and the
//!   XML is still produced with safe defaults
//! - **Configurable layout**: every label and column offset comes from
//!   [`ColumnMapping`], loadable from JSON
//! - **Legacy encodings**: output is written as windows-1251 by default
//! - **Batch conversion**: sequential processing with per-file outcomes

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    BatchConverter, BatchProgress, BatchReport, ConverterConfig, FileOutcome, FileStatus,
    OutputEncoding, UpdConverter, WrittenFile,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, SpreadsheetFormat};
pub use error::{Error, Result};
pub use model::{
    Cell, CellPos, DocumentInfo, ExtractedDocument, Grid, InnKpp, LineItem, Totals, VatRate,
};
pub use parser::{ColumnMapping, ItemDefaults};
pub use render::{generate_xml, ConversionResult, JsonFormat, XmlSettings};

use std::path::Path;

/// Read the first sheet of a spreadsheet file.
///
/// # Example
///
/// ```no_run
/// use updxml::read_grid;
///
/// let grid = read_grid("upd.xlsx").unwrap();
/// println!("Rows: {}", grid.row_count());
/// ```
pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    parser::read_grid(path)
}

/// Extract header data, items and totals from a spreadsheet file.
///
/// # Arguments
///
/// * `path` - Path to the spreadsheet
/// * `config` - Converter configuration
pub fn extract_file<P: AsRef<Path>>(
    path: P,
    config: &ConverterConfig,
) -> Result<ExtractedDocument> {
    UpdConverter::new(config.clone()).extract_file(path)
}

/// Convert a spreadsheet file to XML text without writing anything.
///
/// # Example
///
/// ```no_run
/// use updxml::{preview_file, ConverterConfig};
///
/// let result = preview_file("upd.xlsx", &ConverterConfig::default()).unwrap();
/// println!("{}", result.xml_text);
/// ```
pub fn preview_file<P: AsRef<Path>>(path: P, config: &ConverterConfig) -> Result<ConversionResult> {
    UpdConverter::new(config.clone()).preview(path)
}

/// Convert a spreadsheet file and write `<stem>.xml` into `output_dir`.
pub fn convert_file<P, Q>(path: P, output_dir: Q, config: &ConverterConfig) -> Result<WrittenFile>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    UpdConverter::new(config.clone()).convert_file(path, output_dir)
}

/// Extract a spreadsheet file and render the result as JSON.
///
/// # Example
///
/// ```no_run
/// use updxml::{to_json, ConverterConfig, JsonFormat};
///
/// let json = to_json("upd.xlsx", &ConverterConfig::default(), JsonFormat::Pretty).unwrap();
/// std::fs::write("upd.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(
    path: P,
    config: &ConverterConfig,
    format: JsonFormat,
) -> Result<String> {
    let doc = extract_file(path, config)?;
    render::to_json(&doc, format)
}
