//! Spreadsheet container detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Spreadsheet container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// ZIP based workbook (xlsx, xlsm, xlsb, ods)
    Zip,
    /// OLE2 compound file (legacy xls)
    Ole,
}

impl std::fmt::Display for SpreadsheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadsheetFormat::Zip => write!(f, "ZIP workbook"),
            SpreadsheetFormat::Ole => write!(f, "OLE2 workbook"),
        }
    }
}

/// ZIP local file header: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE2 compound document signature
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Detect the spreadsheet container from a file path.
///
/// # Example
/// ```no_run
/// use updxml::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("upd.xlsx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SpreadsheetFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = Vec::with_capacity(OLE_MAGIC.len());
    reader
        .by_ref()
        .take(OLE_MAGIC.len() as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the spreadsheet container from the leading bytes of a file.
///
/// # Returns
/// * `Ok(SpreadsheetFormat)` if the data starts with a known signature
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SpreadsheetFormat> {
    if data.starts_with(ZIP_MAGIC) {
        Ok(SpreadsheetFormat::Zip)
    } else if data.starts_with(OLE_MAGIC) {
        Ok(SpreadsheetFormat::Ole)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if a file extension is one the reader accepts.
pub fn is_supported_extension(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods"
    )
}
