//! Error types for updxml library.

use std::io;
use thiserror::Error;

/// Result type alias for updxml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a spreadsheet.
///
/// Missing labels, columns or values inside a readable spreadsheet are not
/// errors: extraction degrades to empty fields and the XML is still produced.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a recognized spreadsheet container.
    #[error("Unknown file format: not a spreadsheet")]
    UnknownFormat,

    /// The spreadsheet could not be decoded.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The workbook has no sheets.
    #[error("Workbook contains no sheets")]
    EmptyWorkbook,

    /// Invalid converter configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output encoding error.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error during rendering (XML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Error::Io(e),
            _ => Error::Spreadsheet(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
