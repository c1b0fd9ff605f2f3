//! Conversion pipeline: spreadsheet in, encoded XML out.
//!
//! [`UpdConverter`] ties the grid reader, the extractors and the XML
//! assembler together under one [`ConverterConfig`].
//!
//! # Example
//!
//! ```no_run
//! use updxml::convert::{ConverterConfig, UpdConverter};
//!
//! fn main() -> updxml::Result<()> {
//!     let config = ConverterConfig::from_json_file("config.json")?;
//!     let converter = UpdConverter::new(config);
//!
//!     let written = converter.convert_file("upd.xlsx", "out")?;
//!     println!("{} -> {}", written.file_id, written.output_path.display());
//!     Ok(())
//! }
//! ```

mod batch;
mod encoding;

pub use batch::{BatchConverter, BatchProgress, BatchReport, FileOutcome, FileStatus};
pub use encoding::OutputEncoding;

use crate::error::{Error, Result};
use crate::model::{ExtractedDocument, Grid};
use crate::parser::{self, ColumnMapping, ItemDefaults};
use crate::render::{ConversionResult, XmlAssembler, XmlSettings, DEFAULT_COUNTRY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete converter configuration.
///
/// Serialized in camelCase; every section is optional, so a partial JSON
/// file is merged over the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConverterConfig {
    /// Where fields are found in the sheet
    pub excel_mapping: ColumnMapping,

    /// Fixed XML attributes
    pub xml_settings: XmlSettings,

    /// Values for empty item cells
    pub defaults: ItemDefaults,

    /// Country of origin for all items
    pub default_country: String,

    /// Output file encoding
    pub xml_encoding: OutputEncoding,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            excel_mapping: ColumnMapping::default(),
            xml_settings: XmlSettings::default(),
            defaults: ItemDefaults::default(),
            default_country: DEFAULT_COUNTRY.to_string(),
            xml_encoding: OutputEncoding::default(),
        }
    }
}

impl ConverterConfig {
    /// Create a configuration with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Render(e.to_string()))
    }

    /// Set the column mapping.
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.excel_mapping = mapping;
        self
    }

    /// Set the XML settings.
    pub fn with_xml_settings(mut self, settings: XmlSettings) -> Self {
        self.xml_settings = settings;
        self
    }

    /// Set the item defaults.
    pub fn with_defaults(mut self, defaults: ItemDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the country of origin.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    /// Set the output encoding.
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.xml_encoding = encoding;
        self
    }

    /// XML settings with the configured country applied.
    pub fn effective_xml_settings(&self) -> XmlSettings {
        self.xml_settings
            .clone()
            .with_country(self.default_country.clone())
    }
}

/// A converted file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Path of the XML file
    pub output_path: PathBuf,

    /// Composite file identifier
    pub file_id: String,

    /// Number of line items written
    pub item_count: usize,
}

/// Spreadsheet to XML converter.
#[derive(Debug, Clone, Default)]
pub struct UpdConverter {
    config: ConverterConfig,
    assembler: XmlAssembler,
}

impl UpdConverter {
    /// Create a converter.
    pub fn new(config: ConverterConfig) -> Self {
        let assembler = XmlAssembler::new(config.effective_xml_settings());
        Self { config, assembler }
    }

    /// Replace the assembler, e.g. to pin the fallback date.
    pub fn with_assembler(mut self, assembler: XmlAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Extract header data, items and totals from a grid.
    pub fn extract_grid(&self, grid: &Grid) -> ExtractedDocument {
        parser::extract(grid, &self.config.excel_mapping, &self.config.defaults)
    }

    /// Extract from a spreadsheet file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<ExtractedDocument> {
        let grid = parser::read_grid(path)?;
        Ok(self.extract_grid(&grid))
    }

    /// Extract from spreadsheet bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<ExtractedDocument> {
        let grid = parser::read_grid_from_bytes(data)?;
        Ok(self.extract_grid(&grid))
    }

    /// Render an extracted document.
    pub fn render(&self, doc: &ExtractedDocument) -> ConversionResult {
        self.assembler.assemble(&doc.info, &doc.items, &doc.totals)
    }

    /// Convert a grid to XML text.
    pub fn convert_grid(&self, grid: &Grid) -> ConversionResult {
        self.render(&self.extract_grid(grid))
    }

    /// Convert spreadsheet bytes to XML text.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConversionResult> {
        Ok(self.render(&self.extract_bytes(data)?))
    }

    /// Convert a spreadsheet file to XML text without writing anything.
    pub fn preview<P: AsRef<Path>>(&self, path: P) -> Result<ConversionResult> {
        Ok(self.render(&self.extract_file(path)?))
    }

    /// Convert a spreadsheet file and write the encoded XML into `output_dir`.
    ///
    /// The output name is the input file stem with an `.xml` extension.
    pub fn convert_file<P, Q>(&self, input: P, output_dir: Q) -> Result<WrittenFile>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input = input.as_ref();
        let output_path = output_path_for(input, output_dir.as_ref())?;

        let doc = self.extract_file(input)?;
        let result = self.render(&doc);
        let bytes = result.to_bytes(self.config.xml_encoding);
        fs::write(&output_path, bytes)?;

        log::info!(
            "Converted {} -> {} ({} items)",
            input.display(),
            output_path.display(),
            doc.item_count()
        );
        Ok(WrittenFile {
            output_path,
            file_id: result.file_id,
            item_count: doc.item_count(),
        })
    }

    /// Asynchronous [`convert_file`](Self::convert_file); file I/O goes
    /// through `tokio::fs`.
    #[cfg(feature = "async")]
    pub async fn convert_file_async<P, Q>(&self, input: P, output_dir: Q) -> Result<WrittenFile>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input = input.as_ref();
        let output_path = output_path_for(input, output_dir.as_ref())?;

        let data = tokio::fs::read(input).await?;
        let doc = self.extract_bytes(&data)?;
        let result = self.render(&doc);
        let bytes = result.to_bytes(self.config.xml_encoding);
        tokio::fs::write(&output_path, bytes).await?;

        log::info!(
            "Converted {} -> {} ({} items)",
            input.display(),
            output_path.display(),
            doc.item_count()
        );
        Ok(WrittenFile {
            output_path,
            file_id: result.file_id,
            item_count: doc.item_count(),
        })
    }
}

/// Output path for `input` inside `output_dir`: the input stem plus `.xml`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| Error::Other(format!("no file name in {}", input.display())))?;
    let mut name = stem.to_os_string();
    name.push(".xml");
    Ok(output_dir.join(name))
}
