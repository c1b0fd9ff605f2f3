//! XML rendering result.

use crate::convert::OutputEncoding;
use serde::{Deserialize, Serialize};

/// Rendered XML document and its file identifier.
///
/// The text carries no XML declaration; [`ConversionResult::to_bytes`]
/// writes one matching the chosen output encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// XML document text
    pub xml_text: String,

    /// Composite file identifier (`ИдФайл`)
    pub file_id: String,
}

impl ConversionResult {
    /// Create a new result.
    pub fn new(xml_text: String, file_id: String) -> Self {
        Self { xml_text, file_id }
    }

    /// Full document text including the XML declaration for `encoding`.
    pub fn to_document_string(&self, encoding: OutputEncoding) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"{}\"?>\n{}",
            encoding.label(),
            self.xml_text
        )
    }

    /// Encode the document, declaration included, as bytes.
    pub fn to_bytes(&self, encoding: OutputEncoding) -> Vec<u8> {
        encoding.encode(&self.to_document_string(encoding))
    }
}
