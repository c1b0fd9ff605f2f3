//! Rendering of extracted documents to XML and JSON.

mod json;
mod options;
mod result;
mod xml;

pub use json::{to_json, JsonFormat};
pub use options::{XmlSettings, DEFAULT_COUNTRY};
pub use result::ConversionResult;
pub use xml::{generate_xml, rounded_quantity, XmlAssembler};
