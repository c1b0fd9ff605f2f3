//! Output byte encoding.

use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Byte encoding of written XML files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputEncoding {
    /// Single-byte Cyrillic, expected by most accounting software
    #[default]
    Windows1251,
    /// UTF-8
    Utf8,
}

impl OutputEncoding {
    /// Resolve a WHATWG encoding label (`cp1251`, `windows-1251`, `utf8`, ...).
    pub fn from_label(label: &str) -> Result<Self> {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(enc) if enc == WINDOWS_1251 => Ok(OutputEncoding::Windows1251),
            Some(enc) if enc == UTF_8 => Ok(OutputEncoding::Utf8),
            Some(enc) => Err(Error::Encoding(format!(
                "unsupported output encoding: {}",
                enc.name()
            ))),
            None => Err(Error::Encoding(format!("unknown encoding label: {}", label))),
        }
    }

    /// Canonical name, as written in the XML declaration.
    pub fn label(self) -> &'static str {
        self.encoding().name()
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            OutputEncoding::Windows1251 => WINDOWS_1251,
            OutputEncoding::Utf8 => UTF_8,
        }
    }

    /// Encode text.
    ///
    /// Characters the encoding cannot represent are written as numeric
    /// character references (`&#25554;`), which XML readers resolve back
    /// to the original character.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let encoding = self.encoding();
        let (bytes, _, had_errors) = encoding.encode(text);
        if had_errors {
            let unmappable: String = text
                .chars()
                .filter(|c| encoding.encode(c.encode_utf8(&mut [0; 4])).2)
                .collect();
            log::warn!(
                "{} character(s) {:?} cannot be written as {}; using character references",
                unmappable.chars().count(),
                unmappable,
                encoding.name()
            );
        }
        bytes.into_owned()
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

impl TryFrom<String> for OutputEncoding {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_label(&value)
    }
}

impl From<OutputEncoding> for String {
    fn from(value: OutputEncoding) -> Self {
        value.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_aliases() {
        let windows = OutputEncoding::Windows1251;
        assert_eq!(OutputEncoding::from_label("windows-1251").unwrap(), windows);
        assert_eq!(OutputEncoding::from_label("cp1251").unwrap(), windows);
        assert_eq!(OutputEncoding::from_label("UTF-8").unwrap(), OutputEncoding::Utf8);
        assert_eq!("utf8".parse::<OutputEncoding>().unwrap(), OutputEncoding::Utf8);
    }

    #[test]
    fn test_unknown_and_unsupported_labels() {
        assert!(matches!(OutputEncoding::from_label("klingon"), Err(Error::Encoding(_))));
        assert!(matches!(OutputEncoding::from_label("koi8-r"), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_encode_cyrillic() {
        let bytes = OutputEncoding::Windows1251.encode("Акт №1");
        assert_eq!(bytes, vec![0xC0, 0xEA, 0xF2, b' ', 0xB9, b'1']);
    }

    #[test]
    fn test_unmappable_character_becomes_reference() {
        let bytes = OutputEncoding::Windows1251.encode("Розетка 插座");
        assert!(bytes.ends_with(b" &#25554;&#24231;"));
        assert_eq!(&bytes[..2], &[0xD0, 0xEE]);

        let utf8 = OutputEncoding::Utf8.encode("Товар 😀");
        assert_eq!(utf8, "Товар 😀".as_bytes());
    }

    #[test]
    fn test_serde_as_label() {
        let enc: OutputEncoding = serde_json::from_str("\"windows-1251\"").unwrap();
        assert_eq!(enc, OutputEncoding::Windows1251);
        assert_eq!(serde_json::to_string(&OutputEncoding::Utf8).unwrap(), "\"UTF-8\"");
    }
}
