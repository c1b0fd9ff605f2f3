//! XML output settings.

use serde::{Deserialize, Serialize};

/// Fixed attributes of the generated `ON_NSCHFDOPPR` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XmlSettings {
    /// Format version (`ВерсФорм`)
    pub version: String,

    /// Document function (`Функция`), e.g. `ДОП` or `СЧФДОП`
    pub function: String,

    /// Currency OKV code
    pub currency_code: String,

    /// Currency name
    pub currency_name: String,

    /// Producing program (`ВерсПрог`)
    pub program_version: String,

    /// Country of origin written for every item
    ///
    /// Configured at the top level of a converter configuration, so it is
    /// not part of the `xmlSettings` section.
    #[serde(skip)]
    pub default_country: String,
}

impl Default for XmlSettings {
    fn default() -> Self {
        Self {
            version: "5.03".to_string(),
            function: "ДОП".to_string(),
            currency_code: "643".to_string(),
            currency_name: "Российский рубль".to_string(),
            program_version: "UPD Converter 1.0".to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// Country of origin used when none is configured.
pub const DEFAULT_COUNTRY: &str = "КИТАЙ";

impl XmlSettings {
    /// Create settings with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document function.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    /// Set the format version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the currency.
    pub fn with_currency(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self.currency_name = name.into();
        self
    }

    /// Set the country of origin.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }
}
