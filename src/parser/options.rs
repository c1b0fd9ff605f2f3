//! Column mapping: where the extractors look for each field.
//!
//! Labels are substrings searched for in the sheet; columns are 0-indexed
//! absolute column numbers (column A is 0). The serialized shape matches the
//! `excelMapping` section of a converter configuration file.

use serde::{Deserialize, Deserializer, Serialize};

/// Complete column mapping for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnMapping {
    /// Document number and date
    pub document: DocumentMapping,

    /// Seller block
    #[serde(deserialize_with = "seller_from_json")]
    pub seller: PartyMapping,

    /// Buyer block
    #[serde(deserialize_with = "buyer_from_json")]
    pub buyer: PartyMapping,

    /// Address search
    pub address: AddressMapping,

    /// Goods table
    pub items: ItemsMapping,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            document: DocumentMapping::default(),
            seller: PartyMapping::seller(),
            buyer: PartyMapping::buyer(),
            address: AddressMapping::default(),
            items: ItemsMapping::default(),
        }
    }
}

impl ColumnMapping {
    /// Create a mapping with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document mapping.
    pub fn with_document(mut self, document: DocumentMapping) -> Self {
        self.document = document;
        self
    }

    /// Set the seller mapping.
    pub fn with_seller(mut self, seller: PartyMapping) -> Self {
        self.seller = seller;
        self
    }

    /// Set the buyer mapping.
    pub fn with_buyer(mut self, buyer: PartyMapping) -> Self {
        self.buyer = buyer;
        self
    }

    /// Set the goods table mapping.
    pub fn with_items(mut self, items: ItemsMapping) -> Self {
        self.items = items;
        self
    }
}

/// Where to find the document number and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentMapping {
    /// Label on the document number row
    pub number_search_text: String,

    /// Column holding the number
    pub number_column: usize,

    /// Label cell preceding the date (compared after trimming)
    pub date_search_text: String,

    /// Column holding the date
    pub date_column: usize,

    /// How many leading rows to scan for the date
    pub date_search_rows: usize,
}

impl Default for DocumentMapping {
    fn default() -> Self {
        Self {
            number_search_text: "Счет-фактура №".to_string(),
            number_column: 15,
            date_search_text: "от".to_string(),
            date_column: 24,
            date_search_rows: 20,
        }
    }
}

/// Where to find one party (seller or buyer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMapping {
    /// Label on the name row
    pub name_search_text: String,

    /// Column holding the name
    pub name_column: usize,

    /// Column holding the address on an address row
    pub address_column: usize,

    /// Label on the INN/KPP row
    pub inn_kpp_search_text: String,

    /// Column holding `INN/KPP`
    pub inn_kpp_column: usize,
}

impl PartyMapping {
    /// Default seller mapping.
    pub fn seller() -> Self {
        Self {
            name_search_text: "Продавец:".to_string(),
            name_column: 17,
            address_column: 17,
            inn_kpp_search_text: "ИНН/КПП продавца".to_string(),
            inn_kpp_column: 17,
        }
    }

    /// Default buyer mapping.
    pub fn buyer() -> Self {
        Self {
            name_search_text: "Покупатель:".to_string(),
            name_column: 56,
            address_column: 56,
            inn_kpp_search_text: "ИНН/КПП покупателя".to_string(),
            inn_kpp_column: 56,
        }
    }
}

/// Partially specified party section; missing keys keep the party's defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PartyOverrides {
    name_search_text: Option<String>,
    name_column: Option<usize>,
    address_column: Option<usize>,
    inn_kpp_search_text: Option<String>,
    inn_kpp_column: Option<usize>,
}

impl PartyOverrides {
    fn apply(self, base: PartyMapping) -> PartyMapping {
        PartyMapping {
            name_search_text: self.name_search_text.unwrap_or(base.name_search_text),
            name_column: self.name_column.unwrap_or(base.name_column),
            address_column: self.address_column.unwrap_or(base.address_column),
            inn_kpp_search_text: self
                .inn_kpp_search_text
                .unwrap_or(base.inn_kpp_search_text),
            inn_kpp_column: self.inn_kpp_column.unwrap_or(base.inn_kpp_column),
        }
    }
}

fn seller_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PartyMapping, D::Error> {
    PartyOverrides::deserialize(deserializer).map(|o| o.apply(PartyMapping::seller()))
}

fn buyer_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PartyMapping, D::Error> {
    PartyOverrides::deserialize(deserializer).map(|o| o.apply(PartyMapping::buyer()))
}

/// How address rows are found.
///
/// The first matching cell belongs to the seller, the second to the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressMapping {
    /// Label on address rows
    pub search_text: String,

    /// How many leading rows to scan
    pub search_rows: usize,
}

impl Default for AddressMapping {
    fn default() -> Self {
        Self {
            search_text: "Адрес:".to_string(),
            search_rows: 15,
        }
    }
}

/// Layout of the goods table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemsMapping {
    /// Header label of the row-number column
    pub header_search_text: String,

    /// Row-number column
    pub row_number_column: usize,

    /// Item name column
    pub name_column: usize,

    /// OKEI unit code column
    pub okei_code_column: usize,

    /// Unit name column
    pub unit_column: usize,

    /// Quantity column
    pub quantity_column: usize,

    /// Price column
    pub price_column: usize,

    /// Amount without VAT column
    pub amount_no_vat_column: usize,

    /// VAT rate column
    pub vat_rate_column: usize,

    /// VAT amount column
    pub vat_amount_column: usize,

    /// Amount with VAT column
    pub amount_with_vat_column: usize,

    /// Rows after the header searched for the first item
    pub data_start_window: usize,

    /// Offset from the header used when no first item is recognized
    pub fallback_offset: usize,

    /// Safety cap on extracted items
    pub max_items: usize,
}

impl Default for ItemsMapping {
    fn default() -> Self {
        Self {
            header_search_text: "№\nп/п".to_string(),
            row_number_column: 5,
            name_column: 9,
            okei_code_column: 22,
            unit_column: 24,
            quantity_column: 26,
            price_column: 29,
            amount_no_vat_column: 39,
            vat_rate_column: 51,
            vat_amount_column: 53,
            amount_with_vat_column: 57,
            data_start_window: 8,
            fallback_offset: 3,
            max_items: 10_000,
        }
    }
}

/// Values substituted for empty cells of a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemDefaults {
    /// VAT rate in percent
    pub vat_rate: f64,

    /// Unit name
    pub unit: String,

    /// OKEI unit code
    #[serde(deserialize_with = "string_or_number")]
    pub okei_code: String,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            vat_rate: 20.0,
            unit: "шт".to_string(),
            okei_code: "796".to_string(),
        }
    }
}

/// Accept `"796"` as well as `796`.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let mapping = ColumnMapping::default();
        assert_eq!(mapping.document.number_column, 15);
        assert_eq!(mapping.seller.name_search_text, "Продавец:");
        assert_eq!(mapping.buyer.inn_kpp_column, 56);
        assert_eq!(mapping.items.amount_with_vat_column, 57);
        assert_eq!(mapping.address.search_rows, 15);
    }

    #[test]
    fn test_partial_party_keeps_own_defaults() {
        let mapping: ColumnMapping =
            serde_json::from_str(r#"{"buyer": {"nameColumn": 40}, "seller": {}}"#).unwrap();
        assert_eq!(mapping.buyer.name_column, 40);
        assert_eq!(mapping.buyer.name_search_text, "Покупатель:");
        assert_eq!(mapping.buyer.inn_kpp_column, 56);
        assert_eq!(mapping.seller, PartyMapping::seller());
    }

    #[test]
    fn test_item_defaults_accept_numeric_okei() {
        let defaults: ItemDefaults =
            serde_json::from_str(r#"{"vatRate": 10, "okeiCode": 166}"#).unwrap();
        assert_eq!(defaults.okei_code, "166");
        assert_eq!(defaults.vat_rate, 10.0);
        assert_eq!(defaults.unit, "шт");
    }

    #[test]
    fn test_mapping_json_roundtrip_shape() {
        let json = serde_json::to_value(ColumnMapping::default()).unwrap();
        assert_eq!(json["document"]["numberSearchText"], "Счет-фактура №");
        assert_eq!(json["items"]["headerSearchText"], "№\nп/п");
        assert_eq!(json["buyer"]["innKppColumn"], 56);
    }

    #[test]
    fn test_partial_json_overrides() {
        let mapping: ColumnMapping =
            serde_json::from_str(r#"{"items": {"nameColumn": 3, "maxItems": 5}}"#).unwrap();
        assert_eq!(mapping.items.name_column, 3);
        assert_eq!(mapping.items.max_items, 5);
        assert_eq!(mapping.items.row_number_column, 5);
        assert_eq!(mapping.document, DocumentMapping::default());
    }
}
