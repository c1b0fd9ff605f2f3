//! Document-level types.

use super::{LineItem, Totals};
use serde::{Deserialize, Serialize};

/// Header data of a UPD as found in the spreadsheet.
///
/// Every field is optional: extraction records only what it finds and the
/// XML assembler substitutes defaults when rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Document (invoice) number, passed through as found
    pub doc_number: Option<String>,

    /// Document date, `DD.MM.YYYY` when recognized, raw text otherwise
    pub doc_date: Option<String>,

    /// Seller organization name
    pub seller_name: Option<String>,

    /// Seller address
    pub seller_address: Option<String>,

    /// Seller INN
    pub seller_inn: Option<String>,

    /// Seller KPP
    pub seller_kpp: Option<String>,

    /// Buyer organization name
    pub buyer_name: Option<String>,

    /// Buyer address
    pub buyer_address: Option<String>,

    /// Buyer INN
    pub buyer_inn: Option<String>,

    /// Buyer KPP
    pub buyer_kpp: Option<String>,
}

impl DocumentInfo {
    /// Create an empty document info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seller's INN and KPP.
    pub fn set_seller_tax_ids(&mut self, ids: InnKpp) {
        self.seller_inn = ids.inn;
        self.seller_kpp = ids.kpp;
    }

    /// Set the buyer's INN and KPP.
    pub fn set_buyer_tax_ids(&mut self, ids: InnKpp) {
        self.buyer_inn = ids.inn;
        self.buyer_kpp = ids.kpp;
    }

    /// Number of fields that were found.
    pub fn found_count(&self) -> usize {
        [
            &self.doc_number,
            &self.doc_date,
            &self.seller_name,
            &self.seller_address,
            &self.seller_inn,
            &self.seller_kpp,
            &self.buyer_name,
            &self.buyer_address,
            &self.buyer_inn,
            &self.buyer_kpp,
        ]
        .iter()
        .filter(|field| field.is_some())
        .count()
    }
}

/// Taxpayer number (INN) and registration reason code (KPP).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnKpp {
    /// INN
    pub inn: Option<String>,
    /// KPP
    pub kpp: Option<String>,
}

/// Everything extracted from one spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Header fields
    pub info: DocumentInfo,

    /// Line items in sheet order
    pub items: Vec<LineItem>,

    /// Sums over the items
    pub totals: Totals,
}

impl ExtractedDocument {
    /// Bundle extraction results, computing totals from the items.
    pub fn new(info: DocumentInfo, items: Vec<LineItem>) -> Self {
        let totals = Totals::from_items(&items);
        Self {
            info,
            items,
            totals,
        }
    }

    /// Number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_count() {
        let mut info = DocumentInfo::new();
        assert_eq!(info.found_count(), 0);

        info.doc_number = Some("12".to_string());
        info.set_seller_tax_ids(InnKpp {
            inn: Some("7743013902".to_string()),
            kpp: None,
        });
        assert_eq!(info.found_count(), 2);
    }

    #[test]
    fn test_serialize_camel_case() {
        let info = DocumentInfo {
            doc_number: Some("7".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"docNumber\":\"7\""));
        assert!(json.contains("\"sellerInn\":null"));
    }
}
