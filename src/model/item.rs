//! Line item and totals types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the goods table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Row number from the row-number column
    pub row_number: i64,

    /// Item name
    pub name: String,

    /// Leading ASCII article code of the name (may be empty)
    pub article: String,

    /// OKEI unit code
    pub unit_code: String,

    /// Unit name
    pub unit_name: String,

    /// Quantity
    pub quantity: Option<f64>,

    /// Unit price
    pub price: Option<f64>,

    /// Amount without VAT
    pub amount_no_vat: Option<f64>,

    /// VAT rate
    pub vat_rate: VatRate,

    /// VAT amount
    pub vat_amount: Option<f64>,

    /// Amount including VAT
    pub amount_with_vat: Option<f64>,
}

/// VAT rate as found in the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VatRate {
    /// Numeric rate, either a fraction (`0.2`) or a percentage (`20`)
    Rate(f64),
    /// Non-numeric label such as `без НДС`
    Label(String),
}

impl VatRate {
    /// Rate as a whole percentage.
    ///
    /// Fractions below one are scaled by 100, so `0.2` and `20` both give `20`.
    pub fn percent(&self) -> Option<i64> {
        match self {
            VatRate::Rate(rate) if rate.is_finite() => {
                let percent = if rate.abs() < 1.0 { rate * 100.0 } else { *rate };
                Some(percent.round() as i64)
            }
            VatRate::Rate(_) | VatRate::Label(_) => None,
        }
    }

    /// Value for the 1C VAT field: the percentage without a sign, or the label.
    pub fn plain(&self) -> String {
        match (self.percent(), self) {
            (Some(percent), _) => percent.to_string(),
            (None, VatRate::Label(label)) => label.clone(),
            (None, VatRate::Rate(_)) => String::new(),
        }
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate::Rate(20.0)
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.percent(), self) {
            (Some(percent), _) => write!(f, "{}%", percent),
            (None, VatRate::Label(label)) => write!(f, "{}", label),
            (None, VatRate::Rate(_)) => Ok(()),
        }
    }
}

/// Sums over all line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Total amount without VAT
    pub total_no_vat: f64,

    /// Total VAT
    pub total_vat: f64,

    /// Total amount including VAT
    pub total_with_vat: f64,

    /// Total quantity
    pub total_quantity: f64,
}

impl Totals {
    /// Sum the items in a single pass; missing values count as zero.
    ///
    /// No rounding happens here.
    pub fn from_items(items: &[LineItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total_no_vat: acc.total_no_vat + item.amount_no_vat.unwrap_or(0.0),
            total_vat: acc.total_vat + item.vat_amount.unwrap_or(0.0),
            total_with_vat: acc.total_with_vat + item.amount_with_vat.unwrap_or(0.0),
            total_quantity: acc.total_quantity + item.quantity.unwrap_or(0.0),
        })
    }
}
