use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lenient;

/// One row of the repair estimate.
///
/// `SR`, `LA`, `VE` and `ME` are labour hours booked against the shop's
/// labour categories; they never affect the row's own total and only feed
/// the auto-derived complementary quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(deserialize_with = "lenient::text")]
    pub source: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,

    #[serde(rename = "SR", with = "lenient::decimal")]
    pub sr: Decimal,
    #[serde(rename = "LA", with = "lenient::decimal")]
    pub la: Decimal,
    #[serde(rename = "VE", with = "lenient::decimal")]
    pub ve: Decimal,
    #[serde(rename = "ME", with = "lenient::decimal")]
    pub me: Decimal,

    #[serde(with = "lenient::decimal")]
    pub quantity: Decimal,
    #[serde(with = "lenient::decimal")]
    pub price: Decimal,

    // Calculated value
    #[serde(with = "lenient::decimal")]
    pub total: Decimal,
}

impl LineItem {
    /// A part or service line without labour hours.
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            price,
            ..Default::default()
        }
    }

    /// Hours billed as bodywork labour (`SR + LA + VE`).
    pub fn bodywork_hours(&self) -> Decimal {
        self.sr.saturating_add(self.la).saturating_add(self.ve)
    }
}
