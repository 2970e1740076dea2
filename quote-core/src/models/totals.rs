use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Grand totals across the five complementary rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteTotals {
    #[serde(with = "lenient::decimal")]
    pub subtotal: Decimal,
    #[serde(with = "lenient::decimal")]
    pub iva: Decimal,
    #[serde(with = "lenient::decimal")]
    pub total_with_iva: Decimal,
}
