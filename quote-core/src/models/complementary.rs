//! The five fixed charge rows printed under the line items.
//!
//! | Row           | Quantity                     | Default price |
//! |---------------|------------------------------|---------------|
//! | `partsTotal`  | none (sum of item totals)    | n/a           |
//! | `parts`       | user-edited                  | 0             |
//! | `bodywork`    | `SR + LA + VE` over items    | 40            |
//! | `mechanics`   | `ME` over items              | 40            |
//! | `consumables` | `VE` over items              | 24            |
//!
//! Every row carries its own VAT percentage (22 unless set).

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient::{self, DEFAULT_TAX_RATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    PartsTotal,
    Parts,
    Bodywork,
    Mechanics,
    Consumables,
}

impl RowKind {
    /// Display order, matching the printed quote.
    pub const ALL: [RowKind; 5] = [
        Self::PartsTotal,
        Self::Parts,
        Self::Bodywork,
        Self::Mechanics,
        Self::Consumables,
    ];

    /// Rows whose amount is `quantity x price`.
    pub const PRICED: [RowKind; 4] = [
        Self::Parts,
        Self::Bodywork,
        Self::Mechanics,
        Self::Consumables,
    ];

    /// JSON key of the row inside `complementary`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::PartsTotal => "partsTotal",
            Self::Parts => "parts",
            Self::Bodywork => "bodywork",
            Self::Mechanics => "mechanics",
            Self::Consumables => "consumables",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == s)
    }

    pub fn default_price(&self) -> Decimal {
        match self {
            Self::PartsTotal | Self::Parts => Decimal::ZERO,
            Self::Bodywork | Self::Mechanics => Decimal::from(40),
            Self::Consumables => Decimal::from(24),
        }
    }

    /// Whether the quantity is derived from line-item labour hours.
    pub fn has_derived_quantity(&self) -> bool {
        matches!(self, Self::Bodywork | Self::Mechanics | Self::Consumables)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplementaryRow {
    #[serde(serialize_with = "lenient::decimal::serialize")]
    pub quantity: Decimal,
    #[serde(serialize_with = "lenient::decimal::serialize")]
    pub price: Decimal,
    /// VAT percentage, e.g. `22` for 22%.
    #[serde(serialize_with = "lenient::decimal::serialize")]
    pub tax: Decimal,

    // Calculated values
    #[serde(serialize_with = "lenient::decimal::serialize")]
    pub total: Decimal,
    #[serde(serialize_with = "lenient::decimal::serialize")]
    pub taxable: Decimal,
    #[serde(serialize_with = "lenient::decimal::serialize")]
    pub tax_amount: Decimal,
    #[serde(serialize_with = "lenient::decimal::serialize")]
    pub total_with_tax: Decimal,
}

impl ComplementaryRow {
    /// A fresh row with the documented defaults for `kind`.
    pub fn with_defaults(kind: RowKind) -> Self {
        Self {
            quantity: Decimal::ZERO,
            price: kind.default_price(),
            tax: DEFAULT_TAX_RATE,
            total: Decimal::ZERO,
            taxable: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_with_tax: Decimal::ZERO,
        }
    }

    fn from_raw(
        kind: RowKind,
        raw: RawRow,
    ) -> Self {
        let (quantity, price) = if kind == RowKind::PartsTotal {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            (
                raw.quantity.unwrap_or(Decimal::ZERO),
                raw.price.unwrap_or_else(|| kind.default_price()),
            )
        };

        Self {
            quantity,
            price,
            tax: raw.tax.unwrap_or(DEFAULT_TAX_RATE),
            total: raw.total.unwrap_or(Decimal::ZERO),
            taxable: raw.taxable.unwrap_or(Decimal::ZERO),
            tax_amount: raw.tax_amount.unwrap_or(Decimal::ZERO),
            total_with_tax: raw.total_with_tax.unwrap_or(Decimal::ZERO),
        }
    }
}

/// A row as stored, before per-row defaults are filled in.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRow {
    #[serde(deserialize_with = "lenient::optional")]
    quantity: Option<Decimal>,
    #[serde(deserialize_with = "lenient::optional")]
    price: Option<Decimal>,
    #[serde(deserialize_with = "lenient::optional")]
    tax: Option<Decimal>,
    #[serde(deserialize_with = "lenient::optional")]
    total: Option<Decimal>,
    #[serde(deserialize_with = "lenient::optional")]
    taxable: Option<Decimal>,
    #[serde(deserialize_with = "lenient::optional")]
    tax_amount: Option<Decimal>,
    #[serde(deserialize_with = "lenient::optional")]
    total_with_tax: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplementaryRows {
    pub parts: ComplementaryRow,
    pub bodywork: ComplementaryRow,
    pub mechanics: ComplementaryRow,
    pub consumables: ComplementaryRow,
    pub parts_total: ComplementaryRow,
}

impl ComplementaryRows {
    pub fn get(
        &self,
        kind: RowKind,
    ) -> &ComplementaryRow {
        match kind {
            RowKind::PartsTotal => &self.parts_total,
            RowKind::Parts => &self.parts,
            RowKind::Bodywork => &self.bodywork,
            RowKind::Mechanics => &self.mechanics,
            RowKind::Consumables => &self.consumables,
        }
    }

    pub fn get_mut(
        &mut self,
        kind: RowKind,
    ) -> &mut ComplementaryRow {
        match kind {
            RowKind::PartsTotal => &mut self.parts_total,
            RowKind::Parts => &mut self.parts,
            RowKind::Bodywork => &mut self.bodywork,
            RowKind::Mechanics => &mut self.mechanics,
            RowKind::Consumables => &mut self.consumables,
        }
    }

    /// All five rows in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RowKind, &ComplementaryRow)> {
        RowKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Builds the rows from a stored `complementary` object. Missing rows
    /// and missing fields take their defaults; anything that is not an
    /// object is treated as missing.
    pub fn from_value(value: &Value) -> Self {
        let mut rows = Self::default();
        let Some(map) = value.as_object() else {
            return rows;
        };

        for kind in RowKind::ALL {
            if let Some(stored) = map.get(kind.key()) {
                let raw = RawRow::deserialize(stored).unwrap_or_default();
                *rows.get_mut(kind) = ComplementaryRow::from_raw(kind, raw);
            }
        }
        rows
    }
}

impl Default for ComplementaryRows {
    fn default() -> Self {
        Self {
            parts: ComplementaryRow::with_defaults(RowKind::Parts),
            bodywork: ComplementaryRow::with_defaults(RowKind::Bodywork),
            mechanics: ComplementaryRow::with_defaults(RowKind::Mechanics),
            consumables: ComplementaryRow::with_defaults(RowKind::Consumables),
            parts_total: ComplementaryRow::with_defaults(RowKind::PartsTotal),
        }
    }
}

impl<'de> Deserialize<'de> for ComplementaryRows {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_match_shop_price_list() {
        let rows = ComplementaryRows::default();

        assert_eq!(rows.parts.price, dec!(0));
        assert_eq!(rows.bodywork.price, dec!(40));
        assert_eq!(rows.mechanics.price, dec!(40));
        assert_eq!(rows.consumables.price, dec!(24));
        for (_, row) in rows.iter() {
            assert_eq!(row.tax, dec!(22));
        }
    }

    #[test]
    fn missing_rows_take_defaults() {
        let rows = ComplementaryRows::from_value(&json!({ "parts": { "quantity": 3 } }));

        assert_eq!(rows.parts.quantity, dec!(3));
        assert_eq!(rows.parts.price, dec!(0));
        assert_eq!(rows.bodywork, ComplementaryRow::with_defaults(RowKind::Bodywork));
    }

    #[test]
    fn missing_fields_take_row_defaults() {
        let rows = ComplementaryRows::from_value(&json!({ "consumables": { "tax": "" } }));

        assert_eq!(rows.consumables.price, dec!(24));
        assert_eq!(rows.consumables.tax, dec!(22));
    }

    #[test]
    fn non_object_input_is_all_defaults() {
        assert_eq!(
            ComplementaryRows::from_value(&json!("nope")),
            ComplementaryRows::default()
        );
        assert_eq!(
            ComplementaryRows::from_value(&json!({ "bodywork": 12 })),
            ComplementaryRows::default()
        );
    }

    #[test]
    fn parts_total_ignores_stored_quantity_and_price() {
        let rows = ComplementaryRows::from_value(&json!({
            "partsTotal": { "quantity": 5, "price": 10, "tax": 10, "total": 50 }
        }));

        assert_eq!(rows.parts_total.quantity, dec!(0));
        assert_eq!(rows.parts_total.price, dec!(0));
        assert_eq!(rows.parts_total.tax, dec!(10));
        assert_eq!(rows.parts_total.total, dec!(50));
    }

    #[test]
    fn serializes_camel_case_rows() {
        let json = serde_json::to_value(ComplementaryRows::default()).unwrap();

        assert_eq!(json["bodywork"]["price"], json!(40));
        assert_eq!(json["partsTotal"]["totalWithTax"], json!(0));
        assert_eq!(json["consumables"]["taxAmount"], json!(0));
    }

    #[test]
    fn parse_accepts_row_keys() {
        assert_eq!(RowKind::parse("partsTotal"), Some(RowKind::PartsTotal));
        assert_eq!(RowKind::parse("bodywork"), Some(RowKind::Bodywork));
        assert_eq!(RowKind::parse("labour"), None);
    }
}
