//! Typed edits applied to a quote.
//!
//! Every edit targets an input field; derived fields have no edit and can
//! only change through recalculation. Applying an edit validates it first,
//! so a rejected edit leaves the document untouched, then mutates the
//! document and recalculates it.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::recalculate;
use crate::lenient::parse_decimal;
use crate::models::{GeneralField, LineItem, QuoteDocument, RowKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("item {index} does not exist (quote has {len} items)")]
    ItemOutOfRange { index: usize, len: usize },

    #[error("{field} is not editable on {row}")]
    ReadOnlyField {
        row: &'static str,
        field: &'static str,
    },

    #[error("unknown field path: {0}")]
    UnknownPath(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTextField {
    Source,
    Description,
}

impl ItemTextField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Description => "description",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::Source, Self::Description]
            .into_iter()
            .find(|field| field.key() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemNumberField {
    Sr,
    La,
    Ve,
    Me,
    Quantity,
    Price,
}

impl ItemNumberField {
    pub const ALL: [ItemNumberField; 6] = [
        Self::Sr,
        Self::La,
        Self::Ve,
        Self::Me,
        Self::Quantity,
        Self::Price,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Sr => "SR",
            Self::La => "LA",
            Self::Ve => "VE",
            Self::Me => "ME",
            Self::Quantity => "quantity",
            Self::Price => "price",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == s)
    }

    fn slot<'a>(
        &self,
        item: &'a mut LineItem,
    ) -> &'a mut Decimal {
        match self {
            Self::Sr => &mut item.sr,
            Self::La => &mut item.la,
            Self::Ve => &mut item.ve,
            Self::Me => &mut item.me,
            Self::Quantity => &mut item.quantity,
            Self::Price => &mut item.price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplementaryField {
    Quantity,
    Price,
    Tax,
}

impl ComplementaryField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::Tax => "tax",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::Quantity, Self::Price, Self::Tax]
            .into_iter()
            .find(|field| field.key() == s)
    }

    /// `parts` is fully editable; labour rows derive their quantity and
    /// `partsTotal` derives both quantity and price.
    pub fn is_editable_on(
        &self,
        row: RowKind,
    ) -> bool {
        match (row, self) {
            (_, Self::Tax) => true,
            (RowKind::PartsTotal, _) => false,
            (RowKind::Parts, _) => true,
            (_, Self::Price) => true,
            (_, Self::Quantity) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteEdit {
    SetGeneral(GeneralField, String),
    AddItem(LineItem),
    RemoveItem(usize),
    SetItemText {
        index: usize,
        field: ItemTextField,
        value: String,
    },
    SetItemNumber {
        index: usize,
        field: ItemNumberField,
        value: Decimal,
    },
    SetComplementary {
        row: RowKind,
        field: ComplementaryField,
        value: Decimal,
    },
}

impl QuoteEdit {
    /// Builds an edit from a dotted field path and the raw text the user
    /// typed.
    ///
    /// Accepted paths are `general.<key>`, `items[<index>].<key>` and
    /// `complementary.<row>.<key>`, using the document's JSON keys. Numeric
    /// values are read leniently, so `"12,50"` is 12.5 and `"abc"` is 0.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use quote_core::{ItemNumberField, QuoteEdit};
    ///
    /// let edit = QuoteEdit::parse("items[2].price", "12,50").unwrap();
    ///
    /// assert_eq!(
    ///     edit,
    ///     QuoteEdit::SetItemNumber { index: 2, field: ItemNumberField::Price, value: dec!(12.50) }
    /// );
    /// ```
    pub fn parse(
        path: &str,
        value: &str,
    ) -> Result<Self, EditError> {
        let unknown = || EditError::UnknownPath(path.to_string());
        let path = path.trim();

        if let Some(key) = path.strip_prefix("general.") {
            let field = GeneralField::parse(key).ok_or_else(unknown)?;
            return Ok(Self::SetGeneral(field, value.to_string()));
        }

        if let Some(rest) = path.strip_prefix("items[") {
            let (index, key) = rest.split_once("].").ok_or_else(unknown)?;
            let index: usize = index.parse().map_err(|_| unknown())?;

            if let Some(field) = ItemTextField::parse(key) {
                return Ok(Self::SetItemText {
                    index,
                    field,
                    value: value.to_string(),
                });
            }
            let field = ItemNumberField::parse(key).ok_or_else(unknown)?;
            return Ok(Self::SetItemNumber {
                index,
                field,
                value: parse_decimal(value),
            });
        }

        if let Some(rest) = path.strip_prefix("complementary.") {
            let (row, key) = rest.split_once('.').ok_or_else(unknown)?;
            let row = RowKind::parse(row).ok_or_else(unknown)?;
            let field = ComplementaryField::parse(key).ok_or_else(unknown)?;
            return Ok(Self::SetComplementary {
                row,
                field,
                value: parse_decimal(value),
            });
        }

        Err(unknown())
    }

    /// Applies the edit and recalculates the document.
    pub fn apply(
        self,
        quote: &mut QuoteDocument,
    ) -> Result<(), EditError> {
        self.validate(quote)?;
        debug!(edit = ?self, "applying quote edit");

        match self {
            Self::SetGeneral(field, value) => quote.general.set(field, value),
            Self::AddItem(item) => quote.items.push(item),
            Self::RemoveItem(index) => {
                quote.items.remove(index);
            }
            Self::SetItemText {
                index,
                field,
                value,
            } => {
                let item = &mut quote.items[index];
                match field {
                    ItemTextField::Source => item.source = value,
                    ItemTextField::Description => item.description = value,
                }
            }
            Self::SetItemNumber {
                index,
                field,
                value,
            } => *field.slot(&mut quote.items[index]) = value,
            Self::SetComplementary { row, field, value } => {
                let target = quote.complementary.get_mut(row);
                match field {
                    ComplementaryField::Quantity => target.quantity = value,
                    ComplementaryField::Price => target.price = value,
                    ComplementaryField::Tax => target.tax = value,
                }
            }
        }

        recalculate(quote);
        Ok(())
    }

    fn validate(
        &self,
        quote: &QuoteDocument,
    ) -> Result<(), EditError> {
        let len = quote.items.len();
        match self {
            Self::RemoveItem(index)
            | Self::SetItemText { index, .. }
            | Self::SetItemNumber { index, .. }
                if *index >= len =>
            {
                Err(EditError::ItemOutOfRange { index: *index, len })
            }
            Self::SetComplementary { row, field, .. } if !field.is_editable_on(*row) => {
                Err(EditError::ReadOnlyField {
                    row: row.key(),
                    field: field.key(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_quote() -> QuoteDocument {
        let mut quote = QuoteDocument::default();
        quote.items.push(LineItem::new("Paraurti", dec!(1), dec!(100)));
        recalculate(&mut quote);
        quote
    }

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn parse_general_path() {
        let result = QuoteEdit::parse("general.licensePlate", "AB123CD");

        assert_eq!(
            result,
            Ok(QuoteEdit::SetGeneral(GeneralField::LicensePlate, "AB123CD".to_string()))
        );
    }

    #[test]
    fn parse_item_text_path() {
        let result = QuoteEdit::parse("items[0].description", "Faro");

        assert_eq!(
            result,
            Ok(QuoteEdit::SetItemText {
                index: 0,
                field: ItemTextField::Description,
                value: "Faro".to_string(),
            })
        );
    }

    #[test]
    fn parse_item_labour_path() {
        let result = QuoteEdit::parse("items[3].VE", "1,5");

        assert_eq!(
            result,
            Ok(QuoteEdit::SetItemNumber {
                index: 3,
                field: ItemNumberField::Ve,
                value: dec!(1.5),
            })
        );
    }

    #[test]
    fn parse_complementary_path_coerces_garbage_to_zero() {
        let result = QuoteEdit::parse("complementary.bodywork.price", "abc");

        assert_eq!(
            result,
            Ok(QuoteEdit::SetComplementary {
                row: RowKind::Bodywork,
                field: ComplementaryField::Price,
                value: dec!(0),
            })
        );
    }

    #[test]
    fn parse_rejects_unknown_paths() {
        for path in [
            "general.owner",
            "items[x].price",
            "items[0]price",
            "items[0].total",
            "complementary.labour.price",
            "complementary.parts.total",
            "totals.subtotal",
            "",
        ] {
            assert_eq!(
                QuoteEdit::parse(path, "1"),
                Err(EditError::UnknownPath(path.to_string())),
                "path {path:?}"
            );
        }
    }

    // =========================================================================
    // is_editable_on tests
    // =========================================================================

    #[test]
    fn parts_row_is_fully_editable() {
        for field in [ComplementaryField::Quantity, ComplementaryField::Price, ComplementaryField::Tax] {
            assert!(field.is_editable_on(RowKind::Parts));
        }
    }

    #[test]
    fn labour_rows_derive_their_quantity() {
        for row in [RowKind::Bodywork, RowKind::Mechanics, RowKind::Consumables] {
            assert!(!ComplementaryField::Quantity.is_editable_on(row));
            assert!(ComplementaryField::Price.is_editable_on(row));
            assert!(ComplementaryField::Tax.is_editable_on(row));
        }
    }

    #[test]
    fn parts_total_only_accepts_tax() {
        assert!(!ComplementaryField::Quantity.is_editable_on(RowKind::PartsTotal));
        assert!(!ComplementaryField::Price.is_editable_on(RowKind::PartsTotal));
        assert!(ComplementaryField::Tax.is_editable_on(RowKind::PartsTotal));
    }

    // =========================================================================
    // apply tests
    // =========================================================================

    #[test]
    fn apply_item_price_recalculates() {
        let mut quote = test_quote();

        QuoteEdit::parse("items[0].price", "12,50")
            .unwrap()
            .apply(&mut quote)
            .unwrap();

        assert_eq!(quote.items[0].total, dec!(12.50));
        assert_eq!(quote.totals.total_with_iva, dec!(15.25));
    }

    #[test]
    fn apply_add_and_remove_item() {
        let mut quote = test_quote();

        QuoteEdit::AddItem(LineItem::new("Faro", dec!(2), dec!(50)))
            .apply(&mut quote)
            .unwrap();
        assert_eq!(quote.complementary.parts_total.total, dec!(200.00));

        QuoteEdit::RemoveItem(0).apply(&mut quote).unwrap();
        assert_eq!(quote.items.len(), 1);
        assert_eq!(quote.items[0].description, "Faro");
        assert_eq!(quote.complementary.parts_total.total, dec!(100.00));
    }

    #[test]
    fn apply_labour_hours_drive_quantities() {
        let mut quote = test_quote();

        QuoteEdit::parse("items[0].VE", "2")
            .unwrap()
            .apply(&mut quote)
            .unwrap();

        assert_eq!(quote.complementary.bodywork.quantity, dec!(2));
        assert_eq!(quote.complementary.consumables.quantity, dec!(2));
        assert_eq!(quote.complementary.bodywork.total, dec!(80.00));
    }

    #[test]
    fn apply_row_tax() {
        let mut quote = test_quote();

        QuoteEdit::parse("complementary.partsTotal.tax", "10")
            .unwrap()
            .apply(&mut quote)
            .unwrap();

        assert_eq!(quote.complementary.parts_total.tax_amount, dec!(10.00));
        assert_eq!(quote.totals.total_with_iva, dec!(110.00));
    }

    #[test]
    fn apply_out_of_range_leaves_quote_untouched() {
        let mut quote = test_quote();
        let before = quote.clone();

        let result = QuoteEdit::RemoveItem(5).apply(&mut quote);

        assert_eq!(result, Err(EditError::ItemOutOfRange { index: 5, len: 1 }));
        assert_eq!(quote, before);
    }

    #[test]
    fn apply_read_only_field_leaves_quote_untouched() {
        let mut quote = test_quote();
        let before = quote.clone();

        let result = QuoteEdit::parse("complementary.bodywork.quantity", "9")
            .unwrap()
            .apply(&mut quote);

        assert_eq!(
            result,
            Err(EditError::ReadOnlyField {
                row: "bodywork",
                field: "quantity",
            })
        );
        assert_eq!(quote, before);
    }

    #[test]
    fn apply_general_field_does_not_change_totals() {
        let mut quote = test_quote();
        let totals = quote.totals.clone();

        QuoteEdit::SetGeneral(GeneralField::Client, "Rossi".to_string())
            .apply(&mut quote)
            .unwrap();

        assert_eq!(quote.general.client, "Rossi");
        assert_eq!(quote.totals, totals);
    }
}
