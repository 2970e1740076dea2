//! Recalculation of a quote's derived fields.
//!
//! # Steps
//!
//! | Step | Result |
//! |------|--------|
//! | 1    | each item: `total = quantity x price` |
//! | 2    | `partsTotal`: `total = taxable = sum of item totals`, VAT on top |
//! | 3    | `bodywork.quantity = sum(SR + LA + VE)` |
//! | 4    | `mechanics.quantity = sum(ME)` |
//! | 5    | `consumables.quantity = sum(VE)` |
//! | 6    | `parts`, `bodywork`, `mechanics`, `consumables`: `total = quantity x price`, VAT on top |
//! | 7    | `subtotal`, `iva` and `totalWithIva` over the five rows |
//!
//! `VE` hours are billed twice on purpose: once as bodywork labour and once
//! as consumable materials.
//!
//! Every derived amount is rounded to cents as soon as it is computed, so a
//! second pass over the output reproduces it exactly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use quote_core::{LineItem, QuoteCalculator, QuoteDocument};
//!
//! let mut quote = QuoteDocument::default();
//! quote.items.push(LineItem::new("Paraurti anteriore", dec!(1), dec!(100)));
//!
//! QuoteCalculator::new().recalculate(&mut quote);
//!
//! assert_eq!(quote.complementary.parts_total.total, dec!(100.00));
//! assert_eq!(quote.totals.iva, dec!(22.00));
//! assert_eq!(quote.totals.total_with_iva, dec!(122.00));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{percentage_of, round_half_up, sum};
use crate::models::{ComplementaryRow, ComplementaryRows, LineItem, QuoteDocument, QuoteTotals, RowKind};

/// Labour hours summed across all line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabourQuantities {
    /// `SR + LA + VE`
    pub bodywork: Decimal,
    /// `ME`
    pub mechanics: Decimal,
    /// `VE`
    pub consumables: Decimal,
}

/// Stateless calculator for quote documents.
///
/// Recalculation is total: it never fails and never panics, whatever the
/// document holds. Overflowing amounts saturate at the decimal bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteCalculator;

impl QuoteCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Recomputes every derived field of `quote` from its raw inputs.
    pub fn recalculate(
        &self,
        quote: &mut QuoteDocument,
    ) {
        for item in &mut quote.items {
            item.total = self.item_total(item);
        }

        let parts_sum = self.parts_sum(&quote.items);
        self.apply_parts_total(&mut quote.complementary.parts_total, parts_sum);

        let labour = self.labour_quantities(&quote.items);
        quote.complementary.bodywork.quantity = labour.bodywork;
        quote.complementary.mechanics.quantity = labour.mechanics;
        quote.complementary.consumables.quantity = labour.consumables;

        for kind in RowKind::PRICED {
            self.apply_priced_row(quote.complementary.get_mut(kind));
        }

        quote.totals = self.totals(&quote.complementary);
    }

    /// Calculates a line item's total.
    fn item_total(
        &self,
        item: &LineItem,
    ) -> Decimal {
        round_half_up(item.quantity.saturating_mul(item.price))
    }

    /// Sums the (already computed) item totals.
    fn parts_sum(
        &self,
        items: &[LineItem],
    ) -> Decimal {
        round_half_up(sum(items.iter().map(|item| item.total)))
    }

    /// Sums labour hours per complementary category.
    fn labour_quantities(
        &self,
        items: &[LineItem],
    ) -> LabourQuantities {
        LabourQuantities {
            bodywork: round_half_up(sum(items.iter().map(LineItem::bodywork_hours))),
            mechanics: round_half_up(sum(items.iter().map(|item| item.me))),
            consumables: round_half_up(sum(items.iter().map(|item| item.ve))),
        }
    }

    /// Fills the `partsTotal` row from the sum of item totals.
    fn apply_parts_total(
        &self,
        row: &mut ComplementaryRow,
        parts_sum: Decimal,
    ) {
        row.quantity = Decimal::ZERO;
        row.price = Decimal::ZERO;
        self.apply_amounts(row, parts_sum);
    }

    /// Fills a `quantity x price` row.
    fn apply_priced_row(
        &self,
        row: &mut ComplementaryRow,
    ) {
        let total = round_half_up(row.quantity.saturating_mul(row.price));
        self.apply_amounts(row, total);
    }

    /// Sets the taxable amount and the VAT on top of it.
    fn apply_amounts(
        &self,
        row: &mut ComplementaryRow,
        total: Decimal,
    ) {
        let tax_amount = percentage_of(total, row.tax);

        row.total = total;
        row.taxable = total;
        row.tax_amount = tax_amount;
        row.total_with_tax = round_half_up(total.saturating_add(tax_amount));
    }

    /// Calculates the grand totals over the five rows.
    fn totals(
        &self,
        rows: &ComplementaryRows,
    ) -> QuoteTotals {
        let subtotal = round_half_up(sum(rows.iter().map(|(_, row)| row.total)));
        let iva = round_half_up(sum(rows.iter().map(|(_, row)| row.tax_amount)));

        QuoteTotals {
            subtotal,
            iva,
            total_with_iva: round_half_up(subtotal.saturating_add(iva)),
        }
    }
}

/// Recomputes `quote` in place with the default calculator.
pub fn recalculate(quote: &mut QuoteDocument) {
    QuoteCalculator::new().recalculate(quote);
}

/// By-value form of [`recalculate`].
pub fn recalculated(mut quote: QuoteDocument) -> QuoteDocument {
    recalculate(&mut quote);
    quote
}
