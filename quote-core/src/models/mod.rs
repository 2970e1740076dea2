mod complementary;
mod document;
mod general;
mod line_item;
mod totals;

pub use complementary::{ComplementaryRow, ComplementaryRows, RowKind};
pub use document::QuoteDocument;
pub use general::{GeneralField, GeneralInfo};
pub use line_item::LineItem;
pub use totals::QuoteTotals;
