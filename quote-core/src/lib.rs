pub mod calculations;
pub mod edit;
pub mod lenient;
pub mod models;
pub mod naming;
pub mod store;

pub use calculations::{QuoteCalculator, recalculate, recalculated};
pub use edit::{ComplementaryField, EditError, ItemNumberField, ItemTextField, QuoteEdit};
pub use models::*;
pub use store::{QuoteRepository, QuoteSummary, SearchHit, StoreError};
