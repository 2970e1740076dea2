pub mod repository;
pub mod search;

pub use repository::{QuoteRepository, QuoteSummary, SearchHit, StoreError};
