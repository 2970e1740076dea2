use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{GeneralInfo, QuoteDocument};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Quote not found: {0}")]
    NotFound(String),

    #[error("Quote already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid quote name: {0:?}")]
    InvalidName(String),

    #[error("Could not determine the user's documents directory")]
    NoDefaultDir,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize quote: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Preview of a stored quote, enough to pick one from a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSummary {
    /// Stored name without the `.json` extension.
    pub name: String,
    pub general: GeneralInfo,
    /// As stored; not recalculated.
    pub total_with_iva: Decimal,
    pub modified: Option<DateTime<Utc>>,
}

impl QuoteSummary {
    pub fn from_document(
        name: impl Into<String>,
        quote: &QuoteDocument,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            general: quote.general.clone(),
            total_with_iva: quote.totals.total_with_iva,
            modified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub summary: QuoteSummary,
    pub score: u32,
}

/// Persistence for quote documents, addressed by name.
///
/// Names are sanitized by the implementation; a name that sanitizes to
/// nothing is rejected with [`StoreError::InvalidName`].
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Every stored quote, newest first. Unreadable entries are skipped.
    async fn list(&self) -> Result<Vec<QuoteSummary>, StoreError>;

    /// Loads a quote as stored, without recalculating it.
    async fn read(&self, name: &str) -> Result<QuoteDocument, StoreError>;

    /// Creates or replaces a quote and returns the path written.
    async fn write(
        &self,
        name: &str,
        quote: &QuoteDocument,
    ) -> Result<PathBuf, StoreError>;

    async fn delete(&self, name: &str) -> Result<(), StoreError>;

    async fn exists(&self, name: &str) -> Result<bool, StoreError>;

    async fn rename(
        &self,
        from: &str,
        to: &str,
    ) -> Result<(), StoreError>;

    /// Quotes matching every term of `query`, best match first.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, StoreError>;
}
