//! The quote being worked on.
//!
//! Holds one document between loading and saving, so edits can be applied
//! one after another and written back once.

use std::path::PathBuf;

use quote_core::{
    EditError, QuoteDocument, QuoteEdit, QuoteRepository, StoreError, naming::suggest_file_stem,
    recalculate,
};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct QuoteSession {
    quote: QuoteDocument,
    /// Set by any applied edit, cleared by a save.
    dirty: bool,
    /// Name the document was last loaded from or saved under.
    last_saved: Option<String>,
}

impl QuoteSession {
    /// A session on a blank quote dated today.
    pub fn new() -> Self {
        Self {
            quote: QuoteDocument::new(),
            ..Default::default()
        }
    }

    /// Loads `name` and brings its derived values up to date. Loading does
    /// not count as an edit.
    pub async fn open(
        repo: &dyn QuoteRepository,
        name: &str,
    ) -> Result<Self, StoreError> {
        let mut quote = repo.read(name).await?;
        recalculate(&mut quote);

        Ok(Self {
            quote,
            dirty: false,
            last_saved: Some(name.to_string()),
        })
    }

    pub fn quote(&self) -> &QuoteDocument {
        &self.quote
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved(&self) -> Option<&str> {
        self.last_saved.as_deref()
    }

    /// Applies `edit`. A rejected edit leaves the session unchanged.
    pub fn apply(
        &mut self,
        edit: QuoteEdit,
    ) -> Result<(), EditError> {
        edit.apply(&mut self.quote)?;
        self.dirty = true;
        Ok(())
    }

    /// Marks the session dirty after an explicit recalculation.
    pub fn recalculate(&mut self) {
        recalculate(&mut self.quote);
        self.dirty = true;
    }

    /// The name [`QuoteSession::save`] uses when none is given.
    pub fn default_name(&self) -> String {
        self.last_saved
            .clone()
            .unwrap_or_else(|| suggest_file_stem(&self.quote.general))
    }

    /// Writes the document under `name`, or [`QuoteSession::default_name`].
    pub async fn save(
        &mut self,
        repo: &dyn QuoteRepository,
        name: Option<&str>,
    ) -> Result<PathBuf, StoreError> {
        let name = name.map_or_else(|| self.default_name(), str::to_string);
        let path = repo.write(&name, &self.quote).await?;

        info!(name = %name, file = %path.display(), "Saved quote");
        self.dirty = false;
        self.last_saved = Some(name);
        Ok(path)
    }

    /// Start over with a blank quote.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote_core::{GeneralField, LineItem};
    use quote_store::FsQuoteRepository;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn edit_marks_dirty() {
        let mut session = QuoteSession::new();
        assert!(!session.is_dirty());

        session
            .apply(QuoteEdit::AddItem(LineItem::new("Faro", dec!(1), dec!(80))))
            .expect("Should add item");

        assert!(session.is_dirty());
        assert_eq!(session.quote().totals.total_with_iva, dec!(97.60));
    }

    #[test]
    fn rejected_edit_keeps_clean_state() {
        let mut session = QuoteSession::new();

        let result = session.apply(QuoteEdit::RemoveItem(0));

        assert!(matches!(result, Err(EditError::ItemOutOfRange { index: 0, len: 0 })));
        assert!(!session.is_dirty());
    }

    #[test]
    fn default_name_follows_details() {
        let mut session = QuoteSession::new();
        session
            .apply(QuoteEdit::SetGeneral(GeneralField::LicensePlate, "AB123CD".into()))
            .unwrap();
        session
            .apply(QuoteEdit::SetGeneral(GeneralField::Model, "Panda".into()))
            .unwrap();
        session
            .apply(QuoteEdit::SetGeneral(GeneralField::QuoteDate, "2024-03-07".into()))
            .unwrap();

        assert_eq!(session.default_name(), "AB123CD_Panda_2024-03-07");
    }

    #[tokio::test]
    async fn save_clears_dirty_and_remembers_name() {
        let dir = TempDir::new().unwrap();
        let repo = FsQuoteRepository::open(dir.path()).await.unwrap();
        let mut session = QuoteSession::new();
        session
            .apply(QuoteEdit::SetGeneral(GeneralField::Client, "Rossi".into()))
            .unwrap();

        let path = session
            .save(&repo, Some("rossi"))
            .await
            .expect("Should save");

        assert!(path.ends_with("rossi.json"));
        assert!(!session.is_dirty());
        assert_eq!(session.last_saved(), Some("rossi"));
        assert_eq!(session.default_name(), "rossi");
    }

    #[tokio::test]
    async fn open_recalculates_without_dirtying() {
        let dir = TempDir::new().unwrap();
        let repo = FsQuoteRepository::open(dir.path()).await.unwrap();
        let mut stale = QuoteDocument::default();
        stale.items.push(LineItem::new("Specchietto", dec!(2), dec!(30)));
        repo.write("stale", &stale).await.unwrap();

        let session = QuoteSession::open(&repo, "stale").await.expect("Should open");

        assert_eq!(session.quote().items[0].total, dec!(60.00));
        assert_eq!(session.quote().complementary.parts_total.total, dec!(60.00));
        assert!(!session.is_dirty());
        assert_eq!(session.last_saved(), Some("stale"));
    }

    #[test]
    fn clear_starts_over() {
        let mut session = QuoteSession::new();
        session
            .apply(QuoteEdit::AddItem(LineItem::new("Faro", dec!(1), dec!(80))))
            .unwrap();

        session.clear();

        assert!(session.quote().items.is_empty());
        assert!(!session.is_dirty());
        assert_eq!(session.last_saved(), None);
    }
}
