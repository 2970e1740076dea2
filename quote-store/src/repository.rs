use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::UserDirs;
use quote_core::store::search::{query_terms, score_document, sort_hits};
use quote_core::{QuoteDocument, QuoteRepository, QuoteSummary, SearchHit, StoreError};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::names::sanitize_name;

/// Folder created under the user's documents directory by default.
pub const DEFAULT_DIR_NAME: &str = "preventivi-officina";

const EXTENSION: &str = "json";

/// Quotes stored as pretty-printed JSON files in one flat directory.
pub struct FsQuoteRepository {
    base_dir: PathBuf,
}

impl FsQuoteRepository {
    /// Opens (creating it if needed) a store rooted at `base_dir`.
    pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|source| io_error(&base_dir, source))?;

        info!(dir = %base_dir.display(), "Opened quote store");
        Ok(Self { base_dir })
    }

    /// Opens the store in [`FsQuoteRepository::default_dir`].
    pub async fn open_default() -> Result<Self, StoreError> {
        let dir = Self::default_dir().ok_or(StoreError::NoDefaultDir)?;
        Self::open(dir).await
    }

    /// `<documents>/preventivi-officina`, falling back to `~/Documents`
    /// on platforms that do not report a documents directory.
    pub fn default_dir() -> Option<PathBuf> {
        UserDirs::new().map(|dirs| {
            dirs.document_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dirs.home_dir().join("Documents"))
                .join(DEFAULT_DIR_NAME)
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path of the file backing `name`.
    pub fn path_for(
        &self,
        name: &str,
    ) -> Result<PathBuf, StoreError> {
        let stem = sanitize_name(name)?;
        Ok(self.base_dir.join(format!("{stem}.{EXTENSION}")))
    }

    async fn load(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<QuoteDocument, StoreError> {
        let text = fs::read_to_string(path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound(name.to_string())
            } else {
                io_error(path, source)
            }
        })?;

        QuoteDocument::from_json(&text).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every readable quote with its preview, in directory order.
    async fn load_all(&self) -> Result<Vec<(QuoteSummary, QuoteDocument)>, StoreError> {
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|source| io_error(&self.base_dir, source))?;

        let mut quotes = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_error(&self.base_dir, source))?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string) else {
                warn!(file = %path.display(), "Skipping quote with a non UTF-8 name");
                continue;
            };

            let modified = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => {
                    metadata.modified().ok().map(DateTime::<Utc>::from)
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable quote");
                    continue;
                }
            };

            match self.load(&name, &path).await {
                Ok(quote) => {
                    let summary = QuoteSummary::from_document(name, &quote, modified);
                    quotes.push((summary, quote));
                }
                Err(e) => warn!(file = %path.display(), error = %e, "Skipping unreadable quote"),
            }
        }

        debug!(count = quotes.len(), "Loaded stored quotes");
        Ok(quotes)
    }
}

fn io_error(
    path: &Path,
    source: std::io::Error,
) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl QuoteRepository for FsQuoteRepository {
    async fn list(&self) -> Result<Vec<QuoteSummary>, StoreError> {
        let mut summaries: Vec<QuoteSummary> = self
            .load_all()
            .await?
            .into_iter()
            .map(|(summary, _)| summary)
            .collect();

        // Newest first; `None` sorts last.
        summaries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        Ok(summaries)
    }

    async fn read(&self, name: &str) -> Result<QuoteDocument, StoreError> {
        let path = self.path_for(name)?;
        let quote = self.load(name, &path).await?;

        debug!(file = %path.display(), "Read quote");
        Ok(quote)
    }

    async fn write(
        &self,
        name: &str,
        quote: &QuoteDocument,
    ) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name)?;
        let json = quote.to_pretty_json().map_err(StoreError::Serialize)?;

        // Atomic write: tmp file + rename
        let tmp_path = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&tmp_path, json)
            .await
            .map_err(|source| io_error(&tmp_path, source))?;
        if let Err(source) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(io_error(&path, source));
        }

        info!(file = %path.display(), "Saved quote");
        Ok(path)
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound(name.to_string())
            } else {
                io_error(&path, source)
            }
        })?;

        info!(file = %path.display(), "Deleted quote");
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        fs::try_exists(&path)
            .await
            .map_err(|source| io_error(&path, source))
    }

    async fn rename(
        &self,
        from: &str,
        to: &str,
    ) -> Result<(), StoreError> {
        let from_path = self.path_for(from)?;
        let to_path = self.path_for(to)?;

        if !self.exists(from).await? {
            return Err(StoreError::NotFound(from.to_string()));
        }
        if from_path == to_path {
            return Ok(());
        }
        if self.exists(to).await? {
            return Err(StoreError::AlreadyExists(to.to_string()));
        }

        fs::rename(&from_path, &to_path)
            .await
            .map_err(|source| io_error(&from_path, source))?;

        info!(from = %from_path.display(), to = %to_path.display(), "Renamed quote");
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, StoreError> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .load_all()
            .await?
            .into_iter()
            .filter_map(|(summary, quote)| {
                score_document(&terms, &summary.name, &quote).map(|score| SearchHit { summary, score })
            })
            .collect();
        sort_hits(&mut hits);

        debug!(query = %query, hits = hits.len(), "Searched quotes");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote_core::{LineItem, recalculated};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    async fn setup_store() -> (TempDir, FsQuoteRepository) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo = FsQuoteRepository::open(dir.path())
            .await
            .expect("Failed to open store");
        (dir, repo)
    }

    fn test_quote(
        client: &str,
        plate: &str,
    ) -> QuoteDocument {
        let mut quote = QuoteDocument::default();
        quote.general.client = client.to_string();
        quote.general.license_plate = plate.to_string();
        quote.items.push(LineItem::new("Paraurti", dec!(1), dec!(100)));
        recalculated(quote)
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join(DEFAULT_DIR_NAME);

        let repo = FsQuoteRepository::open(&nested).await.expect("Should open store");

        assert!(nested.is_dir());
        assert_eq!(repo.base_dir(), nested.as_path());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let (_dir, repo) = setup_store().await;
        let quote = test_quote("Rossi", "AB123CD");

        let path = repo.write("rossi.json", &quote).await.expect("Should write quote");
        let read = repo.read("rossi").await.expect("Should read quote");

        assert_eq!(path.file_name().unwrap(), "rossi.json");
        assert_eq!(read, quote);
    }

    #[tokio::test]
    async fn test_write_is_pretty_printed_and_leaves_no_tmp_file() {
        let (dir, repo) = setup_store().await;

        let path = repo.write("rossi", &test_quote("Rossi", "")).await.unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("{\n  \"general\""));
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let (_dir, repo) = setup_store().await;
        repo.write("q", &test_quote("Rossi", "")).await.unwrap();

        repo.write("q", &test_quote("Bianchi", "")).await.unwrap();

        assert_eq!(repo.read("q").await.unwrap().general.client, "Bianchi");
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let (_dir, repo) = setup_store().await;

        let result = repo.read("missing").await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_invalid_json() {
        let (dir, repo) = setup_store().await;
        std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();

        let result = repo.read("broken").await;

        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_invalid_name_is_rejected() {
        let (_dir, repo) = setup_store().await;

        let result = repo.write("..", &QuoteDocument::default()).await;

        assert!(matches!(result, Err(StoreError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let (_dir, repo) = setup_store().await;
        repo.write("q", &test_quote("Rossi", "")).await.unwrap();

        assert!(repo.exists("q").await.unwrap());
        repo.delete("q").await.expect("Should delete quote");
        assert!(!repo.exists("q").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let (_dir, repo) = setup_store().await;

        let result = repo.delete("q").await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rename() {
        let (_dir, repo) = setup_store().await;
        repo.write("old", &test_quote("Rossi", "")).await.unwrap();

        repo.rename("old", "new.json").await.expect("Should rename quote");

        assert!(!repo.exists("old").await.unwrap());
        assert_eq!(repo.read("new").await.unwrap().general.client, "Rossi");
    }

    #[tokio::test]
    async fn test_rename_errors() {
        let (_dir, repo) = setup_store().await;
        repo.write("a", &test_quote("Rossi", "")).await.unwrap();
        repo.write("b", &test_quote("Bianchi", "")).await.unwrap();

        let missing = repo.rename("c", "d").await;
        let taken = repo.rename("a", "b").await;

        assert!(matches!(missing, Err(StoreError::NotFound(_))));
        assert!(matches!(taken, Err(StoreError::AlreadyExists(_))));
        assert_eq!(repo.read("b").await.unwrap().general.client, "Bianchi");
    }

    #[tokio::test]
    async fn test_list_skips_bad_files() {
        let (dir, repo) = setup_store().await;
        repo.write("good", &test_quote("Rossi", "AB123CD")).await.unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("folder.json")).unwrap();

        let list = repo.list().await.expect("Should list quotes");

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "good");
        assert_eq!(list[0].general.license_plate, "AB123CD");
        assert_eq!(list[0].total_with_iva, dec!(122.00));
        assert!(list[0].modified.is_some());
    }

    #[tokio::test]
    async fn test_every_listed_name_reads_back() {
        let (_dir, repo) = setup_store().await;
        let long_with_dot = format!("{}.zeta", "x".repeat(crate::names::MAX_NAME_LEN - 1));
        for name in ["a.json.json", "  ..Rossi.. ", long_with_dot.as_str()] {
            repo.write(name, &test_quote("Rossi", "")).await.unwrap();
        }

        let list = repo.list().await.expect("Should list quotes");

        assert_eq!(list.len(), 3);
        for summary in &list {
            let quote = repo.read(&summary.name).await.expect("Listed name should read back");
            assert_eq!(quote.general.client, "Rossi");
            assert!(repo.exists(&summary.name).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_search_ranks_hits() {
        let (_dir, repo) = setup_store().await;
        repo.write("plate", &test_quote("", "ROSSI1")).await.unwrap();
        repo.write("client", &test_quote("Rossi", "")).await.unwrap();
        repo.write("other", &test_quote("Bianchi", "")).await.unwrap();

        let hits = repo.search("rossi").await.expect("Should search");

        let names: Vec<_> = hits.iter().map(|h| h.summary.name.as_str()).collect();
        // client exact: 4 + 2; plate contains: 5
        assert_eq!(names, vec!["client", "plate"]);
        assert_eq!(hits[0].score, 6);
        assert_eq!(hits[1].score, 5);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let (_dir, repo) = setup_store().await;
        repo.write("q", &test_quote("Rossi", "")).await.unwrap();

        let hits = repo.search("   ").await.unwrap();

        assert!(hits.is_empty());
    }
}
