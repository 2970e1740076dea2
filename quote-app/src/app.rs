//! Command handlers behind the `quote-manager` binary.
//!
//! Each handler loads what it needs from the store, does its work and
//! returns the text to print, so the binary only parses arguments and
//! prints.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use quote_core::{
    GeneralField, LineItem, QuoteDocument, QuoteEdit, QuoteRepository, QuoteSummary, RowKind,
};
use quote_export::{
    Language, PdfOptions, default_pdf_name, export_json, export_pdf, format_money,
    format_quantity,
};
use tracing::{debug, info};

use crate::session::QuoteSession;

pub struct App {
    repo: Box<dyn QuoteRepository>,
    language: Language,
}

impl App {
    pub fn new(
        repo: Box<dyn QuoteRepository>,
        language: Language,
    ) -> Self {
        Self { repo, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    // ─── store commands ─────────────────────────────────────────────────────

    /// Creates a quote, applies `edits` and saves it under `name` or the
    /// suggested file stem. Refuses to replace an existing quote.
    pub async fn create(
        &self,
        name: Option<&str>,
        edits: Vec<QuoteEdit>,
    ) -> Result<String> {
        let mut session = QuoteSession::new();
        for edit in edits {
            session.apply(edit)?;
        }

        let name = name.map_or_else(|| session.default_name(), str::to_string);
        if self.repo.exists(&name).await? {
            bail!("A quote named '{name}' already exists");
        }

        let path = session
            .save(&*self.repo, Some(&name))
            .await
            .with_context(|| format!("Failed to save new quote '{name}'"))?;
        Ok(format!("Created {}", path.display()))
    }

    pub async fn list(&self) -> Result<String> {
        let summaries = self.repo.list().await.context("Failed to list quotes")?;
        if summaries.is_empty() {
            return Ok("No quotes saved yet.".to_string());
        }

        let mut out = self.summary_header(None);
        for summary in &summaries {
            self.summary_row(&mut out, summary, None);
        }
        Ok(out)
    }

    pub async fn search(
        &self,
        query: &str,
    ) -> Result<String> {
        let hits = self
            .repo
            .search(query)
            .await
            .with_context(|| format!("Search for '{query}' failed"))?;
        debug!(query, hits = hits.len(), "search finished");
        if hits.is_empty() {
            return Ok(format!("No quotes match '{}'.", query.trim()));
        }

        let mut out = self.summary_header(Some("SCORE"));
        for hit in &hits {
            self.summary_row(&mut out, &hit.summary, Some(hit.score));
        }
        Ok(out)
    }

    /// Full recalculated view of one quote.
    pub async fn show(
        &self,
        name: &str,
    ) -> Result<String> {
        let session = self.open(name).await?;
        Ok(render_quote(name, session.quote(), self.language))
    }

    /// Applies `edits` in order and saves once. Nothing is saved if any
    /// edit is rejected.
    pub async fn edit(
        &self,
        name: &str,
        edits: Vec<QuoteEdit>,
    ) -> Result<String> {
        let mut session = self.open(name).await?;
        let count = edits.len();
        for edit in edits {
            session
                .apply(edit)
                .with_context(|| format!("Could not edit '{name}'"))?;
        }

        self.save(&mut session, name).await?;
        info!(name, edits = count, "Quote edited");
        Ok(format!(
            "Updated {name}: {}",
            format_money(session.quote().totals.total_with_iva, self.language)
        ))
    }

    pub async fn add_item(
        &self,
        name: &str,
        item: LineItem,
    ) -> Result<String> {
        let mut session = self.open(name).await?;
        session.apply(QuoteEdit::AddItem(item))?;
        self.save(&mut session, name).await?;

        let quote = session.quote();
        Ok(format!(
            "Added item {} to {name}: {}",
            quote.items.len() - 1,
            format_money(quote.totals.total_with_iva, self.language)
        ))
    }

    pub async fn remove_item(
        &self,
        name: &str,
        index: usize,
    ) -> Result<String> {
        let mut session = self.open(name).await?;
        session
            .apply(QuoteEdit::RemoveItem(index))
            .with_context(|| format!("Could not remove item {index} from '{name}'"))?;
        self.save(&mut session, name).await?;

        Ok(format!(
            "Removed item {index} from {name}: {}",
            format_money(session.quote().totals.total_with_iva, self.language)
        ))
    }

    /// Rewrites a stored quote with its derived values brought up to date.
    pub async fn recalc(
        &self,
        name: &str,
    ) -> Result<String> {
        let mut session = self.open(name).await?;
        session.recalculate();
        self.save(&mut session, name).await?;

        Ok(format!(
            "Recalculated {name}: {}",
            format_money(session.quote().totals.total_with_iva, self.language)
        ))
    }

    pub async fn rename(
        &self,
        from: &str,
        to: &str,
    ) -> Result<String> {
        self.repo
            .rename(from, to)
            .await
            .with_context(|| format!("Failed to rename '{from}' to '{to}'"))?;
        Ok(format!("Renamed {from} to {to}"))
    }

    pub async fn delete(
        &self,
        name: &str,
    ) -> Result<String> {
        self.repo
            .delete(name)
            .await
            .with_context(|| format!("Failed to delete '{name}'"))?;
        Ok(format!("Deleted {name}"))
    }

    // ─── export commands ────────────────────────────────────────────────────

    /// Exports to `target`, or to `<name>.json` inside it when it is a
    /// directory.
    pub async fn export_json(
        &self,
        name: &str,
        target: &Path,
    ) -> Result<PathBuf> {
        let session = self.open(name).await?;
        let path = if target.is_dir() {
            target.join(format!("{name}.json"))
        } else {
            target.to_path_buf()
        };

        export_json(session.quote(), &path)
            .with_context(|| format!("Failed to export '{name}' as JSON"))?;
        Ok(path)
    }

    /// Exports to `target`, or to the suggested PDF name inside it when it
    /// is a directory. The suggested name uses the printed details, so an
    /// anonymized export is not named after the client.
    pub async fn export_pdf(
        &self,
        name: &str,
        target: &Path,
        options: &PdfOptions,
    ) -> Result<PathBuf> {
        let session = self.open(name).await?;
        let path = if target.is_dir() {
            let file_name = if options.anonymize {
                default_pdf_name(&quote_export::anonymized(session.quote()).general)
            } else {
                default_pdf_name(&session.quote().general)
            };
            target.join(file_name)
        } else {
            target.to_path_buf()
        };

        export_pdf(session.quote(), &path, options)
            .with_context(|| format!("Failed to export '{name}' as PDF"))?;
        Ok(path)
    }

    // ─── helpers ────────────────────────────────────────────────────────────

    async fn open(
        &self,
        name: &str,
    ) -> Result<QuoteSession> {
        QuoteSession::open(&*self.repo, name)
            .await
            .with_context(|| format!("Failed to open quote '{name}'"))
    }

    async fn save(
        &self,
        session: &mut QuoteSession,
        name: &str,
    ) -> Result<PathBuf> {
        session
            .save(&*self.repo, Some(name))
            .await
            .with_context(|| format!("Failed to save quote '{name}'"))
    }

    fn summary_header(
        &self,
        extra: Option<&str>,
    ) -> String {
        let labels = self.language.labels();
        let mut out = format!(
            "{:<32} {:<20} {:<10} {:<16} {:<12} {:>14}",
            "NAME",
            labels.client.to_uppercase(),
            labels.license_plate.to_uppercase(),
            labels.model.to_uppercase(),
            labels.quote_date.to_uppercase(),
            labels.total.to_uppercase(),
        );
        if let Some(extra) = extra {
            let _ = write!(out, " {extra:>6}");
        }
        out.push('\n');
        out
    }

    fn summary_row(
        &self,
        out: &mut String,
        summary: &QuoteSummary,
        score: Option<u32>,
    ) {
        let general = &summary.general;
        let _ = write!(
            out,
            "{:<32} {:<20} {:<10} {:<16} {:<12} {:>14}",
            truncate(&summary.name, 32),
            truncate(&general.client, 20),
            truncate(&general.license_plate, 10),
            truncate(&general.model, 16),
            truncate(&general.quote_date, 12),
            format_money(summary.total_with_iva, self.language),
        );
        if let Some(score) = score {
            let _ = write!(out, " {score:>6}");
        }
        out.push('\n');
    }
}

/// Text rendering of a quote in the given language.
pub fn render_quote(
    name: &str,
    quote: &QuoteDocument,
    language: Language,
) -> String {
    let labels = language.labels();
    let money = |amount| format_money(amount, language);
    let qty = |value| format_quantity(value, language);
    let mut out = String::new();

    let _ = writeln!(out, "{}: {name}", labels.title);
    for field in GeneralField::ALL {
        let _ = writeln!(out, "  {:<22} {}", labels.general(field), quote.general.get(field));
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{:>3}  {:<14} {:<30} {:>4} {:>4} {:>4} {:>4} {:>6} {:>12} {:>12}",
        "#",
        labels.source,
        labels.description,
        "SR",
        "LA",
        "VE",
        "ME",
        labels.quantity,
        labels.price,
        labels.total
    );
    for (index, item) in quote.items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<14} {:<30} {:>4} {:>4} {:>4} {:>4} {:>6} {:>12} {:>12}",
            index,
            truncate(&item.source, 14),
            truncate(&item.description, 30),
            qty(item.sr),
            qty(item.la),
            qty(item.ve),
            qty(item.me),
            qty(item.quantity),
            money(item.price),
            money(item.total)
        );
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{:<24} {:>6} {:>12} {:>12} {:>6} {:>12} {:>14}",
        "",
        labels.quantity,
        labels.price,
        labels.taxable,
        labels.tax_percentage,
        labels.tax_amount,
        labels.total_with_tax
    );
    for (kind, row) in quote.complementary.iter() {
        let (quantity, price) = if kind == RowKind::PartsTotal {
            (String::new(), String::new())
        } else {
            (qty(row.quantity), money(row.price))
        };
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>12} {:>12} {:>6} {:>12} {:>14}",
            labels.row(kind),
            quantity,
            price,
            money(row.taxable),
            qty(row.tax),
            money(row.tax_amount),
            money(row.total_with_tax)
        );
    }

    out.push('\n');
    let _ = writeln!(out, "{:<24} {:>14}", labels.subtotal, money(quote.totals.subtotal));
    let _ = writeln!(out, "{:<24} {:>14}", labels.total_tax, money(quote.totals.iva));
    let _ = write!(
        out,
        "{:<24} {:>14}",
        labels.final_total,
        money(quote.totals.total_with_iva)
    );
    out
}

/// Pairs `path value path value ...` arguments into edits.
pub fn parse_assignments(args: &[String]) -> Result<Vec<QuoteEdit>> {
    if args.len() % 2 != 0 {
        bail!("Expected <path> <value> pairs, got {} arguments", args.len());
    }

    args.chunks_exact(2)
        .map(|pair| {
            QuoteEdit::parse(&pair[0], &pair[1])
                .with_context(|| format!("Cannot set '{}'", pair[0]))
        })
        .collect()
}

fn truncate(
    text: &str,
    width: usize,
) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
