use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use quote_core::{LineItem, lenient::parse_decimal};
use quote_export::{Language, PdfOptions};
use quote_store::FsQuoteRepository;

use quote_app::{App, AppConfig, app::parse_assignments, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Body-shop quote manager.
///
/// Keeps repair quotes as JSON files, recalculates their totals and exports
/// them as JSON or PDF.
#[derive(Debug, Parser)]
#[command(name = "quote-manager", version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: config.toml in the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the quotes.
    #[arg(long, global = true)]
    quotes_dir: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `quote_store=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new quote, optionally setting fields right away.
    New {
        /// Name to save under (default: suggested from plate, model and date).
        #[arg(long)]
        name: Option<String>,

        /// `<path> <value>` pairs, e.g. `general.client "Mario Rossi"`.
        #[arg(num_args = 0.., allow_hyphen_values = true, value_names = ["PATH", "VALUE"])]
        assignments: Vec<String>,
    },

    /// List stored quotes, newest first.
    List,

    /// Find quotes matching every word of the query.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Print a quote with recalculated totals.
    Show { name: String },

    /// Set fields by path and save, e.g. `set rossi items[0].price 12,50`.
    Set {
        name: String,

        #[arg(
            required = true,
            num_args = 2..,
            allow_hyphen_values = true,
            value_names = ["PATH", "VALUE"]
        )]
        assignments: Vec<String>,
    },

    /// Append a line item.
    AddItem {
        name: String,
        description: String,

        #[arg(long, short, default_value = "1")]
        quantity: String,

        #[arg(long, short, default_value = "0")]
        price: String,

        /// Price-list reference.
        #[arg(long, default_value = "")]
        source: String,

        /// Bodywork hours: removal and refit.
        #[arg(long, default_value = "0")]
        sr: String,

        /// Bodywork hours: panel work.
        #[arg(long, default_value = "0")]
        la: String,

        /// Painting hours.
        #[arg(long, default_value = "0")]
        ve: String,

        /// Mechanics hours.
        #[arg(long, default_value = "0")]
        me: String,
    },

    /// Remove the line item at a zero-based index.
    RemoveItem { name: String, index: usize },

    /// Recalculate a stored quote and save it.
    Recalc { name: String },

    /// Rename a stored quote; fails if the new name is taken.
    Rename { from: String, to: String },

    Delete { name: String },

    /// Write the recalculated quote as JSON to a file or directory.
    ExportJson { name: String, path: PathBuf },

    /// Print the quote to a PDF file or directory.
    ExportPdf {
        name: String,
        path: PathBuf,

        /// Label language (default from configuration).
        #[arg(long)]
        lang: Option<Language>,

        /// Hide client, plate, chassis and insurer.
        #[arg(long)]
        anonymize: bool,
    },
}

// ─── setup ───────────────────────────────────────────────────────────────────

/// Configuration file, then environment, then flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(dir) = &cli.quotes_dir {
        config.quotes_dir = Some(dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.log_file = Some(file.clone());
    }
    Ok(config)
}

fn apply_logging(
    config: &AppConfig,
    level_from_flag: bool,
) -> Result<()> {
    if level_from_flag || !logging::env_filter_overrides() {
        logging::set_log_level(&config.log_level)?;
    }
    if let Some(file) = &config.log_file {
        logging::enable_file_logging(file)?;
    }
    Ok(())
}

async fn open_store(config: &AppConfig) -> Result<FsQuoteRepository> {
    let repo = match &config.quotes_dir {
        Some(dir) => FsQuoteRepository::open(dir).await,
        None => FsQuoteRepository::open_default().await,
    };
    repo.context("Failed to open the quotes directory")
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    apply_logging(&config, cli.log_level.is_some())?;
    debug!(?config, "configuration loaded");

    let repo = open_store(&config).await?;
    let app = App::new(Box::new(repo), config.language);

    let output = run(&app, cli.command).await;
    logging::disable_file_logging();

    println!("{}", output?);
    Ok(())
}

async fn run(
    app: &App,
    command: Command,
) -> Result<String> {
    match command {
        Command::New { name, assignments } => {
            let edits = parse_assignments(&assignments)?;
            app.create(name.as_deref(), edits).await
        }
        Command::List => app.list().await,
        Command::Search { query } => app.search(&query.join(" ")).await,
        Command::Show { name } => app.show(&name).await,
        Command::Set { name, assignments } => {
            let edits = parse_assignments(&assignments)?;
            app.edit(&name, edits).await
        }
        Command::AddItem {
            name,
            description,
            quantity,
            price,
            source,
            sr,
            la,
            ve,
            me,
        } => {
            let item = LineItem {
                source,
                sr: parse_decimal(&sr),
                la: parse_decimal(&la),
                ve: parse_decimal(&ve),
                me: parse_decimal(&me),
                ..LineItem::new(description, parse_decimal(&quantity), parse_decimal(&price))
            };
            app.add_item(&name, item).await
        }
        Command::RemoveItem { name, index } => app.remove_item(&name, index).await,
        Command::Recalc { name } => app.recalc(&name).await,
        Command::Rename { from, to } => app.rename(&from, &to).await,
        Command::Delete { name } => app.delete(&name).await,
        Command::ExportJson { name, path } => {
            let written = app.export_json(&name, &path).await?;
            Ok(format!("Exported {}", written.display()))
        }
        Command::ExportPdf {
            name,
            path,
            lang,
            anonymize,
        } => {
            let options = PdfOptions {
                language: lang.unwrap_or(app.language()),
                anonymize,
            };
            let written = app.export_pdf(&name, &path, &options).await?;
            Ok(format!("Exported {}", written.display()))
        }
    }
}
